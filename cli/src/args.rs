use clap::Args;
use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use kbnav_protocol::ChildFilter;
use kbnav_protocol::ChildSort;
use kbnav_protocol::ContentFormat;
use kbnav_protocol::DisplayMode;
use kbnav_protocol::SearchScope;
use std::path::PathBuf;

/// Browse a knowledge base served by the document service.
#[derive(Debug, Parser)]
#[command(name = "kbnav", version)]
pub struct Cli {
    /// Document service API base URL (overrides config and KBNAV_API_BASE_URL).
    #[arg(long = "base-url", global = true)]
    pub base_url: Option<String>,

    /// Directory holding config.toml (defaults to $KBNAV_HOME or ~/.kbnav).
    #[arg(long = "kbnav-home", global = true)]
    pub kbnav_home: Option<PathBuf>,

    /// Per-request timeout in seconds.
    #[arg(long = "timeout", global = true)]
    pub timeout_secs: Option<u64>,

    #[arg(long = "format", value_enum, default_value_t = OutputFormat::Text, global = true)]
    pub output_format: OutputFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    #[default]
    Text,
}

/// One line typed into the interactive shell.
#[derive(Debug, Parser)]
#[command(name = "kbnav", no_binary_name = true, disable_version_flag = true)]
pub struct ShellLine {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show the node under the server cursor.
    Current,

    /// Navigate to a node id or a name the server can resolve.
    Go {
        #[arg(value_name = "TARGET")]
        target: String,
    },

    /// Step back through history.
    Back {
        #[arg(value_name = "STEPS", default_value_t = 1)]
        steps: u32,
    },

    /// Step forward through history.
    Forward {
        #[arg(value_name = "STEPS", default_value_t = 1)]
        steps: u32,
    },

    /// Move to an ancestor of the current node.
    Up {
        #[arg(value_name = "LEVELS", default_value_t = 1)]
        levels: u32,
    },

    /// Show navigation history and cursor.
    History,

    /// Re-render the current node with different view options.
    Show(ShowArgs),

    /// List, load, unload or purge document modules.
    #[command(subcommand)]
    Modules(ModulesCommand),

    /// List the children of a node.
    Children(ChildrenArgs),

    /// Full-text search across loaded modules.
    Search(SearchArgs),

    /// Expand or collapse a node in the tree (shell only).
    Toggle {
        #[arg(value_name = "ID")]
        id: String,
    },

    /// Dump the whole navigator state.
    State,

    /// Server status.
    Status,

    /// Show, or change, the backend settings.
    Settings(SettingsArgs),

    /// Interactive session over one navigator.
    Shell,
}

#[derive(Debug, Subcommand)]
pub enum ModulesCommand {
    List,
    Load {
        #[arg(value_name = "NAME")]
        name: String,
    },
    Unload {
        #[arg(value_name = "NAME")]
        name: String,
    },
    Purge,
}

#[derive(Debug, Default, Args)]
pub struct ShowArgs {
    #[arg(long = "content", value_enum)]
    pub content_format: Option<ContentFormatArg>,

    #[arg(long = "depth")]
    pub depth: Option<u8>,

    #[arg(long = "no-content")]
    pub no_content: bool,

    #[arg(long = "no-see-also")]
    pub no_see_also: bool,

    #[arg(long = "metadata")]
    pub show_metadata: bool,

    #[arg(long = "display", value_enum)]
    pub display_mode: Option<DisplayModeArg>,
}

#[derive(Debug, Args)]
pub struct ChildrenArgs {
    #[arg(value_name = "ID")]
    pub id: String,

    #[arg(long = "filter", value_enum, default_value_t = FilterArg::All)]
    pub filter: FilterArg,

    #[arg(long = "sort", value_enum, default_value_t = SortArg::Order)]
    pub sort: SortArg,
}

#[derive(Debug, Args)]
pub struct SearchArgs {
    #[arg(value_name = "QUERY", num_args = 1.., required = true)]
    pub query: Vec<String>,

    #[arg(long = "scope", value_enum, default_value_t = ScopeArg::All)]
    pub scope: ScopeArg,

    #[arg(long = "whole-word")]
    pub whole_word: bool,

    #[arg(long = "case-sensitive")]
    pub case_sensitive: bool,

    #[arg(long = "regex")]
    pub use_regex: bool,
}

#[derive(Debug, Default, Args)]
pub struct SettingsArgs {
    #[arg(long = "home")]
    pub home: Option<String>,

    #[arg(long = "local")]
    pub local: Option<String>,

    #[arg(long = "lang")]
    pub lang: Option<String>,
}

impl SettingsArgs {
    pub fn is_update(&self) -> bool {
        self.home.is_some() || self.local.is_some() || self.lang.is_some()
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum ContentFormatArg {
    Text,
    Markdown,
    Tree,
    Json,
}

impl From<ContentFormatArg> for ContentFormat {
    fn from(value: ContentFormatArg) -> Self {
        match value {
            ContentFormatArg::Text => ContentFormat::Text,
            ContentFormatArg::Markdown => ContentFormat::Markdown,
            ContentFormatArg::Tree => ContentFormat::Tree,
            ContentFormatArg::Json => ContentFormat::Json,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum DisplayModeArg {
    None,
    Label,
    FullId,
}

impl From<DisplayModeArg> for DisplayMode {
    fn from(value: DisplayModeArg) -> Self {
        match value {
            DisplayModeArg::None => DisplayMode::None,
            DisplayModeArg::Label => DisplayMode::Label,
            DisplayModeArg::FullId => DisplayMode::FullId,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum FilterArg {
    All,
    Section,
    Content,
}

impl From<FilterArg> for ChildFilter {
    fn from(value: FilterArg) -> Self {
        match value {
            FilterArg::All => ChildFilter::All,
            FilterArg::Section => ChildFilter::Section,
            FilterArg::Content => ChildFilter::Content,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum SortArg {
    Order,
    Title,
    Label,
}

impl From<SortArg> for ChildSort {
    fn from(value: SortArg) -> Self {
        match value {
            SortArg::Order => ChildSort::Order,
            SortArg::Title => ChildSort::Title,
            SortArg::Label => ChildSort::Label,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum ScopeArg {
    All,
    Content,
    Title,
    Label,
}

impl From<ScopeArg> for SearchScope {
    fn from(value: ScopeArg) -> Self {
        match value {
            ScopeArg::All => SearchScope::All,
            ScopeArg::Content => SearchScope::Content,
            ScopeArg::Title => SearchScope::Title,
            ScopeArg::Label => SearchScope::Label,
        }
    }
}
