use serde::Deserialize;
use serde::Serialize;
use std::fmt;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentFormat {
    Text,
    #[default]
    Markdown,
    Tree,
    Json,
}

impl ContentFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            ContentFormat::Text => "text",
            ContentFormat::Markdown => "markdown",
            ContentFormat::Tree => "tree",
            ContentFormat::Json => "json",
        }
    }
}

impl fmt::Display for ContentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayMode {
    #[default]
    None,
    Label,
    FullId,
}

impl DisplayMode {
    pub fn as_str(self) -> &'static str {
        match self {
            DisplayMode::None => "none",
            DisplayMode::Label => "label",
            DisplayMode::FullId => "full_id",
        }
    }
}

/// Rendering options captured once per detail fetch. Changing them never
/// touches entries that were already cached.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewOptions {
    pub depth: u8,
    pub include_content: bool,
    pub include_see_also: bool,
    pub show_metadata: bool,
    pub display_mode: DisplayMode,
}

/// Deepest subtree the detail endpoint accepts.
pub const MAX_VIEW_DEPTH: u8 = 5;

impl Default for ViewOptions {
    fn default() -> Self {
        Self {
            depth: 1,
            include_content: true,
            include_see_also: true,
            show_metadata: false,
            display_mode: DisplayMode::None,
        }
    }
}

/// Query for a single node's detail view.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DetailRequest {
    pub depth: u8,
    pub format: ContentFormat,
    pub include_content: Option<bool>,
    pub include_see_also: Option<bool>,
    pub show_metadata: Option<bool>,
    pub display_mode: Option<DisplayMode>,
}

impl DetailRequest {
    pub fn full(view: &ViewOptions, format: ContentFormat) -> Self {
        Self {
            depth: view.depth.min(MAX_VIEW_DEPTH),
            format,
            include_content: Some(view.include_content),
            include_see_also: Some(view.include_see_also),
            show_metadata: Some(view.show_metadata),
            display_mode: Some(view.display_mode),
        }
    }

    /// Zero-depth plain-text fetch; everything else left to server defaults.
    pub fn shallow() -> Self {
        Self {
            depth: 0,
            format: ContentFormat::Text,
            include_content: None,
            include_see_also: None,
            show_metadata: None,
            display_mode: None,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChildFilter {
    #[default]
    All,
    Section,
    Content,
}

impl ChildFilter {
    pub fn as_str(self) -> &'static str {
        match self {
            ChildFilter::All => "all",
            ChildFilter::Section => "section",
            ChildFilter::Content => "content",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChildSort {
    #[default]
    Order,
    Title,
    Label,
}

impl ChildSort {
    pub fn as_str(self) -> &'static str {
        match self {
            ChildSort::Order => "order",
            ChildSort::Title => "title",
            ChildSort::Label => "label",
        }
    }
}
