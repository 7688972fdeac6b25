/*!
Command-line front end for the knowledge-base navigator.

Each subcommand drives one [`Navigator`] operation against the document
service and prints the resulting state; `kbnav shell` keeps a single
navigator alive across many commands so cache, expansion and search state
carry over between them.
*/

mod args;
mod output;
mod shell;

use anyhow::Context;
use kbnav_backend_client::ClientOptions;
use kbnav_backend_client::DocumentClient;
use kbnav_core::NavigateOutcome;
use kbnav_core::Navigator;
use kbnav_core::NavigatorConfig;
use kbnav_protocol::BackendSettings;
use std::sync::Arc;

pub use args::ChildrenArgs;
pub use args::Cli;
pub use args::Command;
pub use args::ModulesCommand;
pub use args::OutputFormat;
pub use args::SearchArgs;
pub use args::SettingsArgs;
pub use args::ShellLine;
pub use args::ShowArgs;
pub use output::Report;

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = resolve_config(&cli)?;
    let client = DocumentClient::new(ClientOptions {
        base_url: config.base_url.clone(),
        timeout: config.request_timeout(),
    })
    .context("failed to build document service client")?;
    let navigator = Navigator::new(Arc::new(client), config);

    if let Command::Shell = cli.command {
        return shell::run_shell(&navigator, cli.output_format).await;
    }
    let report = execute(&navigator, cli.command).await?;
    print!("{}", report.render(cli.output_format)?);
    Ok(())
}

/// Config file and environment first, command-line flags last.
fn resolve_config(cli: &Cli) -> anyhow::Result<NavigatorConfig> {
    let mut config =
        NavigatorConfig::load(cli.kbnav_home.as_deref()).context("failed to load config")?;
    if let Some(base_url) = &cli.base_url {
        config.base_url = base_url.clone();
    }
    if let Some(timeout) = cli.timeout_secs {
        config.request_timeout_secs = timeout;
    }
    config.validate().context("invalid configuration")?;
    Ok(config)
}

pub async fn execute(navigator: &Navigator, command: Command) -> anyhow::Result<Report> {
    let report = match command {
        Command::Current => {
            let outcome = navigator.load_current_node().await?;
            node_report(navigator, Some(outcome))
        }
        Command::Go { target } => {
            let outcome = navigator.navigate_to(&target).await?;
            node_report(navigator, Some(outcome))
        }
        Command::Back { steps } => {
            let outcome = navigator.move_back(steps).await?;
            node_report(navigator, Some(outcome))
        }
        Command::Forward { steps } => {
            let outcome = navigator.move_forward(steps).await?;
            node_report(navigator, Some(outcome))
        }
        Command::Up { levels } => {
            let outcome = navigator.move_up(levels).await?;
            node_report(navigator, Some(outcome))
        }
        Command::History => {
            navigator.refresh_history().await?;
            let history = navigator.snapshot().history;
            Report::History {
                items: history.items,
                cursor: history.cursor,
            }
        }
        Command::Show(args) => show(navigator, args).await?,
        Command::Modules(command) => modules(navigator, command).await?,
        Command::Children(args) => {
            navigator.set_child_query(args.filter.into(), args.sort.into());
            navigator.load_children(&args.id).await?;
            let snapshot = navigator.snapshot();
            Report::Children {
                children: snapshot.children.get(&args.id).cloned().unwrap_or_default(),
                previews: snapshot
                    .child_previews
                    .get(&args.id)
                    .cloned()
                    .unwrap_or_default(),
                id: args.id,
            }
        }
        Command::Search(args) => {
            navigator.set_whole_word(args.whole_word);
            navigator.set_case_sensitive(args.case_sensitive);
            navigator.set_use_regex(args.use_regex);
            navigator
                .perform_search(&args.query.join(" "), args.scope.into())
                .await?;
            let search = navigator.snapshot().search;
            Report::Search {
                query: search.query,
                results: search.results,
            }
        }
        Command::Toggle { id } => {
            let expanded = navigator.toggle_expansion(&id);
            Report::Expansion { id, expanded }
        }
        Command::State => Report::State(Box::new(navigator.snapshot())),
        Command::Status => Report::Status {
            status: navigator.service().status().await?,
        },
        Command::Settings(args) => settings(navigator, args).await?,
        Command::Shell => anyhow::bail!("already in a shell"),
    };
    Ok(report)
}

async fn show(navigator: &Navigator, args: ShowArgs) -> anyhow::Result<Report> {
    let mut view = navigator.snapshot().view;
    if let Some(depth) = args.depth {
        view.depth = depth;
    }
    if args.no_content {
        view.include_content = false;
    }
    if args.no_see_also {
        view.include_see_also = false;
    }
    if args.show_metadata {
        view.show_metadata = true;
    }
    if let Some(mode) = args.display_mode {
        view.display_mode = mode.into();
    }
    navigator.set_view_options(view);
    if let Some(format) = args.content_format {
        navigator.set_content_format(format.into());
    }
    if navigator.current().is_none() {
        navigator.load_current_node().await?;
    }
    navigator.fetch_node_view().await?;
    Ok(node_report(navigator, None))
}

async fn modules(navigator: &Navigator, command: ModulesCommand) -> anyhow::Result<Report> {
    match command {
        ModulesCommand::List => navigator.list_modules().await?,
        ModulesCommand::Load { name } => navigator.load_module(&name).await?,
        ModulesCommand::Unload { name } => navigator.unload_module(&name).await?,
        ModulesCommand::Purge => navigator.purge_modules().await?,
    }
    let snapshot = navigator.snapshot();
    Ok(Report::Modules {
        modules: snapshot.modules,
        roots: snapshot.roots,
    })
}

async fn settings(navigator: &Navigator, args: SettingsArgs) -> anyhow::Result<Report> {
    let service = navigator.service();
    if !args.is_update() {
        return Ok(Report::Settings(service.settings().await?));
    }
    let current = service.settings().await?;
    let updated = BackendSettings {
        home: args.home.unwrap_or(current.home),
        local: args.local.unwrap_or(current.local),
        lang: args.lang.unwrap_or(current.lang),
    };
    service.apply_settings(&updated).await?;
    Ok(Report::Settings(updated))
}

fn node_report(navigator: &Navigator, outcome: Option<NavigateOutcome>) -> Report {
    let snapshot = navigator.snapshot();
    Report::Node {
        outcome,
        node: snapshot.current,
        breadcrumb: snapshot.breadcrumb,
        format: snapshot.content_format,
    }
}
