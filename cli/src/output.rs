use crate::args::OutputFormat;
use kbnav_core::ModuleRoots;
use kbnav_core::NavigateOutcome;
use kbnav_core::NavigatorSnapshot;
use kbnav_protocol::BackendSettings;
use kbnav_protocol::BreadcrumbEntry;
use kbnav_protocol::ContentFormat;
use kbnav_protocol::ModuleRecord;
use kbnav_protocol::NodeId;
use kbnav_protocol::NodeRecord;
use kbnav_protocol::NodeSummary;
use kbnav_protocol::SearchHit;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt::Write as _;

/// What a command produced, ready to print as JSON or text.
#[derive(Debug, Serialize)]
#[serde(tag = "report", rename_all = "snake_case")]
pub enum Report {
    Node {
        outcome: Option<NavigateOutcome>,
        node: Option<NodeRecord>,
        breadcrumb: Vec<BreadcrumbEntry>,
        #[serde(skip)]
        format: ContentFormat,
    },
    History {
        items: Vec<NodeId>,
        cursor: i64,
    },
    Modules {
        modules: Vec<ModuleRecord>,
        roots: BTreeMap<String, ModuleRoots>,
    },
    Children {
        id: NodeId,
        children: Vec<NodeId>,
        previews: Vec<NodeSummary>,
    },
    Search {
        query: String,
        results: Vec<SearchHit>,
    },
    Expansion {
        id: NodeId,
        expanded: bool,
    },
    Settings(BackendSettings),
    Status {
        status: Value,
    },
    State(Box<NavigatorSnapshot>),
    Done {
        message: String,
    },
}

impl Report {
    pub fn done(message: impl Into<String>) -> Self {
        Report::Done {
            message: message.into(),
        }
    }

    pub fn render(&self, format: OutputFormat) -> anyhow::Result<String> {
        match format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(self)?),
            OutputFormat::Text => Ok(self.render_text()),
        }
    }

    fn render_text(&self) -> String {
        let mut out = String::new();
        match self {
            Report::Node {
                outcome,
                node,
                breadcrumb,
                format,
            } => {
                if let Some(NavigateOutcome::Superseded) = outcome {
                    out.push_str("(superseded by a newer navigation)\n");
                }
                if !breadcrumb.is_empty() {
                    let trail: Vec<&str> =
                        breadcrumb.iter().map(|entry| entry.label.as_str()).collect();
                    let _ = writeln!(out, "{}", trail.join(" > "));
                }
                match node {
                    Some(node) => render_node(&mut out, node, *format),
                    None => out.push_str("no current node\n"),
                }
            }
            Report::History { items, cursor } => {
                if items.is_empty() {
                    out.push_str("history is empty\n");
                }
                for (index, item) in items.iter().enumerate() {
                    let marker = if index as i64 == *cursor { ">" } else { " " };
                    let _ = writeln!(out, "{marker} {index:>3}  {item}");
                }
            }
            Report::Modules { modules, roots } => {
                for module in modules {
                    let state = if module.is_loaded { "loaded" } else { "available" };
                    let _ = writeln!(
                        out,
                        "{:<24} {:<9} {} files",
                        module.name, state, module.file_count
                    );
                    if let Some(roots) = roots.get(&module.name) {
                        for root in roots.as_slice() {
                            let _ = writeln!(out, "    {}  {}", root.id, root.display_title());
                        }
                    }
                }
            }
            Report::Children {
                id,
                children,
                previews,
            } => {
                let _ = writeln!(out, "{id}: {} children", children.len());
                if previews.is_empty() {
                    for child in children {
                        let _ = writeln!(out, "  {child}");
                    }
                }
                for preview in previews {
                    let more = if preview.has_children { "+" } else { " " };
                    let _ = writeln!(
                        out,
                        "{more} {:<8} {}  {}",
                        preview.kind.as_str(),
                        preview.id,
                        preview.title.as_deref().unwrap_or(&preview.label)
                    );
                }
            }
            Report::Search { query, results } => {
                let _ = writeln!(out, "{} results for {query:?}", results.len());
                for hit in results {
                    let _ = writeln!(
                        out,
                        "  {:>6.2}  {}  {}",
                        hit.score,
                        hit.id,
                        hit.title.as_deref().unwrap_or(&hit.label)
                    );
                    if let Some(excerpt) = &hit.excerpt {
                        let _ = writeln!(out, "          {}", excerpt.trim());
                    }
                }
            }
            Report::Expansion { id, expanded } => {
                let state = if *expanded { "expanded" } else { "collapsed" };
                let _ = writeln!(out, "{id} {state}");
            }
            Report::Settings(settings) => {
                let _ = writeln!(out, "home:  {}", settings.home);
                let _ = writeln!(out, "local: {}", settings.local);
                let _ = writeln!(out, "lang:  {}", settings.lang);
            }
            Report::Status { status } => {
                out.push_str(&serde_json::to_string_pretty(status).unwrap_or_default());
                out.push('\n');
            }
            Report::State(snapshot) => {
                out.push_str(&serde_json::to_string_pretty(snapshot).unwrap_or_default());
                out.push('\n');
            }
            Report::Done { message } => {
                let _ = writeln!(out, "{message}");
            }
        }
        out
    }
}

fn render_node(out: &mut String, node: &NodeRecord, format: ContentFormat) {
    let _ = writeln!(out, "{}  [{}]  {}", node.id, node.kind, node.display_title());
    if let Some(module) = &node.module_id {
        let _ = writeln!(out, "module: {module}");
    }
    if let Some(path) = &node.path {
        match node.line_number {
            Some(line) => {
                let _ = writeln!(out, "source: {path}:{line}");
            }
            None => {
                let _ = writeln!(out, "source: {path}");
            }
        }
    }
    if let Some(body) = node_body(node, format) {
        out.push('\n');
        out.push_str(body.trim_end());
        out.push('\n');
    }
    if !node.see_also.is_empty() {
        out.push_str("\nsee also:\n");
        for link in &node.see_also {
            let _ = writeln!(out, "  {}  {}", link.id, link.label);
        }
    }
}

/// Rendered content for the requested format, falling back to raw content.
fn node_body(node: &NodeRecord, format: ContentFormat) -> Option<String> {
    let rendered = node.formatted_content.as_ref().and_then(|content| match format {
        ContentFormat::Markdown => content.markdown.clone(),
        ContentFormat::Text => content.plain_text.clone(),
        ContentFormat::Tree => content.tree_view.clone(),
        ContentFormat::Json => content
            .structured_data
            .as_ref()
            .and_then(|data| serde_json::to_string_pretty(data).ok()),
    });
    rendered.or_else(|| node.content.clone())
}
