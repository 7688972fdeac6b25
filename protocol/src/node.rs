use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;
use serde_with::skip_serializing_none;
use std::fmt;

pub type NodeId = String;

#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum NodeKind {
    Section,
    #[default]
    Content,
    Leaf,
    Other(String),
}

impl NodeKind {
    pub fn as_str(&self) -> &str {
        match self {
            NodeKind::Section => "section",
            NodeKind::Content => "content",
            NodeKind::Leaf => "leaf",
            NodeKind::Other(kind) => kind,
        }
    }

    /// Kinds that own children in the tree view.
    pub fn is_container(&self) -> bool {
        matches!(self, NodeKind::Section)
    }
}

impl From<String> for NodeKind {
    fn from(value: String) -> Self {
        match value.as_str() {
            "section" => NodeKind::Section,
            "content" => NodeKind::Content,
            "leaf" => NodeKind::Leaf,
            _ => NodeKind::Other(value),
        }
    }
}

impl From<NodeKind> for String {
    fn from(value: NodeKind) -> Self {
        match value {
            NodeKind::Other(kind) => kind,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[skip_serializing_none]
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SeeAlso {
    #[serde(rename = "node_id", alias = "id")]
    pub id: NodeId,
    #[serde(default)]
    pub label: String,
    pub description: Option<String>,
    pub title: Option<String>,
}

/// Rendered variants of a node's content, as produced by the detail view.
#[skip_serializing_none]
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FormattedContent {
    pub markdown: Option<String>,
    #[serde(rename = "text")]
    pub plain_text: Option<String>,
    #[serde(rename = "tree")]
    pub tree_view: Option<String>,
    #[serde(rename = "json_data")]
    pub structured_data: Option<Value>,
}

impl FormattedContent {
    pub fn is_empty(&self) -> bool {
        self.markdown.is_none()
            && self.plain_text.is_none()
            && self.tree_view.is_none()
            && self.structured_data.is_none()
    }
}

#[skip_serializing_none]
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    #[serde(rename = "node_id", alias = "id")]
    pub id: NodeId,
    #[serde(default)]
    pub label: String,
    #[serde(rename = "type", default)]
    pub kind: NodeKind,
    pub title: Option<String>,
    #[serde(default)]
    pub has_children: bool,
    pub content_preview: Option<String>,
    pub content: Option<String>,
    #[serde(rename = "module")]
    pub module_id: Option<String>,
    #[serde(alias = "file_path")]
    pub path: Option<String>,
    pub line_number: Option<u32>,
    pub parent_id: Option<NodeId>,
    #[serde(default)]
    pub children_ids: Vec<NodeId>,
    #[serde(default)]
    pub see_also: Vec<SeeAlso>,
    pub formatted_content: Option<FormattedContent>,
}

impl NodeRecord {
    /// Section-like node that reports children and therefore needs its
    /// child listing loaded when entered.
    pub fn is_expandable(&self) -> bool {
        self.kind.is_container() && self.has_children
    }

    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.label)
    }
}

/// Lightweight child entry used to render a tree row.
#[skip_serializing_none]
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeSummary {
    #[serde(rename = "node_id", alias = "id")]
    pub id: NodeId,
    #[serde(default)]
    pub label: String,
    #[serde(rename = "type", default)]
    pub kind: NodeKind,
    pub title: Option<String>,
    #[serde(default)]
    pub has_children: bool,
    pub content_preview: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BreadcrumbEntry {
    #[serde(alias = "node_id")]
    pub id: NodeId,
    #[serde(default)]
    pub label: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NodeView {
    pub node: NodeRecord,
    #[serde(default)]
    pub formatted_content: FormattedContent,
}

impl NodeView {
    /// Folds the rendered content into the node itself.
    pub fn into_node(self) -> NodeRecord {
        let NodeView {
            mut node,
            formatted_content,
        } = self;
        node.formatted_content = Some(formatted_content);
        node
    }
}

/// A node together with the breadcrumb the server reported for it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Located {
    pub node: NodeRecord,
    #[serde(default)]
    pub breadcrumb: Vec<BreadcrumbEntry>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ResolveReply {
    #[serde(default)]
    pub id: Option<NodeId>,
    #[serde(default)]
    pub node_id: Option<NodeId>,
    #[serde(default)]
    pub candidates: Option<Vec<Value>>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Resolution {
    Resolved(NodeId),
    Ambiguous { candidates: usize },
    NotFound,
}

impl ResolveReply {
    pub fn resolved(id: impl Into<NodeId>) -> Self {
        Self {
            node_id: Some(id.into()),
            ..Self::default()
        }
    }

    /// Candidate lists win over a direct id: more than one candidate is
    /// ambiguous even when the server also picked one.
    pub fn into_resolution(self) -> Resolution {
        if let Some(candidates) = &self.candidates
            && candidates.len() > 1
        {
            return Resolution::Ambiguous {
                candidates: candidates.len(),
            };
        }
        match self.node_id.or(self.id) {
            Some(id) if !id.is_empty() => Resolution::Resolved(id),
            _ => Resolution::NotFound,
        }
    }
}

/// Result of asking the server to move its cursor onto a node.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct NavigateReply {
    #[serde(default)]
    pub already_at_target: bool,
    #[serde(default)]
    pub node: Option<NodeRecord>,
    #[serde(default)]
    pub breadcrumb: Vec<BreadcrumbEntry>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct HistorySnapshot {
    #[serde(default)]
    pub items: Vec<NodeId>,
    #[serde(default = "empty_cursor")]
    pub cursor: i64,
    #[serde(default)]
    pub size: usize,
}

fn empty_cursor() -> i64 {
    -1
}
