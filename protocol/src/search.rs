use crate::node::NodeId;
use crate::node::NodeKind;
use serde::Deserialize;
use serde::Serialize;
use serde_with::skip_serializing_none;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchScope {
    #[default]
    All,
    Content,
    Title,
    Label,
}

impl SearchScope {
    pub fn as_str(self) -> &'static str {
        match self {
            SearchScope::All => "all",
            SearchScope::Content => "content",
            SearchScope::Title => "title",
            SearchScope::Label => "label",
        }
    }
}

pub const DEFAULT_MAX_RESULTS: usize = 50;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchOptions {
    pub scope: SearchScope,
    pub max_results: usize,
    pub whole_word: bool,
    pub case_sensitive: bool,
    pub use_regex: bool,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            scope: SearchScope::All,
            max_results: DEFAULT_MAX_RESULTS,
            whole_word: false,
            case_sensitive: false,
            use_regex: false,
        }
    }
}

#[skip_serializing_none]
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    #[serde(rename = "node_id", alias = "id")]
    pub id: NodeId,
    #[serde(default)]
    pub label: String,
    pub title: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: NodeKind,
    pub module: Option<String>,
    pub file_id: Option<String>,
    pub excerpt: Option<String>,
    #[serde(default)]
    pub score: f64,
}
