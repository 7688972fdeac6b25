use crate::module::ModuleListing;
use crate::node::HistorySnapshot;
use crate::node::Located;
use crate::node::NavigateReply;
use crate::node::NodeId;
use crate::node::NodeRecord;
use crate::node::NodeSummary;
use crate::node::NodeView;
use crate::node::ResolveReply;
use crate::search::SearchHit;
use crate::search::SearchOptions;
use crate::settings::BackendSettings;
use crate::view::ChildFilter;
use crate::view::ChildSort;
use crate::view::DetailRequest;
use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Failure talking to the document service. Cloneable so that a single
/// in-flight request can hand the same outcome to every waiter.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ServiceError {
    #[error("{operation} request failed: {status} - {body}")]
    Status {
        operation: &'static str,
        status: u16,
        body: String,
    },
    #[error("{operation} rejected by server: {message}")]
    Rejected {
        operation: &'static str,
        message: String,
    },
    #[error("{operation} returned an unreadable payload: {message}")]
    Decode {
        operation: &'static str,
        message: String,
    },
    #[error("{operation} transport failure: {message}")]
    Transport {
        operation: &'static str,
        message: String,
    },
}

impl ServiceError {
    pub fn operation(&self) -> &'static str {
        match self {
            ServiceError::Status { operation, .. }
            | ServiceError::Rejected { operation, .. }
            | ServiceError::Decode { operation, .. }
            | ServiceError::Transport { operation, .. } => operation,
        }
    }

    pub fn rejected(operation: &'static str, message: impl Into<String>) -> Self {
        Self::Rejected {
            operation,
            message: message.into(),
        }
    }

    pub fn transport(operation: &'static str, message: impl Into<String>) -> Self {
        Self::Transport {
            operation,
            message: message.into(),
        }
    }

    pub fn decode(operation: &'static str, message: impl Into<String>) -> Self {
        Self::Decode {
            operation,
            message: message.into(),
        }
    }
}

pub type ServiceResult<T> = std::result::Result<T, ServiceError>;

/// Request/response boundary to the remote document-tree service.
///
/// The service is stateful: it owns the navigation cursor, the history and
/// the set of loaded modules. Implementations must not cache.
#[async_trait]
pub trait DocumentService: Send + Sync {
    async fn list_modules(&self) -> ServiceResult<ModuleListing>;

    async fn load_module(&self, name: &str) -> ServiceResult<()>;

    async fn unload_module(&self, name: &str) -> ServiceResult<()>;

    async fn purge_modules(&self) -> ServiceResult<()>;

    /// Root nodes of every loaded module, flat and in server order.
    async fn loaded_roots(&self) -> ServiceResult<Vec<NodeRecord>>;

    async fn current_node(&self) -> ServiceResult<Located>;

    async fn resolve(&self, target: &str) -> ServiceResult<ResolveReply>;

    async fn node_detail(&self, id: &str, request: &DetailRequest) -> ServiceResult<NodeView>;

    async fn children(&self, id: &str) -> ServiceResult<Vec<NodeId>>;

    async fn preview_children(
        &self,
        id: &str,
        filter: ChildFilter,
        sort: ChildSort,
    ) -> ServiceResult<Vec<NodeSummary>>;

    /// Moves the server cursor onto `id`, appending to server history unless
    /// the cursor is already there.
    async fn navigate(&self, id: &str) -> ServiceResult<NavigateReply>;

    async fn back(&self, steps: u32) -> ServiceResult<Located>;

    async fn forward(&self, steps: u32) -> ServiceResult<Located>;

    async fn up(&self, levels: u32) -> ServiceResult<Located>;

    async fn history(&self) -> ServiceResult<HistorySnapshot>;

    async fn search(&self, query: &str, options: &SearchOptions) -> ServiceResult<Vec<SearchHit>>;

    async fn status(&self) -> ServiceResult<Value>;

    async fn settings(&self) -> ServiceResult<BackendSettings>;

    async fn apply_settings(&self, settings: &BackendSettings) -> ServiceResult<()>;
}
