//! Types shared between the knowledge-base navigation engine and the remote
//! document service it talks to.
//!
//! Everything that crosses the wire lives here, together with the
//! [`DocumentService`] trait that the HTTP gateway implements and that tests
//! replace with scripted fakes.

pub mod envelope;
pub mod module;
pub mod node;
pub mod search;
pub mod service;
pub mod settings;
pub mod view;

pub use envelope::Envelope;
pub use module::ModuleListing;
pub use module::ModuleRecord;
pub use node::BreadcrumbEntry;
pub use node::FormattedContent;
pub use node::HistorySnapshot;
pub use node::Located;
pub use node::NavigateReply;
pub use node::NodeId;
pub use node::NodeKind;
pub use node::NodeRecord;
pub use node::NodeSummary;
pub use node::NodeView;
pub use node::ResolveReply;
pub use node::Resolution;
pub use node::SeeAlso;
pub use search::SearchHit;
pub use search::SearchOptions;
pub use search::SearchScope;
pub use service::DocumentService;
pub use service::ServiceError;
pub use service::ServiceResult;
pub use settings::BackendSettings;
pub use view::ChildFilter;
pub use view::ChildSort;
pub use view::ContentFormat;
pub use view::DetailRequest;
pub use view::DisplayMode;
pub use view::ViewOptions;

/// Identifier of the top-level container that every tree starts expanded at.
pub const ROOT_SENTINEL: &str = "::ROOT";

/// Literal a UI binding produces when it stringifies a missing id.
pub const UNDEFINED_PLACEHOLDER: &str = "undefined";

/// True for ids that can never name a real node.
pub fn is_placeholder_id(id: &str) -> bool {
    id.is_empty() || id == UNDEFINED_PLACEHOLDER
}
