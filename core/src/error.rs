use kbnav_protocol::NodeId;
use kbnav_protocol::ServiceError;
use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum NavError {
    #[error("invalid navigation target {target:?}")]
    InvalidTarget { target: String },

    #[error("target {target:?} did not resolve to a node")]
    NotFound { target: String },

    #[error("ambiguous target {target:?}: {candidates} candidates")]
    Ambiguous { target: String, candidates: usize },

    #[error("module {module} is no longer loaded (node {id})")]
    ModuleNotLoaded { module: String, id: NodeId },

    #[error(transparent)]
    Service(#[from] ServiceError),
}

/// Coarse classification surfaced to the UI.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Rejected before any network call.
    Validation,
    Resolution,
    Transport,
}

impl NavError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            NavError::InvalidTarget { .. } => ErrorKind::Validation,
            NavError::NotFound { .. } | NavError::Ambiguous { .. } => ErrorKind::Resolution,
            NavError::ModuleNotLoaded { .. } | NavError::Service(_) => ErrorKind::Transport,
        }
    }

    pub(crate) fn invalid_target(target: &str) -> Self {
        Self::InvalidTarget {
            target: target.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, NavError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid configuration: {0}")]
    Invalid(String),

    #[error("could not locate home directory")]
    NoHome,
}
