//! Error types for taxonomy loading, record parsing and lookups.

use std::path::PathBuf;
use thiserror::Error;

/// Failures of a query against the store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    /// The taxonomy has not been loaded (or its load failed).
    #[error("taxonomy not loaded")]
    NotReady,

    /// The identifier maps to no taxonomy node, fallbacks included.
    #[error("no taxonomy node for identifier '{0}'")]
    Unresolvable(String),

    /// The ancestry walk revisited a node or ran past the depth bound.
    #[error("ancestry cycle detected at node '{node_id}': {}", path.join(" -> "))]
    CycleDetected {
        /// Node the walk started from
        node_id: String,
        /// Ids visited before giving up
        path: Vec<String>,
    },
}

impl LookupError {
    /// Get an error code for this error type.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotReady => "NOT_READY",
            Self::Unresolvable(_) => "UNRESOLVABLE_IDENTIFIER",
            Self::CycleDetected { .. } => "CYCLE_DETECTED",
        }
    }
}

/// Failures of a taxonomy load. Any of these leaves the store permanently
/// not ready.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to fetch taxonomy source {origin}: {reason}")]
    Fetch { origin: String, reason: String },

    #[error("taxonomy source {origin} returned HTTP {status}")]
    HttpStatus { origin: String, status: u16 },

    #[error("failed to read taxonomy file {}: {error}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        error: std::io::Error,
    },

    #[error("taxonomy sources contained no usable records")]
    Empty,

    #[error("parent cycle in taxonomy: {}", path.join(" -> "))]
    Cycle { path: Vec<String> },

    #[error("load already attempted on this store")]
    AlreadyAttempted,
}

/// A row that cannot become a node. Skipped, the rest of the load continues.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    #[error("line {line}: record has no id")]
    MissingId { line: usize },

    #[error("line {line}: record '{id}' has no name")]
    MissingName { line: usize, id: String },
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {error}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        error: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),

    #[error("missing configuration: set {0}")]
    Missing(&'static str),

    #[error("failed to build http client: {0}")]
    Client(String),
}
