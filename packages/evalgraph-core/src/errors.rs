//! Error types for evalgraph-core
//!
//! Every query either fully succeeds or fails with one of these; the engine
//! never hands back a partial predecessor set.

use thiserror::Error;

use crate::config::ConfigError;

/// Main error type for evalgraph operations
#[derive(Debug, Error)]
pub enum FlowGraphError {
    /// Cursor does not belong to the tree the graph was built over
    #[error("cursor {cursor} does not belong to tree {tree}")]
    UnknownCursor { cursor: String, tree: u64 },

    /// The rule table has no entry for this node kind
    #[error("no evaluation-order rule for `{kind}` at {location}")]
    UnsupportedConstruct { kind: String, location: String },

    /// Parent/child links contradict each other
    #[error("malformed tree: {0}")]
    MalformedTree(String),

    /// Write location of an assignment (e.g. `x` in `x = 1`)
    #[error("`{0}` is an assignment target, not a program point")]
    NotAProgramPoint(String),

    /// Tree root is not a compilation unit
    #[error("tree root is `{0}`, expected a compilation unit")]
    MissingCompilationUnit(String),

    /// Resolver recursion exceeded `max_resolution_depth`
    #[error("resolution depth limit {limit} exceeded")]
    ResolutionDepthExceeded { limit: usize },

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Snapshot serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl FlowGraphError {
    /// Create a parse error
    pub fn parse_error(msg: impl Into<String>) -> Self {
        FlowGraphError::Parse(msg.into())
    }

    /// Create a malformed-tree error and log it; these are contract violations
    /// of whoever built the tree.
    pub fn malformed(msg: impl Into<String>) -> Self {
        let msg = msg.into();
        tracing::error!(reason = %msg, "malformed syntax tree");
        FlowGraphError::MalformedTree(msg)
    }

    /// True for errors caused by the query rather than the tree
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self,
            FlowGraphError::UnknownCursor { .. } | FlowGraphError::NotAProgramPoint(_)
        )
    }
}

/// Result type alias for evalgraph operations
pub type Result<T> = std::result::Result<T, FlowGraphError>;
