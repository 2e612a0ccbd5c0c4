//! Error types for routing.

use thiserror::Error;

/// Router-specific errors.
#[derive(Debug, Error)]
pub enum RouterError {
    /// Too many redirects in a row, most likely a redirect cycle.
    #[error("redirect limit of {limit} exceeded at {path}")]
    RedirectLimit { path: String, limit: usize },

    /// Invalid path pattern.
    #[error("invalid path pattern {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// A navigator was used before being bound to a router, or after the
    /// router was dropped.
    #[error("navigator is not bound to a live router")]
    Detached,

    /// Router options could not be parsed.
    #[error("invalid router options: {0}")]
    Options(#[from] serde_json::Error),
}

/// Result type alias for router operations.
pub type Result<T> = std::result::Result<T, RouterError>;

/// Error returned by a route view.
#[derive(Debug, Error)]
pub enum RenderError {
    /// A view failed with a message.
    #[error("{0}")]
    Message(String),

    /// A view failed with an underlying error.
    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error>),
}

impl RenderError {
    /// Creates a message error.
    pub fn msg(message: impl Into<String>) -> Self {
        Self::Message(message.into())
    }
}

/// Result type for route views.
pub type RenderResult = std::result::Result<(), RenderError>;
