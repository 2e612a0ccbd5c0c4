//! Error types for the route inspector.

use std::path::PathBuf;

use thiserror::Error;
use veneer_router::RouterError;

/// Inspector errors.
#[derive(Debug, Error)]
pub enum InspectError {
    /// The manifest file could not be read.
    #[error("failed to read manifest {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The manifest is not valid JSON or has the wrong shape.
    #[error("invalid manifest: {0}")]
    Json(#[from] serde_json::Error),

    /// Building or running the router failed.
    #[error(transparent)]
    Router(#[from] RouterError),
}

/// Result type alias for inspector operations.
pub type Result<T> = std::result::Result<T, InspectError>;
