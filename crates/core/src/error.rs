//! Error types for LoadDesk

use thiserror::Error;

use crate::map::ComposerState;

/// Main error type for LoadDesk operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    #[cfg(feature = "native")]
    Http(#[from] reqwest::Error),

    #[error("failed to fetch tabular source {source_name}: {reason}")]
    SourceFetch { source_name: String, reason: String },

    #[error("map container is not available; mount the view before initializing")]
    MissingContainer,

    #[error("invalid viewport: {field} = {value} ({reason})")]
    InvalidViewport {
        field: &'static str,
        value: String,
        reason: String,
    },

    #[error("map engine failed to load: {0}")]
    EngineLoad(String),

    #[error("map engine rejected {operation}: {reason}")]
    Engine {
        operation: &'static str,
        reason: String,
    },

    #[error("cannot {operation} while viewport is {actual:?}")]
    InvalidState {
        operation: &'static str,
        actual: ComposerState,
    },

    #[error("configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Whether the failed operation can be retried.
    ///
    /// A missing container is retried with another `mount` on the same handle.
    /// An engine load failure leaves the handle holding the failed viewport, so
    /// retrying takes `teardown` followed by `mount`.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::MissingContainer | Error::EngineLoad(_))
    }
}

/// Result type alias for LoadDesk operations
pub type Result<T> = std::result::Result<T, Error>;
