//! Error types for molsearch.
//!
//! Every failure in the search pipeline degrades to an empty or error-flagged
//! result state; nothing here is fatal to the process. The variants below are
//! split between errors that reach the user-visible error state (network,
//! engine availability) and errors the pipeline recovers from locally
//! (per-line parse failures, invalid patterns).

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Main error type for the molsearch library.
#[derive(Debug, Error)]
pub enum MolSearchError {
    // Network errors
    #[error("Network error: {message}")]
    Network {
        message: String,
        /// HTTP status code when the gateway answered with a non-2xx response
        status: Option<u16>,
    },

    #[error("Request timeout after {0:?}")]
    Timeout(Duration),

    // Structure errors
    #[error("Failed to parse structure '{structure}': {message}")]
    Parse { structure: String, message: String },

    #[error("Invalid substructure pattern '{pattern}': {message}")]
    Pattern { pattern: String, message: String },

    // Engine errors
    #[error("Structure matching engine unavailable after {waited:?}")]
    EngineUnavailable { waited: Duration },

    #[error("Structure matching engine error: {message}")]
    Engine { message: String },

    // Search lifecycle
    #[error("Search superseded by a newer request")]
    Superseded,

    // Serialization errors
    #[error("JSON error: {message}")]
    Json {
        message: String,
        #[source]
        source: Option<serde_json::Error>,
    },

    #[error("CSV error: {message}")]
    Csv {
        message: String,
        #[source]
        source: Option<csv::Error>,
    },

    // File system errors
    #[error("IO error at {path:?}: {message}")]
    Io {
        message: String,
        path: Option<PathBuf>,
        #[source]
        source: Option<std::io::Error>,
    },

    // Configuration errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    // Validation errors
    #[error("Validation error for {field}: {message}")]
    Validation { field: String, message: String },

    // Generic errors
    #[error("{0}")]
    Other(String),
}

/// Result type alias for molsearch operations.
pub type Result<T> = std::result::Result<T, MolSearchError>;

// Conversion implementations for common error types

impl From<std::io::Error> for MolSearchError {
    fn from(err: std::io::Error) -> Self {
        MolSearchError::Io {
            message: err.to_string(),
            path: None,
            source: Some(err),
        }
    }
}

impl From<serde_json::Error> for MolSearchError {
    fn from(err: serde_json::Error) -> Self {
        MolSearchError::Json {
            message: err.to_string(),
            source: Some(err),
        }
    }
}

impl From<csv::Error> for MolSearchError {
    fn from(err: csv::Error) -> Self {
        MolSearchError::Csv {
            message: err.to_string(),
            source: Some(err),
        }
    }
}

impl From<reqwest::Error> for MolSearchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            MolSearchError::Timeout(Duration::from_secs(0))
        } else {
            MolSearchError::Network {
                message: err.to_string(),
                status: err.status().map(|s| s.as_u16()),
            }
        }
    }
}

impl MolSearchError {
    /// Create an IO error with path context.
    pub fn io_with_path(err: std::io::Error, path: impl Into<PathBuf>) -> Self {
        MolSearchError::Io {
            message: err.to_string(),
            path: Some(path.into()),
            source: Some(err),
        }
    }

    /// Check if this error should trigger a retry.
    pub fn is_retryable(&self) -> bool {
        match self {
            MolSearchError::Timeout(_) => true,
            MolSearchError::Network { status, .. } => match status {
                None => true,
                Some(code) => matches!(code, 408 | 429 | 500 | 502 | 503 | 504),
            },
            _ => false,
        }
    }

    /// Whether this error belongs in the user-visible error state.
    ///
    /// Parse and pattern errors are recovered inside the pipeline and never
    /// reach the user; a superseded search is silently discarded.
    pub fn is_user_visible(&self) -> bool {
        !matches!(
            self,
            MolSearchError::Parse { .. }
                | MolSearchError::Pattern { .. }
                | MolSearchError::Superseded
        )
    }

    /// Whether the error can only be cleared by reloading the engine.
    pub fn is_terminal(&self) -> bool {
        matches!(self, MolSearchError::EngineUnavailable { .. })
    }
}
