//! Error types for the gallery core

use thiserror::Error;

/// The main error type for gallery operations.
///
/// Permission denials and missing favorites are never errors; they surface as
/// `false`/`None` return values. Only backend, encoding and configuration
/// faults end up here.
#[derive(Debug, Error)]
pub enum GalleryError {
    #[error("storage error: {0}")]
    Storage(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("config error: {0}")]
    Config(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("dog api error: {0}")]
    Api(String),
}

#[cfg(feature = "api")]
impl From<reqwest::Error> for GalleryError {
    fn from(e: reqwest::Error) -> Self {
        GalleryError::Api(e.to_string())
    }
}

/// Result type alias for gallery operations
pub type Result<T> = std::result::Result<T, GalleryError>;

/// Convert a storage backend error to GalleryError
pub fn err<E: std::error::Error>(e: E) -> GalleryError {
    GalleryError::Storage(e.to_string())
}
