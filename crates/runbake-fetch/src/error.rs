//! Error types for runbake-fetch.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid runtime version: {0:?}")]
    InvalidVersion(String),

    #[error("HTTP {status} from {url}")]
    Http { url: String, status: u16 },

    #[error("network error fetching {url}: {message}")]
    Network { url: String, message: String },

    #[error("cannot prepare download location")]
    Fs(#[from] runbake_fs::Error),

    #[error("failed to write '{path}'")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("checksum mismatch: expected {expected}, got {actual}")]
    ChecksumMismatch { expected: String, actual: String },

    #[error(transparent)]
    Verify(#[from] runbake_verify::VerificationError),

    #[error("max retries exceeded ({count} attempts): {last}")]
    MaxRetriesExceeded { count: u32, last: Box<FetchError> },
}

impl FetchError {
    /// Whether another attempt could plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            FetchError::Network { .. } => true,
            FetchError::Http { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, FetchError>;
