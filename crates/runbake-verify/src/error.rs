use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum VerificationError {
    #[error("checksum mismatch: expected {expected}, got {actual}")]
    Mismatch { expected: String, actual: String },

    #[error("invalid SHA-256 digest: {0:?}")]
    InvalidDigest(String),

    #[error("failed to read '{path}'")]
    Read { path: PathBuf, source: io::Error },

    #[error("failed to write '{path}'")]
    Write { path: PathBuf, source: io::Error },
}

pub type Result<T> = std::result::Result<T, VerificationError>;
