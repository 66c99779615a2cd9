use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to read '{path}'")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write '{path}'")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to create directory '{path}'")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to copy '{from}' to '{to}'")]
    Copy {
        from: PathBuf,
        to: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to lock '{path}'")]
    Lock {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("timed out after {timeout:?} waiting for lock '{path}'")]
    LockTimeout { path: PathBuf, timeout: Duration },

    #[error("path has no parent directory: '{0}'")]
    NoParent(PathBuf),
}

impl Error {
    /// Underlying I/O error kind, when there is one.
    pub fn io_kind(&self) -> Option<std::io::ErrorKind> {
        match self {
            Self::Read { source, .. }
            | Self::Write { source, .. }
            | Self::CreateDir { source, .. }
            | Self::Copy { source, .. }
            | Self::Lock { source, .. } => Some(source.kind()),
            Self::LockTimeout { .. } | Self::NoParent(_) => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
