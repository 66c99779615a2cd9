use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to open archive '{path}'")]
    Open { path: PathBuf, source: io::Error },

    #[error("archive '{path}' is corrupted")]
    Corrupted { path: PathBuf, source: io::Error },

    #[error("archive entry '{entry}' escapes the extraction directory")]
    PathEscape { entry: PathBuf },

    #[error("failed to unpack '{entry}'")]
    Unpack { entry: PathBuf, source: io::Error },

    #[error("failed to create staging directory in '{path}'")]
    Staging { path: PathBuf, source: io::Error },

    #[error(transparent)]
    Fs(#[from] runbake_fs::Error),

    #[error(transparent)]
    Command(#[from] runbake_platform::Error),

    #[error("extraction task aborted: {0}")]
    Task(String),
}

pub type Result<T> = std::result::Result<T, Error>;
