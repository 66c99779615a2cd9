use std::path::PathBuf;

use runbake_fetch::FetchError;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("extraction failed")]
    Extraction(#[from] runbake_archive::Error),

    #[error("failed to lock cache")]
    Lock(#[source] runbake_fs::Error),

    #[error("failed to list '{path}'")]
    List {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to resolve '{path}'")]
    Resolve {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("no source directory found in '{0}'")]
    NotFound(PathBuf),

    #[error("build failed")]
    Build(#[from] runbake_platform::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
