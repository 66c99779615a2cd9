use std::path::PathBuf;
use std::time::Duration;

use runbake_fetch::FetchError;
use runbake_patch::PatchError;

use crate::bundle::BundleError;
use crate::stage::Stage;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{stage}: failed to fetch runtime source")]
    Fetch { stage: Stage, source: FetchError },

    #[error("{stage}: failed to extract runtime source")]
    Extraction {
        stage: Stage,
        source: runbake_archive::Error,
    },

    #[error("{stage}")]
    Toolchain {
        stage: Stage,
        source: runbake_toolchain::Error,
    },

    #[error("{stage}: failed to bundle application")]
    Bundle { stage: Stage, source: BundleError },

    #[error("{stage}")]
    Patch { stage: Stage, source: PatchError },

    #[error("{stage}: native build failed")]
    Build {
        stage: Stage,
        source: runbake_toolchain::Error,
    },

    #[error("{stage}")]
    Packaging {
        stage: Stage,
        source: PackagingError,
    },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("{stage}: timed out after {after:?}")]
    Timeout { stage: Stage, after: Duration },

    #[error("{stage}: cancelled")]
    Cancelled { stage: Stage },
}

impl Error {
    /// The stage that failed, if the pipeline got that far.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            Self::Fetch { stage, .. }
            | Self::Extraction { stage, .. }
            | Self::Toolchain { stage, .. }
            | Self::Bundle { stage, .. }
            | Self::Patch { stage, .. }
            | Self::Build { stage, .. }
            | Self::Packaging { stage, .. }
            | Self::Timeout { stage, .. }
            | Self::Cancelled { stage } => Some(*stage),
            Self::Config(_) => None,
        }
    }

    pub(crate) fn acquire(stage: Stage, e: runbake_toolchain::Error) -> Self {
        match e {
            runbake_toolchain::Error::Fetch(source) => Self::Fetch { stage, source },
            runbake_toolchain::Error::Extraction(source) => Self::Extraction { stage, source },
            source => Self::Toolchain { stage, source },
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PackagingError {
    #[error("release binary '{0}' was not produced")]
    MissingBinary(PathBuf),

    #[error(transparent)]
    Fs(#[from] runbake_fs::Error),

    #[error("failed to mark '{path}' executable")]
    Permissions {
        path: PathBuf,
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
