use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum PatchError {
    #[error(transparent)]
    Fs(#[from] runbake_fs::Error),

    #[error("patch '{patch}': anchor {anchor:?} not found in '{file}'")]
    AnchorNotFound {
        patch: String,
        file: PathBuf,
        anchor: String,
    },

    #[error("patch '{patch}' did not reach a fixed point on '{file}'")]
    NotFixedPoint { patch: String, file: PathBuf },
}

pub type Result<T> = std::result::Result<T, PatchError>;
