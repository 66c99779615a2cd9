use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use runbake_fs::FileSystem;
use tracing::debug;

use crate::error::{PatchError, Result};

type Detect = Arc<dyn Fn(&str) -> bool + Send + Sync>;

/// A transform reports the anchor it could not find as `Err`.
type Transform = Arc<dyn Fn(&str) -> std::result::Result<String, String> + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchOutcome {
    Applied,
    AlreadyApplied,
}

impl fmt::Display for PatchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Applied => write!(f, "applied"),
            Self::AlreadyApplied => write!(f, "already applied"),
        }
    }
}

/// A named, stateless edit of one file relative to a source tree root.
#[derive(Clone)]
pub struct Patch {
    name: String,
    target: PathBuf,
    detect: Detect,
    transform: Transform,
}

impl Patch {
    pub fn new<D, T>(name: impl Into<String>, target: impl Into<PathBuf>, detect: D, transform: T) -> Self
    where
        D: Fn(&str) -> bool + Send + Sync + 'static,
        T: Fn(&str) -> std::result::Result<String, String> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            target: target.into(),
            detect: Arc::new(detect),
            transform: Arc::new(transform),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Path of the patched file, relative to the tree root.
    pub fn target(&self) -> &Path {
        &self.target
    }

    pub fn is_applied(&self, content: &str) -> bool {
        (self.detect)(content)
    }

    /// Patch `content` in memory.
    ///
    /// Returns `None` when the patch is already present.
    pub fn apply_to_str(&self, content: &str) -> Result<Option<String>> {
        if self.is_applied(content) {
            return Ok(None);
        }
        let patched = (self.transform)(content).map_err(|anchor| PatchError::AnchorNotFound {
            patch: self.name.clone(),
            file: self.target.clone(),
            anchor,
        })?;
        if !self.is_applied(&patched) {
            return Err(PatchError::NotFixedPoint {
                patch: self.name.clone(),
                file: self.target.clone(),
            });
        }
        Ok(Some(patched))
    }

    /// Patch the target file under `root`, writing only if something changed.
    pub fn apply<F: FileSystem + ?Sized>(&self, fs: &F, root: &Path) -> Result<PatchOutcome> {
        let path = root.join(&self.target);
        let content = fs.read_to_string(&path)?;
        let outcome = match self.apply_to_str(&content)? {
            Some(patched) => {
                fs.write(&path, patched.as_bytes())?;
                PatchOutcome::Applied
            }
            None => PatchOutcome::AlreadyApplied,
        };
        debug!(patch = %self.name, file = %path.display(), %outcome, "patch");
        Ok(outcome)
    }
}

impl fmt::Debug for Patch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Patch")
            .field("name", &self.name)
            .field("target", &self.target)
            .finish_non_exhaustive()
    }
}
