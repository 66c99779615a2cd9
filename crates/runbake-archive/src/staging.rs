use std::path::{Path, PathBuf};

use tempfile::TempDir;
use tracing::debug;

use crate::error::{Error, Result};

const STAGING_PREFIX: &str = ".extract-";

/// A hidden scratch directory inside `destination`.
///
/// Dropping it without calling [`Staging::commit`] removes everything that
/// was extracted so far.
#[derive(Debug)]
pub struct Staging {
    dir: TempDir,
    destination: PathBuf,
}

impl Staging {
    pub fn new(destination: impl AsRef<Path>) -> Result<Self> {
        let destination = destination.as_ref().to_path_buf();
        runbake_fs::ensure_dir(&destination)?;
        let dir = tempfile::Builder::new()
            .prefix(STAGING_PREFIX)
            .tempdir_in(&destination)
            .map_err(|e| Error::Staging {
                path: destination.clone(),
                source: e,
            })?;
        Ok(Self { dir, destination })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn destination(&self) -> &Path {
        &self.destination
    }

    /// Move the staged top-level entries into the destination.
    pub fn commit(self) -> Result<usize> {
        let moved = runbake_fs::move_entries(self.dir.path(), &self.destination)?;
        debug!(destination = %self.destination.display(), moved, "committed extraction");
        Ok(moved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_staging_is_hidden_and_removed_on_drop() {
        let dir = tempfile::tempdir().unwrap();
        let staged_path = {
            let staging = Staging::new(dir.path()).unwrap();
            let name = staging.path().file_name().unwrap().to_string_lossy().into_owned();
            assert!(name.starts_with(STAGING_PREFIX));
            std::fs::write(staging.path().join("half-written"), b"x").unwrap();
            staging.path().to_path_buf()
        };
        assert!(!staged_path.exists());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_commit_moves_entries_and_cleans_up() {
        let dir = tempfile::tempdir().unwrap();
        let staging = Staging::new(dir.path()).unwrap();
        std::fs::create_dir(staging.path().join("node-v4.2.1")).unwrap();
        std::fs::write(staging.path().join("node-v4.2.1").join("configure"), b"#!/bin/sh").unwrap();

        assert_eq!(staging.commit().unwrap(), 1);
        let names: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from("node-v4.2.1")]);
        assert!(dir.path().join("node-v4.2.1/configure").is_file());
    }
}
