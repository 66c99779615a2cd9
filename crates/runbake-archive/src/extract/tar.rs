use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use flate2::read::GzDecoder;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::staging::Staging;

/// Decodes `.tar.gz` archives without any external tools.
#[derive(Debug, Clone, Copy, Default)]
pub struct TarGzExtractor;

impl TarGzExtractor {
    pub async fn extract(&self, archive: &Path, destination: &Path) -> Result<usize> {
        info!(archive = %archive.display(), destination = %destination.display(), "extracting");
        let archive = archive.to_path_buf();
        let destination = destination.to_path_buf();
        tokio::task::spawn_blocking(move || extract_blocking(&archive, &destination))
            .await
            .map_err(|e| Error::Task(e.to_string()))?
    }
}

fn extract_blocking(archive: &Path, destination: &Path) -> Result<usize> {
    let file = File::open(archive).map_err(|e| Error::Open {
        path: archive.to_path_buf(),
        source: e,
    })?;
    let staging = Staging::new(destination)?;
    unpack_into(archive, file, staging.path())?;
    staging.commit()
}

fn unpack_into(archive_path: &Path, file: File, target: &Path) -> Result<()> {
    let corrupted = |e| Error::Corrupted {
        path: archive_path.to_path_buf(),
        source: e,
    };

    let mut archive = tar::Archive::new(GzDecoder::new(BufReader::new(file)));
    let mut count = 0usize;
    for entry in archive.entries().map_err(corrupted)? {
        let mut entry = entry.map_err(corrupted)?;
        let entry_path: PathBuf = entry
            .path()
            .map(|p| p.into_owned())
            .map_err(corrupted)?;
        let unpacked = entry.unpack_in(target).map_err(|e| Error::Unpack {
            entry: entry_path.clone(),
            source: e,
        })?;
        if !unpacked {
            return Err(Error::PathEscape { entry: entry_path });
        }
        count += 1;
    }
    debug!(entries = count, "unpacked archive");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn test_missing_archive_is_open_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = TarGzExtractor
            .extract(&dir.path().join("absent.tar.gz"), dir.path())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Open { .. }));
    }

    #[tokio::test]
    async fn test_garbage_is_corrupted_and_leaves_no_staging() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("node-latest.tar.gz");
        File::create(&archive)
            .unwrap()
            .write_all(b"definitely not gzip")
            .unwrap();
        let dest = dir.path().join("latest");

        let err = TarGzExtractor.extract(&archive, &dest).await.unwrap_err();
        assert!(matches!(err, Error::Corrupted { .. }));
        assert_eq!(std::fs::read_dir(&dest).unwrap().count(), 0);
    }
}
