//! Advisory locking for shared cache directories.
//!
//! Two invocations against the same cache directory serialise on a lock file
//! inside it. The lock is released when the [`CacheLock`] is dropped.
//!
//! Waiting is a non-blocking poll, so dropping the [`CacheLock::acquire`]
//! future abandons the wait immediately.

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::time::Duration;

use fs4::fs_std::FileExt;
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::{Error, Result};

const POLL_INTERVAL: Duration = Duration::from_millis(50);
const CONTENTION_WARN_AFTER: Duration = Duration::from_millis(500);

/// Exclusive advisory lock held on a cache directory.
#[derive(Debug)]
pub struct CacheLock {
    lock_path: PathBuf,
    _file: File,
}

impl CacheLock {
    pub const LOCK_FILENAME: &'static str = ".runbake.lock";

    /// Lock `dir`, waiting at most `timeout` for a competing holder.
    ///
    /// `dir` must already exist.
    pub async fn acquire(dir: &Path, timeout: Duration) -> Result<Self> {
        let lock_path = dir.join(Self::LOCK_FILENAME);
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)
            .map_err(|e| lock_error(&lock_path, e))?;

        let start = Instant::now();
        let mut warned = false;
        loop {
            if FileExt::try_lock_exclusive(&file).map_err(|e| lock_error(&lock_path, e))? {
                debug!(
                    path = %lock_path.display(),
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "cache lock acquired"
                );
                return Ok(Self {
                    lock_path,
                    _file: file,
                });
            }

            let elapsed = start.elapsed();
            if elapsed >= timeout {
                return Err(Error::LockTimeout {
                    path: lock_path,
                    timeout,
                });
            }
            if !warned && elapsed >= CONTENTION_WARN_AFTER {
                warn!(path = %lock_path.display(), "cache is locked by another build, waiting");
                warned = true;
            }
            tokio::time::sleep(POLL_INTERVAL.min(timeout - elapsed)).await;
        }
    }

    pub fn path(&self) -> &Path {
        &self.lock_path
    }
}

fn lock_error(path: &Path, source: std::io::Error) -> Error {
    Error::Lock {
        path: path.to_path_buf(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_lock_acquire_basic() {
        let temp_dir = TempDir::new().unwrap();
        let lock = CacheLock::acquire(temp_dir.path(), Duration::from_secs(1))
            .await
            .unwrap();
        assert!(lock.path().exists());
        assert_eq!(lock.path().file_name().unwrap(), CacheLock::LOCK_FILENAME);
    }

    #[tokio::test]
    async fn test_lock_released_on_drop() {
        let temp_dir = TempDir::new().unwrap();
        {
            let _lock = CacheLock::acquire(temp_dir.path(), Duration::from_secs(1))
                .await
                .unwrap();
        }
        let again = CacheLock::acquire(temp_dir.path(), Duration::ZERO).await;
        assert!(again.is_ok());
    }

    #[tokio::test]
    async fn test_lock_contention_times_out() {
        let temp_dir = TempDir::new().unwrap();
        let held = CacheLock::acquire(temp_dir.path(), Duration::from_secs(1))
            .await
            .unwrap();

        let err = CacheLock::acquire(temp_dir.path(), Duration::from_millis(100))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::LockTimeout { .. }));

        // A timed-out waiter must not grab the lock once it is released.
        drop(held);
        CacheLock::acquire(temp_dir.path(), Duration::ZERO)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_dropped_wait_leaves_lock_free() {
        let temp_dir = TempDir::new().unwrap();
        let held = CacheLock::acquire(temp_dir.path(), Duration::from_secs(1))
            .await
            .unwrap();

        let start = std::time::Instant::now();
        let waited = tokio::time::timeout(
            Duration::from_millis(100),
            CacheLock::acquire(temp_dir.path(), Duration::from_secs(30)),
        )
        .await;
        assert!(waited.is_err());
        assert!(start.elapsed() < Duration::from_secs(2));

        drop(held);
        CacheLock::acquire(temp_dir.path(), Duration::ZERO)
            .await
            .unwrap();
    }

    #[test]
    fn test_runtime_shuts_down_after_cancelled_wait() {
        let temp_dir = TempDir::new().unwrap();
        let start = std::time::Instant::now();
        {
            let rt = tokio::runtime::Runtime::new().unwrap();
            rt.block_on(async {
                let _held = CacheLock::acquire(temp_dir.path(), Duration::from_secs(1))
                    .await
                    .unwrap();
                tokio::select! {
                    _ = CacheLock::acquire(temp_dir.path(), Duration::from_secs(30)) => {
                        panic!("lock should still be contended")
                    }
                    _ = tokio::time::sleep(Duration::from_millis(100)) => {}
                }
            });
        }
        assert!(start.elapsed() < Duration::from_secs(2));
    }

    #[tokio::test]
    async fn test_lock_missing_directory() {
        let temp_dir = TempDir::new().unwrap();
        let err = CacheLock::acquire(&temp_dir.path().join("absent"), Duration::from_secs(1))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Lock { .. }));
    }
}
