use std::path::{Path, PathBuf};
use std::time::Duration;

use runbake_archive::ArchiveExtractor;
use runbake_fetch::{DistSource, FetchError, FetchOptions, Fetcher, HttpClient, RuntimeVersion};
use runbake_fs::CacheLock;
use runbake_platform::CommandRunner;
use tracing::{debug, info};

use crate::driver::ToolchainDriver;
use crate::error::{Error, Result};
use crate::resolve::find_source_dir;
use crate::toolchain::Toolchain;

/// A toolchain together with the lock that keeps other runs out of its
/// cache directory. Dropping it releases the lock.
#[derive(Debug)]
pub struct Acquired {
    pub toolchain: Toolchain,
    pub lock: CacheLock,
}

/// Runtime source trees kept under `{cache_dir}/{version}/`.
#[derive(Debug, Clone)]
pub struct ToolchainCache {
    cache_dir: PathBuf,
    dist: DistSource,
    driver: ToolchainDriver,
    extractor: ArchiveExtractor,
    lock_timeout: Duration,
}

impl ToolchainCache {
    pub fn new(cache_dir: impl Into<PathBuf>, driver: ToolchainDriver) -> Self {
        Self {
            cache_dir: cache_dir.into(),
            dist: DistSource::default(),
            extractor: driver.extractor(),
            driver,
            lock_timeout: Duration::from_secs(600),
        }
    }

    pub fn dist(mut self, dist: DistSource) -> Self {
        self.dist = dist;
        self
    }

    /// Switch the native toolchain. Also resets the extractor to the
    /// driver's own.
    pub fn driver(mut self, driver: ToolchainDriver) -> Self {
        self.extractor = driver.extractor();
        self.driver = driver;
        self
    }

    pub fn extractor(mut self, extractor: ArchiveExtractor) -> Self {
        self.extractor = extractor;
        self
    }

    pub fn lock_timeout(mut self, timeout: Duration) -> Self {
        self.lock_timeout = timeout;
        self
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    pub fn version_dir(&self, version: &RuntimeVersion) -> PathBuf {
        self.cache_dir.join(version.to_string())
    }

    pub fn archive_path(&self, version: &RuntimeVersion) -> PathBuf {
        self.version_dir(version).join(version.archive_file_name())
    }

    /// Fetch, extract and resolve `version`, skipping whatever is already
    /// cached.
    ///
    /// A source directory left by an earlier run is used as-is, without
    /// touching the network. The returned lock is held on the version
    /// directory so the caller can keep mutating the tree exclusively.
    pub async fn acquire<C, R>(
        &self,
        version: &RuntimeVersion,
        fetcher: &Fetcher<C>,
        options: &FetchOptions,
        runner: &R,
    ) -> Result<Acquired>
    where
        C: HttpClient,
        R: CommandRunner,
    {
        let version_dir = self.version_dir(version);
        runbake_fs::ensure_dir(&version_dir).map_err(FetchError::from)?;
        // Build commands run with the tree as their working directory.
        let version_dir = std::path::absolute(&version_dir).map_err(|e| Error::Resolve {
            path: version_dir.clone(),
            source: e,
        })?;
        let lock = CacheLock::acquire(&version_dir, self.lock_timeout)
            .await
            .map_err(Error::Lock)?;

        let root = match find_source_dir(&version_dir)? {
            Some(root) => {
                debug!(root = %root.display(), "reusing extracted toolchain");
                root
            }
            None => {
                let archive = version_dir.join(version.archive_file_name());
                let url = self.dist.archive_url(version);
                fetcher.fetch(&url, &archive, options).await?;
                self.extractor.extract(&archive, &version_dir, runner).await?;
                find_source_dir(&version_dir)?.ok_or_else(|| Error::NotFound(version_dir.clone()))?
            }
        };

        info!(root = %root.display(), %version, "toolchain ready");
        Ok(Acquired {
            toolchain: Toolchain::new(root, version.clone(), self.driver.clone()),
            lock,
        })
    }
}
