use std::path::Path;

use futures_util::StreamExt;
use runbake_verify::{Hasher, Sha256Digest, Sha256Hasher};
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

use crate::core::{is_success, retry_delay};
use crate::data::{FetchOptions, FetchPhase, Progress};
use crate::effects::http::HttpClient;
use crate::error::{FetchError, Result};

/// What a call to [`Fetcher::fetch`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The destination already held a usable archive; no request was made.
    Cached,
    Downloaded { bytes: u64, digest: Sha256Digest },
}

/// Downloads a URL to a file, reusing a previous download when it is intact.
pub struct Fetcher<C: HttpClient> {
    client: C,
}

impl<C: HttpClient> Fetcher<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Make sure `destination` holds the body of `url`.
    ///
    /// An existing destination file is reused without network access unless
    /// its recorded digest or the pinned checksum says it is damaged, in which
    /// case it is discarded and fetched again.
    pub async fn fetch(
        &self,
        url: &str,
        destination: &Path,
        options: &FetchOptions,
    ) -> Result<FetchOutcome> {
        let dest_dir = match destination.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        runbake_fs::ensure_dir(dest_dir)?;

        if destination.exists() {
            if cached_is_usable(destination, options)? {
                debug!(path = %destination.display(), "reusing cached archive");
                return Ok(FetchOutcome::Cached);
            }
            discard(destination)?;
        }

        info!(url, "downloading");
        let mut retry_count = 0;
        loop {
            match self
                .download_once(url, dest_dir, destination, options, retry_count)
                .await
            {
                Ok(outcome) => return Ok(outcome),
                Err(e) if e.is_retryable() && retry_count < options.max_retries => {
                    let delay = retry_delay(retry_count, options.retry_backoff);
                    warn!(url, error = %e, attempt = retry_count + 1, ?delay, "download failed, retrying");
                    tokio::time::sleep(delay).await;
                    retry_count += 1;
                }
                Err(e) if e.is_retryable() => {
                    return Err(FetchError::MaxRetriesExceeded {
                        count: retry_count + 1,
                        last: Box::new(e),
                    });
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn download_once(
        &self,
        url: &str,
        dest_dir: &Path,
        destination: &Path,
        options: &FetchOptions,
        retry_count: u32,
    ) -> Result<FetchOutcome> {
        let mut progress = Progress {
            phase: FetchPhase::Connecting,
            bytes_downloaded: 0,
            total_bytes: None,
            retry_count,
        };
        report(options, &progress);

        let network = |e: C::Error| FetchError::Network {
            url: url.to_string(),
            message: e.to_string(),
        };

        let response = self.client.get(url, &options.headers).await.map_err(network)?;
        if !is_success(response.status) {
            return Err(FetchError::Http {
                url: url.to_string(),
                status: response.status,
            });
        }
        progress.total_bytes = response.content_length;

        let staging = tempfile::Builder::new()
            .prefix(".download-")
            .tempfile_in(dest_dir)
            .map_err(|e| FetchError::Io {
                path: dest_dir.to_path_buf(),
                source: e,
            })?;
        let (file, staging_path) = staging.into_parts();
        let write_err = |e| FetchError::Io {
            path: staging_path.to_path_buf(),
            source: e,
        };
        let mut file = tokio::fs::File::from_std(file);
        let mut hasher = Sha256Hasher::new();

        progress.phase = FetchPhase::Downloading;
        report(options, &progress);

        let mut body = response.body;
        while let Some(chunk) = body.next().await {
            let chunk = chunk.map_err(network)?;
            hasher.update(&chunk);
            file.write_all(&chunk).await.map_err(write_err)?;
            progress.bytes_downloaded += chunk.len() as u64;
            report(options, &progress);
        }
        file.flush().await.map_err(write_err)?;
        file.sync_all().await.map_err(write_err)?;
        drop(file);

        progress.phase = FetchPhase::Verifying;
        report(options, &progress);

        let digest = Sha256Digest::try_from(hasher.finalize())?;
        if let Some(expected) = &options.checksum {
            if expected != &digest {
                return Err(FetchError::ChecksumMismatch {
                    expected: expected.to_hex(),
                    actual: digest.to_hex(),
                });
            }
        }

        progress.phase = FetchPhase::Committing;
        report(options, &progress);

        staging_path.persist(destination).map_err(|e| FetchError::Io {
            path: destination.to_path_buf(),
            source: e.error,
        })?;
        runbake_verify::write_sidecar(destination, &digest)?;

        progress.phase = FetchPhase::Completed;
        report(options, &progress);

        info!(path = %destination.display(), bytes = progress.bytes_downloaded, sha256 = %digest, "download complete");
        Ok(FetchOutcome::Downloaded {
            bytes: progress.bytes_downloaded,
            digest,
        })
    }
}

fn report(options: &FetchOptions, progress: &Progress) {
    if let Some(callback) = &options.on_progress {
        callback(progress);
    }
}

/// An archive with no recorded digest and no pinned checksum is trusted as-is.
fn cached_is_usable(path: &Path, options: &FetchOptions) -> Result<bool> {
    let recorded = runbake_verify::read_sidecar(path).unwrap_or_else(|e| {
        warn!(path = %path.display(), error = %e, "ignoring unreadable digest sidecar");
        None
    });
    if recorded.is_none() && options.checksum.is_none() {
        return Ok(true);
    }

    let actual = runbake_verify::digest_file(path)?;
    if let Some(recorded) = recorded {
        if recorded != actual {
            warn!(path = %path.display(), expected = %recorded, actual = %actual, "cached archive is corrupt");
            return Ok(false);
        }
    }
    if let Some(expected) = &options.checksum {
        if expected != &actual {
            warn!(path = %path.display(), expected = %expected, actual = %actual, "cached archive does not match pinned checksum");
            return Ok(false);
        }
    }
    Ok(true)
}

fn discard(path: &Path) -> Result<()> {
    for p in [path.to_path_buf(), runbake_verify::sidecar_path(path)] {
        match std::fs::remove_file(&p) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(FetchError::Io { path: p, source: e }),
        }
    }
    Ok(())
}
