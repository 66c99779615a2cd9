use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use runbake_verify::Sha256Digest;

use super::progress::Progress;

/// Identifies this client to the distribution server and any proxy in between.
pub const USER_AGENT: &str = concat!("runbake/", env!("CARGO_PKG_VERSION"));

pub type ProgressCallback = Arc<dyn Fn(&Progress) + Send + Sync>;

/// Configuration for a single fetch.
///
/// # Examples
///
/// ```
/// use runbake_fetch::FetchOptions;
/// use std::time::Duration;
///
/// let options = FetchOptions::default()
///     .max_retries(5)
///     .retry_backoff(Duration::from_millis(200))
///     .header("Accept", "application/gzip");
/// ```
#[derive(Clone)]
pub struct FetchOptions {
    /// Expected SHA-256 of the archive. Checked on fresh downloads and before
    /// reusing a cached file.
    pub checksum: Option<Sha256Digest>,

    /// Retries after the initial attempt, for network errors and 5xx responses.
    ///
    /// Default: 3
    pub max_retries: u32,

    /// Delay before retry N is `retry_backoff * 2^N`.
    ///
    /// Default: 100ms
    pub retry_backoff: Duration,

    /// Sent with every request. Starts with a `User-Agent` entry.
    pub headers: Arc<[(String, String)]>,

    pub on_progress: Option<ProgressCallback>,
}

impl fmt::Debug for FetchOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FetchOptions")
            .field("checksum", &self.checksum)
            .field("max_retries", &self.max_retries)
            .field("retry_backoff", &self.retry_backoff)
            .field("headers", &self.headers)
            .field("on_progress", &"{ ... }")
            .finish()
    }
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            checksum: None,
            max_retries: 3,
            retry_backoff: Duration::from_millis(100),
            headers: Arc::new([("User-Agent".to_string(), USER_AGENT.to_string())]),
            on_progress: None,
        }
    }
}

impl FetchOptions {
    #[must_use]
    pub fn checksum(mut self, checksum: Option<Sha256Digest>) -> Self {
        self.checksum = checksum;
        self
    }

    #[must_use]
    pub fn max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    #[must_use]
    pub fn retry_backoff(mut self, backoff: Duration) -> Self {
        self.retry_backoff = backoff;
        self
    }

    /// Add a header, replacing an existing one with the same name.
    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let key = key.into();
        let mut headers: Vec<_> = self
            .headers
            .iter()
            .filter(|(k, _)| !k.eq_ignore_ascii_case(&key))
            .cloned()
            .collect();
        headers.push((key, value.into()));
        self.headers = headers.into();
        self
    }

    #[must_use]
    pub fn on_progress(mut self, callback: ProgressCallback) -> Self {
        self.on_progress = Some(callback);
        self
    }
}
