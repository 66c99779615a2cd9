use std::fmt;
use std::str::FromStr;

use crate::error::FetchError;

pub const DEFAULT_DIST_URL: &str = "https://nodejs.org/dist";

/// Which runtime release to build against.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RuntimeVersion {
    /// The distribution server's "most recent" alias.
    Latest,
    /// A dotted release number, stored without a leading `v`.
    Release(String),
}

impl RuntimeVersion {
    pub const LATEST: &'static str = "latest";

    /// File name of the cached archive: `node-{version}.tar.gz`.
    pub fn archive_file_name(&self) -> String {
        format!("node-{self}.tar.gz")
    }
}

impl FromStr for RuntimeVersion {
    type Err = FetchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s == Self::LATEST {
            return Ok(RuntimeVersion::Latest);
        }
        let v = s.strip_prefix('v').unwrap_or(s);
        // Used as a cache directory name, so it must stay a single normal component.
        if v.is_empty()
            || v.chars().all(|c| c == '.')
            || v.contains(['/', '\\'])
            || v.chars().any(char::is_whitespace)
        {
            return Err(FetchError::InvalidVersion(s.to_string()));
        }
        Ok(RuntimeVersion::Release(v.to_string()))
    }
}

impl fmt::Display for RuntimeVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuntimeVersion::Latest => f.write_str(Self::LATEST),
            RuntimeVersion::Release(v) => f.write_str(v),
        }
    }
}

/// Base URL of a runtime source distribution server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistSource {
    prefix: String,
}

impl Default for DistSource {
    fn default() -> Self {
        Self::new(DEFAULT_DIST_URL)
    }
}

impl DistSource {
    pub fn new(prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        Self {
            prefix: prefix.trim_end_matches('/').to_string(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn archive_url(&self, version: &RuntimeVersion) -> String {
        match version {
            RuntimeVersion::Latest => format!("{}/node-latest.tar.gz", self.prefix),
            RuntimeVersion::Release(v) => format!("{}/v{v}/node-v{v}.tar.gz", self.prefix),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latest_url() {
        let dist = DistSource::new("https://example.org/dist");
        assert_eq!(
            dist.archive_url(&RuntimeVersion::Latest),
            "https://example.org/dist/node-latest.tar.gz"
        );
    }

    #[test]
    fn test_release_url() {
        let dist = DistSource::new("https://example.org/dist/");
        let v: RuntimeVersion = "4.2.1".parse().unwrap();
        assert_eq!(
            dist.archive_url(&v),
            "https://example.org/dist/v4.2.1/node-v4.2.1.tar.gz"
        );
    }

    #[test]
    fn test_parse_strips_single_v() {
        assert_eq!(
            "v0.10.28".parse::<RuntimeVersion>().unwrap(),
            RuntimeVersion::Release("0.10.28".into())
        );
        assert_eq!(
            "latest".parse::<RuntimeVersion>().unwrap(),
            RuntimeVersion::Latest
        );
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("".parse::<RuntimeVersion>().is_err());
        assert!("v".parse::<RuntimeVersion>().is_err());
        assert!("../etc".parse::<RuntimeVersion>().is_err());
        assert!("1.0 beta".parse::<RuntimeVersion>().is_err());
        assert!(".".parse::<RuntimeVersion>().is_err());
        assert!("..".parse::<RuntimeVersion>().is_err());
        assert!("v..".parse::<RuntimeVersion>().is_err());
    }

    #[test]
    fn test_archive_file_name() {
        assert_eq!(
            RuntimeVersion::Latest.archive_file_name(),
            "node-latest.tar.gz"
        );
        assert_eq!(
            RuntimeVersion::Release("4.2.1".into()).archive_file_name(),
            "node-4.2.1.tar.gz"
        );
    }
}
