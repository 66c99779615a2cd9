use std::path::{Path, PathBuf};
use std::time::Duration;

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use runbake_fetch::{DEFAULT_DIST_URL, RuntimeVersion};
use runbake_verify::Sha256Digest;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::stage::Stage;

/// Everything a build needs to know.
///
/// Only `entry` and `output` have no default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildConfig {
    /// The application's entry script.
    pub entry: PathBuf,

    /// Where the finished executable is written.
    pub output: PathBuf,

    /// `latest` or a release number such as `4.2.1`.
    #[serde(default = "default_runtime_version")]
    pub runtime_version: String,

    /// Downloaded archives and extracted trees, one directory per version.
    #[serde(default = "default_cache_dir")]
    pub cache_dir: PathBuf,

    /// Compile the runtime so that it never interprets its own options.
    #[serde(default)]
    pub suppress_cli_flags: bool,

    #[serde(default = "default_dist_url")]
    pub dist_url: String,

    /// Expected SHA-256 of the source archive, as hex.
    #[serde(default)]
    pub checksum: Option<String>,

    #[serde(default)]
    pub timeouts: StageTimeouts,

    #[serde(default = "default_lock_timeout_secs")]
    pub lock_timeout_secs: u64,

    /// External bundler command line; the entry path is appended. The entry
    /// file is used as-is when unset.
    #[serde(default)]
    pub bundler: Option<Vec<String>>,
}

fn default_runtime_version() -> String {
    RuntimeVersion::LATEST.to_string()
}

fn default_cache_dir() -> PathBuf {
    PathBuf::from("./tmp/runbake")
}

fn default_dist_url() -> String {
    DEFAULT_DIST_URL.to_string()
}

fn default_lock_timeout_secs() -> u64 {
    600
}

/// Per-stage time limits in seconds. Unset limits fall back to
/// `default_secs`; with that unset too the stage may run forever.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StageTimeouts {
    pub fetch_secs: Option<u64>,
    pub extract_secs: Option<u64>,
    pub build_secs: Option<u64>,
    pub default_secs: Option<u64>,
}

impl StageTimeouts {
    /// Acquisition covers both download and extraction, so its limit is the
    /// sum of the two and is unbounded if either is.
    pub fn for_stage(&self, stage: Stage) -> Option<Duration> {
        let or_default = |secs: Option<u64>| secs.or(self.default_secs);
        let secs = match stage {
            Stage::AcquireToolchain => {
                or_default(self.fetch_secs)?.checked_add(or_default(self.extract_secs)?)?
            }
            Stage::Build => or_default(self.build_secs)?,
            _ => self.default_secs?,
        };
        Some(Duration::from_secs(secs))
    }
}

/// Command line values layered over every other configuration source.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ConfigOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entry: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub runtime_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_dir: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suppress_cli_flags: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dist_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checksum: Option<String>,
}

impl BuildConfig {
    pub const FILE_NAME: &'static str = "runbake.toml";
    pub const ENV_PREFIX: &'static str = "RUNBAKE_";

    pub fn new(entry: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            entry: entry.into(),
            output: output.into(),
            runtime_version: default_runtime_version(),
            cache_dir: default_cache_dir(),
            suppress_cli_flags: false,
            dist_url: default_dist_url(),
            checksum: None,
            timeouts: StageTimeouts::default(),
            lock_timeout_secs: default_lock_timeout_secs(),
            bundler: None,
        }
    }

    /// The file and environment layers, lowest precedence first.
    ///
    /// Without an explicit `config_file`, `runbake.toml` is picked up if
    /// present. Nested keys use `__` in variable names, e.g.
    /// `RUNBAKE_TIMEOUTS__BUILD_SECS`.
    pub fn figment(config_file: Option<&Path>) -> Figment {
        let file = config_file.unwrap_or(Path::new(Self::FILE_NAME));
        Figment::new()
            .merge(Toml::file(file))
            .merge(Env::prefixed(Self::ENV_PREFIX).split("__"))
    }

    /// Load from file, environment and `overrides`, in rising precedence.
    pub fn load(config_file: Option<&Path>, overrides: &ConfigOverrides) -> Result<Self> {
        if let Some(path) = config_file {
            if !path.is_file() {
                return Err(Error::Config(format!(
                    "config file '{}' does not exist",
                    path.display()
                )));
            }
        }
        Self::from_figment(Self::figment(config_file).merge(Serialized::defaults(overrides)))
    }

    pub fn from_figment(figment: Figment) -> Result<Self> {
        figment.extract().map_err(|e| Error::Config(e.to_string()))
    }

    pub fn version(&self) -> Result<RuntimeVersion> {
        self.runtime_version
            .parse()
            .map_err(|e| Error::Config(format!("runtime_version: {e}")))
    }

    pub fn checksum_digest(&self) -> Result<Option<Sha256Digest>> {
        self.checksum
            .as_deref()
            .map(|hex| hex.parse().map_err(|e| Error::Config(format!("checksum: {e}"))))
            .transpose()
    }

    pub fn lock_timeout(&self) -> Duration {
        Duration::from_secs(self.lock_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn test_defaults_fill_everything_but_paths() {
        Jail::expect_with(|jail| {
            jail.create_file(BuildConfig::FILE_NAME, "entry = \"app.js\"\noutput = \"out/app\"")?;
            let config = BuildConfig::load(None, &ConfigOverrides::default()).unwrap();
            assert_eq!(config, BuildConfig::new("app.js", "out/app"));
            assert_eq!(config.version().unwrap(), RuntimeVersion::Latest);
            Ok(())
        });
    }

    #[test]
    fn test_precedence_file_env_overrides() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "custom.toml",
                r#"
                    entry = "app.js"
                    output = "app"
                    runtime_version = "0.12.7"
                    cache_dir = "/var/cache/runbake"

                    [timeouts]
                    build_secs = 3600
                "#,
            )?;
            jail.set_env("RUNBAKE_RUNTIME_VERSION", "4.2.1");
            jail.set_env("RUNBAKE_TIMEOUTS__FETCH_SECS", "120");

            let overrides = ConfigOverrides {
                runtime_version: Some("5.0.0".into()),
                suppress_cli_flags: Some(true),
                ..Default::default()
            };
            let from_env =
                BuildConfig::load(Some(Path::new("custom.toml")), &ConfigOverrides::default())
                    .unwrap();
            assert_eq!(from_env.runtime_version, "4.2.1");
            assert_eq!(from_env.cache_dir, Path::new("/var/cache/runbake"));
            assert_eq!(from_env.timeouts.fetch_secs, Some(120));
            assert_eq!(from_env.timeouts.build_secs, Some(3600));

            let from_cli = BuildConfig::load(Some(Path::new("custom.toml")), &overrides).unwrap();
            assert_eq!(from_cli.runtime_version, "5.0.0");
            assert!(from_cli.suppress_cli_flags);
            Ok(())
        });
    }

    #[test]
    fn test_missing_entry_is_config_error() {
        Jail::expect_with(|_| {
            let err = BuildConfig::load(None, &ConfigOverrides::default()).unwrap_err();
            assert!(matches!(err, Error::Config(_)));
            Ok(())
        });
    }

    #[test]
    fn test_missing_explicit_file_is_config_error() {
        let err = BuildConfig::load(
            Some(Path::new("/definitely/not/here.toml")),
            &ConfigOverrides::default(),
        )
        .unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn test_invalid_checksum() {
        let mut config = BuildConfig::new("a.js", "a");
        config.checksum = Some("xyz".into());
        assert!(matches!(config.checksum_digest(), Err(Error::Config(_))));
        config.checksum = Some("ab".repeat(32));
        assert!(config.checksum_digest().unwrap().is_some());
    }

    #[test]
    fn test_stage_timeouts() {
        let timeouts = StageTimeouts {
            fetch_secs: Some(60),
            extract_secs: None,
            build_secs: Some(1800),
            default_secs: Some(30),
        };
        assert_eq!(
            timeouts.for_stage(Stage::AcquireToolchain),
            Some(Duration::from_secs(90))
        );
        assert_eq!(timeouts.for_stage(Stage::Build), Some(Duration::from_secs(1800)));
        assert_eq!(timeouts.for_stage(Stage::Package), Some(Duration::from_secs(30)));

        let unbounded = StageTimeouts {
            fetch_secs: Some(60),
            ..Default::default()
        };
        assert_eq!(unbounded.for_stage(Stage::AcquireToolchain), None);
        assert_eq!(unbounded.for_stage(Stage::Build), None);
    }
}
