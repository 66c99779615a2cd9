//! Turning an application's entry point into one source text.

use std::future::Future;
use std::path::{Path, PathBuf};

use runbake_platform::{Command, CommandRunner, SystemRunner};
use tracing::info;

#[derive(Debug, thiserror::Error)]
pub enum BundleError {
    #[error("failed to read entry '{path}'")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("bundler failed")]
    Command(#[from] runbake_platform::Error),

    #[error("bundler command is empty")]
    EmptyCommand,
}

/// Produces a single self-contained source text for an entry point.
///
/// Implementations must not modify anything on disk.
pub trait Bundler: Send + Sync {
    fn bundle(&self, entry: &Path) -> impl Future<Output = Result<String, BundleError>> + Send;
}

/// Uses the entry file itself, which is enough for an application without
/// dependencies.
#[derive(Debug, Clone, Copy, Default)]
pub struct EntryFileBundler;

impl Bundler for EntryFileBundler {
    async fn bundle(&self, entry: &Path) -> Result<String, BundleError> {
        tokio::fs::read_to_string(entry)
            .await
            .map_err(|e| BundleError::Read {
                path: entry.to_path_buf(),
                source: e,
            })
    }
}

/// Runs an external bundler with the entry path appended and takes its
/// standard output as the bundle.
#[derive(Debug, Clone)]
pub struct CommandBundler<R = SystemRunner> {
    program: String,
    args: Vec<String>,
    runner: R,
}

impl CommandBundler {
    /// Build from a command line such as `["browserify", "--node"]`.
    pub fn from_argv(argv: &[String]) -> Result<Self, BundleError> {
        Self::with_runner(argv, SystemRunner)
    }
}

impl<R: CommandRunner> CommandBundler<R> {
    pub fn with_runner(argv: &[String], runner: R) -> Result<Self, BundleError> {
        let (program, args) = argv.split_first().ok_or(BundleError::EmptyCommand)?;
        Ok(Self {
            program: program.clone(),
            args: args.to_vec(),
            runner,
        })
    }

    pub fn command(&self, entry: &Path) -> Command {
        Command::new(&self.program).args(&self.args).arg(entry)
    }
}

impl<R: CommandRunner> Bundler for CommandBundler<R> {
    async fn bundle(&self, entry: &Path) -> Result<String, BundleError> {
        Ok(self.runner.capture(&self.command(entry)).await?)
    }
}

/// The bundler picked by configuration.
#[derive(Debug, Clone)]
pub enum AnyBundler {
    EntryFile(EntryFileBundler),
    Command(CommandBundler),
}

impl AnyBundler {
    pub fn from_config(argv: Option<&[String]>) -> Result<Self, BundleError> {
        match argv {
            Some(argv) => Ok(Self::Command(CommandBundler::from_argv(argv)?)),
            None => Ok(Self::EntryFile(EntryFileBundler)),
        }
    }
}

impl Bundler for AnyBundler {
    async fn bundle(&self, entry: &Path) -> Result<String, BundleError> {
        info!(entry = %entry.display(), "bundle");
        match self {
            Self::EntryFile(b) => b.bundle(entry).await,
            Self::Command(b) => b.bundle(entry).await,
        }
    }
}
