use std::future::Future;
use std::path::{Path, PathBuf};

use runbake_archive::ArchiveExtractor;
use runbake_fetch::{
    DistSource, FetchOptions, Fetcher, HttpClient, ProgressCallback, ReqwestClient, RuntimeVersion,
};
use runbake_fs::{DiskFs, FileSystem};
use runbake_patch::{Patch, PatchOutcome, builtin};
use runbake_platform::{CommandRunner, SystemRunner};
use runbake_toolchain::{Acquired, Toolchain, ToolchainCache, ToolchainDriver};
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::bundle::{AnyBundler, Bundler};
use crate::config::{BuildConfig, StageTimeouts};
use crate::error::{Error, PackagingError, Result};
use crate::stage::{Stage, run_stage};

/// What a successful run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildReport {
    pub toolchain: Toolchain,
    pub output: PathBuf,
    pub patches: Vec<(Stage, PatchOutcome)>,
}

/// The fixed sequence of stages from entry script to executable.
pub struct Pipeline<C: HttpClient, R: CommandRunner, B: Bundler> {
    entry: PathBuf,
    output: PathBuf,
    version: RuntimeVersion,
    suppress_cli_flags: bool,
    timeouts: StageTimeouts,
    cache: ToolchainCache,
    fetcher: Fetcher<C>,
    fetch_options: FetchOptions,
    runner: R,
    bundler: B,
    cancel: CancellationToken,
}

impl<C: HttpClient, R: CommandRunner, B: Bundler> Pipeline<C, R, B> {
    pub fn new(config: &BuildConfig, client: C, runner: R, bundler: B) -> Result<Self> {
        let cache = ToolchainCache::new(&config.cache_dir, ToolchainDriver::host())
            .dist(DistSource::new(config.dist_url.as_str()))
            .lock_timeout(config.lock_timeout());
        Ok(Self {
            entry: config.entry.clone(),
            output: config.output.clone(),
            version: config.version()?,
            suppress_cli_flags: config.suppress_cli_flags,
            timeouts: config.timeouts,
            cache,
            fetcher: Fetcher::new(client),
            fetch_options: FetchOptions::default().checksum(config.checksum_digest()?),
            runner,
            bundler,
            cancel: CancellationToken::new(),
        })
    }

    /// Replace the host's native toolchain, and the extractor that goes
    /// with it.
    pub fn driver(mut self, driver: ToolchainDriver) -> Self {
        self.cache = self.cache.driver(driver);
        self
    }

    pub fn extractor(mut self, extractor: ArchiveExtractor) -> Self {
        self.cache = self.cache.extractor(extractor);
        self
    }

    pub fn on_progress(mut self, callback: ProgressCallback) -> Self {
        self.fetch_options = self.fetch_options.on_progress(callback);
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn fetcher(&self) -> &Fetcher<C> {
        &self.fetcher
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    pub async fn run(&self) -> Result<BuildReport> {
        let Acquired {
            toolchain,
            lock: _lock,
        } = self
            .stage(Stage::AcquireToolchain, async {
                self.cache
                    .acquire(&self.version, &self.fetcher, &self.fetch_options, &self.runner)
                    .await
                    .map_err(|e| Error::acquire(Stage::AcquireToolchain, e))
            })
            .await?;

        let bundle = self
            .stage(Stage::BundleApplication, async {
                self.bundler
                    .bundle(&self.entry)
                    .await
                    .map_err(|source| Error::Bundle {
                        stage: Stage::BundleApplication,
                        source,
                    })
            })
            .await?;

        self.stage(Stage::EmbedBundle, async {
            embed_bundle(&DiskFs, toolchain.root(), &bundle)
        })
        .await?;

        let mut patches = vec![
            (Stage::PatchConfig, builtin::gyp_module()),
            (Stage::PatchEntryPoint, builtin::bootstrap_eval()),
        ];
        if self.suppress_cli_flags {
            patches.push((Stage::PatchCliFlags, builtin::suppress_cli_flags()));
        }
        let mut outcomes = Vec::with_capacity(patches.len());
        for (stage, patch) in patches {
            let outcome = self
                .stage(stage, async { apply_patch(stage, &patch, toolchain.root()) })
                .await?;
            outcomes.push((stage, outcome));
        }

        self.stage(Stage::Build, async {
            toolchain
                .build(&self.runner)
                .await
                .map_err(|source| Error::Build {
                    stage: Stage::Build,
                    source,
                })
        })
        .await?;

        self.stage(Stage::Package, async {
            package(&toolchain.release_binary(), &self.output).map_err(|source| {
                Error::Packaging {
                    stage: Stage::Package,
                    source,
                }
            })
        })
        .await?;

        info!(output = %self.output.display(), "build complete");
        Ok(BuildReport {
            toolchain,
            output: self.output.clone(),
            patches: outcomes,
        })
    }

    async fn stage<T, F>(&self, stage: Stage, work: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        run_stage(stage, self.timeouts.for_stage(stage), &self.cancel, work).await
    }
}

/// Build with the real network, subprocesses and configured bundler.
pub async fn build(
    config: &BuildConfig,
    cancel: CancellationToken,
    on_progress: Option<ProgressCallback>,
) -> Result<BuildReport> {
    let bundler = AnyBundler::from_config(config.bundler.as_deref())
        .map_err(|e| Error::Config(format!("bundler: {e}")))?;
    let mut pipeline = Pipeline::new(config, ReqwestClient::new(), SystemRunner, bundler)?
        .with_cancellation(cancel);
    if let Some(callback) = on_progress {
        pipeline = pipeline.on_progress(callback);
    }
    pipeline.run().await
}

/// Drop every character outside ASCII.
pub fn sanitize_ascii(text: &str) -> String {
    text.chars().filter(char::is_ascii).collect()
}

fn embed_bundle<F: FileSystem>(fs: &F, root: &Path, bundle: &str) -> Result<()> {
    let path = root.join(builtin::MODULE_FILE);
    info!(path = %path.display(), "bundle ->");
    fs.write(&path, sanitize_ascii(bundle).as_bytes())
        .map_err(|e| Error::Patch {
            stage: Stage::EmbedBundle,
            source: e.into(),
        })
}

fn apply_patch(stage: Stage, patch: &Patch, root: &Path) -> Result<PatchOutcome> {
    patch
        .apply(&DiskFs, root)
        .map_err(|source| Error::Patch { stage, source })
}

fn package(binary: &Path, output: &Path) -> std::result::Result<(), PackagingError> {
    if !binary.is_file() {
        return Err(PackagingError::MissingBinary(binary.to_path_buf()));
    }
    info!(src = %binary.display(), dst = %output.display(), "cp");
    runbake_fs::copy_file(binary, output)?;
    mark_executable(output)
}

#[cfg(unix)]
fn mark_executable(path: &Path) -> std::result::Result<(), PackagingError> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755)).map_err(|e| {
        PackagingError::Permissions {
            path: path.to_path_buf(),
            source: e,
        }
    })
}

#[cfg(not(unix))]
fn mark_executable(_path: &Path) -> std::result::Result<(), PackagingError> {
    Ok(())
}
