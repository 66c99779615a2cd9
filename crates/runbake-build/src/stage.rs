use std::fmt;
use std::future::Future;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{Instrument, debug, info_span};

use crate::error::{Error, Result};

/// One step of the build pipeline, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    AcquireToolchain,
    BundleApplication,
    EmbedBundle,
    PatchConfig,
    PatchEntryPoint,
    PatchCliFlags,
    Build,
    Package,
}

impl Stage {
    pub fn as_str(self) -> &'static str {
        match self {
            Stage::AcquireToolchain => "acquire-toolchain",
            Stage::BundleApplication => "bundle-application",
            Stage::EmbedBundle => "embed-bundle",
            Stage::PatchConfig => "patch-config",
            Stage::PatchEntryPoint => "patch-entry-point",
            Stage::PatchCliFlags => "patch-cli-flags",
            Stage::Build => "build",
            Stage::Package => "package",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Drive `work` for `stage`, giving up when `timeout` elapses or `cancel`
/// fires. Giving up drops `work`, which kills any child it spawned.
pub(crate) async fn run_stage<T, F>(
    stage: Stage,
    timeout: Option<Duration>,
    cancel: &CancellationToken,
    work: F,
) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    let span = info_span!("stage", stage = %stage);
    async move {
        debug!("start");
        let bounded = async {
            match timeout {
                Some(after) => tokio::time::timeout(after, work)
                    .await
                    .map_err(|_| Error::Timeout { stage, after })?,
                None => work.await,
            }
        };
        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(Error::Cancelled { stage }),
            result = bounded => result,
        };
        debug!(ok = result.is_ok(), "finish");
        result
    }
    .instrument(span)
    .await
}
