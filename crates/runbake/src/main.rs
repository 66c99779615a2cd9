use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use runbake_build::{BuildConfig, CancellationToken};
use tracing::{info, warn};

use crate::cli::Cli;
use crate::tracker::DownloadTracker;

mod cli;
mod logging;
mod tracker;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.log_level);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("runbake: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = BuildConfig::load(cli.config.as_deref(), &cli.overrides())
        .context("failed to load configuration")?;

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupted, stopping the build");
            on_interrupt.cancel();
        }
    });

    let tracker = Arc::new(DownloadTracker::default());
    let result = runbake_build::build(&config, cancel, Some(tracker.callback())).await;
    tracker.finish();

    let report = result.context("build failed")?;
    info!(
        output = %report.output.display(),
        toolchain = %report.toolchain.root().display(),
        "done"
    );
    Ok(())
}
