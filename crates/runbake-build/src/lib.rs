//! The build pipeline: acquire a runtime source tree, embed an application
//! bundle into it, patch it, build it and copy out the binary.
//!
//! Stages run strictly in order, each under its own tracing span, timeout and
//! the pipeline's cancellation token. The first failing stage ends the run.

pub use bundle::{AnyBundler, BundleError, Bundler, CommandBundler, EntryFileBundler};
pub use config::{BuildConfig, ConfigOverrides, StageTimeouts};
pub use error::{Error, PackagingError, Result};
pub use pipeline::{BuildReport, Pipeline, build, sanitize_ascii};
pub use stage::Stage;

pub use tokio_util::sync::CancellationToken;

mod bundle;
mod config;
mod error;
mod pipeline;
mod stage;
