//! Data layer: immutable types for download configuration and progress tracking.

mod options;
mod progress;
mod version;

pub use options::{FetchOptions, ProgressCallback, USER_AGENT};
pub use progress::{FetchPhase, Progress};
pub use version::{DEFAULT_DIST_URL, DistSource, RuntimeVersion};
