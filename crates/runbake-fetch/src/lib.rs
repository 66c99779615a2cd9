//! Runtime source archive downloading with streaming verification and atomic placement.
//!
//! # Architecture
//!
//! This crate follows the three-layer pattern:
//! - `data` - Immutable configuration and types
//! - `core` - Pure transformations
//! - `effects` - I/O operations behind the [`HttpClient`] trait
//!
//! # Key Features
//!
//! - **Single-Pass**: the body is hashed while it streams to disk
//! - **Atomic Placement**: bytes land in a staging file that is renamed into
//!   place only after verification, so a partial download is never reused
//! - **Cache Reuse**: an intact archive already on disk is never fetched again
//! - **Mechanism-Only**: progress is reported through a callback; rendering is
//!   the caller's business

mod core;
mod data;
mod effects;
mod error;

pub use core::{is_success, retry_delay};
pub use data::{
    DEFAULT_DIST_URL, DistSource, FetchOptions, FetchPhase, Progress, ProgressCallback,
    RuntimeVersion, USER_AGENT,
};
pub use effects::{BoxStream, FetchOutcome, Fetcher, HttpClient, HttpResponse};

#[cfg(feature = "reqwest")]
pub use effects::ReqwestClient;

pub use error::{FetchError, Result};
