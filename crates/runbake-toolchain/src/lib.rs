//! Acquisition of an extracted runtime source tree and the native build
//! that turns it into a binary.
//!
//! - [`ToolchainCache`] fetches, extracts and resolves a version under a
//!   cache directory, reusing whatever a previous run left behind
//! - [`ToolchainDriver`] knows the per-platform build commands and where the
//!   release binary ends up
//! - [`Toolchain`] is the resolved tree plus its driver

pub use cache::{Acquired, ToolchainCache};
pub use driver::{PosixDriver, ToolchainDriver, WindowsDriver};
pub use error::{Error, Result};
pub use resolve::find_source_dir;
pub use toolchain::Toolchain;

mod cache;
mod driver;
mod error;
mod resolve;
mod toolchain;
