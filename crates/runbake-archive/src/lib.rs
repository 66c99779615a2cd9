//! Unpacking of runtime source archives.
//!
//! Extraction always happens in a hidden `.extract-*` directory next to the
//! final location. Only once the archive is fully unpacked are its top-level
//! entries moved into place, so an interrupted run never leaves something
//! that looks like a complete source tree.
//!
//! Two extractors exist behind [`ArchiveExtractor`]:
//!
//! - [`TarGzExtractor`] decodes gzip + tar in-process
//! - [`SystemTar`] shells out to the host's `tar` utility

pub use error::{Error, Result};
pub use extract::{ArchiveExtractor, SystemTar, TarGzExtractor};
pub use staging::Staging;

mod error;
pub mod extract;
mod staging;
