//! Filesystem primitives shared by the runbake crates.
//!
//! - [`atomic_write`] for every file the pipeline rewrites in place
//! - [`copy_file`] / [`ensure_dir`] / [`move_entries`] for packaging and staging
//! - [`CacheLock`] for serialising access to a shared cache directory
//! - [`FileSystem`] as the seam for code that edits source trees

mod effects;
mod error;
mod lock;
mod primitives;

pub use effects::{DiskFs, FileSystem, MemoryFs};
pub use error::{Error, Result};
pub use lock::CacheLock;
pub use primitives::{
    AtomicWriteOptions, atomic_read, atomic_write, copy_file, ensure_dir, move_entries,
};
