pub mod atomic_write;
pub mod copy;

pub use atomic_write::{AtomicWriteOptions, atomic_read, atomic_write};
pub use copy::{copy_file, ensure_dir, move_entries};
