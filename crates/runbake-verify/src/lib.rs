//! Content verification primitives for downloaded artifacts.
//!
//! Provides incremental hashing for single-pass verification while bytes
//! stream to disk, plus the digest sidecar used to detect a corrupted cached
//! archive before it is reused.
//!
//! # Example
//!
//! ```
//! use runbake_verify::{Hasher, Sha256Digest, Sha256Hasher};
//!
//! let mut hasher = Sha256Hasher::new();
//! hasher.update(b"hello ");
//! hasher.update(b"world");
//! let digest = Sha256Digest::try_from(hasher.finalize()).unwrap();
//!
//! let expected = Sha256Digest::try_from(Sha256Hasher::digest(b"hello world")).unwrap();
//! expected.verify(&digest).unwrap();
//! ```

pub use self::digest::{Sha256Digest, digest_file, read_sidecar, sidecar_path, write_sidecar};
pub use self::error::{Result, VerificationError};
pub use self::hasher::{Hasher, Sha256Hasher};

mod digest;
mod error;
mod hasher;
