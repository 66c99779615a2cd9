//! Idempotent edits to files of an extracted runtime source tree.
//!
//! A [`Patch`] pairs a detection predicate with a transform. Applying it
//! reads the target, does nothing if the predicate already holds, and
//! otherwise writes the transformed content. The transform must make the
//! predicate hold, so re-applying a patch to its own output never edits the
//! file twice.
//!
//! ```
//! use runbake_patch::builtin;
//!
//! let patch = builtin::gyp_module();
//! let once = patch.apply_to_str("'lib/fs.js',").unwrap().unwrap();
//! assert!(patch.is_applied(&once));
//! assert_eq!(patch.apply_to_str(&once).unwrap(), None);
//! ```

pub use error::{PatchError, Result};
pub use patch::{Patch, PatchOutcome};

pub mod builtin;
mod error;
mod patch;
