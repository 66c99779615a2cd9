//! Host platform detection and subprocess execution.
//!
//! Every subprocess the build pipeline spawns goes through a
//! [`CommandRunner`], which validates the exit status instead of treating
//! process termination as success.

pub use command::{Command, CommandRunner, SystemRunner};
pub use error::{Error, Result};

pub mod command;
mod error;
pub mod os;
