//! Pure helpers with no I/O.

mod retry;

pub use retry::retry_delay;

/// Whether an HTTP status code denotes success.
pub fn is_success(status: u16) -> bool {
    (200..300).contains(&status)
}
