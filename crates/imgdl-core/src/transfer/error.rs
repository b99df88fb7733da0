//! Error type for a single URL transfer.

use thiserror::Error;

/// Why one transfer ended in an `Error` row. Never escapes the transfer unit;
/// its display string becomes the row's detail.
#[derive(Debug, Error)]
pub enum TransferError {
    /// Not an absolute http(s) URL; no request was made.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
    /// Curl reported an error (DNS, connect, TLS, timeout, truncated body).
    #[error("curl: {0}")]
    Curl(#[from] curl::Error),
    /// The final response status was not 200.
    #[error("HTTP {0}")]
    Http(u32),
    /// Creating or writing the destination file failed.
    #[error("storage: {0}")]
    Storage(#[from] std::io::Error),
    /// The batch was cancelled before this transfer finished.
    #[error("aborted")]
    Aborted,
    /// The multi handle failed while this transfer was in flight.
    #[error("curl multi: {0}")]
    Multi(#[from] curl::MultiError),
}
