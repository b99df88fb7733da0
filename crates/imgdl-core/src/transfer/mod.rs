//! Transfer unit: one URL to one file.
//!
//! Issues a GET with the shared transport settings. A response other than 200
//! ends the transfer without touching the file system; a 200 body is streamed
//! chunk by chunk into the destination file. Every failure is contained here
//! and becomes an `Error` row; partial files are removed.

mod error;
mod handler;
mod partial;

pub use error::TransferError;
pub use handler::ImageHandler;

use curl::easy::Easy2;
use std::path::Path;

use crate::report::StatusRow;
use crate::transport::TransportConfig;

/// Lifecycle of one transfer. `Succeeded` and `Failed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferState {
    /// Queued, not yet handed to curl.
    Pending,
    /// Request sent, waiting for a 200 response and the first body chunk.
    Requesting,
    /// Destination file open, body chunks being written.
    StreamingBody,
    Succeeded,
    Failed,
}

impl TransferState {
    pub fn is_terminal(self) -> bool {
        matches!(self, TransferState::Succeeded | TransferState::Failed)
    }
}

/// Rejects anything that is not an absolute http(s) URL.
pub(crate) fn check_url(url: &str) -> Result<(), TransferError> {
    let parsed =
        url::Url::parse(url).map_err(|e| TransferError::InvalidUrl(format!("{url} ({e})")))?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(TransferError::InvalidUrl(format!(
            "{url} (unsupported scheme {other})"
        ))),
    }
}

/// Build a configured Easy2 handle for `url`, writing to `dest`.
pub(crate) fn build_easy(
    index: usize,
    url: &str,
    dest: &Path,
    transport: &TransportConfig,
) -> Result<Easy2<ImageHandler>, TransferError> {
    check_url(url)?;
    let mut easy = Easy2::new(ImageHandler::new(index, dest));
    easy.url(url)?;
    transport.apply(&mut easy)?;
    Ok(easy)
}

pub(crate) fn log_result(index: usize, url: &str, result: &Result<u64, TransferError>) {
    match result {
        Ok(bytes) => tracing::info!(index, url, bytes, "download complete"),
        Err(e) => tracing::warn!(index, url, "download failed: {}", e),
    }
}

/// Downloads `url` into `dest` on the current thread and returns its row (index 1).
pub fn fetch_one(url: &str, dest: &Path, transport: &TransportConfig) -> StatusRow {
    fetch_one_indexed(1, url, dest, transport)
}

/// Like [`fetch_one`] but records the row under `index`.
/// Blocks; call from `spawn_blocking` if used from async code.
pub fn fetch_one_indexed(
    index: usize,
    url: &str,
    dest: &Path,
    transport: &TransportConfig,
) -> StatusRow {
    tracing::debug!(index, url, dest = %dest.display(), "transfer started");
    let result = perform_single(index, url, dest, transport);
    log_result(index, url, &result);
    StatusRow::from_result(index, url, &result)
}

fn perform_single(
    index: usize,
    url: &str,
    dest: &Path,
    transport: &TransportConfig,
) -> Result<u64, TransferError> {
    let mut easy = build_easy(index, url, dest, transport)?;
    easy.get_mut().start();
    let performed = easy.perform();
    let code = easy.response_code().unwrap_or(0);
    easy.get_mut().finish(code, performed)
}
