//! Easy2 Handler for one image transfer.
//! Checks for a 200 status before opening the destination file, then streams
//! each received chunk into it.

use std::io;
use std::path::{Path, PathBuf};
use std::str;

use super::partial::PartialFile;
use super::{TransferError, TransferState};

/// Handler state for one URL. Implements curl's Handler for Easy2.
pub struct ImageHandler {
    index: usize,
    dest: PathBuf,
    /// Status of the most recent response (the last hop after redirects).
    status: Option<u32>,
    state: TransferState,
    file: Option<PartialFile>,
    bytes_written: u64,
    storage_error: Option<io::Error>,
}

impl ImageHandler {
    pub(crate) fn new(index: usize, dest: &Path) -> Self {
        Self {
            index,
            dest: dest.to_path_buf(),
            status: None,
            state: TransferState::Pending,
            file: None,
            bytes_written: 0,
            storage_error: None,
        }
    }

    /// Handle is attached to curl; the request is about to go out.
    pub(crate) fn start(&mut self) {
        self.state = TransferState::Requesting;
    }

    pub fn state(&self) -> TransferState {
        self.state
    }

    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    /// Settle the transfer once curl is done with it. `code` is the final
    /// response code (0 when no response arrived). On error any partial file
    /// is removed.
    pub(crate) fn finish(
        &mut self,
        code: u32,
        performed: Result<(), curl::Error>,
    ) -> Result<u64, TransferError> {
        let result = self.settle(code, performed);
        match result {
            Ok(_) => self.state = TransferState::Succeeded,
            Err(_) => self.discard(),
        }
        result
    }

    /// Close and delete whatever was written; the transfer ends as Failed.
    pub(crate) fn discard(&mut self) {
        self.file = None;
        self.state = TransferState::Failed;
    }

    fn settle(&mut self, code: u32, performed: Result<(), curl::Error>) -> Result<u64, TransferError> {
        if let Some(e) = self.storage_error.take() {
            return Err(TransferError::Storage(e));
        }
        if code != 0 && code != 200 {
            return Err(TransferError::Http(code));
        }
        performed?;
        if code != 200 {
            return Err(TransferError::Http(code));
        }
        // A 200 with an empty body never reaches write(); still produce the file.
        let file = match self.file.take() {
            Some(f) => f,
            None => PartialFile::create(&self.dest)?,
        };
        file.commit()?;
        tracing::debug!(
            index = self.index,
            dest = %self.dest.display(),
            bytes = self.bytes_written,
            "image saved"
        );
        Ok(self.bytes_written)
    }

    fn open_destination(&mut self) -> bool {
        match PartialFile::create(&self.dest) {
            Ok(f) => {
                self.file = Some(f);
                self.state = TransferState::StreamingBody;
                true
            }
            Err(e) => {
                self.storage_error = Some(e);
                self.state = TransferState::Failed;
                false
            }
        }
    }
}

/// Status code from a raw HTTP status line ("HTTP/1.1 200 OK", "HTTP/2 404").
/// Only the code must be ASCII; the reason phrase may hold any bytes.
pub(crate) fn parse_status_line(line: &[u8]) -> Option<u32> {
    if !line.starts_with(b"HTTP/") {
        return None;
    }
    let code = line
        .split(|b| b.is_ascii_whitespace())
        .filter(|token| !token.is_empty())
        .nth(1)?;
    if !code.iter().all(u8::is_ascii_digit) {
        return None;
    }
    str::from_utf8(code).ok()?.parse().ok()
}

impl curl::easy::Handler for ImageHandler {
    fn header(&mut self, data: &[u8]) -> bool {
        if let Some(code) = parse_status_line(data) {
            self.status = Some(code);
        }
        true
    }

    fn write(&mut self, data: &[u8]) -> Result<usize, curl::easy::WriteError> {
        if self.state == TransferState::Requesting {
            if self.status != Some(200) {
                // Not the success status: stop without touching the file system.
                self.state = TransferState::Failed;
                return Ok(0);
            }
            if !self.open_destination() {
                return Ok(0);
            }
        }
        let file = match (self.state, self.file.as_mut()) {
            (TransferState::StreamingBody, Some(f)) => f,
            _ => return Ok(0),
        };
        match file.write_chunk(data) {
            Ok(()) => {
                self.bytes_written += data.len() as u64;
                Ok(data.len())
            }
            Err(e) => {
                self.storage_error = Some(e);
                Ok(0)
            }
        }
    }
}
