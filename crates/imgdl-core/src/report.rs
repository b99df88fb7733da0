//! Per-URL status rows and the batch report.

use serde::Serialize;
use std::fmt;

use crate::transfer::TransferError;

/// URLs longer than this (in characters) are shortened for display.
pub const MAX_DISPLAY_LEN: usize = 50;
/// Characters kept from each end of a shortened URL.
const DISPLAY_KEEP: usize = 30;

/// Final outcome of one transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Outcome {
    Success,
    Error,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Success => write!(f, "Success"),
            Outcome::Error => write!(f, "Error"),
        }
    }
}

/// Shortens `url` for display: unchanged when it has at most
/// [`MAX_DISPLAY_LEN`] characters, otherwise the first 30 characters,
/// `"..."`, and the last 30 characters.
pub fn display_url(url: &str) -> String {
    let len = url.chars().count();
    if len <= MAX_DISPLAY_LEN {
        return url.to_string();
    }
    let head: String = url.chars().take(DISPLAY_KEEP).collect();
    let tail: String = url.chars().skip(len - DISPLAY_KEEP).collect();
    format!("{head}...{tail}")
}

/// One report entry, recorded once by the transfer that owns `index`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusRow {
    /// 1-based position of the URL in the submitted list.
    pub index: usize,
    /// URL as shown to the user (see [`display_url`]).
    pub url: String,
    pub outcome: Outcome,
    /// Reason for an `Error` row (HTTP status, curl message, I/O error).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl StatusRow {
    pub fn success(index: usize, url: &str) -> Self {
        Self {
            index,
            url: display_url(url),
            outcome: Outcome::Success,
            detail: None,
        }
    }

    pub fn error(index: usize, url: &str, detail: impl Into<String>) -> Self {
        Self {
            index,
            url: display_url(url),
            outcome: Outcome::Error,
            detail: Some(detail.into()),
        }
    }

    /// Row for a finished transfer; `Ok` carries the number of bytes written.
    pub fn from_result(index: usize, url: &str, result: &Result<u64, TransferError>) -> Self {
        match result {
            Ok(_) => Self::success(index, url),
            Err(e) => Self::error(index, url, e.to_string()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.outcome == Outcome::Success
    }
}

/// Ordered collection of status rows for one batch.
///
/// Rows are appended as transfers finish; [`Report::into_submission_order`]
/// sorts them back by index.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Report {
    rows: Vec<StatusRow>,
}

impl Report {
    pub fn with_capacity(n: usize) -> Self {
        Self {
            rows: Vec::with_capacity(n),
        }
    }

    pub fn push(&mut self, row: StatusRow) {
        self.rows.push(row);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[StatusRow] {
        &self.rows
    }

    pub fn iter(&self) -> std::slice::Iter<'_, StatusRow> {
        self.rows.iter()
    }

    pub fn success_count(&self) -> usize {
        self.rows.iter().filter(|r| r.is_success()).count()
    }

    pub fn error_count(&self) -> usize {
        self.rows.len() - self.success_count()
    }

    /// Sorts rows by their 1-based index (stable).
    pub fn into_submission_order(mut self) -> Self {
        self.rows.sort_by_key(|r| r.index);
        self
    }
}

impl<'a> IntoIterator for &'a Report {
    type Item = &'a StatusRow;
    type IntoIter = std::slice::Iter<'a, StatusRow>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}
