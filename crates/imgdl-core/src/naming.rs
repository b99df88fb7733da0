//! Output file naming.
//!
//! Every URL in a batch is saved as `image_<index>.jpg` in the destination
//! directory, where `index` is its 1-based position in the submitted list.
//! The extension is fixed and not checked against the served content type.

use std::path::{Path, PathBuf};

const FILE_PREFIX: &str = "image_";
const FILE_EXTENSION: &str = "jpg";

/// File name for the URL at 1-based position `index`.
///
/// # Examples
///
/// - `image_file_name(1)` → `"image_1.jpg"`
/// - `image_file_name(12)` → `"image_12.jpg"`
pub fn image_file_name(index: usize) -> String {
    format!("{FILE_PREFIX}{index}.{FILE_EXTENSION}")
}

/// Destination path for the URL at 1-based position `index` inside `dir`.
pub fn destination_path(dir: &Path, index: usize) -> PathBuf {
    dir.join(image_file_name(index))
}
