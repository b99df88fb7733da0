//! Destination file that is removed on drop unless committed.

use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Open destination file for one transfer. Dropping it without
/// [`PartialFile::commit`] closes the file and deletes it.
pub(crate) struct PartialFile {
    path: PathBuf,
    file: Option<File>,
}

impl PartialFile {
    /// Create (or truncate) `path` for binary writing.
    pub(crate) fn create(path: &Path) -> io::Result<Self> {
        let file = File::options()
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            file: Some(file),
        })
    }

    pub(crate) fn write_chunk(&mut self, data: &[u8]) -> io::Result<()> {
        match self.file.as_mut() {
            Some(f) => f.write_all(data),
            None => Err(io::Error::new(io::ErrorKind::Other, "file already closed")),
        }
    }

    /// Flush and close the file, keeping it on disk.
    pub(crate) fn commit(mut self) -> io::Result<()> {
        if let Some(mut f) = self.file.take() {
            f.flush()?;
        }
        Ok(())
    }
}

impl Drop for PartialFile {
    fn drop(&mut self) {
        if let Some(f) = self.file.take() {
            drop(f);
            if let Err(e) = std::fs::remove_file(&self.path) {
                tracing::debug!(path = %self.path.display(), "could not remove partial file: {}", e);
            } else {
                tracing::debug!(path = %self.path.display(), "removed partial file");
            }
        }
    }
}
