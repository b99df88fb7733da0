//! Collecting the destination directory and URL list from the user.

use anyhow::{bail, Context, Result};
use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

/// True when `path` is an existing directory we can create files in.
pub fn check_directory_access(path: &Path) -> bool {
    path.is_dir() && tempfile::tempfile_in(path).is_ok()
}

/// URLs from `reader`, one per line. Blank lines and `#` comments are skipped.
pub fn parse_url_lines<R: BufRead>(reader: R) -> Result<Vec<String>> {
    let mut urls = Vec::new();
    for line in reader.lines() {
        let line = line.context("failed to read URL list")?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        urls.push(line.to_string());
    }
    Ok(urls)
}

pub fn read_url_file(path: &Path) -> Result<Vec<String>> {
    let f = File::open(path).with_context(|| format!("open {}", path.display()))?;
    parse_url_lines(BufReader::new(f))
}

/// Ask for a directory until an existing writable one is entered.
pub fn prompt_directory<R: BufRead, W: Write>(input: &mut R, out: &mut W) -> Result<PathBuf> {
    loop {
        write!(out, "Enter the directory to save images: ")?;
        out.flush()?;
        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            bail!("no destination directory given");
        }
        let entered = line.trim();
        if !entered.is_empty() && check_directory_access(Path::new(entered)) {
            return Ok(PathBuf::from(entered));
        }
        writeln!(out, "Directory not available, enter another one.")?;
    }
}

/// Read URLs one per line until an empty line or end of input.
pub fn prompt_urls<R: BufRead, W: Write>(input: &mut R, out: &mut W) -> Result<Vec<String>> {
    writeln!(out, "Enter image URLs (press Enter to finish):")?;
    out.flush()?;
    let mut urls = Vec::new();
    loop {
        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            break;
        }
        let entered = line.trim();
        if entered.is_empty() {
            break;
        }
        urls.push(entered.to_string());
    }
    Ok(urls)
}
