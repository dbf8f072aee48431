//! Atomic file writes for artifact persistence
//!
//! Writes go to a temporary file in the destination directory first, then
//! replace the target with an atomic rename. Overwrite-on-conflict: an
//! existing file at the destination is replaced.

use anyhow::{Context, Result};
use camino::Utf8Path;
use std::fs;
use std::io::Write;
use tempfile::NamedTempFile;

/// Atomically write content to a file using temp file + rename.
///
/// The parent directory is created if it does not exist. Line endings are
/// normalized to LF.
///
/// # Errors
///
/// Returns an error if the parent directory cannot be created, the
/// temporary file cannot be written, or the rename fails.
pub fn write_file_atomic(path: &Utf8Path, content: &str) -> Result<()> {
    let normalized = normalize_line_endings(content);

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create parent directory: {parent}"))?;
    }

    // Stage in the same directory so the rename stays on one filesystem
    let temp_dir = path.parent().unwrap_or_else(|| Utf8Path::new("."));
    let mut temp_file = NamedTempFile::new_in(temp_dir)
        .with_context(|| format!("Failed to create temporary file in: {temp_dir}"))?;

    temp_file
        .write_all(normalized.as_bytes())
        .context("Failed to write content to temporary file")?;
    temp_file
        .as_file()
        .sync_all()
        .context("Failed to sync temporary file")?;

    temp_file
        .persist(path.as_std_path())
        .with_context(|| format!("Failed to rename temporary file to: {path}"))?;

    Ok(())
}

/// Normalize CRLF and lone CR line endings to LF.
fn normalize_line_endings(content: &str) -> String {
    content.replace("\r\n", "\n").replace('\r', "\n")
}
