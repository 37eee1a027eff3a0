//! Directory listing, clearing and text reads

use std::fs;
use std::path::{Path, PathBuf};

use crate::{Error, RemovalFailure, Result};

/// List the entries directly under `dir`, sorted by path.
///
/// Only the first level is enumerated; nested contents are not visited.
pub fn list_entries(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut entries = Vec::new();
    for entry in fs::read_dir(dir).map_err(|e| Error::io(dir, e))? {
        let entry = entry.map_err(|e| Error::io(dir, e))?;
        entries.push(entry.path());
    }
    entries.sort();
    Ok(entries)
}

/// Remove a single entry: directories recursively, files and symlinks directly.
///
/// Symlinks are never followed, so a link to a directory removes the link only.
pub fn remove_entry(path: &Path) -> std::io::Result<()> {
    let file_type = fs::symlink_metadata(path)?.file_type();
    if file_type.is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    }
}

/// Remove every entry under `dir`, leaving `dir` itself in place.
///
/// A listing failure is returned immediately. Individual removal failures do
/// not stop the sweep; every remaining entry is still attempted and all
/// failures are reported together as [`Error::RemovalFailed`].
pub fn clear_dir(dir: &Path) -> Result<()> {
    let entries = list_entries(dir)?;
    let mut failures = Vec::new();

    for path in entries {
        if let Err(source) = remove_entry(&path) {
            tracing::warn!(path = %path.display(), error = %source, "Failed to remove entry");
            failures.push(RemovalFailure { path, source });
        }
    }

    if failures.is_empty() {
        Ok(())
    } else {
        Err(Error::RemovalFailed {
            path: dir.to_path_buf(),
            failures,
        })
    }
}

/// Read a whole file as UTF-8 text.
pub fn read_text(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| Error::io(path, e))
}

