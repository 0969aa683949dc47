//! Atomic file operations for safe JSON persistence.
//!
//! Writes go to a temp file in the target directory, are fsynced, and then
//! renamed over the target, so a crash leaves either the old or the new file.

use crate::{FitnessError, Result};
use serde::{de::DeserializeOwned, Serialize};
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::debug;

/// Read and parse a JSON file.
///
/// Returns `None` if the file doesn't exist, or an error if parsing fails.
pub(crate) fn atomic_read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    if !path.exists() {
        return Ok(None);
    }

    let contents = fs::read_to_string(path).map_err(|e| FitnessError::io_with_path(e, path))?;

    let data: T = serde_json::from_str(&contents).map_err(|e| FitnessError::Json {
        message: format!("Failed to parse {}: {}", path.display(), e),
        source: Some(e),
    })?;

    Ok(Some(data))
}

/// Write data to a JSON file atomically.
pub(crate) fn atomic_write_json<T: Serialize>(path: &Path, data: &T) -> Result<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    if !parent.exists() {
        fs::create_dir_all(parent).map_err(|e| FitnessError::io_with_path(e, parent))?;
    }

    let serialized = serde_json::to_string_pretty(data).map_err(|e| FitnessError::Json {
        message: format!("Failed to serialize data: {}", e),
        source: Some(e),
    })?;

    let mut temp = NamedTempFile::new_in(parent).map_err(|e| FitnessError::io_with_path(e, parent))?;
    temp.write_all(serialized.as_bytes())
        .map_err(|e| FitnessError::io_with_path(e, temp.path()))?;
    temp.as_file()
        .sync_all()
        .map_err(|e| FitnessError::io_with_path(e, temp.path()))?;

    temp.persist(path)
        .map_err(|e| FitnessError::io_with_path(e.error, path))?;

    debug!("Atomically wrote {}", path.display());
    Ok(())
}
