//! Shared utilities.

use std::io::{self, Write};
use std::path::Path;

use chrono::{DateTime, Local};
use tempfile::NamedTempFile;

use crate::error::{LensError, Result};

/// Format an RFC 3339 timestamp for display in local time.
///
/// Timestamps come from the backend as opaque strings; anything that fails
/// to parse is shown verbatim rather than dropped.
#[must_use]
pub fn format_timestamp(raw: &str) -> String {
    match DateTime::parse_from_rfc3339(raw) {
        Ok(dt) => dt.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string(),
        Err(_) => raw.to_string(),
    }
}

/// Atomically write content to a file.
///
/// Writes to a temporary file in the same directory, flushes it, then
/// renames it over the target. The original file is unchanged if any step
/// fails. The parent directory is created when missing.
pub fn atomic_write(path: impl AsRef<Path>, content: &[u8]) -> Result<()> {
    let path = path.as_ref();

    let parent = path.parent().ok_or_else(|| LensError::Io {
        context: format!("Cannot determine parent directory for: {}", path.display()),
        source: io::Error::new(io::ErrorKind::InvalidInput, "No parent directory"),
    })?;

    if !parent.exists() {
        std::fs::create_dir_all(parent).map_err(|e| {
            LensError::io(
                format!("Failed to create directory: {}", parent.display()),
                e,
            )
        })?;
    }

    // Same directory so the rename stays on one filesystem.
    let mut temp_file = NamedTempFile::new_in(parent).map_err(|e| {
        LensError::io(
            format!("Failed to create temporary file in: {}", parent.display()),
            e,
        )
    })?;

    temp_file.write_all(content).map_err(|e| {
        LensError::io(
            format!("Failed to write to temporary file for: {}", path.display()),
            e,
        )
    })?;

    temp_file.flush().map_err(|e| {
        LensError::io(
            format!("Failed to flush temporary file for: {}", path.display()),
            e,
        )
    })?;

    temp_file.persist(path).map_err(|e| {
        LensError::io(
            format!("Failed to atomically write file: {}", path.display()),
            e.error,
        )
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_timestamp_falls_back_to_raw() {
        assert_eq!(format_timestamp("not a date"), "not a date");
        assert_eq!(format_timestamp(""), "");
    }

    #[test]
    fn test_format_timestamp_parses_rfc3339() {
        let out = format_timestamp("2026-02-01T10:30:00Z");
        // Local-time rendering, so only the shape is stable.
        assert_eq!(out.len(), "2026-02-01 10:30".len());
        assert!(out.starts_with("2026-"));
    }

    #[test]
    fn test_atomic_write_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.toml");

        atomic_write(&path, b"key = \"value\"").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "key = \"value\"");
    }

    #[test]
    fn test_atomic_write_replaces_existing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.toml");

        atomic_write(&path, b"old").unwrap();
        atomic_write(&path, b"new").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "new");
    }

    #[test]
    fn test_atomic_write_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/deep/out.toml");

        atomic_write(&path, b"x").unwrap();
        assert!(path.exists());
    }
}
