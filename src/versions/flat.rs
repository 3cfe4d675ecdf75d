//! Flat `KEY=VALUE` reader
//!
//! ## Format
//! ```text
//! # comment
//! REDIS_VERSION=8.2.2
//! FALKORDB_VERSION=v4.14.11
//! ```
//!
//! Blank lines, `#` comments and lines without `=` are ignored. Keys outside
//! the whitelist are skipped so newer files still parse.

use std::fs;
use std::path::Path;

use crate::error::{FalkorLiteError, Result};
use super::record::{is_valid_key, is_valid_value, VersionKey, VersionRecord};

/// Read and validate a flat versions file
pub fn read_versions_file(path: &Path) -> Result<VersionRecord> {
    if !path.exists() {
        return Err(FalkorLiteError::ConfigNotFound(path.to_path_buf()));
    }

    let content = fs::read_to_string(path)?;
    parse_versions(&content)
}

/// Parse flat file content into a record
///
/// Later assignments of the same key replace earlier ones.
pub fn parse_versions(content: &str) -> Result<VersionRecord> {
    let mut record = VersionRecord::new();

    for (index, raw) in content.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        let key = key.trim();
        let value = value.trim();

        if !is_valid_key(key) {
            return Err(invalid_line(index, line, format!("invalid key {:?}", key)));
        }

        let Some(version_key) = VersionKey::from_name(key) else {
            tracing::trace!("Skipping unrecognized version key {}", key);
            continue;
        };

        if !is_valid_value(value) {
            return Err(invalid_line(
                index,
                line,
                format!("invalid value {:?} for {}", value, version_key),
            ));
        }

        record.insert(version_key, value);
    }

    Ok(record)
}

fn invalid_line(index: usize, line: &str, reason: String) -> FalkorLiteError {
    FalkorLiteError::InvalidVersionLine {
        line: index + 1,
        content: line.to_string(),
        reason,
    }
}
