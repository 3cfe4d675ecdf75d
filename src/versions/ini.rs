//! `setup.cfg` reader
//!
//! Reads the `[build_versions]` section of an INI file. Keys are matched
//! case-insensitively, `=` and `:` both separate key from value, and `#` / `;`
//! start comment lines. Indented lines continue the previous value.

use std::fs;
use std::path::Path;

use crate::error::{FalkorLiteError, Result};
use super::record::{is_valid_value, VersionKey, VersionRecord};

/// Section holding the build versions
pub const BUILD_VERSIONS_SECTION: &str = "build_versions";

/// A `key = value` assignment inside the target section
struct Assignment {
    line: usize,
    key: String,
    value: String,
}

/// Read both versions from the `[build_versions]` section of a setup.cfg
pub fn read_versions_from_setup_cfg(path: &Path) -> Result<VersionRecord> {
    if !path.exists() {
        return Err(FalkorLiteError::ConfigNotFound(path.to_path_buf()));
    }

    let content = fs::read_to_string(path)?;
    parse_setup_cfg(&content, path)
}

/// Parse setup.cfg content; `path` is only used in error messages
pub fn parse_setup_cfg(content: &str, path: &Path) -> Result<VersionRecord> {
    let mut in_section = false;
    let mut found_section = false;
    let mut assignments: Vec<Assignment> = Vec::new();

    for (index, raw) in content.lines().enumerate() {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with(';') {
            continue;
        }

        if trimmed.starts_with('[') && trimmed.ends_with(']') {
            in_section = trimmed[1..trimmed.len() - 1].trim() == BUILD_VERSIONS_SECTION;
            found_section |= in_section;
            continue;
        }

        if !in_section {
            continue;
        }

        if raw.starts_with(char::is_whitespace) {
            if let Some(last) = assignments.last_mut() {
                last.value.push('\n');
                last.value.push_str(trimmed);
                continue;
            }
        }

        let Some(split) = trimmed.find(['=', ':']) else {
            return Err(FalkorLiteError::InvalidVersionLine {
                line: index + 1,
                content: trimmed.to_string(),
                reason: "expected 'key = value'".to_string(),
            });
        };

        assignments.push(Assignment {
            line: index + 1,
            key: trimmed[..split].trim().to_ascii_lowercase(),
            value: trimmed[split + 1..].trim().to_string(),
        });
    }

    if !found_section {
        return Err(FalkorLiteError::MissingSection {
            section: BUILD_VERSIONS_SECTION.to_string(),
            path: path.to_path_buf(),
        });
    }

    let mut record = VersionRecord::new();
    for key in VersionKey::ALL {
        let Some(assignment) = assignments.iter().rev().find(|a| a.key == key.ini_name()) else {
            return Err(FalkorLiteError::MissingVersionKey {
                key: key.ini_name().to_string(),
                location: format!("[{}] section of {}", BUILD_VERSIONS_SECTION, path.display()),
            });
        };

        if !is_valid_value(&assignment.value) {
            return Err(FalkorLiteError::InvalidVersionLine {
                line: assignment.line,
                content: format!("{} = {}", assignment.key, assignment.value),
                reason: format!("invalid value {:?} for {}", assignment.value, key.ini_name()),
            });
        }

        record.insert(key, assignment.value.clone());
    }

    Ok(record)
}
