//! Version Configuration Module
//!
//! Reads the pinned redis-server and FalkorDB module versions used by the
//! build tooling.
//!
//! ## Responsibilities
//! - Parse a flat `versions.txt` or the `[build_versions]` section of a setup.cfg
//! - Keep only whitelisted keys, validate their values
//! - Let `REDIS_VERSION` / `FALKORDB_VERSION` override file values
//!
//! Records are built fresh on every call; nothing is cached.

mod flat;
mod ini;
mod record;

use std::path::{Path, PathBuf};

use crate::error::{FalkorLiteError, Result};

pub use flat::{parse_versions, read_versions_file};
pub use ini::{parse_setup_cfg, read_versions_from_setup_cfg, BUILD_VERSIONS_SECTION};
pub use record::{is_valid_key, is_valid_value, VersionKey, VersionRecord};

/// File name of the flat versions file at the repository root
pub const DEFAULT_VERSIONS_FILE: &str = "versions.txt";

/// Default location of the versions file
pub fn default_versions_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join(DEFAULT_VERSIONS_FILE)
}

/// Read a versions source, picking the reader by file extension
///
/// `.cfg` and `.ini` files are read as INI; anything else as `KEY=VALUE`.
pub fn read_versions(path: Option<&Path>) -> Result<VersionRecord> {
    let path = resolve_path(path);
    let is_ini = matches!(
        path.extension().and_then(|ext| ext.to_str()),
        Some("cfg") | Some("ini")
    );

    if is_ini {
        read_versions_from_setup_cfg(&path)
    } else {
        read_versions_file(&path)
    }
}

/// Read a versions source and apply environment overrides
pub fn load_versions(path: Option<&Path>) -> Result<VersionRecord> {
    load_versions_with(path, process_env)
}

/// Same as [`load_versions`] with an injectable environment lookup
pub fn load_versions_with<F>(path: Option<&Path>, lookup: F) -> Result<VersionRecord>
where
    F: Fn(&str) -> Option<String>,
{
    let mut record = read_versions(path)?;

    for key in VersionKey::ALL {
        if let Some(value) = env_override(key, &lookup)? {
            tracing::debug!("{} overridden from environment: {}", key, value);
            record.insert(key, value);
        }
    }

    Ok(record)
}

/// Resolve one version: the environment wins, otherwise the file is read
pub fn get_version_with<F>(key: VersionKey, path: Option<&Path>, lookup: F) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(value) = env_override(key, &lookup)? {
        return Ok(value);
    }

    let resolved = resolve_path(path);
    let record = read_versions(Some(&resolved))?;
    record
        .get(key)
        .map(str::to_string)
        .ok_or_else(|| FalkorLiteError::MissingVersionKey {
            key: key.env_name().to_string(),
            location: resolved.display().to_string(),
        })
}

/// Redis version from `REDIS_VERSION` or the versions file
pub fn get_redis_version(path: Option<&Path>) -> Result<String> {
    get_version_with(VersionKey::Redis, path, process_env)
}

/// FalkorDB version from `FALKORDB_VERSION` or the versions file
pub fn get_falkordb_version(path: Option<&Path>) -> Result<String> {
    get_version_with(VersionKey::FalkorDb, path, process_env)
}

// =============================================================================
// Helpers
// =============================================================================

fn resolve_path(path: Option<&Path>) -> PathBuf {
    path.map(Path::to_path_buf).unwrap_or_else(default_versions_path)
}

fn process_env(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

fn env_override<F>(key: VersionKey, lookup: &F) -> Result<Option<String>>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key.env_name()) {
        // An exported but empty variable counts as unset
        Some(value) if value.is_empty() => {
            tracing::debug!("{} is set but empty; using the file value", key);
            Ok(None)
        }
        Some(value) if is_valid_value(&value) => Ok(Some(value)),
        Some(value) => Err(FalkorLiteError::InvalidVersionEnv {
            name: key.env_name().to_string(),
            value,
        }),
        None => Ok(None),
    }
}
