//! Version record
//!
//! The whitelisted version keys and the validated mapping built from a
//! configuration source.

use std::collections::BTreeMap;
use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

static KEY_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("key pattern compiles"));

static VALUE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9.\-v]+$").expect("value pattern compiles"));

/// Check a config key against `[A-Za-z_][A-Za-z0-9_]*`
pub fn is_valid_key(key: &str) -> bool {
    KEY_PATTERN.is_match(key)
}

/// Check a version value against `[a-zA-Z0-9.\-v]+`
pub fn is_valid_value(value: &str) -> bool {
    VALUE_PATTERN.is_match(value)
}

/// A recognized version key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum VersionKey {
    /// Version of the bundled redis-server
    #[serde(rename = "REDIS_VERSION")]
    Redis,

    /// Version of the FalkorDB module loaded into it
    #[serde(rename = "FALKORDB_VERSION")]
    FalkorDb,
}

impl VersionKey {
    /// Every recognized key, in reporting order
    pub const ALL: [VersionKey; 2] = [VersionKey::Redis, VersionKey::FalkorDb];

    /// Name used in flat files and as the environment override variable
    pub fn env_name(self) -> &'static str {
        match self {
            VersionKey::Redis => "REDIS_VERSION",
            VersionKey::FalkorDb => "FALKORDB_VERSION",
        }
    }

    /// Name used inside the `[build_versions]` INI section
    pub fn ini_name(self) -> &'static str {
        match self {
            VersionKey::Redis => "redis_version",
            VersionKey::FalkorDb => "falkordb_version",
        }
    }

    /// Look up a key by its flat-file name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|key| key.env_name() == name)
    }
}

impl fmt::Display for VersionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.env_name())
    }
}

/// Validated mapping of recognized version keys to values
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct VersionRecord {
    entries: BTreeMap<VersionKey, String>,
}

impl VersionRecord {
    /// Create an empty record
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a value; callers validate first
    pub(crate) fn insert(&mut self, key: VersionKey, value: impl Into<String>) {
        self.entries.insert(key, value.into());
    }

    /// Get the value for a key
    pub fn get(&self, key: VersionKey) -> Option<&str> {
        self.entries.get(&key).map(String::as_str)
    }

    /// `REDIS_VERSION`, if present
    pub fn redis_version(&self) -> Option<&str> {
        self.get(VersionKey::Redis)
    }

    /// `FALKORDB_VERSION`, if present
    pub fn falkordb_version(&self) -> Option<&str> {
        self.get(VersionKey::FalkorDb)
    }

    pub fn contains(&self, key: VersionKey) -> bool {
        self.entries.contains_key(&key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries in key order
    pub fn iter(&self) -> impl Iterator<Item = (VersionKey, &str)> {
        self.entries.iter().map(|(key, value)| (*key, value.as_str()))
    }
}
