//! Tests for the flat KEY=VALUE reader
//!
//! These tests verify:
//! - Parsing of the pinned versions
//! - Comment, blank line and whitespace handling
//! - Whitelist-and-skip for unknown keys
//! - Line-numbered validation errors

use falkordblite::versions::{
    self, get_version_with, parse_versions, read_versions_file, VersionKey,
};
use falkordblite::FalkorLiteError;

use super::{no_env, write_config};

const PINNED: &str = "REDIS_VERSION=8.2.2\nFALKORDB_VERSION=v4.14.11\n";

// =============================================================================
// Basic Parsing Tests
// =============================================================================

#[test]
fn test_reads_pinned_versions() {
    let (_dir, path) = write_config("versions.txt", PINNED);

    let redis = get_version_with(VersionKey::Redis, Some(&path), no_env).unwrap();
    let falkordb = get_version_with(VersionKey::FalkorDb, Some(&path), no_env).unwrap();

    assert_eq!(redis, "8.2.2");
    assert_eq!(falkordb, "v4.14.11");
}

#[test]
fn test_public_getters_without_env_overrides() {
    let (_dir, path) = write_config("versions.txt", PINNED);

    if std::env::var("REDIS_VERSION").is_err() {
        assert_eq!(versions::get_redis_version(Some(&path)).unwrap(), "8.2.2");
    }
    if std::env::var("FALKORDB_VERSION").is_err() {
        assert_eq!(versions::get_falkordb_version(Some(&path)).unwrap(), "v4.14.11");
    }
}

#[test]
fn test_comments_blank_lines_and_whitespace() {
    let content = "# Versions used by the build\n\n   REDIS_VERSION = 8.2.2   \n\t# indented comment\nFALKORDB_VERSION=v4.14.11\n";

    let record = parse_versions(content).unwrap();

    assert_eq!(record.redis_version(), Some("8.2.2"));
    assert_eq!(record.falkordb_version(), Some("v4.14.11"));
    assert_eq!(record.len(), 2);
}

#[test]
fn test_lines_without_assignment_are_ignored() {
    let record = parse_versions("just some text\nREDIS_VERSION=7.4.0\n").unwrap();
    assert_eq!(record.redis_version(), Some("7.4.0"));
    assert_eq!(record.len(), 1);
}

#[test]
fn test_value_keeps_everything_after_first_equals() {
    let err = parse_versions("REDIS_VERSION=8.2.2=extra\n").unwrap_err();
    assert!(matches!(err, FalkorLiteError::InvalidVersionLine { line: 1, .. }));
}

#[test]
fn test_last_assignment_wins() {
    let record = parse_versions("REDIS_VERSION=7.2.0\nREDIS_VERSION=8.2.2\n").unwrap();
    assert_eq!(record.redis_version(), Some("8.2.2"));
}

#[test]
fn test_empty_file_gives_empty_record() {
    let record = parse_versions("").unwrap();
    assert!(record.is_empty());
}

#[test]
fn test_repository_versions_file() {
    let path = versions::default_versions_path();
    assert!(path.exists(), "versions.txt should exist at {}", path.display());

    let record = read_versions_file(&path).unwrap();

    let redis = record.redis_version().unwrap();
    let parts: Vec<&str> = redis.split('.').collect();
    assert_eq!(parts.len(), 3, "REDIS_VERSION '{}' should be X.Y.Z", redis);
    assert!(parts.iter().all(|p| p.chars().all(|c| c.is_ascii_digit())));

    let falkordb = record.falkordb_version().unwrap();
    assert!(falkordb.starts_with('v'), "FALKORDB_VERSION '{}' should start with 'v'", falkordb);
}

// =============================================================================
// Whitelist Tests
// =============================================================================

#[test]
fn test_unknown_key_is_skipped() {
    let record = parse_versions("OTHER_VERSION=1.0\nREDIS_VERSION=8.2.2\n").unwrap();

    assert_eq!(record.len(), 1);
    assert!(record.contains(VersionKey::Redis));
    assert!(!record.contains(VersionKey::FalkorDb));
}

#[test]
fn test_unknown_key_value_is_not_validated() {
    let record = parse_versions("BUILD_NOTES=not a version!\nFALKORDB_VERSION=v4.14.11\n").unwrap();
    assert_eq!(record.falkordb_version(), Some("v4.14.11"));
}

#[test]
fn test_keys_are_case_sensitive() {
    let record = parse_versions("redis_version=8.2.2\n").unwrap();
    assert!(record.is_empty());
}

// =============================================================================
// Validation Tests
// =============================================================================

#[test]
fn test_disallowed_character_names_the_line() {
    let content = "# header\nREDIS_VERSION=8.2.2\nFALKORDB_VERSION=v4.14.11;rm\n";

    match parse_versions(content).unwrap_err() {
        FalkorLiteError::InvalidVersionLine { line, content, reason } => {
            assert_eq!(line, 3);
            assert_eq!(content, "FALKORDB_VERSION=v4.14.11;rm");
            assert!(reason.contains("FALKORDB_VERSION"));
        }
        other => panic!("Expected InvalidVersionLine, got {:?}", other),
    }
}

#[test]
fn test_empty_value_is_rejected() {
    let err = parse_versions("REDIS_VERSION=\n").unwrap_err();
    assert!(matches!(err, FalkorLiteError::InvalidVersionLine { line: 1, .. }));
}

#[test]
fn test_malformed_key_is_rejected() {
    let err = parse_versions("REDIS_VERSION=8.2.2\n1BAD-KEY=1.0\n").unwrap_err();
    match err {
        FalkorLiteError::InvalidVersionLine { line, reason, .. } => {
            assert_eq!(line, 2);
            assert!(reason.contains("invalid key"));
        }
        other => panic!("Expected InvalidVersionLine, got {:?}", other),
    }
}

#[test]
fn test_allowed_value_characters() {
    for value in ["8.2.2", "v4.14.11", "8.2.2-rc1", "7", "vvv"] {
        assert!(versions::is_valid_value(value), "{} should be valid", value);
    }
    for value in ["", "8.2.2 ", "v4_14", "8.2.2+build", "x/y"] {
        assert!(!versions::is_valid_value(value), "{:?} should be invalid", value);
    }
}

#[test]
fn test_key_pattern() {
    assert!(versions::is_valid_key("REDIS_VERSION"));
    assert!(versions::is_valid_key("_private"));
    assert!(!versions::is_valid_key("9LIVES"));
    assert!(!versions::is_valid_key("WITH-DASH"));
    assert!(!versions::is_valid_key(""));
}

// =============================================================================
// Error Condition Tests
// =============================================================================

#[test]
fn test_missing_file() {
    let (dir, _) = write_config("other.txt", "");
    let missing = dir.path().join("versions.txt");

    let err = read_versions_file(&missing).unwrap_err();
    match err {
        FalkorLiteError::ConfigNotFound(path) => assert_eq!(path, missing),
        other => panic!("Expected ConfigNotFound, got {:?}", other),
    }
}

#[test]
fn test_missing_key_without_env() {
    let (_dir, path) = write_config("versions.txt", "REDIS_VERSION=8.2.2\n");

    let err = get_version_with(VersionKey::FalkorDb, Some(&path), no_env).unwrap_err();
    match err {
        FalkorLiteError::MissingVersionKey { key, .. } => assert_eq!(key, "FALKORDB_VERSION"),
        other => panic!("Expected MissingVersionKey, got {:?}", other),
    }
}

#[test]
fn test_record_serializes_with_env_names() {
    let record = parse_versions(PINNED).unwrap();
    let json = serde_json::to_value(&record).unwrap();

    assert_eq!(json["REDIS_VERSION"], "8.2.2");
    assert_eq!(json["FALKORDB_VERSION"], "v4.14.11");
}
