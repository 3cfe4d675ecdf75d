//! Error types for falkordblite
//!
//! Provides a unified error type for all operations.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using FalkorLiteError
pub type Result<T> = std::result::Result<T, FalkorLiteError>;

/// Unified error type for falkordblite operations
#[derive(Debug, Error)]
pub enum FalkorLiteError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Version Configuration Errors
    // -------------------------------------------------------------------------
    #[error("version config not found at {}", .0.display())]
    ConfigNotFound(PathBuf),

    #[error("missing [{section}] section in {}", .path.display())]
    MissingSection { section: String, path: PathBuf },

    #[error("missing '{key}' in {location}")]
    MissingVersionKey { key: String, location: String },

    #[error("invalid version config at line {line} ({content:?}): {reason}")]
    InvalidVersionLine {
        line: usize,
        content: String,
        reason: String,
    },

    #[error("invalid value for environment variable {name}: {value:?}")]
    InvalidVersionEnv { name: String, value: String },

    // -------------------------------------------------------------------------
    // Client Errors
    // -------------------------------------------------------------------------
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("client is closed")]
    Closed,

    // -------------------------------------------------------------------------
    // Protocol / Server Errors
    // -------------------------------------------------------------------------
    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("Server error: {0}")]
    Server(String),

    #[error("connection to {0} dropped after a failed command")]
    ConnectionBroken(String),

    #[error("embedded server failed to start: {0}")]
    ServerStartup(String),

    // -------------------------------------------------------------------------
    // Network / Archive Errors
    // -------------------------------------------------------------------------
    #[error("HTTP {status} fetching {url}")]
    HttpStatus { status: u16, url: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Archive error: {0}")]
    Archive(String),
}

impl FalkorLiteError {
    /// True for an HTTP 403 response
    pub fn is_forbidden(&self) -> bool {
        matches!(self, FalkorLiteError::HttpStatus { status: 403, .. })
    }
}
