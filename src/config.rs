//! Configuration for the embedded client
//!
//! Centralized configuration with sensible defaults.

use std::path::PathBuf;

/// Settings the embedded server launcher controls itself; user supplied
/// values for these are ignored.
pub const MANAGED_SETTINGS: [&str; 4] = ["port", "bind", "dir", "dbfilename"];

/// Configuration for an embedded server and its client connection
#[derive(Debug, Clone)]
pub struct ClientConfig {
    // -------------------------------------------------------------------------
    // Storage Configuration
    // -------------------------------------------------------------------------
    /// Database file for persisted state. `None` runs against a scratch
    /// directory that is removed on close, with persistence disabled.
    pub db_path: Option<PathBuf>,

    // -------------------------------------------------------------------------
    // Server Configuration
    // -------------------------------------------------------------------------
    /// redis-server executable (looked up on PATH when not absolute)
    pub server_binary: PathBuf,

    /// FalkorDB module passed as `--loadmodule`
    pub module_path: Option<PathBuf>,

    /// Extra `--<key> <value>` settings, forwarded verbatim and in order
    pub server_settings: Vec<(String, String)>,

    /// Address the server binds to
    pub host: String,

    /// How long to wait for the server to answer PING (milliseconds)
    pub startup_timeout_ms: u64,

    // -------------------------------------------------------------------------
    // Connection Configuration
    // -------------------------------------------------------------------------
    /// Connection read timeout (milliseconds, 0 = none)
    pub read_timeout_ms: u64,

    /// Connection write timeout (milliseconds, 0 = none)
    pub write_timeout_ms: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            db_path: None,
            server_binary: PathBuf::from("redis-server"),
            module_path: None,
            server_settings: Vec::new(),
            host: "127.0.0.1".to_string(),
            startup_timeout_ms: 10_000,
            read_timeout_ms: 0,
            write_timeout_ms: 5000,
        }
    }
}

impl ClientConfig {
    /// Create a new config builder
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }
}

/// Builder for ClientConfig
#[derive(Default)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    /// Set the database file
    pub fn db_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.db_path = Some(path.into());
        self
    }

    /// Set the redis-server executable
    pub fn server_binary(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.server_binary = path.into();
        self
    }

    /// Set the FalkorDB module to load
    pub fn module_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.module_path = Some(path.into());
        self
    }

    /// Append one server setting
    pub fn server_setting(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.server_settings.push((key.into(), value.into()));
        self
    }

    /// Append several server settings
    pub fn server_settings<I, K, V>(mut self, settings: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.config
            .server_settings
            .extend(settings.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Set the bind address
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.config.host = host.into();
        self
    }

    /// Set the startup timeout (in milliseconds)
    pub fn startup_timeout_ms(mut self, ms: u64) -> Self {
        self.config.startup_timeout_ms = ms;
        self
    }

    /// Set the read timeout (in milliseconds)
    pub fn read_timeout_ms(mut self, ms: u64) -> Self {
        self.config.read_timeout_ms = ms;
        self
    }

    /// Set the write timeout (in milliseconds)
    pub fn write_timeout_ms(mut self, ms: u64) -> Self {
        self.config.write_timeout_ms = ms;
        self
    }

    pub fn build(self) -> ClientConfig {
        self.config
    }
}
