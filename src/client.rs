//! Client Module
//!
//! The command-execution capability graph handles are built on, and the
//! embedded client that provides it.
//!
//! ## Responsibilities
//! - `CommandExecutor`: the one seam graph operations depend on
//! - `EmbeddedClient`: owns a private server process plus one connection
//! - Release both exactly once, on `cleanup()` or drop

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;

use crate::config::ClientConfig;
use crate::error::{FalkorLiteError, Result};
use crate::network::{Connection, EmbeddedServer};
use crate::protocol::{Command, Value};

/// Anything that can run a server command
///
/// Implementations without resources to release keep the default no-op
/// `cleanup`.
pub trait CommandExecutor {
    /// Run one command and return its reply
    fn execute_command(&self, command: Command) -> Result<Value>;

    /// Release held resources; must be safe to call more than once
    fn cleanup(&self) -> Result<()> {
        Ok(())
    }
}

impl<T: CommandExecutor + ?Sized> CommandExecutor for Box<T> {
    fn execute_command(&self, command: Command) -> Result<Value> {
        (**self).execute_command(command)
    }

    fn cleanup(&self) -> Result<()> {
        (**self).cleanup()
    }
}

/// Server process and its connection, dropped together
struct Session {
    connection: Connection,
    server: EmbeddedServer,
    read_timeout_ms: u64,
    write_timeout_ms: u64,
}

impl Session {
    /// Replace a broken connection with a fresh one to the same server
    fn reconnect(&mut self) -> Result<()> {
        tracing::debug!("Reconnecting to embedded server on {}", self.server.addr());
        let mut connection = self.server.connect()?;
        connection.set_timeouts(self.read_timeout_ms, self.write_timeout_ms)?;
        self.connection = connection;
        Ok(())
    }
}

/// Client backed by a private embedded server
pub struct EmbeddedClient {
    session: Mutex<Option<Session>>,
    addr: SocketAddr,
    db_path: PathBuf,
    pid: Option<u32>,
}

impl EmbeddedClient {
    /// Start an embedded server for `config` and connect to it
    pub fn open(config: ClientConfig) -> Result<Self> {
        let server = EmbeddedServer::start(&config)?;
        let mut connection = server.connect()?;
        connection.set_timeouts(config.read_timeout_ms, config.write_timeout_ms)?;

        Ok(Self {
            addr: server.addr(),
            db_path: server.db_path(),
            pid: server.pid(),
            session: Mutex::new(Some(Session {
                connection,
                server,
                read_timeout_ms: config.read_timeout_ms,
                write_timeout_ms: config.write_timeout_ms,
            })),
        })
    }

    /// Open with a database file (convenience method)
    pub fn open_path(path: impl Into<PathBuf>) -> Result<Self> {
        Self::open(ClientConfig::builder().db_path(path).build())
    }

    // =========================================================================
    // Key-value helpers
    // =========================================================================

    pub fn ping(&self) -> Result<String> {
        let reply = self.execute_command(Command::new("PING"))?;
        Ok(reply.to_text().unwrap_or_default())
    }

    /// Get a string value
    pub fn get(&self, key: impl AsRef<[u8]>) -> Result<Option<Vec<u8>>> {
        match self.execute_command(Command::new("GET").arg(key))? {
            Value::Nil => Ok(None),
            Value::Bulk(bytes) => Ok(Some(bytes)),
            other => Err(FalkorLiteError::Protocol(format!("unexpected GET reply: {}", other))),
        }
    }

    /// Set a string value
    pub fn set(&self, key: impl AsRef<[u8]>, value: impl AsRef<[u8]>) -> Result<()> {
        self.execute_command(Command::new("SET").arg(key).arg(value))?;
        Ok(())
    }

    /// Delete keys, returning how many existed
    pub fn delete<I, K>(&self, keys: I) -> Result<i64>
    where
        I: IntoIterator<Item = K>,
        K: AsRef<[u8]>,
    {
        let reply = self.execute_command(Command::new("DEL").args(keys))?;
        reply
            .as_int()
            .ok_or_else(|| FalkorLiteError::Protocol(format!("unexpected DEL reply: {}", reply)))
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn port(&self) -> u16 {
        self.addr.port()
    }

    /// Server process id (as of startup)
    pub fn pid(&self) -> Option<u32> {
        self.pid
    }

    /// Database file the server persists to
    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    pub fn is_closed(&self) -> bool {
        self.session.lock().is_none()
    }
}

impl CommandExecutor for EmbeddedClient {
    fn execute_command(&self, command: Command) -> Result<Value> {
        let mut session = self.session.lock();
        let session = session.as_mut().ok_or(FalkorLiteError::Closed)?;
        // A reply left over from a failed command must not answer this one
        if session.connection.is_broken() {
            session.reconnect()?;
        }
        session.connection.send(&command)
    }

    fn cleanup(&self) -> Result<()> {
        let Some(mut session) = self.session.lock().take() else {
            return Ok(());
        };
        tracing::debug!("Closing embedded client on {}", session.connection.peer_addr());
        drop(session.connection);
        session.server.shutdown()
    }
}

impl Drop for EmbeddedClient {
    fn drop(&mut self) {
        if let Err(e) = self.cleanup() {
            tracing::warn!("Embedded client cleanup failed: {}", e);
        }
    }
}
