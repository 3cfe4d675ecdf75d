//! Embedded Server
//!
//! Launches a private redis-server process and stops it again.

use std::fs;
use std::net::{SocketAddr, TcpListener, ToSocketAddrs};
use std::path::{Path, PathBuf};
use std::process::{Child, Command as Process, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use tempfile::TempDir;

use crate::config::{ClientConfig, MANAGED_SETTINGS};
use crate::error::{FalkorLiteError, Result};
use crate::protocol::Command;
use super::Connection;

/// Database file name used when the caller gives none
const SCRATCH_DBFILENAME: &str = "falkordb.db";

/// Poll interval while waiting for the server to start or exit
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// How long shutdown waits for the process before killing it
const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

/// A running redis-server owned by this process
pub struct EmbeddedServer {
    child: Option<Child>,
    addr: SocketAddr,
    dir: PathBuf,
    dbfilename: String,
    persistent: bool,

    /// Scratch directory, removed on drop
    _scratch: Option<TempDir>,
}

impl EmbeddedServer {
    /// Start a server for `config` and wait until it answers PING
    pub fn start(config: &ClientConfig) -> Result<Self> {
        let (dir, dbfilename, scratch) = match &config.db_path {
            Some(path) => {
                let (dir, file) = split_db_path(path)?;
                fs::create_dir_all(&dir)?;
                (dir, file, None)
            }
            None => {
                let scratch = tempfile::Builder::new().prefix("falkordblite-").tempdir()?;
                (scratch.path().to_path_buf(), SCRATCH_DBFILENAME.to_string(), Some(scratch))
            }
        };

        let port = free_port(&config.host)?;
        let addr = (config.host.as_str(), port)
            .to_socket_addrs()?
            .next()
            .ok_or_else(|| FalkorLiteError::ServerStartup(format!("cannot resolve {}", config.host)))?;

        let args = server_args(config, port, &dir, &dbfilename);
        tracing::debug!("Starting {} {}", config.server_binary.display(), args.join(" "));

        let child = Process::new(&config.server_binary)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| {
                FalkorLiteError::ServerStartup(format!(
                    "cannot launch {}: {}",
                    config.server_binary.display(),
                    e
                ))
            })?;

        let mut server = Self {
            child: Some(child),
            addr,
            dir,
            dbfilename,
            persistent: scratch.is_none(),
            _scratch: scratch,
        };

        if let Err(e) = server.wait_until_ready(Duration::from_millis(config.startup_timeout_ms)) {
            server.kill();
            return Err(e);
        }

        tracing::debug!("Embedded server ready on {} (pid {:?})", server.addr, server.pid());
        Ok(server)
    }

    /// Poll the server with PING until it answers or `timeout` elapses
    fn wait_until_ready(&mut self, timeout: Duration) -> Result<()> {
        let deadline = Instant::now() + timeout;

        loop {
            if let Some(child) = self.child.as_mut() {
                if let Some(status) = child.try_wait()? {
                    return Err(FalkorLiteError::ServerStartup(format!(
                        "server exited during startup with {}",
                        status
                    )));
                }
            }

            if let Ok(mut conn) = Connection::connect_timeout(&self.addr, POLL_INTERVAL * 4) {
                match conn.send(&Command::new("PING")) {
                    Ok(_) => return Ok(()),
                    // Still loading the dataset
                    Err(FalkorLiteError::Server(message)) if message.starts_with("LOADING") => {}
                    Err(e) => tracing::trace!("Server not ready yet: {}", e),
                }
            }

            if Instant::now() >= deadline {
                return Err(FalkorLiteError::ServerStartup(format!(
                    "no PING reply on {} within {:?}",
                    self.addr, timeout
                )));
            }
            thread::sleep(POLL_INTERVAL);
        }
    }

    /// Open a new client connection to this server
    pub fn connect(&self) -> Result<Connection> {
        Connection::connect(self.addr)
    }

    /// Stop the server, saving first when it has a database file
    ///
    /// Calling this again after the process is gone does nothing.
    pub fn shutdown(&mut self) -> Result<()> {
        let Some(mut child) = self.child.take() else {
            return Ok(());
        };

        let command = Command::new("SHUTDOWN").arg(if self.persistent { "SAVE" } else { "NOSAVE" });
        match Connection::connect_timeout(&self.addr, Duration::from_secs(1)) {
            Ok(mut conn) => {
                if let Err(e) = conn.send_no_reply(&command) {
                    tracing::warn!("SHUTDOWN failed on {}: {}", self.addr, e);
                }
            }
            Err(e) => tracing::debug!("Cannot reach {} for shutdown: {}", self.addr, e),
        }

        let deadline = Instant::now() + SHUTDOWN_GRACE;
        while Instant::now() < deadline {
            if child.try_wait()?.is_some() {
                tracing::debug!("Embedded server on {} stopped", self.addr);
                return Ok(());
            }
            thread::sleep(POLL_INTERVAL);
        }

        tracing::warn!("Embedded server on {} did not exit, killing it", self.addr);
        child.kill()?;
        child.wait()?;
        Ok(())
    }

    fn kill(&mut self) {
        if let Some(mut child) = self.child.take() {
            let _ = child.kill();
            let _ = child.wait();
        }
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

    /// Process id, while the server is running
    pub fn pid(&self) -> Option<u32> {
        self.child.as_ref().map(Child::id)
    }

    /// Full path of the database file
    pub fn db_path(&self) -> PathBuf {
        self.dir.join(&self.dbfilename)
    }

    pub fn is_running(&self) -> bool {
        self.child.is_some()
    }
}

impl Drop for EmbeddedServer {
    fn drop(&mut self) {
        if let Err(e) = self.shutdown() {
            tracing::warn!("Embedded server shutdown failed: {}", e);
        }
    }
}

/// Command-line arguments for redis-server
///
/// Managed settings come first; extra settings follow in the order given,
/// except those that would override a managed one.
pub fn server_args(config: &ClientConfig, port: u16, dir: &Path, dbfilename: &str) -> Vec<String> {
    let mut args = vec![
        "--port".to_string(),
        port.to_string(),
        "--bind".to_string(),
        config.host.clone(),
        "--dir".to_string(),
        dir.display().to_string(),
        "--dbfilename".to_string(),
        dbfilename.to_string(),
    ];

    if config.db_path.is_none() {
        args.push("--save".to_string());
        args.push(String::new());
    }

    if let Some(module) = &config.module_path {
        args.push("--loadmodule".to_string());
        args.push(module.display().to_string());
    }

    for (key, value) in &config.server_settings {
        let key = key.trim_start_matches('-');
        if MANAGED_SETTINGS.contains(&key.to_ascii_lowercase().as_str()) {
            tracing::warn!("Ignoring server setting '{}': managed by the launcher", key);
            continue;
        }
        args.push(format!("--{}", key));
        args.push(value.clone());
    }

    args
}

fn split_db_path(path: &Path) -> Result<(PathBuf, String)> {
    let file = path
        .file_name()
        .and_then(|f| f.to_str())
        .ok_or_else(|| {
            FalkorLiteError::InvalidArgument(format!("invalid database file path: {}", path.display()))
        })?
        .to_string();

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };

    Ok((dir, file))
}

fn free_port(host: &str) -> Result<u16> {
    let listener = TcpListener::bind((host, 0))?;
    Ok(listener.local_addr()?.port())
}
