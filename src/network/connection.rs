//! Server Connection
//!
//! A blocking client connection to the embedded server.

use std::io::{BufReader, BufWriter};
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::time::Duration;

use crate::error::{FalkorLiteError, Result};
use crate::protocol::{read_value, write_command, Command, Value};

/// A single client connection
pub struct Connection {
    /// TCP stream reader (buffered for efficiency)
    reader: BufReader<TcpStream>,

    /// TCP stream writer (buffered for efficiency)
    writer: BufWriter<TcpStream>,

    /// Peer address for logging
    peer_addr: String,

    /// Set when a reply may be left unread on the socket
    broken: bool,
}

impl Connection {
    /// Connect to a server address
    pub fn connect(addr: impl ToSocketAddrs) -> Result<Self> {
        Self::from_stream(TcpStream::connect(addr)?)
    }

    /// Connect, giving up after `timeout`
    pub fn connect_timeout(addr: &SocketAddr, timeout: Duration) -> Result<Self> {
        Self::from_stream(TcpStream::connect_timeout(addr, timeout)?)
    }

    fn from_stream(stream: TcpStream) -> Result<Self> {
        let peer_addr = stream
            .peer_addr()
            .map(|a| a.to_string())
            .unwrap_or_else(|_| "unknown".to_string());

        // Disable Nagle's algorithm for low latency
        stream.set_nodelay(true)?;

        let read_stream = stream.try_clone()?;

        Ok(Self {
            reader: BufReader::new(read_stream),
            writer: BufWriter::new(stream),
            peer_addr,
            broken: false,
        })
    }

    /// Configure connection timeouts (0 disables a timeout)
    pub fn set_timeouts(&mut self, read_ms: u64, write_ms: u64) -> Result<()> {
        let read = (read_ms > 0).then(|| Duration::from_millis(read_ms));
        let write = (write_ms > 0).then(|| Duration::from_millis(write_ms));

        self.reader.get_ref().set_read_timeout(read)?;
        self.writer.get_ref().set_write_timeout(write)?;

        Ok(())
    }

    /// Send a command and read its reply
    ///
    /// Error replies become [`FalkorLiteError::Server`]; errors nested inside
    /// arrays are returned as values. An I/O or framing failure leaves the
    /// stream out of step with its replies, so the connection refuses every
    /// later command with [`FalkorLiteError::ConnectionBroken`].
    pub fn send(&mut self, command: &Command) -> Result<Value> {
        if self.broken {
            return Err(FalkorLiteError::ConnectionBroken(self.peer_addr.clone()));
        }
        tracing::trace!("Sending {} to {}", command.name(), self.peer_addr);

        match self.exchange(command) {
            Ok(Value::Error(message)) => Err(FalkorLiteError::Server(message)),
            Ok(value) => Ok(value),
            Err(e) => {
                tracing::debug!("Connection to {} failed during {}: {}", self.peer_addr, command.name(), e);
                self.broken = true;
                Err(e)
            }
        }
    }

    fn exchange(&mut self, command: &Command) -> Result<Value> {
        write_command(&mut self.writer, command)?;
        read_value(&mut self.reader)
    }

    /// True once a failed exchange has made the connection unusable
    pub fn is_broken(&self) -> bool {
        self.broken
    }

    /// Send a command whose reply may never arrive (e.g. SHUTDOWN)
    pub fn send_no_reply(&mut self, command: &Command) -> Result<()> {
        write_command(&mut self.writer, command)?;
        match read_value(&mut self.reader) {
            Ok(Value::Error(message)) => Err(FalkorLiteError::Server(message)),
            Ok(_) => Ok(()),
            Err(FalkorLiteError::Io(_)) => Ok(()),
            Err(e) => Err(e),
        }
    }

    /// Get the peer address string
    pub fn peer_addr(&self) -> &str {
        &self.peer_addr
    }
}
