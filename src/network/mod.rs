//! Network Module
//!
//! The embedded server process and client connections to it.
//!
//! ## Architecture
//! - One redis-server process per embedded client, on a free local port
//! - Blocking TCP connection speaking RESP2
//! - Process is stopped with SHUTDOWN, then killed if it lingers

mod connection;
mod server;

pub use connection::Connection;
pub use server::{server_args, EmbeddedServer};
