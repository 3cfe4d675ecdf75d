//! # falkordblite
//!
//! Embedded FalkorDB: a private redis-server with the graph module loaded,
//! plus the tooling used to build it.
//!
//! - Graph client over an embedded server process
//! - Async-callable wrappers of the same client
//! - Version pinning for the bundled server and module
//! - Release archive fetching with retry/backoff
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────┐      ┌──────────────────────────┐
//! │   FalkorDb / AsyncFalkorDb  │      │  versions (build time)   │
//! │   (GraphClient interface)   │      │  versions.txt/setup.cfg  │
//! └──────────────┬──────────────┘      └──────────────────────────┘
//!                │ select_graph
//!                ▼
//!         ┌─────────────┐              ┌──────────────────────────┐
//!         │    Graph    │              │  fetch (build time)      │
//!         └──────┬──────┘              │  GET → untar → stage     │
//!                │ CommandExecutor     └──────────────────────────┘
//!                ▼
//!      ┌───────────────────┐
//!      │  EmbeddedClient   │
//!      │ Connection (RESP) │
//!      └─────────┬─────────┘
//!                ▼
//!      ┌───────────────────┐
//!      │ redis-server +    │
//!      │ FalkorDB module   │
//!      └───────────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;
pub mod versions;

pub mod protocol;
pub mod network;
pub mod client;
pub mod graph;
pub mod falkordb;
pub mod async_client;
pub mod fetch;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{FalkorLiteError, Result};
pub use config::ClientConfig;
pub use client::{CommandExecutor, EmbeddedClient};
pub use graph::Graph;
#[cfg(feature = "graph-ops")]
pub use graph::QueryResult;
pub use falkordb::{FalkorDb, GraphClient};
pub use async_client::{AsyncEmbeddedClient, AsyncFalkorDb, AsyncGraph};
pub use versions::{get_falkordb_version, get_redis_version, VersionKey, VersionRecord};
pub use fetch::{ArchiveFetcher, RetryPolicy};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of falkordblite
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
