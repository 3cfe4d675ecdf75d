//! Async wrappers
//!
//! Async-callable versions of the clients for code that expects `.await`.
//! Every method runs the same blocking operation inline; nothing is spawned
//! and no extra ordering or cancellation behavior is added.

use std::path::PathBuf;

use crate::client::{CommandExecutor, EmbeddedClient};
use crate::config::ClientConfig;
use crate::error::Result;
use crate::falkordb::{FalkorDb, GraphClient};
use crate::graph::Graph;
use crate::protocol::Value;

#[cfg(feature = "graph-ops")]
use crate::graph::{ConstraintKind, EntityKind, IndexKind, QueryResult};
#[cfg(feature = "graph-ops")]
use serde_json::Value as JsonValue;

// =============================================================================
// AsyncFalkorDb
// =============================================================================

/// Async graph client
pub struct AsyncFalkorDb<E: CommandExecutor = EmbeddedClient> {
    inner: FalkorDb<E>,
}

impl AsyncFalkorDb<EmbeddedClient> {
    /// Start an embedded server; construction itself is synchronous
    pub fn open(config: ClientConfig) -> Result<Self> {
        Ok(Self {
            inner: FalkorDb::open(config)?,
        })
    }

    pub fn open_path(path: impl Into<PathBuf>) -> Result<Self> {
        Self::open(ClientConfig::builder().db_path(path).build())
    }
}

impl<E: CommandExecutor> AsyncFalkorDb<E> {
    pub fn with_client(client: E) -> Self {
        Self {
            inner: FalkorDb::with_client(client),
        }
    }

    pub fn client(&self) -> &E {
        self.inner.client()
    }

    /// Select a graph; synchronous because no I/O happens
    pub fn select_graph(&self, name: &str) -> Result<AsyncGraph<'_, E>> {
        Ok(AsyncGraph {
            inner: self.inner.select_graph(name)?,
        })
    }

    pub async fn list_graphs(&self) -> Vec<String> {
        self.inner.list_graphs()
    }

    pub async fn config_get(&self, name: &str) -> Result<Value> {
        self.inner.config_get(name)
    }

    pub async fn config_set(&self, name: &str, value: &str) -> Result<()> {
        self.inner.config_set(name, value)
    }

    pub async fn udf_load(&self, name: &str, script: &str) -> Result<()> {
        self.inner.udf_load(name, script)
    }

    pub async fn udf_replace(&self, name: &str, script: &str) -> Result<()> {
        self.inner.udf_replace(name, script)
    }

    pub async fn udf_list(&self) -> Result<Vec<String>> {
        self.inner.udf_list()
    }

    pub async fn udf_delete(&self, name: &str) -> Result<()> {
        self.inner.udf_delete(name)
    }

    pub async fn udf_flush(&self) -> Result<()> {
        self.inner.udf_flush()
    }

    pub async fn close(&self) -> Result<()> {
        self.inner.close()
    }
}

// =============================================================================
// AsyncGraph
// =============================================================================

/// Async handle to a graph
pub struct AsyncGraph<'a, E: CommandExecutor> {
    inner: Graph<'a, E>,
}

impl<'a, E: CommandExecutor> AsyncGraph<'a, E> {
    pub fn name(&self) -> &str {
        self.inner.name()
    }

    /// The blocking handle underneath
    pub fn blocking(&self) -> &Graph<'a, E> {
        &self.inner
    }
}

impl<E: CommandExecutor> std::fmt::Debug for AsyncGraph<'_, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AsyncGraph").field("name", &self.inner.name()).finish()
    }
}

#[cfg(feature = "graph-ops")]
impl<'a, E: CommandExecutor> AsyncGraph<'a, E> {
    pub async fn query(&self, query: &str, params: Option<&JsonValue>) -> Result<QueryResult> {
        self.inner.query(query, params)
    }

    pub async fn query_with_timeout(
        &self,
        query: &str,
        params: Option<&JsonValue>,
        timeout_ms: u64,
    ) -> Result<QueryResult> {
        self.inner.query_with_timeout(query, params, timeout_ms)
    }

    pub async fn ro_query(&self, query: &str, params: Option<&JsonValue>) -> Result<QueryResult> {
        self.inner.ro_query(query, params)
    }

    pub async fn explain(&self, query: &str, params: Option<&JsonValue>) -> Result<Vec<String>> {
        self.inner.explain(query, params)
    }

    pub async fn profile(&self, query: &str, params: Option<&JsonValue>) -> Result<Vec<String>> {
        self.inner.profile(query, params)
    }

    pub async fn call_procedure(
        &self,
        procedure: &str,
        args: &[JsonValue],
        yields: &[&str],
    ) -> Result<QueryResult> {
        self.inner.call_procedure(procedure, args, yields)
    }

    pub async fn delete(&self) -> Result<()> {
        self.inner.delete()
    }

    pub async fn copy(&self, clone: &str) -> Result<AsyncGraph<'a, E>> {
        Ok(AsyncGraph {
            inner: self.inner.copy(clone)?,
        })
    }

    pub async fn slowlog(&self) -> Result<Vec<Vec<String>>> {
        self.inner.slowlog()
    }

    pub async fn slowlog_reset(&self) -> Result<()> {
        self.inner.slowlog_reset()
    }

    // =========================================================================
    // Indices and constraints
    // =========================================================================

    pub async fn list_indices(&self) -> Result<QueryResult> {
        self.inner.list_indices()
    }

    pub async fn list_constraints(&self) -> Result<QueryResult> {
        self.inner.list_constraints()
    }

    pub async fn create_index(
        &self,
        entity: EntityKind,
        kind: IndexKind,
        label: &str,
        properties: &[&str],
    ) -> Result<QueryResult> {
        self.inner.create_index(entity, kind, label, properties)
    }

    pub async fn drop_index(
        &self,
        entity: EntityKind,
        kind: IndexKind,
        label: &str,
        properties: &[&str],
    ) -> Result<QueryResult> {
        self.inner.drop_index(entity, kind, label, properties)
    }

    pub async fn create_node_range_index(&self, label: &str, properties: &[&str]) -> Result<QueryResult> {
        self.inner.create_node_range_index(label, properties)
    }

    pub async fn create_edge_range_index(&self, relation: &str, properties: &[&str]) -> Result<QueryResult> {
        self.inner.create_edge_range_index(relation, properties)
    }

    pub async fn create_node_fulltext_index(&self, label: &str, properties: &[&str]) -> Result<QueryResult> {
        self.inner.create_node_fulltext_index(label, properties)
    }

    pub async fn create_edge_fulltext_index(&self, relation: &str, properties: &[&str]) -> Result<QueryResult> {
        self.inner.create_edge_fulltext_index(relation, properties)
    }

    pub async fn drop_node_range_index(&self, label: &str, property: &str) -> Result<QueryResult> {
        self.inner.drop_node_range_index(label, property)
    }

    pub async fn drop_edge_range_index(&self, relation: &str, property: &str) -> Result<QueryResult> {
        self.inner.drop_edge_range_index(relation, property)
    }

    pub async fn drop_node_fulltext_index(&self, label: &str, property: &str) -> Result<QueryResult> {
        self.inner.drop_node_fulltext_index(label, property)
    }

    pub async fn drop_edge_fulltext_index(&self, relation: &str, property: &str) -> Result<QueryResult> {
        self.inner.drop_edge_fulltext_index(relation, property)
    }

    pub async fn create_constraint(
        &self,
        kind: ConstraintKind,
        entity: EntityKind,
        label: &str,
        properties: &[&str],
    ) -> Result<()> {
        self.inner.create_constraint(kind, entity, label, properties)
    }

    pub async fn drop_constraint(
        &self,
        kind: ConstraintKind,
        entity: EntityKind,
        label: &str,
        properties: &[&str],
    ) -> Result<()> {
        self.inner.drop_constraint(kind, entity, label, properties)
    }
}

// =============================================================================
// AsyncEmbeddedClient
// =============================================================================

/// Async key-value access to an embedded server
pub struct AsyncEmbeddedClient {
    inner: EmbeddedClient,
}

impl AsyncEmbeddedClient {
    pub fn open(config: ClientConfig) -> Result<Self> {
        Ok(Self {
            inner: EmbeddedClient::open(config)?,
        })
    }

    pub fn open_path(path: impl Into<PathBuf>) -> Result<Self> {
        Self::open(ClientConfig::builder().db_path(path).build())
    }

    pub async fn ping(&self) -> Result<String> {
        self.inner.ping()
    }

    pub async fn get(&self, key: impl AsRef<[u8]>) -> Result<Option<Vec<u8>>> {
        self.inner.get(key)
    }

    pub async fn set(&self, key: impl AsRef<[u8]>, value: impl AsRef<[u8]>) -> Result<()> {
        self.inner.set(key, value)
    }

    pub async fn delete(&self, key: impl AsRef<[u8]>) -> Result<i64> {
        self.inner.delete([key])
    }

    pub async fn close(&self) -> Result<()> {
        self.inner.cleanup()
    }

    /// The blocking client underneath
    pub fn blocking(&self) -> &EmbeddedClient {
        &self.inner
    }
}
