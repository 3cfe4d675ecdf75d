//! FalkorDB client
//!
//! The graph-database client surface, composed over an owned command
//! executor instead of inheriting from a base client.
//!
//! ```no_run
//! use falkordblite::{FalkorDb, GraphClient};
//!
//! let db = FalkorDb::open_path("/tmp/falkordb.db")?;
//! let graph = db.select_graph("social")?;
//! let result = graph.query("CREATE (n:Person {name: 'Alice'}) RETURN n", None)?;
//! for row in &result.result_set {
//!     println!("{:?}", row);
//! }
//! db.close()?;
//! # Ok::<(), falkordblite::FalkorLiteError>(())
//! ```

use std::path::PathBuf;

use crate::client::{CommandExecutor, EmbeddedClient};
use crate::config::ClientConfig;
use crate::error::Result;
use crate::graph::Graph;
use crate::protocol::{Command, Value};

/// Capability interface of a graph-database client
///
/// Implementors only provide the executor; graph selection, listing,
/// configuration and close are shared.
pub trait GraphClient {
    type Executor: CommandExecutor;

    /// The executor commands are sent through
    fn executor(&self) -> &Self::Executor;

    /// Select a graph by name
    ///
    /// Fails with `InvalidArgument` for an empty name.
    fn select_graph(&self, name: &str) -> Result<Graph<'_, Self::Executor>> {
        Graph::new(self.executor(), name)
    }

    /// Names of all graphs; empty when the server cannot answer
    fn list_graphs(&self) -> Vec<String> {
        match self.executor().execute_command(Command::new("GRAPH.LIST")) {
            Ok(Value::Array(names)) => names.iter().filter_map(Value::to_text).collect(),
            Ok(_) => Vec::new(),
            Err(e) => {
                tracing::debug!("GRAPH.LIST failed: {}", e);
                Vec::new()
            }
        }
    }

    /// Read a graph module setting (`*` for all)
    fn config_get(&self, name: &str) -> Result<Value> {
        self.executor()
            .execute_command(Command::new("GRAPH.CONFIG").arg("GET").arg(name))
    }

    /// Change a graph module setting
    fn config_set(&self, name: &str, value: &str) -> Result<()> {
        self.executor()
            .execute_command(Command::new("GRAPH.CONFIG").arg("SET").arg(name).arg(value))?;
        Ok(())
    }

    // =========================================================================
    // User-defined function libraries
    // =========================================================================

    /// Load a JavaScript UDF library; fails if `name` is already loaded
    fn udf_load(&self, name: &str, script: &str) -> Result<()> {
        self.executor()
            .execute_command(Command::new("GRAPH.UDF").arg("LOAD").arg(name).arg(script))?;
        Ok(())
    }

    /// Load a UDF library, replacing any library of the same name
    fn udf_replace(&self, name: &str, script: &str) -> Result<()> {
        self.executor().execute_command(
            Command::new("GRAPH.UDF")
                .arg("LOAD")
                .arg("REPLACE")
                .arg(name)
                .arg(script),
        )?;
        Ok(())
    }

    /// Names of the loaded UDF libraries
    fn udf_list(&self) -> Result<Vec<String>> {
        let reply = self
            .executor()
            .execute_command(Command::new("GRAPH.UDF").arg("LIST"))?;
        Ok(reply
            .into_array()
            .unwrap_or_default()
            .iter()
            .filter_map(udf_library_name)
            .collect())
    }

    fn udf_delete(&self, name: &str) -> Result<()> {
        self.executor()
            .execute_command(Command::new("GRAPH.UDF").arg("DELETE").arg(name))?;
        Ok(())
    }

    /// Remove every UDF library
    fn udf_flush(&self) -> Result<()> {
        self.executor()
            .execute_command(Command::new("GRAPH.UDF").arg("FLUSH"))?;
        Ok(())
    }

    /// Release the executor's resources; repeated calls are no-ops
    fn close(&self) -> Result<()> {
        self.executor().cleanup()
    }
}

/// Graph client over an owned executor (the embedded client by default)
pub struct FalkorDb<E: CommandExecutor = EmbeddedClient> {
    client: E,
}

impl FalkorDb<EmbeddedClient> {
    /// Start an embedded server for `config` and wrap its client
    pub fn open(config: ClientConfig) -> Result<Self> {
        Ok(Self::with_client(EmbeddedClient::open(config)?))
    }

    /// Open with a database file (convenience method)
    pub fn open_path(path: impl Into<PathBuf>) -> Result<Self> {
        Self::open(ClientConfig::builder().db_path(path).build())
    }
}

impl<E: CommandExecutor> FalkorDb<E> {
    /// Wrap an existing executor
    pub fn with_client(client: E) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &E {
        &self.client
    }

    pub fn into_client(self) -> E {
        self.client
    }
}

impl<E: CommandExecutor> GraphClient for FalkorDb<E> {
    type Executor = E;

    fn executor(&self) -> &E {
        &self.client
    }
}

/// Library name of one `GRAPH.UDF LIST` entry
///
/// Entries are flat `[field, value, ...]` arrays holding `library_name`;
/// a bare string entry is taken as the name itself.
fn udf_library_name(entry: &Value) -> Option<String> {
    match entry {
        Value::Array(fields) => fields
            .chunks(2)
            .find(|pair| pair[0].as_str() == Some("library_name"))
            .and_then(|pair| pair.get(1))
            .and_then(Value::to_text),
        other => other.to_text(),
    }
}
