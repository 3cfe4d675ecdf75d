//! Graph Module
//!
//! A named graph bound to a command executor.
//!
//! The handle itself only knows its name and its client. The `graph-ops`
//! feature (on by default) adds the FalkorDB graph commands: queries,
//! graph management, index and constraint management, procedure calls.

#[cfg(feature = "graph-ops")]
mod ops;
#[cfg(feature = "graph-ops")]
mod params;
#[cfg(feature = "graph-ops")]
mod result;

use crate::client::CommandExecutor;
use crate::error::{FalkorLiteError, Result};
use crate::protocol::{Command, Value};

#[cfg(feature = "graph-ops")]
pub use ops::{EntityKind, IndexKind, ConstraintKind};
#[cfg(feature = "graph-ops")]
pub use params::{build_params_header, render_param};
#[cfg(feature = "graph-ops")]
pub use result::QueryResult;

/// A graph selected on a client
pub struct Graph<'a, E: CommandExecutor + ?Sized> {
    client: &'a E,
    name: String,
}

impl<'a, E: CommandExecutor + ?Sized> Graph<'a, E> {
    /// Bind `name` to `client`
    ///
    /// Fails with `InvalidArgument` when the name is empty.
    pub fn new(client: &'a E, name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(FalkorLiteError::InvalidArgument(
                "graph name must be a non-empty string".to_string(),
            ));
        }
        Ok(Self { client, name })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The client this graph runs commands on
    pub fn client(&self) -> &'a E {
        self.client
    }

    /// Run a raw command on the client
    pub fn execute_command(&self, command: Command) -> Result<Value> {
        self.client.execute_command(command)
    }
}

impl<E: CommandExecutor + ?Sized> Clone for Graph<'_, E> {
    fn clone(&self) -> Self {
        Self {
            client: self.client,
            name: self.name.clone(),
        }
    }
}

impl<E: CommandExecutor + ?Sized> std::fmt::Debug for Graph<'_, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Graph").field("name", &self.name).finish()
    }
}
