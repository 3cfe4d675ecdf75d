//! Graph operations
//!
//! FalkorDB graph commands, forwarded verbatim to the server.

use std::fmt;

use serde_json::Value as JsonValue;

use crate::client::CommandExecutor;
use crate::error::{FalkorLiteError, Result};
use crate::protocol::{Command, Value};
use super::params::{build_params_header, render_param};
use super::result::QueryResult;
use super::Graph;

/// What an index or constraint applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Node,
    Edge,
}

impl EntityKind {
    fn pattern(self, label: &str) -> String {
        match self {
            EntityKind::Node => format!("(e:{})", label),
            EntityKind::Edge => format!("()-[e:{}]-()", label),
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            EntityKind::Node => "NODE",
            EntityKind::Edge => "RELATIONSHIP",
        })
    }
}

/// Index flavour
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexKind {
    Range,
    Fulltext,
}

impl IndexKind {
    fn keyword(self) -> &'static str {
        match self {
            IndexKind::Range => "INDEX",
            IndexKind::Fulltext => "FULLTEXT INDEX",
        }
    }
}

/// Constraint flavour
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintKind {
    Unique,
    Mandatory,
}

impl fmt::Display for ConstraintKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ConstraintKind::Unique => "UNIQUE",
            ConstraintKind::Mandatory => "MANDATORY",
        })
    }
}

impl<'a, E: CommandExecutor + ?Sized> Graph<'a, E> {
    // =========================================================================
    // Queries
    // =========================================================================

    /// Run a Cypher query
    pub fn query(&self, query: &str, params: Option<&JsonValue>) -> Result<QueryResult> {
        self.run_query("GRAPH.QUERY", query, params, None)
    }

    /// Run a Cypher query with a server-side timeout
    pub fn query_with_timeout(
        &self,
        query: &str,
        params: Option<&JsonValue>,
        timeout_ms: u64,
    ) -> Result<QueryResult> {
        self.run_query("GRAPH.QUERY", query, params, Some(timeout_ms))
    }

    /// Run a read-only Cypher query
    pub fn ro_query(&self, query: &str, params: Option<&JsonValue>) -> Result<QueryResult> {
        self.run_query("GRAPH.RO_QUERY", query, params, None)
    }

    fn run_query(
        &self,
        command: &str,
        query: &str,
        params: Option<&JsonValue>,
        timeout_ms: Option<u64>,
    ) -> Result<QueryResult> {
        let text = with_params(query, params)?;
        let mut command = Command::new(command).arg(&self.name).arg(text);
        if let Some(ms) = timeout_ms {
            command = command.arg("timeout").arg(ms.to_string());
        }
        QueryResult::from_value(self.execute_command(command)?)
    }

    /// Execution plan for a query
    pub fn explain(&self, query: &str, params: Option<&JsonValue>) -> Result<Vec<String>> {
        let text = with_params(query, params)?;
        let reply = self.execute_command(Command::new("GRAPH.EXPLAIN").arg(&self.name).arg(text))?;
        Ok(text_lines(reply))
    }

    /// Run a query and return its profiled plan
    pub fn profile(&self, query: &str, params: Option<&JsonValue>) -> Result<Vec<String>> {
        let text = with_params(query, params)?;
        let reply = self.execute_command(Command::new("GRAPH.PROFILE").arg(&self.name).arg(text))?;
        Ok(text_lines(reply))
    }

    /// Call a procedure read-only, e.g. `db.labels`
    pub fn call_procedure(
        &self,
        procedure: &str,
        args: &[JsonValue],
        yields: &[&str],
    ) -> Result<QueryResult> {
        let args: Vec<String> = args.iter().map(render_param).collect();
        let mut query = format!("CALL {}({})", procedure, args.join(","));
        if !yields.is_empty() {
            query.push_str(" YIELD ");
            query.push_str(&yields.join(","));
        }
        self.ro_query(&query, None)
    }

    // =========================================================================
    // Graph management
    // =========================================================================

    /// Delete the graph and everything in it
    pub fn delete(&self) -> Result<()> {
        self.execute_command(Command::new("GRAPH.DELETE").arg(&self.name))?;
        Ok(())
    }

    /// Copy the graph under a new name and return a handle to the copy
    pub fn copy(&self, clone: &str) -> Result<Graph<'a, E>> {
        let target = Graph::new(self.client, clone)?;
        self.execute_command(Command::new("GRAPH.COPY").arg(&self.name).arg(clone))?;
        Ok(target)
    }

    /// Slow queries recorded for this graph: timestamp, command, query, duration
    pub fn slowlog(&self) -> Result<Vec<Vec<String>>> {
        let reply = self.execute_command(Command::new("GRAPH.SLOWLOG").arg(&self.name))?;
        Ok(reply
            .into_array()
            .unwrap_or_default()
            .into_iter()
            .map(text_lines)
            .collect())
    }

    pub fn slowlog_reset(&self) -> Result<()> {
        self.execute_command(Command::new("GRAPH.SLOWLOG").arg(&self.name).arg("RESET"))?;
        Ok(())
    }

    // =========================================================================
    // Indices and constraints
    // =========================================================================

    pub fn list_indices(&self) -> Result<QueryResult> {
        self.call_procedure("DB.INDEXES", &[], &[])
    }

    pub fn list_constraints(&self) -> Result<QueryResult> {
        self.call_procedure("DB.CONSTRAINTS", &[], &[])
    }

    /// Create an index over `properties` of `label`
    pub fn create_index(
        &self,
        entity: EntityKind,
        kind: IndexKind,
        label: &str,
        properties: &[&str],
    ) -> Result<QueryResult> {
        let query = index_query("CREATE", entity, kind, label, properties)?;
        self.query(&query, None)
    }

    /// Drop an index over `properties` of `label`
    pub fn drop_index(
        &self,
        entity: EntityKind,
        kind: IndexKind,
        label: &str,
        properties: &[&str],
    ) -> Result<QueryResult> {
        let query = index_query("DROP", entity, kind, label, properties)?;
        self.query(&query, None)
    }

    pub fn create_node_range_index(&self, label: &str, properties: &[&str]) -> Result<QueryResult> {
        self.create_index(EntityKind::Node, IndexKind::Range, label, properties)
    }

    pub fn create_edge_range_index(&self, relation: &str, properties: &[&str]) -> Result<QueryResult> {
        self.create_index(EntityKind::Edge, IndexKind::Range, relation, properties)
    }

    pub fn create_node_fulltext_index(&self, label: &str, properties: &[&str]) -> Result<QueryResult> {
        self.create_index(EntityKind::Node, IndexKind::Fulltext, label, properties)
    }

    pub fn create_edge_fulltext_index(&self, relation: &str, properties: &[&str]) -> Result<QueryResult> {
        self.create_index(EntityKind::Edge, IndexKind::Fulltext, relation, properties)
    }

    pub fn drop_node_range_index(&self, label: &str, property: &str) -> Result<QueryResult> {
        self.drop_index(EntityKind::Node, IndexKind::Range, label, &[property])
    }

    pub fn drop_edge_range_index(&self, relation: &str, property: &str) -> Result<QueryResult> {
        self.drop_index(EntityKind::Edge, IndexKind::Range, relation, &[property])
    }

    pub fn drop_node_fulltext_index(&self, label: &str, property: &str) -> Result<QueryResult> {
        self.drop_index(EntityKind::Node, IndexKind::Fulltext, label, &[property])
    }

    pub fn drop_edge_fulltext_index(&self, relation: &str, property: &str) -> Result<QueryResult> {
        self.drop_index(EntityKind::Edge, IndexKind::Fulltext, relation, &[property])
    }

    /// Create a constraint
    ///
    /// Unique constraints need a range index over the same properties, so
    /// one is created first; an existing index is fine.
    pub fn create_constraint(
        &self,
        kind: ConstraintKind,
        entity: EntityKind,
        label: &str,
        properties: &[&str],
    ) -> Result<()> {
        if kind == ConstraintKind::Unique {
            match self.create_index(entity, IndexKind::Range, label, properties) {
                Ok(_) => {}
                Err(FalkorLiteError::Server(message)) => {
                    tracing::debug!("Index for unique constraint on {} not created: {}", label, message)
                }
                Err(e) => return Err(e),
            }
        }
        self.constraint_command("CREATE", kind, entity, label, properties)
    }

    pub fn drop_constraint(
        &self,
        kind: ConstraintKind,
        entity: EntityKind,
        label: &str,
        properties: &[&str],
    ) -> Result<()> {
        self.constraint_command("DROP", kind, entity, label, properties)
    }

    fn constraint_command(
        &self,
        action: &str,
        kind: ConstraintKind,
        entity: EntityKind,
        label: &str,
        properties: &[&str],
    ) -> Result<()> {
        require_properties(properties)?;
        let command = Command::new("GRAPH.CONSTRAINT")
            .arg(action)
            .arg(&self.name)
            .arg(kind.to_string())
            .arg(entity.to_string())
            .arg(label)
            .arg("PROPERTIES")
            .arg(properties.len().to_string())
            .args(properties);
        self.execute_command(command)?;
        Ok(())
    }
}

// =============================================================================
// Helpers
// =============================================================================

fn with_params(query: &str, params: Option<&JsonValue>) -> Result<String> {
    match params {
        Some(params) => Ok(format!("{}{}", build_params_header(params)?, query)),
        None => Ok(query.to_string()),
    }
}

fn index_query(
    action: &str,
    entity: EntityKind,
    kind: IndexKind,
    label: &str,
    properties: &[&str],
) -> Result<String> {
    require_properties(properties)?;
    let fields: Vec<String> = properties.iter().map(|p| format!("e.{}", p)).collect();
    Ok(format!(
        "{} {} FOR {} ON ({})",
        action,
        kind.keyword(),
        entity.pattern(label),
        fields.join(", ")
    ))
}

fn require_properties(properties: &[&str]) -> Result<()> {
    if properties.is_empty() {
        return Err(FalkorLiteError::InvalidArgument(
            "at least one property is required".to_string(),
        ));
    }
    Ok(())
}

fn text_lines(reply: Value) -> Vec<String> {
    match reply {
        Value::Array(items) => items.iter().filter_map(Value::to_text).collect(),
        other => other.to_text().into_iter().collect(),
    }
}
