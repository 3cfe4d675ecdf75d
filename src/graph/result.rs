//! Query results
//!
//! Splits a `GRAPH.QUERY` reply into header, rows and statistics.
//!
//! ```text
//! [ header, rows, statistics ]   queries returning data
//! [ statistics ]                 write-only queries
//! ```

use crate::error::{FalkorLiteError, Result};
use crate::protocol::Value;

/// Parsed reply of a graph query
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryResult {
    /// Column descriptors, as sent by the server
    pub header: Vec<Value>,

    /// One entry per returned row
    pub result_set: Vec<Vec<Value>>,

    /// Lines such as `Nodes created: 1`
    pub statistics: Vec<String>,
}

impl QueryResult {
    /// Parse a raw query reply
    pub fn from_value(value: Value) -> Result<Self> {
        let mut parts = value
            .into_array()
            .ok_or_else(|| FalkorLiteError::Protocol("query reply is not an array".to_string()))?;

        match parts.len() {
            1 => Ok(Self {
                statistics: statistics(parts.remove(0))?,
                ..Self::default()
            }),
            3 => {
                let stats = parts.pop().unwrap_or(Value::Nil);
                let rows = parts.pop().unwrap_or(Value::Nil);
                let header = parts.pop().unwrap_or(Value::Nil);

                let header = header.into_array().unwrap_or_default();
                let result_set = rows
                    .into_array()
                    .unwrap_or_default()
                    .into_iter()
                    .map(|row| match row {
                        Value::Array(cells) => cells,
                        cell => vec![cell],
                    })
                    .collect();

                Ok(Self {
                    header,
                    result_set,
                    statistics: statistics(stats)?,
                })
            }
            n => Err(FalkorLiteError::Protocol(format!(
                "query reply has {} parts, expected 1 or 3",
                n
            ))),
        }
    }

    /// Column names, where the header carries them as text
    pub fn column_names(&self) -> Vec<String> {
        self.header
            .iter()
            .filter_map(|column| match column {
                Value::Array(parts) => parts.last().and_then(Value::to_text),
                other => other.to_text(),
            })
            .collect()
    }

    /// Numeric value of a statistic line, e.g. `statistic("Nodes created")`
    pub fn statistic(&self, name: &str) -> Option<f64> {
        self.statistics.iter().find_map(|line| {
            let (label, value) = line.split_once(':')?;
            if label.trim() != name {
                return None;
            }
            value.split_whitespace().next()?.parse().ok()
        })
    }

    pub fn nodes_created(&self) -> u64 {
        self.statistic("Nodes created").unwrap_or(0.0) as u64
    }

    pub fn nodes_deleted(&self) -> u64 {
        self.statistic("Nodes deleted").unwrap_or(0.0) as u64
    }

    pub fn relationships_created(&self) -> u64 {
        self.statistic("Relationships created").unwrap_or(0.0) as u64
    }

    pub fn properties_set(&self) -> u64 {
        self.statistic("Properties set").unwrap_or(0.0) as u64
    }

    /// Server-side execution time in milliseconds
    pub fn run_time_ms(&self) -> Option<f64> {
        self.statistic("Query internal execution time")
    }

    pub fn is_empty(&self) -> bool {
        self.result_set.is_empty()
    }
}

fn statistics(value: Value) -> Result<Vec<String>> {
    match value {
        Value::Array(lines) => Ok(lines.iter().filter_map(Value::to_text).collect()),
        Value::Nil => Ok(Vec::new()),
        other => Err(FalkorLiteError::Protocol(format!(
            "query statistics are not an array: {}",
            other
        ))),
    }
}
