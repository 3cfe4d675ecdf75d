//! Query parameters
//!
//! Parameters travel inline as a `CYPHER name=value ...` prefix on the query
//! text.

use serde_json::Value as JsonValue;

use crate::error::{FalkorLiteError, Result};

/// Render one parameter value as a Cypher literal
pub fn render_param(value: &JsonValue) -> String {
    match value {
        JsonValue::Null => "null".to_string(),
        JsonValue::Bool(b) => b.to_string(),
        JsonValue::Number(n) => n.to_string(),
        JsonValue::String(s) => quote(s),
        JsonValue::Array(items) => {
            let items: Vec<String> = items.iter().map(render_param).collect();
            format!("[{}]", items.join(","))
        }
        JsonValue::Object(map) => {
            let entries: Vec<String> = map
                .iter()
                .map(|(k, v)| format!("{}:{}", k, render_param(v)))
                .collect();
            format!("{{{}}}", entries.join(","))
        }
    }
}

/// Build the `CYPHER ...` prefix for a parameter object
///
/// Returns an empty string for an empty object.
pub fn build_params_header(params: &JsonValue) -> Result<String> {
    let map = params.as_object().ok_or_else(|| {
        FalkorLiteError::InvalidArgument("query parameters must be a JSON object".to_string())
    })?;

    if map.is_empty() {
        return Ok(String::new());
    }

    let mut header = String::from("CYPHER ");
    for (name, value) in map {
        header.push_str(name);
        header.push('=');
        header.push_str(&render_param(value));
        header.push(' ');
    }
    Ok(header)
}

fn quote(s: &str) -> String {
    let mut quoted = String::with_capacity(s.len() + 2);
    quoted.push('"');
    for c in s.chars() {
        if c == '"' || c == '\\' {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted.push('"');
    quoted
}
