//! Reply values
//!
//! Represents replies read from the server.

use std::fmt;

/// A RESP2 reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// Nil bulk string or nil array
    Nil,

    /// `:` integer reply
    Int(i64),

    /// `+` status reply, e.g. `OK` or `PONG`
    Status(String),

    /// `$` bulk string
    Bulk(Vec<u8>),

    /// `*` array of nested replies
    Array(Vec<Value>),

    /// `-` error reply
    Error(String),
}

impl Value {
    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    /// Text of a status or UTF-8 bulk reply
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Status(s) => Some(s),
            Value::Bulk(bytes) => std::str::from_utf8(bytes).ok(),
            _ => None,
        }
    }

    /// Owned text of a status, bulk or integer reply
    pub fn to_text(&self) -> Option<String> {
        match self {
            Value::Int(n) => Some(n.to_string()),
            other => other.as_str().map(str::to_string),
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            Value::Bulk(_) | Value::Status(_) => self.as_str()?.parse().ok(),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn into_array(self) -> Option<Vec<Value>> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => f.write_str("(nil)"),
            Value::Int(n) => write!(f, "{}", n),
            Value::Status(s) => f.write_str(s),
            Value::Bulk(bytes) => f.write_str(&String::from_utf8_lossy(bytes)),
            Value::Error(message) => write!(f, "(error) {}", message),
            Value::Array(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str("]")
            }
        }
    }
}
