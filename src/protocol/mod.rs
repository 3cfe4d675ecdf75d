//! Protocol Module
//!
//! RESP2 framing for talking to the embedded server.
//!
//! ## Request Format
//! Every command is an array of bulk strings:
//! ```text
//! *<argc>\r\n
//! $<len>\r\n<arg>\r\n   (repeated argc times)
//! ```
//!
//! ## Reply Types
//! - `+` status line
//! - `-` error line
//! - `:` integer
//! - `$` bulk string (`$-1` is nil)
//! - `*` array (`*-1` is nil)

mod codec;
mod command;
mod value;

pub use codec::{
    decode_value, encode_command, encode_value, read_value, write_command, MAX_BULK_SIZE,
    MAX_NESTING_DEPTH,
};
pub use command::Command;
pub use value::Value;
