//! Protocol codec
//!
//! Encoding and decoding functions for RESP2.
//!
//! ## Wire Format
//!
//! ### Request (Command)
//! ```text
//! ┌───────────┬──────────────────────┬─────┬──────────────────────┐
//! │ *argc\r\n │ $len\r\n arg0 \r\n   │ ... │ $len\r\n argN \r\n   │
//! └───────────┴──────────────────────┴─────┴──────────────────────┘
//! ```
//!
//! ### Reply
//! A type byte (`+ - : $ *`) followed by a CRLF-terminated header line;
//! bulk strings carry `len` bytes of payload plus a trailing CRLF, arrays
//! carry `argc` nested replies.

use std::io::{BufRead, Cursor, ErrorKind, Write};

use bytes::{BufMut, BytesMut};

use crate::error::{FalkorLiteError, Result};
use super::{Command, Value};

/// Maximum bulk string size (512 MB, the server's own default limit)
pub const MAX_BULK_SIZE: usize = 512 * 1024 * 1024;

/// Maximum array nesting accepted when reading a reply
pub const MAX_NESTING_DEPTH: usize = 64;

const CRLF: &[u8] = b"\r\n";

// =============================================================================
// Command Encoding
// =============================================================================

/// Encode a command as an array of bulk strings
pub fn encode_command(command: &Command) -> Vec<u8> {
    let args = command.as_args();
    let payload: usize = args.iter().map(|a| a.len() + 16).sum();

    let mut buf = BytesMut::with_capacity(16 + payload);
    put_header(&mut buf, b'*', args.len() as i64);
    for arg in args {
        put_bulk(&mut buf, arg);
    }

    buf.to_vec()
}

/// Encode a reply value (used by test servers and benchmarks)
pub fn encode_value(value: &Value) -> Vec<u8> {
    let mut buf = BytesMut::new();
    put_value(&mut buf, value);
    buf.to_vec()
}

fn put_value(buf: &mut BytesMut, value: &Value) {
    match value {
        Value::Nil => buf.put_slice(b"$-1\r\n"),
        Value::Int(n) => put_header(buf, b':', *n),
        Value::Status(s) => put_line(buf, b'+', s),
        Value::Error(message) => put_line(buf, b'-', message),
        Value::Bulk(bytes) => put_bulk(buf, bytes),
        Value::Array(items) => {
            put_header(buf, b'*', items.len() as i64);
            for item in items {
                put_value(buf, item);
            }
        }
    }
}

fn put_header(buf: &mut BytesMut, kind: u8, n: i64) {
    buf.put_u8(kind);
    buf.put_slice(n.to_string().as_bytes());
    buf.put_slice(CRLF);
}

fn put_line(buf: &mut BytesMut, kind: u8, text: &str) {
    buf.put_u8(kind);
    // Status and error lines cannot carry line breaks
    for b in text.bytes() {
        buf.put_u8(if b == b'\r' || b == b'\n' { b' ' } else { b });
    }
    buf.put_slice(CRLF);
}

fn put_bulk(buf: &mut BytesMut, bytes: &[u8]) {
    put_header(buf, b'$', bytes.len() as i64);
    buf.put_slice(bytes);
    buf.put_slice(CRLF);
}

// =============================================================================
// Reply Decoding
// =============================================================================

/// Decode one reply from a byte slice
///
/// Returns the value and the number of bytes consumed.
pub fn decode_value(bytes: &[u8]) -> Result<(Value, usize)> {
    let mut cursor = Cursor::new(bytes);
    match read_value(&mut cursor) {
        Ok(value) => Ok((value, cursor.position() as usize)),
        Err(FalkorLiteError::Io(ref e)) if e.kind() == ErrorKind::UnexpectedEof => Err(
            FalkorLiteError::Protocol(format!("Incomplete reply: {} bytes", bytes.len())),
        ),
        Err(e) => Err(e),
    }
}

/// Read one complete reply from a buffered stream
///
/// Blocks until the reply is complete. A closed stream surfaces as an
/// `UnexpectedEof` I/O error.
pub fn read_value<R: BufRead>(reader: &mut R) -> Result<Value> {
    read_value_at(reader, 0)
}

fn read_value_at<R: BufRead>(reader: &mut R, depth: usize) -> Result<Value> {
    if depth > MAX_NESTING_DEPTH {
        return Err(FalkorLiteError::Protocol(format!(
            "Reply nested deeper than {} levels",
            MAX_NESTING_DEPTH
        )));
    }

    let line = read_line(reader)?;
    let (kind, rest) = line
        .split_first()
        .ok_or_else(|| FalkorLiteError::Protocol("Empty reply line".to_string()))?;

    match kind {
        b'+' => Ok(Value::Status(utf8(rest)?)),
        b'-' => Ok(Value::Error(utf8(rest)?)),
        b':' => Ok(Value::Int(parse_int(rest)?)),
        b'$' => {
            let len = parse_int(rest)?;
            if len < 0 {
                return Ok(Value::Nil);
            }
            let len = len as usize;
            if len > MAX_BULK_SIZE {
                return Err(FalkorLiteError::Protocol(format!(
                    "Bulk string too large: {} bytes (max {})",
                    len, MAX_BULK_SIZE
                )));
            }

            let mut payload = vec![0u8; len + CRLF.len()];
            reader.read_exact(&mut payload)?;
            if !payload.ends_with(CRLF) {
                return Err(FalkorLiteError::Protocol(
                    "Bulk string not terminated by CRLF".to_string(),
                ));
            }
            payload.truncate(len);
            Ok(Value::Bulk(payload))
        }
        b'*' => {
            let count = parse_int(rest)?;
            if count < 0 {
                return Ok(Value::Nil);
            }

            let mut items = Vec::with_capacity((count as usize).min(1024));
            for _ in 0..count {
                items.push(read_value_at(reader, depth + 1)?);
            }
            Ok(Value::Array(items))
        }
        other => Err(FalkorLiteError::Protocol(format!(
            "Unknown reply type: 0x{:02x}",
            other
        ))),
    }
}

/// Read a CRLF-terminated line, without the terminator
fn read_line<R: BufRead>(reader: &mut R) -> Result<Vec<u8>> {
    let mut line = Vec::new();
    let read = reader.read_until(b'\n', &mut line)?;
    if read == 0 {
        return Err(std::io::Error::new(ErrorKind::UnexpectedEof, "connection closed").into());
    }
    if !line.ends_with(CRLF) {
        if line.ends_with(b"\n") {
            return Err(FalkorLiteError::Protocol(
                "Reply line not terminated by CRLF".to_string(),
            ));
        }
        return Err(std::io::Error::new(ErrorKind::UnexpectedEof, "truncated reply line").into());
    }
    line.truncate(line.len() - CRLF.len());
    Ok(line)
}

fn utf8(bytes: &[u8]) -> Result<String> {
    String::from_utf8(bytes.to_vec())
        .map_err(|e| FalkorLiteError::Protocol(format!("Invalid UTF-8 in reply: {}", e)))
}

fn parse_int(bytes: &[u8]) -> Result<i64> {
    std::str::from_utf8(bytes)
        .ok()
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| {
            FalkorLiteError::Protocol(format!(
                "Invalid integer in reply: {:?}",
                String::from_utf8_lossy(bytes)
            ))
        })
}

// =============================================================================
// Stream-based I/O helpers
// =============================================================================

/// Write a command to a stream
pub fn write_command<W: Write>(writer: &mut W, command: &Command) -> Result<()> {
    let bytes = encode_command(command);
    writer.write_all(&bytes)?;
    writer.flush()?;
    Ok(())
}
