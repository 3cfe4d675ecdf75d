//! Codec Tests
//!
//! Tests for RESP command encoding and reply decoding.

use std::io::{BufReader, Cursor};

use falkordblite::protocol::{
    decode_value, encode_command, encode_value, read_value, write_command, Command, Value,
    MAX_NESTING_DEPTH,
};
use falkordblite::FalkorLiteError;

// =============================================================================
// Command Encoding Tests
// =============================================================================

#[test]
fn test_encode_ping() {
    let encoded = encode_command(&Command::new("PING"));
    assert_eq!(encoded, b"*1\r\n$4\r\nPING\r\n");
}

#[test]
fn test_encode_graph_query() {
    let cmd = Command::new("GRAPH.QUERY").arg("social").arg("MATCH (n) RETURN n");
    let encoded = encode_command(&cmd);

    assert_eq!(
        encoded,
        b"*3\r\n$11\r\nGRAPH.QUERY\r\n$6\r\nsocial\r\n$18\r\nMATCH (n) RETURN n\r\n".to_vec()
    );
}

#[test]
fn test_encode_binary_argument() {
    let cmd = Command::new("SET").arg("k").arg([0u8, b'\r', b'\n', 255]);
    let encoded = encode_command(&cmd);

    assert!(encoded.ends_with(b"$4\r\n\x00\r\n\xff\r\n"));
}

#[test]
fn test_encode_empty_argument() {
    let encoded = encode_command(&Command::new("SET").arg("k").arg(""));
    assert!(encoded.ends_with(b"$0\r\n\r\n"));
}

#[test]
fn test_command_name_and_args() {
    let cmd = Command::new("graph.list");
    assert_eq!(cmd.name(), "GRAPH.LIST");
    assert_eq!(cmd.as_args().len(), 1);

    let cmd = Command::new("DEL").args(["a", "b", "c"]);
    assert_eq!(cmd.as_args().len(), 4);
}

#[test]
fn test_command_from_args() {
    assert!(Command::from_args(Vec::<String>::new()).is_none());

    let cmd = Command::from_args(["GET", "key"]).unwrap();
    assert_eq!(cmd, Command::new("GET").arg("key"));
}

#[test]
fn test_write_command_to_stream() {
    let mut out = Vec::new();
    write_command(&mut out, &Command::new("PING")).unwrap();
    assert_eq!(out, encode_command(&Command::new("PING")));
}

// =============================================================================
// Reply Decoding Tests
// =============================================================================

#[test]
fn test_decode_status() {
    let (value, used) = decode_value(b"+OK\r\n").unwrap();
    assert_eq!(value, Value::Status("OK".to_string()));
    assert_eq!(used, 5);
}

#[test]
fn test_decode_error() {
    let (value, _) = decode_value(b"-ERR unknown command 'GRAPH.QUERY'\r\n").unwrap();
    assert_eq!(value, Value::Error("ERR unknown command 'GRAPH.QUERY'".to_string()));
}

#[test]
fn test_decode_integers() {
    assert_eq!(decode_value(b":42\r\n").unwrap().0, Value::Int(42));
    assert_eq!(decode_value(b":-7\r\n").unwrap().0, Value::Int(-7));
}

#[test]
fn test_decode_bulk_and_nil() {
    assert_eq!(decode_value(b"$5\r\nhello\r\n").unwrap().0, Value::Bulk(b"hello".to_vec()));
    assert_eq!(decode_value(b"$0\r\n\r\n").unwrap().0, Value::Bulk(Vec::new()));
    assert_eq!(decode_value(b"$-1\r\n").unwrap().0, Value::Nil);
    assert_eq!(decode_value(b"*-1\r\n").unwrap().0, Value::Nil);
}

#[test]
fn test_decode_bulk_with_crlf_inside() {
    let (value, _) = decode_value(b"$4\r\na\r\nb\r\n").unwrap();
    assert_eq!(value, Value::Bulk(b"a\r\nb".to_vec()));
}

#[test]
fn test_decode_nested_query_reply() {
    let bytes = b"*3\r\n*1\r\n$6\r\nn.name\r\n*1\r\n*1\r\n$5\r\nAlice\r\n*2\r\n$16\r\nNodes created: 1\r\n+Cached execution: 0\r\n";
    let (value, used) = decode_value(bytes).unwrap();

    assert_eq!(used, bytes.len());
    let parts = value.as_array().unwrap();
    assert_eq!(parts.len(), 3);
    assert_eq!(parts[1], Value::Array(vec![Value::Array(vec![Value::Bulk(b"Alice".to_vec())])]));
    assert_eq!(parts[2].as_array().unwrap()[1].as_str(), Some("Cached execution: 0"));
}

#[test]
fn test_decode_reports_consumed_bytes_only() {
    let (value, used) = decode_value(b":1\r\n:2\r\n").unwrap();
    assert_eq!(value, Value::Int(1));
    assert_eq!(used, 4);
}

#[test]
fn test_encode_value_matches_decoder() {
    let value = Value::Array(vec![
        Value::Int(3),
        Value::Nil,
        Value::Status("PONG".to_string()),
        Value::Bulk(b"bytes".to_vec()),
        Value::Array(vec![]),
    ]);
    let (decoded, _) = decode_value(&encode_value(&value)).unwrap();
    assert_eq!(decoded, value);
}

// =============================================================================
// Malformed Reply Tests
// =============================================================================

#[test]
fn test_incomplete_reply() {
    let err = decode_value(b"$10\r\nshort\r\n").unwrap_err();
    assert!(matches!(err, FalkorLiteError::Protocol(_)));

    let err = decode_value(b"*2\r\n:1\r\n").unwrap_err();
    assert!(matches!(err, FalkorLiteError::Protocol(_)));

    let err = decode_value(b"+OK").unwrap_err();
    assert!(matches!(err, FalkorLiteError::Protocol(_)));
}

#[test]
fn test_unknown_reply_type() {
    let err = decode_value(b"?what\r\n").unwrap_err();
    match err {
        FalkorLiteError::Protocol(message) => assert!(message.contains("0x3f")),
        other => panic!("Expected Protocol error, got {:?}", other),
    }
}

#[test]
fn test_bare_newline_is_rejected() {
    let err = decode_value(b"+OK\n").unwrap_err();
    assert!(matches!(err, FalkorLiteError::Protocol(_)));
}

#[test]
fn test_invalid_integer() {
    let err = decode_value(b":12a\r\n").unwrap_err();
    assert!(matches!(err, FalkorLiteError::Protocol(_)));
}

#[test]
fn test_bulk_missing_terminator() {
    let err = decode_value(b"$2\r\nabXY").unwrap_err();
    assert!(matches!(err, FalkorLiteError::Protocol(_)));
}

#[test]
fn test_nesting_limit() {
    let mut bytes = Vec::new();
    for _ in 0..=MAX_NESTING_DEPTH + 1 {
        bytes.extend_from_slice(b"*1\r\n");
    }
    bytes.extend_from_slice(b":1\r\n");

    let err = decode_value(&bytes).unwrap_err();
    assert!(matches!(err, FalkorLiteError::Protocol(_)));
}

// =============================================================================
// Stream Tests
// =============================================================================

#[test]
fn test_read_values_in_sequence() {
    let mut reader = BufReader::new(Cursor::new(b"+OK\r\n:5\r\n$3\r\nabc\r\n".to_vec()));

    assert_eq!(read_value(&mut reader).unwrap(), Value::Status("OK".to_string()));
    assert_eq!(read_value(&mut reader).unwrap(), Value::Int(5));
    assert_eq!(read_value(&mut reader).unwrap(), Value::Bulk(b"abc".to_vec()));
}

#[test]
fn test_read_from_closed_stream() {
    let mut reader = BufReader::new(Cursor::new(Vec::new()));

    match read_value(&mut reader).unwrap_err() {
        FalkorLiteError::Io(e) => assert_eq!(e.kind(), std::io::ErrorKind::UnexpectedEof),
        other => panic!("Expected Io error, got {:?}", other),
    }
}

// =============================================================================
// Value Accessor Tests
// =============================================================================

#[test]
fn test_value_accessors() {
    assert_eq!(Value::Bulk(b"12".to_vec()).as_int(), Some(12));
    assert_eq!(Value::Int(9).to_text().as_deref(), Some("9"));
    assert_eq!(Value::Nil.to_text(), None);
    assert!(Value::Nil.is_nil());
    assert_eq!(Value::Status("OK".into()).as_str(), Some("OK"));
    assert_eq!(Value::Bulk(vec![0xff]).as_str(), None);
    assert_eq!(Value::Array(vec![Value::Int(1), Value::Nil]).to_string(), "[1, (nil)]");
}
