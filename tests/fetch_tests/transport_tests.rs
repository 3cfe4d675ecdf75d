//! Tests for the HTTP transport against a local one-shot server

use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use falkordblite::fetch::{HttpTransport, UreqTransport};
use falkordblite::FalkorLiteError;

/// Answer one request with `status` and `body`, returning the request headers
fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<Vec<String>>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let url = format!("http://{}/redis.tar.gz", listener.local_addr().unwrap());

    let handle = thread::spawn(move || {
        let (stream, _) = listener.accept().unwrap();
        let mut reader = BufReader::new(stream.try_clone().unwrap());
        let mut headers = Vec::new();
        loop {
            let mut line = String::new();
            reader.read_line(&mut line).unwrap();
            let line = line.trim_end().to_string();
            if line.is_empty() {
                break;
            }
            headers.push(line);
        }

        let mut stream = stream;
        write!(
            stream,
            "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        )
        .unwrap();
        stream.flush().unwrap();
        headers
    });

    (url, handle)
}

#[test]
fn test_body_is_returned() {
    let (url, server) = serve_once("200 OK", "tarball");
    let transport = UreqTransport::new(Duration::from_secs(5));

    let body = transport.get(&url, None).unwrap();

    assert_eq!(body, b"tarball");
    let headers = server.join().unwrap();
    assert!(!headers.iter().any(|h| h.to_ascii_lowercase().starts_with("authorization")));
}

#[test]
fn test_bearer_token_header() {
    let (url, server) = serve_once("200 OK", "");
    let transport = UreqTransport::new(Duration::from_secs(5));

    transport.get(&url, Some("ghp_secret")).unwrap();

    let headers = server.join().unwrap();
    assert!(headers.iter().any(|h| h == "Authorization: Bearer ghp_secret"));
}

#[test]
fn test_forbidden_status() {
    let (url, server) = serve_once("403 Forbidden", "rate limited");
    let transport = UreqTransport::new(Duration::from_secs(5));

    let err = transport.get(&url, None).unwrap_err();

    assert!(err.is_forbidden());
    match err {
        FalkorLiteError::HttpStatus { status, url: failed } => {
            assert_eq!(status, 403);
            assert_eq!(failed, url);
        }
        other => panic!("Expected HttpStatus, got {:?}", other),
    }
    server.join().unwrap();
}

#[test]
fn test_connection_refused_is_network_error() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let url = format!("http://{}/", listener.local_addr().unwrap());
    drop(listener);

    let err = UreqTransport::new(Duration::from_secs(2)).get(&url, None).unwrap_err();
    assert!(matches!(err, FalkorLiteError::Network(_)));
}
