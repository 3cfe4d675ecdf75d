//! Tests for FalkorDb and the GraphClient interface
//!
//! These tests verify:
//! - Graph selection and name validation
//! - Graph listing, including failure fallback
//! - Graph module configuration commands
//! - UDF library management commands
//! - Close idempotency

use falkordblite::{FalkorDb, FalkorLiteError, GraphClient};

use super::{array, bulk, MockExecutor, PlainExecutor};

// =============================================================================
// select_graph Tests
// =============================================================================

#[test]
fn test_select_graph_returns_named_handle() {
    let db = FalkorDb::with_client(MockExecutor::new());

    let graph = db.select_graph("social").unwrap();

    assert_eq!(graph.name(), "social");
    assert!(std::ptr::eq(graph.client(), db.client()));
}

#[test]
fn test_select_graph_rejects_empty_name() {
    let db = FalkorDb::with_client(MockExecutor::new());

    let err = db.select_graph("").unwrap_err();
    assert!(matches!(err, FalkorLiteError::InvalidArgument(_)));
}

#[test]
fn test_select_graph_sends_nothing() {
    let db = FalkorDb::with_client(MockExecutor::new());
    let _graph = db.select_graph("g").unwrap();
    assert!(db.client().calls.borrow().is_empty());
}

#[test]
fn test_multiple_graphs_share_the_client() {
    let db = FalkorDb::with_client(MockExecutor::new());

    let a = db.select_graph("a").unwrap();
    let b = db.select_graph("b").unwrap();

    assert_ne!(a.name(), b.name());
    assert!(std::ptr::eq(a.client(), b.client()));
}

// =============================================================================
// list_graphs Tests
// =============================================================================

#[test]
fn test_list_graphs() {
    let db = FalkorDb::with_client(
        MockExecutor::new().reply(array(vec![bulk("social"), bulk("movies")])),
    );

    assert_eq!(db.list_graphs(), vec!["social", "movies"]);
    assert_eq!(db.client().call(0), vec!["GRAPH.LIST"]);
}

#[test]
fn test_list_graphs_empty_on_error() {
    let db = FalkorDb::with_client(MockExecutor::new().fail("ERR unknown command 'GRAPH.LIST'"));
    assert!(db.list_graphs().is_empty());
}

#[test]
fn test_list_graphs_empty_on_nil() {
    let db = FalkorDb::with_client(MockExecutor::new().reply(falkordblite::protocol::Value::Nil));
    assert!(db.list_graphs().is_empty());
}

// =============================================================================
// Config Tests
// =============================================================================

#[test]
fn test_config_get_and_set() {
    let db = FalkorDb::with_client(
        MockExecutor::new().reply(array(vec![bulk("TIMEOUT"), falkordblite::protocol::Value::Int(0)])),
    );

    let value = db.config_get("TIMEOUT").unwrap();
    assert_eq!(value.as_array().unwrap().len(), 2);
    db.config_set("TIMEOUT", "1000").unwrap();

    assert_eq!(db.client().call(0), vec!["GRAPH.CONFIG", "GET", "TIMEOUT"]);
    assert_eq!(db.client().call(1), vec!["GRAPH.CONFIG", "SET", "TIMEOUT", "1000"]);
}

#[test]
fn test_server_errors_propagate_unchanged() {
    let db = FalkorDb::with_client(MockExecutor::new().fail("ERR Unknown configuration field"));

    match db.config_set("NOPE", "1").unwrap_err() {
        FalkorLiteError::Server(message) => assert_eq!(message, "ERR Unknown configuration field"),
        other => panic!("Expected Server error, got {:?}", other),
    }
}

// =============================================================================
// close Tests
// =============================================================================

#[test]
fn test_close_is_idempotent() {
    let db = FalkorDb::with_client(MockExecutor::new());

    db.close().unwrap();
    db.close().unwrap();

    assert!(db.client().is_closed());
}

#[test]
fn test_close_without_cleanup_hook() {
    let db = FalkorDb::with_client(PlainExecutor);

    assert!(db.close().is_ok());
    assert!(db.close().is_ok());
}

#[test]
fn test_commands_after_close_fail() {
    let db = FalkorDb::with_client(MockExecutor::new());
    let graph = db.select_graph("g").unwrap();

    db.close().unwrap();

    let err = graph.execute_command(falkordblite::protocol::Command::new("PING")).unwrap_err();
    assert!(matches!(err, FalkorLiteError::Closed));
}

#[test]
fn test_boxed_executor() {
    let client: Box<dyn falkordblite::CommandExecutor> = Box::new(PlainExecutor);
    let db = FalkorDb::with_client(client);

    assert_eq!(db.select_graph("g").unwrap().name(), "g");
    db.close().unwrap();
}

// =============================================================================
// UDF Library Tests
// =============================================================================

const UPPER_SCRIPT: &str = "function Upper(s) { return s.toUpperCase(); }\nfalkor.register('Upper', Upper);";

#[test]
fn test_udf_load() {
    let db = FalkorDb::with_client(MockExecutor::new());

    db.udf_load("StringUtils", UPPER_SCRIPT).unwrap();
    db.udf_replace("StringUtils", UPPER_SCRIPT).unwrap();

    assert_eq!(db.client().call(0), vec!["GRAPH.UDF", "LOAD", "StringUtils", UPPER_SCRIPT]);
    assert_eq!(
        db.client().call(1),
        vec!["GRAPH.UDF", "LOAD", "REPLACE", "StringUtils", UPPER_SCRIPT]
    );
}

#[test]
fn test_udf_list_names() {
    let entry = |name: &str| {
        array(vec![
            bulk("library_name"),
            bulk(name),
            bulk("functions"),
            array(vec![bulk("Upper")]),
        ])
    };
    let db = FalkorDb::with_client(MockExecutor::new().reply(array(vec![entry("Lib1"), entry("Lib2")])));

    let names = db.udf_list().unwrap();

    assert_eq!(names, vec!["Lib1", "Lib2"]);
    assert_eq!(db.client().call(0), vec!["GRAPH.UDF", "LIST"]);
}

#[test]
fn test_udf_list_plain_names_and_empty() {
    let db = FalkorDb::with_client(
        MockExecutor::new()
            .reply(array(vec![bulk("Lib1")]))
            .reply(array(vec![])),
    );

    assert_eq!(db.udf_list().unwrap(), vec!["Lib1"]);
    assert!(db.udf_list().unwrap().is_empty());
}

#[test]
fn test_udf_delete_and_flush() {
    let db = FalkorDb::with_client(MockExecutor::new());

    db.udf_delete("Lib1").unwrap();
    db.udf_flush().unwrap();

    assert_eq!(db.client().call(0), vec!["GRAPH.UDF", "DELETE", "Lib1"]);
    assert_eq!(db.client().call(1), vec!["GRAPH.UDF", "FLUSH"]);
}

#[test]
fn test_udf_errors_propagate() {
    let db = FalkorDb::with_client(MockExecutor::new().fail("Library 'Lib1' already registered"));

    let err = db.udf_load("Lib1", UPPER_SCRIPT).unwrap_err();
    assert!(matches!(err, FalkorLiteError::Server(_)));
}
