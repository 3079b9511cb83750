//! End-to-end tests over a file-backed SQLite pool.
//!
//! Exercises the real executor: statements go through the pool, rows are
//! decoded from the driver, and database rejections come back flagged.

use mysql_mcp_gateway::config::PoolOptions;
use mysql_mcp_gateway::db::DbPool;
use mysql_mcp_gateway::error::GatewayError;
use mysql_mcp_gateway::models::{ConnectionConfig, ExecutionRequest};
use mysql_mcp_gateway::tools::{CommandGateway, ToolResponse};
use rmcp::model::CallToolResult;
use serde_json::{Value as JsonValue, json};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

/// Helper to set up a gateway over a fresh database file.
async fn setup_gateway() -> (CommandGateway<DbPool>, Arc<DbPool>, TempDir) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("gateway.db");
    let config = ConnectionConfig::new(
        format!("sqlite:{}", path.display()),
        PoolOptions {
            max_connections: Some(4),
            min_connections: Some(1),
            ..Default::default()
        },
    )
    .unwrap();

    let pool = Arc::new(DbPool::connect(&config).await.expect("Failed to connect"));
    (CommandGateway::new(pool.clone()), pool, dir)
}

async fn run(gw: &CommandGateway<DbPool>, name: &str, query: &str) -> ToolResponse {
    gw.execute(ExecutionRequest::new(name, Some(json!({ "query": query }))))
        .await
        .unwrap_or_else(|e| panic!("{name} failed: {e}"))
}

fn parse(response: &ToolResponse) -> JsonValue {
    assert!(!response.is_error, "unexpected error: {}", response.text);
    serde_json::from_str(&response.text).unwrap()
}

/// Pooled connections are returned asynchronously; give the pool a moment.
async fn wait_for_idle(pool: &DbPool) {
    for _ in 0..50 {
        if pool.in_use() == 0 {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert_eq!(pool.in_use(), 0, "connection not returned to pool");
}

const CREATE_USERS: &str =
    "CREATE TABLE test_users (id INTEGER PRIMARY KEY AUTOINCREMENT, name TEXT NOT NULL, email TEXT)";

#[tokio::test]
async fn test_full_lifecycle() {
    let (gw, pool, _dir) = setup_gateway().await;

    let created = parse(&run(&gw, "create_table", CREATE_USERS).await);
    assert_eq!(created["success"], json!(true));
    assert_eq!(created["message"], json!("Table created successfully"));

    let inserted = parse(
        &run(
            &gw,
            "insert_data",
            "INSERT INTO test_users (name, email) VALUES ('Alice', 'alice@example.com'), ('Bob', NULL)",
        )
        .await,
    );
    assert_eq!(inserted["message"], json!("Data inserted successfully"));
    assert_eq!(inserted["result"]["rows_affected"], json!(2));
    assert_eq!(inserted["result"]["last_insert_id"], json!(2));

    let rows = parse(&run(&gw, "run_sql_query", "SELECT id, name, email FROM test_users ORDER BY id").await);
    assert_eq!(
        rows,
        json!([
            { "id": 1, "name": "Alice", "email": "alice@example.com" },
            { "id": 2, "name": "Bob", "email": null }
        ])
    );

    let updated = parse(
        &run(
            &gw,
            "update_data",
            "UPDATE test_users SET email = 'bob@example.com' WHERE name = 'Bob'",
        )
        .await,
    );
    assert_eq!(updated["message"], json!("Data updated successfully"));
    assert_eq!(updated["result"]["rows_affected"], json!(1));

    let deleted = parse(&run(&gw, "delete_data", "DELETE FROM test_users WHERE id = 1").await);
    assert_eq!(deleted["message"], json!("Data deleted successfully"));
    assert_eq!(deleted["result"]["rows_affected"], json!(1));

    let rows = parse(&run(&gw, "run_sql_query", "select name from test_users").await);
    assert_eq!(rows, json!([{ "name": "Bob" }]));

    wait_for_idle(&pool).await;
}

#[tokio::test]
async fn test_duplicate_table_is_reported_as_error_payload() {
    let (gw, pool, _dir) = setup_gateway().await;
    run(&gw, "create_table", CREATE_USERS).await;

    let response = run(&gw, "create_table", CREATE_USERS).await;

    assert!(response.is_error);
    assert!(response.text.starts_with("SQLite error: "), "{}", response.text);
    assert!(response.text.contains("already exists"));

    let result: CallToolResult = response.into();
    assert_eq!(result.is_error, Some(true));

    wait_for_idle(&pool).await;
}

#[tokio::test]
async fn test_invalid_sql_in_matching_class_is_reported() {
    let (gw, _pool, _dir) = setup_gateway().await;

    let response = run(&gw, "run_sql_query", "SELECT * FROM no_such_table").await;
    assert!(response.is_error);
    assert!(response.text.contains("no such table"));

    let response = run(&gw, "insert_data", "INSERT INTO nowhere VALUES (").await;
    assert!(response.is_error);
    assert!(response.text.starts_with("SQLite error: "));
}

#[tokio::test]
async fn test_wrong_tool_leaves_data_untouched() {
    let (gw, _pool, _dir) = setup_gateway().await;
    run(&gw, "create_table", CREATE_USERS).await;
    run(
        &gw,
        "insert_data",
        "INSERT INTO test_users (name) VALUES ('Alice')",
    )
    .await;

    let err = gw
        .execute(ExecutionRequest::new(
            "run_sql_query",
            Some(json!({ "query": "DELETE FROM test_users" })),
        ))
        .await
        .unwrap_err();
    assert!(matches!(err, GatewayError::StatementClassMismatch { .. }));

    let rows = parse(&run(&gw, "run_sql_query", "SELECT COUNT(*) AS n FROM test_users").await);
    assert_eq!(rows, json!([{ "n": 1 }]));
}

#[tokio::test]
async fn test_stacked_statements_are_rejected_and_not_run() {
    let (gw, pool, _dir) = setup_gateway().await;
    run(&gw, "create_table", CREATE_USERS).await;
    run(
        &gw,
        "insert_data",
        "INSERT INTO test_users (name) VALUES ('Alice')",
    )
    .await;

    for stacked in [
        "SELECT 1; DELETE FROM test_users",
        "SELECT 1; DROP TABLE test_users",
        "SELECT 1;DROP TABLE test_users;",
    ] {
        let response = run(&gw, "run_sql_query", stacked).await;
        assert!(response.is_error, "{stacked:?} ran: {}", response.text);
        assert!(
            response.text.starts_with("SQLite error: "),
            "{}",
            response.text
        );
    }

    let response = run(
        &gw,
        "insert_data",
        "INSERT INTO test_users (name) VALUES ('Bob'); DELETE FROM test_users",
    )
    .await;
    assert!(response.is_error);

    let rows = parse(&run(&gw, "run_sql_query", "SELECT COUNT(*) AS n FROM test_users").await);
    assert_eq!(rows, json!([{ "n": 1 }]));

    let tables = parse(
        &run(
            &gw,
            "run_sql_query",
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name = 'test_users'",
        )
        .await,
    );
    assert_eq!(tables, json!([{ "name": "test_users" }]));

    wait_for_idle(&pool).await;
}

#[tokio::test]
async fn test_trailing_semicolon_and_literal_semicolons_run() {
    let (gw, _pool, _dir) = setup_gateway().await;
    run(&gw, "create_table", CREATE_USERS).await;

    let inserted = parse(
        &run(
            &gw,
            "insert_data",
            "INSERT INTO test_users (name) VALUES ('a; DROP TABLE test_users');",
        )
        .await,
    );
    assert_eq!(inserted["result"]["rows_affected"], json!(1));

    let rows = parse(&run(&gw, "run_sql_query", "SELECT name FROM test_users;").await);
    assert_eq!(rows, json!([{ "name": "a; DROP TABLE test_users" }]));
}

#[tokio::test]
async fn test_empty_result_set_is_empty_array() {
    let (gw, _pool, _dir) = setup_gateway().await;
    run(&gw, "create_table", CREATE_USERS).await;

    let response = run(&gw, "run_sql_query", "SELECT * FROM test_users").await;
    assert_eq!(response.text, "[]");
}

#[tokio::test]
async fn test_utf8_round_trip() {
    let (gw, _pool, _dir) = setup_gateway().await;
    run(&gw, "create_table", CREATE_USERS).await;
    run(
        &gw,
        "insert_data",
        "INSERT INTO test_users (name) VALUES ('日本語テスト 🎉')",
    )
    .await;

    let rows = parse(&run(&gw, "run_sql_query", "SELECT name FROM test_users").await);
    assert_eq!(rows[0]["name"], json!("日本語テスト 🎉"));
}

#[tokio::test]
async fn test_concurrent_reads_share_pool() {
    let (gw, pool, _dir) = setup_gateway().await;
    run(&gw, "create_table", CREATE_USERS).await;
    run(
        &gw,
        "insert_data",
        "INSERT INTO test_users (name) VALUES ('a'), ('b'), ('c')",
    )
    .await;

    let gw = Arc::new(gw);
    let mut handles = Vec::new();
    for _ in 0..12 {
        let gw = gw.clone();
        handles.push(tokio::spawn(async move {
            run(&gw, "run_sql_query", "SELECT COUNT(*) AS n FROM test_users").await
        }));
    }

    for handle in handles {
        let rows = parse(&handle.await.unwrap());
        assert_eq!(rows, json!([{ "n": 3 }]));
    }

    wait_for_idle(&pool).await;
}
