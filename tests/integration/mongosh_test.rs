//! Live tests against a real MongoDB deployment.
//!
//! These run only when `MONGO_URI` is set and `mongosh` (or `MONGOSH_PATH`)
//! is available. They only read, so any reachable deployment works.

use mql_eval::config::BackendConfig;
use mql_eval::db::{DocumentStore, MongoshClient, ResultValue};
use mql_eval::query::{ExecutionResult, QueryExecutor};

/// Returns a connected client, or None when no live backend is configured.
async fn live_client() -> Option<MongoshClient> {
    let Ok(uri) = std::env::var("MONGO_URI") else {
        eprintln!("Skipping test: MONGO_URI not set");
        return None;
    };

    let mut config = BackendConfig {
        uri: Some(uri),
        timeout_secs: Some(60),
        ..Default::default()
    };
    config.apply_env_defaults();

    match MongoshClient::connect(&config).await {
        Ok(client) => Some(client),
        Err(e) => {
            eprintln!("Skipping test: {e}");
            None
        }
    }
}

#[tokio::test]
async fn test_live_scalar_expression() {
    let Some(client) = live_client().await else {
        return;
    };

    let result = client.run_query("admin", "1 + 1").await.unwrap();
    assert_eq!(result, ResultValue::Scalar(2i64.into()));
}

#[tokio::test]
async fn test_live_cursor_is_materialized() {
    let Some(client) = live_client().await else {
        return;
    };

    let result = client
        .run_query("mql_eval_probe", "db.nothing_here.find({})")
        .await
        .unwrap();
    assert_eq!(result, ResultValue::DocumentList(vec![]));
}

#[tokio::test]
async fn test_live_runtime_error_is_execution_failure() {
    let Some(client) = live_client().await else {
        return;
    };

    let executor = QueryExecutor::new(&client);
    let result = executor
        .execute(
            "mql_eval_probe",
            Some("db.nothing_here.aggregate([{$notAStage: 1}])"),
        )
        .await;

    assert!(
        matches!(result, ExecutionResult::ExecutionFailed(_)),
        "unexpected result: {result}"
    );
}
