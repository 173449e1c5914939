use super::common::*;
use std::sync::Arc;

use serde_json::json;

use crate::envelope::GatewayError;
use crate::workflows::apply::EngineError;

#[tokio::test]
async fn status_maps_engine_fields_and_logs_url() {
    let engine = Arc::new(ScriptedEngine::with_lookups([Ok(finished_execution("6FqkZ"))]));
    let proxy = status_proxy(engine, 0);

    let view = proxy.status("6FqkZ").await.expect("status found");

    assert_eq!(view.execution_id, "6FqkZ");
    assert_eq!(view.status, "SUCCESS");
    assert_eq!(view.started_at.as_deref(), Some("2025-10-01T10:00:00Z"));
    assert_eq!(view.ended_at.as_deref(), Some("2025-10-01T10:04:30Z"));
    assert_eq!(view.duration, Some(json!("PT4M30S")));
    assert_eq!(
        view.logs_url,
        "https://kestra.test/ui/executions/ai_job_hunter/job_application_pipeline/6FqkZ/logs"
    );
}

#[tokio::test]
async fn engine_rejection_is_not_found() {
    let engine = Arc::new(ScriptedEngine::with_lookups([Err(EngineError::Rejected {
        status: 404,
        message: Some("Execution 'nope' not found".into()),
    })]));
    let proxy = status_proxy(engine.clone(), 3);

    let err = proxy.status("nope").await.expect_err("missing");
    assert_eq!(
        err,
        GatewayError::ExecutionNotFound {
            execution_id: "nope".into()
        }
    );
    assert_eq!(engine.lookup_count(), 1, "rejections are not retried");
}

#[tokio::test]
async fn transient_failures_are_retried_until_success() {
    let engine = Arc::new(ScriptedEngine::with_lookups([
        Err(EngineError::Transport("connection reset".into())),
        Err(EngineError::Timeout),
        Ok(execution("6FqkZ", "RUNNING")),
    ]));
    let proxy = status_proxy(engine.clone(), 2);

    let view = proxy.status("6FqkZ").await.expect("third attempt succeeds");
    assert_eq!(view.status, "RUNNING");
    assert_eq!(engine.lookup_count(), 3);
}

#[tokio::test]
async fn exhausted_retries_surface_as_server_error() {
    let engine = Arc::new(ScriptedEngine::with_lookups([
        Err(EngineError::Timeout),
        Err(EngineError::Timeout),
    ]));
    let proxy = status_proxy(engine.clone(), 1);

    let err = proxy.status("6FqkZ").await.expect_err("still timing out");
    assert_eq!(err.error_code(), "SERVER_ERROR");
    assert_eq!(err.to_string(), "Failed to check execution status");
    assert_eq!(engine.lookup_count(), 2);
}

#[tokio::test]
async fn decode_failures_are_not_retried() {
    let engine = Arc::new(ScriptedEngine::with_lookups([
        Err(EngineError::Decode("expected value".into())),
        Ok(execution("6FqkZ", "RUNNING")),
    ]));
    let proxy = status_proxy(engine.clone(), 2);

    let err = proxy.status("6FqkZ").await.expect_err("decode fails");
    assert!(matches!(err, GatewayError::Server { .. }));
    assert_eq!(engine.lookup_count(), 1);
}
