use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::response::Response;
use serde_json::{json, Value};

use crate::envelope::ResponseFormatter;
use crate::workflows::apply::domain::{EngineExecution, RawApplicationRequest};
use crate::workflows::apply::engine::{
    EngineError, ExecutionLinks, StartExecution, WorkflowEngine,
};
use crate::workflows::apply::{
    ApplyState, FlowTarget, RequestValidator, RetryPolicy, WorkflowStatusProxy,
    WorkflowTriggerProxy,
};

pub(super) const BASE_URL: &str = "https://kestra.test";

/// Scripted engine: pops one queued outcome per call and records every request.
#[derive(Default)]
pub(super) struct ScriptedEngine {
    starts: Mutex<VecDeque<Result<EngineExecution, EngineError>>>,
    lookups: Mutex<VecDeque<Result<EngineExecution, EngineError>>>,
    pub(super) started: Mutex<Vec<StartExecution>>,
    pub(super) looked_up: Mutex<Vec<String>>,
}

impl ScriptedEngine {
    pub(super) fn with_starts(
        outcomes: impl IntoIterator<Item = Result<EngineExecution, EngineError>>,
    ) -> Self {
        let engine = Self::default();
        engine.starts.lock().expect("starts mutex").extend(outcomes);
        engine
    }

    pub(super) fn with_lookups(
        outcomes: impl IntoIterator<Item = Result<EngineExecution, EngineError>>,
    ) -> Self {
        let engine = Self::default();
        engine.lookups.lock().expect("lookups mutex").extend(outcomes);
        engine
    }

    pub(super) fn started(&self) -> Vec<StartExecution> {
        self.started.lock().expect("started mutex").clone()
    }

    pub(super) fn lookup_count(&self) -> usize {
        self.looked_up.lock().expect("lookup mutex").len()
    }
}

#[async_trait]
impl WorkflowEngine for ScriptedEngine {
    async fn start_execution(
        &self,
        request: &StartExecution,
    ) -> Result<EngineExecution, EngineError> {
        self.started
            .lock()
            .expect("started mutex")
            .push(request.clone());
        self.starts
            .lock()
            .expect("starts mutex")
            .pop_front()
            .unwrap_or_else(|| Ok(execution("exec-default", "CREATED")))
    }

    async fn execution(&self, execution_id: &str) -> Result<EngineExecution, EngineError> {
        self.looked_up
            .lock()
            .expect("lookup mutex")
            .push(execution_id.to_string());
        self.lookups
            .lock()
            .expect("lookups mutex")
            .pop_front()
            .unwrap_or(Err(EngineError::Rejected {
                status: 404,
                message: None,
            }))
    }
}

pub(super) fn execution(id: &str, state: &str) -> EngineExecution {
    EngineExecution {
        id: id.to_string(),
        state: state.to_string(),
        flow_id: "job_application_pipeline".to_string(),
        namespace: "ai_job_hunter".to_string(),
        start_date: Some("2025-10-01T10:00:00Z".to_string()),
        end_date: None,
        duration: None,
    }
}

pub(super) fn finished_execution(id: &str) -> EngineExecution {
    EngineExecution {
        end_date: Some("2025-10-01T10:04:30Z".to_string()),
        duration: Some(json!("PT4M30S")),
        ..execution(id, "SUCCESS")
    }
}

pub(super) fn application_body() -> Value {
    json!({
        "job_id": "remoteok-1042",
        "candidate": {
            "name": "Ada Lovelace",
            "email": "ada@example.com",
            "resume": "https://files.example.com/ada.pdf",
            "profile": { "years_experience": 1 }
        }
    })
}

pub(super) fn raw_application(body: Value) -> RawApplicationRequest {
    serde_json::from_value(body).expect("application body parses")
}

pub(super) fn links() -> ExecutionLinks {
    ExecutionLinks::new(BASE_URL).expect("base url parses")
}

pub(super) fn trigger_proxy(engine: Arc<ScriptedEngine>) -> WorkflowTriggerProxy<ScriptedEngine> {
    WorkflowTriggerProxy::new(
        engine,
        FlowTarget {
            namespace: "ai_job_hunter".to_string(),
            flow_id: "job_application_pipeline".to_string(),
        },
        links(),
    )
}

pub(super) fn status_proxy(
    engine: Arc<ScriptedEngine>,
    retries: u32,
) -> WorkflowStatusProxy<ScriptedEngine> {
    WorkflowStatusProxy::new(
        engine,
        links(),
        RetryPolicy {
            retries,
            backoff: Duration::from_millis(1),
        },
    )
}

pub(super) fn apply_state(engine: Arc<ScriptedEngine>) -> ApplyState<ScriptedEngine> {
    ApplyState {
        validator: RequestValidator,
        trigger: Arc::new(trigger_proxy(engine.clone())),
        status: Arc::new(status_proxy(engine, 0)),
        formatter: ResponseFormatter::new(true),
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("body readable");
    serde_json::from_slice(&body).expect("body is json")
}
