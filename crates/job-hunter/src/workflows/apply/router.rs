use std::sync::Arc;

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::response::Response;
use axum::routing::post;
use axum::{Json, Router};

use super::domain::RawApplicationRequest;
use super::engine::WorkflowEngine;
use super::status::WorkflowStatusProxy;
use super::trigger::WorkflowTriggerProxy;
use super::validation::{RequestValidator, ValidationError};
use crate::envelope::{GatewayError, ResponseFormatter};

const STARTED_MESSAGE: &str = "Job application process started successfully";

/// Shared handler state for the apply endpoints.
pub struct ApplyState<E> {
    pub validator: RequestValidator,
    pub trigger: Arc<WorkflowTriggerProxy<E>>,
    pub status: Arc<WorkflowStatusProxy<E>>,
    pub formatter: ResponseFormatter,
}

impl<E> Clone for ApplyState<E> {
    fn clone(&self) -> Self {
        Self {
            validator: self.validator,
            trigger: self.trigger.clone(),
            status: self.status.clone(),
            formatter: self.formatter,
        }
    }
}

/// `POST /apply` starts an execution, `GET /apply?execution_id=` polls one.
pub fn apply_router<E>(state: ApplyState<E>) -> Router
where
    E: WorkflowEngine + 'static,
{
    Router::new()
        .route("/apply", post(trigger_handler::<E>).get(status_handler::<E>))
        .with_state(state)
}

pub(crate) async fn trigger_handler<E>(
    State(state): State<ApplyState<E>>,
    payload: Result<Json<RawApplicationRequest>, JsonRejection>,
) -> Response
where
    E: WorkflowEngine + 'static,
{
    let outcome: Result<_, GatewayError> = async {
        let Json(raw) =
            payload.map_err(|rejection| ValidationError::MalformedBody(rejection.body_text()))?;
        let request = state.validator.validate(raw)?;
        state.trigger.trigger(request).await
    }
    .await;

    state.formatter.respond(outcome, Some(STARTED_MESSAGE))
}

pub(crate) async fn status_handler<E>(
    State(state): State<ApplyState<E>>,
    pairs: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Response
where
    E: WorkflowEngine + 'static,
{
    let outcome: Result<_, GatewayError> = async {
        let Query(pairs) =
            pairs.map_err(|rejection| ValidationError::MalformedQuery(rejection.body_text()))?;
        let raw = pairs
            .iter()
            .find(|(key, _)| key == "execution_id")
            .map(|(_, value)| value.as_str());
        let execution_id = state.validator.execution_id(raw)?;
        state.status.status(execution_id).await
    }
    .await;

    state.formatter.respond(outcome, None)
}
