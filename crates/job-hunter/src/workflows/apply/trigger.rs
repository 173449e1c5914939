use std::sync::Arc;

use chrono::{SecondsFormat, Utc};
use tracing::{info, warn};

use super::domain::{ApplicationRequest, TriggerReceipt};
use super::engine::{EngineError, ExecutionInputs, ExecutionLinks, StartExecution, WorkflowEngine};
use crate::envelope::GatewayError;

const UNKNOWN_ERROR: &str = "Unknown error";
const TRIGGER_FAILED: &str = "Failed to process application request";

/// Flow coordinates every trigger targets.
#[derive(Debug, Clone)]
pub struct FlowTarget {
    pub namespace: String,
    pub flow_id: String,
}

/// Starts one workflow execution per validated application. Never retried: the engine has
/// no deduplication key, so a repeat would start a second run.
pub struct WorkflowTriggerProxy<E> {
    engine: Arc<E>,
    target: FlowTarget,
    links: ExecutionLinks,
}

impl<E> WorkflowTriggerProxy<E>
where
    E: WorkflowEngine + 'static,
{
    pub fn new(engine: Arc<E>, target: FlowTarget, links: ExecutionLinks) -> Self {
        Self {
            engine,
            target,
            links,
        }
    }

    pub async fn trigger(
        &self,
        request: ApplicationRequest,
    ) -> Result<TriggerReceipt, GatewayError> {
        let start = self.build_start(request);
        let job_id = start.inputs.job_id.clone();

        let execution = self
            .engine
            .start_execution(&start)
            .await
            .map_err(|err| match err {
                EngineError::Rejected { status, message } => {
                    warn!(%job_id, status, "engine refused execution start");
                    GatewayError::Upstream {
                        status,
                        message: message.unwrap_or_else(|| UNKNOWN_ERROR.to_string()),
                    }
                }
                other => GatewayError::server(TRIGGER_FAILED, other),
            })?;

        info!(
            %job_id,
            execution_id = %execution.id,
            status = %execution.state,
            "application workflow started"
        );

        Ok(TriggerReceipt {
            polling_url: self.links.polling_url(&execution.id),
            web_url: self
                .links
                .web_url(&execution.namespace, &execution.flow_id, &execution.id),
            execution_id: execution.id,
            status: execution.state,
            workflow_id: execution.flow_id,
            namespace: execution.namespace,
            started_at: execution.start_date,
        })
    }

    pub(crate) fn build_start(&self, request: ApplicationRequest) -> StartExecution {
        let ApplicationRequest {
            job_id,
            mut candidate,
        } = request;

        if candidate.id.is_none() {
            candidate.id = Some(generate_candidate_id());
        }

        StartExecution {
            namespace: self.target.namespace.clone(),
            flow_id: self.target.flow_id.clone(),
            inputs: ExecutionInputs {
                job_id,
                candidate,
                timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            },
        }
    }
}

/// Millisecond clock plus a random suffix so concurrent calls cannot collide.
fn generate_candidate_id() -> String {
    let suffix = uuid::Uuid::new_v4().simple().to_string();
    format!("candidate_{}_{}", Utc::now().timestamp_millis(), &suffix[..8])
}
