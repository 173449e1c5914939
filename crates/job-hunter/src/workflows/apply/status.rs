use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use super::domain::{EngineExecution, ExecutionStatusView};
use super::engine::{EngineError, ExecutionLinks, WorkflowEngine};
use crate::envelope::GatewayError;

const STATUS_FAILED: &str = "Failed to check execution status";

/// Bounded retry for idempotent status lookups.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub retries: u32,
    pub backoff: Duration,
}

impl RetryPolicy {
    fn delay(&self, attempt: u32) -> Duration {
        self.backoff.saturating_mul(2u32.saturating_pow(attempt))
    }
}

pub struct WorkflowStatusProxy<E> {
    engine: Arc<E>,
    links: ExecutionLinks,
    retry: RetryPolicy,
}

impl<E> WorkflowStatusProxy<E>
where
    E: WorkflowEngine + 'static,
{
    pub fn new(engine: Arc<E>, links: ExecutionLinks, retry: RetryPolicy) -> Self {
        Self {
            engine,
            links,
            retry,
        }
    }

    pub async fn status(&self, execution_id: &str) -> Result<ExecutionStatusView, GatewayError> {
        let execution = self.lookup(execution_id).await.map_err(|err| match err {
            EngineError::Rejected { status, .. } => {
                debug!(%execution_id, status, "engine has no such execution");
                GatewayError::ExecutionNotFound {
                    execution_id: execution_id.to_string(),
                }
            }
            other => GatewayError::server(STATUS_FAILED, other),
        })?;

        Ok(self.view(execution))
    }

    async fn lookup(&self, execution_id: &str) -> Result<EngineExecution, EngineError> {
        let mut attempt = 0;
        loop {
            match self.engine.execution(execution_id).await {
                Err(err) if err.is_transient() && attempt < self.retry.retries => {
                    let delay = self.retry.delay(attempt);
                    warn!(%execution_id, attempt, ?delay, error = %err, "retrying status lookup");
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                outcome => return outcome,
            }
        }
    }

    fn view(&self, execution: EngineExecution) -> ExecutionStatusView {
        ExecutionStatusView {
            logs_url: self
                .links
                .logs_url(&execution.namespace, &execution.flow_id, &execution.id),
            execution_id: execution.id,
            status: execution.state,
            started_at: execution.start_date,
            ended_at: execution.end_date,
            duration: execution.duration,
        }
    }
}
