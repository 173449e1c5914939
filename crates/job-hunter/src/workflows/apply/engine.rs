use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::Url;
use serde::Serialize;
use serde_json::Value;

use super::domain::{Candidate, EngineExecution};
use crate::config::KestraConfig;

/// Body of a start-execution call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StartExecution {
    pub namespace: String,
    pub flow_id: String,
    pub inputs: ExecutionInputs,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExecutionInputs {
    pub job_id: String,
    pub candidate: Candidate,
    pub timestamp: String,
}

/// Transport-level outcome of an engine call.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("engine responded with status {status}")]
    Rejected { status: u16, message: Option<String> },
    #[error("engine request timed out")]
    Timeout,
    #[error("engine unreachable: {0}")]
    Transport(String),
    #[error("engine response could not be decoded: {0}")]
    Decode(String),
    #[error("engine client misconfigured: {0}")]
    Config(String),
}

impl EngineError {
    /// Failures worth repeating for idempotent lookups.
    pub fn is_transient(&self) -> bool {
        matches!(self, EngineError::Timeout | EngineError::Transport(_))
    }
}

/// Seam over the workflow engine API so the proxies can run against fakes.
#[async_trait]
pub trait WorkflowEngine: Send + Sync {
    async fn start_execution(&self, request: &StartExecution)
        -> Result<EngineExecution, EngineError>;
    async fn execution(&self, execution_id: &str) -> Result<EngineExecution, EngineError>;
}

/// URL templates pointing back at the engine for a given execution. Identifiers are
/// always written as single percent-encoded path segments.
#[derive(Debug, Clone)]
pub struct ExecutionLinks {
    base: Url,
}

impl ExecutionLinks {
    pub fn new(base_url: &str) -> Result<Self, EngineError> {
        let base = Url::parse(base_url)
            .map_err(|err| EngineError::Config(format!("invalid engine url {base_url}: {err}")))?;
        if base.cannot_be_a_base() {
            return Err(EngineError::Config(format!(
                "engine url {base_url} cannot carry a path"
            )));
        }
        Ok(Self { base })
    }

    fn join<'a>(&self, segments: impl IntoIterator<Item = &'a str>) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    pub fn executions_url(&self) -> Url {
        self.join(["api", "v1", "executions"])
    }

    /// Lookup address for one execution. `.` and `..` would be dropped by the URL
    /// writer and address the collection instead, so they are refused.
    pub fn execution_url(&self, execution_id: &str) -> Result<Url, EngineError> {
        if matches!(execution_id, "." | "..") {
            return Err(EngineError::Config(format!(
                "execution id {execution_id:?} is not a path segment"
            )));
        }
        Ok(self.join(["api", "v1", "executions", execution_id]))
    }

    pub fn polling_url(&self, execution_id: &str) -> String {
        self.join(["api", "v1", "executions", execution_id]).into()
    }

    pub fn web_url(&self, namespace: &str, flow_id: &str, execution_id: &str) -> String {
        self.join(["ui", "executions", namespace, flow_id, execution_id])
            .into()
    }

    pub fn logs_url(&self, namespace: &str, flow_id: &str, execution_id: &str) -> String {
        self.join(["ui", "executions", namespace, flow_id, execution_id, "logs"])
            .into()
    }
}

/// Kestra REST client authenticated with a bearer token.
#[derive(Debug, Clone)]
pub struct KestraClient {
    client: reqwest::Client,
    links: ExecutionLinks,
}

impl KestraClient {
    pub fn new(config: &KestraConfig) -> Result<Self, EngineError> {
        let mut headers = HeaderMap::new();
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", config.api_token))
            .map_err(|err| EngineError::Config(err.to_string()))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.request_timeout)
            .build()
            .map_err(|err| EngineError::Config(err.to_string()))?;

        Ok(Self {
            client,
            links: ExecutionLinks::new(&config.base_url)?,
        })
    }

    fn map_send_error(err: reqwest::Error) -> EngineError {
        if err.is_timeout() {
            EngineError::Timeout
        } else {
            EngineError::Transport(err.to_string())
        }
    }

    async fn decode(response: reqwest::Response) -> Result<EngineExecution, EngineError> {
        let status = response.status();
        let text = response.text().await.map_err(Self::map_send_error)?;

        if !status.is_success() {
            return Err(EngineError::Rejected {
                status: status.as_u16(),
                message: rejection_message(&text),
            });
        }

        serde_json::from_str(&text).map_err(|err| EngineError::Decode(err.to_string()))
    }
}

#[async_trait]
impl WorkflowEngine for KestraClient {
    async fn start_execution(
        &self,
        request: &StartExecution,
    ) -> Result<EngineExecution, EngineError> {
        let response = self
            .client
            .post(self.links.executions_url())
            .json(request)
            .send()
            .await
            .map_err(Self::map_send_error)?;
        Self::decode(response).await
    }

    async fn execution(&self, execution_id: &str) -> Result<EngineExecution, EngineError> {
        let url = self.links.execution_url(execution_id)?;
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(Self::map_send_error)?;
        Self::decode(response).await
    }
}

fn rejection_message(body: &str) -> Option<String> {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|value| value.get("message").and_then(Value::as_str).map(str::to_string))
        .filter(|message| !message.is_empty())
}
