use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Application payload as received, before any rule has been checked.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawApplicationRequest {
    #[serde(default, deserialize_with = "deserialize_identifier")]
    pub job_id: Option<String>,
    #[serde(default)]
    pub candidate: Option<RawCandidate>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawCandidate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub resume: Option<String>,
    #[serde(default)]
    pub profile: Value,
    #[serde(default, deserialize_with = "deserialize_identifier")]
    pub id: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Candidate accepted for a trigger; name, email and resume are non-empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Candidate {
    pub name: String,
    pub email: String,
    pub resume: String,
    pub profile: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApplicationRequest {
    pub job_id: String,
    pub candidate: Candidate,
}

/// Execution as reported by the workflow engine.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineExecution {
    pub id: String,
    #[serde(deserialize_with = "deserialize_state")]
    pub state: String,
    pub flow_id: String,
    pub namespace: String,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub duration: Option<Value>,
}

/// Response body for a started execution.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TriggerReceipt {
    pub execution_id: String,
    pub status: String,
    pub workflow_id: String,
    pub namespace: String,
    pub started_at: Option<String>,
    pub polling_url: String,
    pub web_url: String,
}

/// Response body for a status lookup.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExecutionStatusView {
    pub execution_id: String,
    pub status: String,
    pub started_at: Option<String>,
    pub ended_at: Option<String>,
    pub duration: Option<Value>,
    pub logs_url: String,
}

/// Identifiers arrive as strings or bare numbers; both are kept as text.
fn deserialize_identifier<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(raw)) => Some(raw),
        Some(Value::Number(number)) => Some(number.to_string()),
        _ => None,
    })
}

// Kestra reports `state` as `{ "current": "RUNNING", "histories": [...] }`; older builds and
// fixtures send the bare string.
fn deserialize_state<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(state) => Ok(state),
        Value::Object(map) => match map.get("current") {
            Some(Value::String(state)) => Ok(state.clone()),
            _ => Err(serde::de::Error::custom("execution state has no current value")),
        },
        other => Err(serde::de::Error::custom(format!(
            "unexpected execution state: {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn state_object_collapses_to_current() {
        let execution: EngineExecution = serde_json::from_value(json!({
            "id": "4Nk1",
            "state": { "current": "RUNNING", "histories": [] },
            "flowId": "job_application_pipeline",
            "namespace": "ai_job_hunter",
            "startDate": "2025-10-01T10:00:00Z"
        }))
        .expect("execution parses");

        assert_eq!(execution.state, "RUNNING");
        assert!(execution.end_date.is_none());
    }

    #[test]
    fn numeric_job_ids_are_accepted() {
        let raw: RawApplicationRequest =
            serde_json::from_value(json!({ "job_id": 9812, "candidate": {} }))
                .expect("request parses");
        assert_eq!(raw.job_id.as_deref(), Some("9812"));
    }

    #[test]
    fn unknown_candidate_fields_are_kept() {
        let raw: RawCandidate = serde_json::from_value(json!({
            "name": "Ada",
            "linkedin": "https://linkedin.com/in/ada"
        }))
        .expect("candidate parses");
        assert_eq!(raw.extra["linkedin"], "https://linkedin.com/in/ada");
        assert!(raw.profile.is_null());
    }
}
