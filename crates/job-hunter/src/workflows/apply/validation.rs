use super::domain::{ApplicationRequest, Candidate, RawApplicationRequest};
use crate::envelope::GatewayError;

/// Rule that rejected an incoming request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Missing required fields: job_id and candidate are required")]
    MissingJobOrCandidate,
    #[error("Candidate must include name, email, and resume")]
    IncompleteCandidate { missing: Vec<&'static str> },
    #[error("execution_id parameter is required")]
    MissingExecutionId,
    #[error("execution_id is not a valid execution identifier")]
    InvalidExecutionId,
    #[error("Request body must be a JSON object: {0}")]
    MalformedBody(String),
    #[error("Invalid query string: {0}")]
    MalformedQuery(String),
}

impl From<ValidationError> for GatewayError {
    fn from(value: ValidationError) -> Self {
        GatewayError::Validation(value.to_string())
    }
}

/// Presence checks performed before any outbound call.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestValidator;

impl RequestValidator {
    pub fn validate(
        &self,
        raw: RawApplicationRequest,
    ) -> Result<ApplicationRequest, ValidationError> {
        let (job_id, candidate) = match (non_blank(raw.job_id), raw.candidate) {
            (Some(job_id), Some(candidate)) => (job_id, candidate),
            _ => return Err(ValidationError::MissingJobOrCandidate),
        };

        let name = non_blank(candidate.name);
        let email = non_blank(candidate.email);
        let resume = non_blank(candidate.resume);

        let missing: Vec<&'static str> = [
            ("name", name.is_none()),
            ("email", email.is_none()),
            ("resume", resume.is_none()),
        ]
        .into_iter()
        .filter_map(|(field, absent)| absent.then_some(field))
        .collect();

        match (name, email, resume) {
            (Some(name), Some(email), Some(resume)) => Ok(ApplicationRequest {
                job_id,
                candidate: Candidate {
                    name,
                    email,
                    resume,
                    profile: candidate.profile,
                    id: non_blank(candidate.id),
                    extra: candidate.extra,
                },
            }),
            _ => Err(ValidationError::IncompleteCandidate { missing }),
        }
    }

    pub fn execution_id<'a>(&self, raw: Option<&'a str>) -> Result<&'a str, ValidationError> {
        let id = raw
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .ok_or(ValidationError::MissingExecutionId)?;
        // Dot segments cannot be written as a single path segment.
        if matches!(id, "." | "..") {
            return Err(ValidationError::InvalidExecutionId);
        }
        Ok(id)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|inner| !inner.trim().is_empty())
}
