//! Uniform success/error envelope shared by every gateway endpoint.
//!
//! Components convert their own failures into [`GatewayError`] at their boundary; the
//! [`ResponseFormatter`] is the only place that turns outcomes into HTTP responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";
pub const KESTRA_ERROR: &str = "KESTRA_ERROR";
pub const EXECUTION_NOT_FOUND: &str = "EXECUTION_NOT_FOUND";
pub const DATA_NOT_FOUND: &str = "DATA_NOT_FOUND";
pub const SERVER_ERROR: &str = "SERVER_ERROR";

/// Failure taxonomy every component boundary maps into.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GatewayError {
    #[error("{0}")]
    Validation(String),
    #[error("Failed to start application process")]
    Upstream { status: u16, message: String },
    #[error("Execution not found")]
    ExecutionNotFound { execution_id: String },
    #[error("Jobs data not found. Please run the scraper first.")]
    DataNotFound,
    #[error("{message}")]
    Server { message: String, detail: String },
}

impl GatewayError {
    pub fn server(message: impl Into<String>, detail: impl ToString) -> Self {
        Self::Server {
            message: message.into(),
            detail: detail.to_string(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            GatewayError::Validation(_) => StatusCode::BAD_REQUEST,
            GatewayError::Upstream { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            GatewayError::ExecutionNotFound { .. } | GatewayError::DataNotFound => {
                StatusCode::NOT_FOUND
            }
            GatewayError::Server { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            GatewayError::Validation(_) => VALIDATION_ERROR,
            GatewayError::Upstream { .. } => KESTRA_ERROR,
            GatewayError::ExecutionNotFound { .. } => EXECUTION_NOT_FOUND,
            GatewayError::DataNotFound => DATA_NOT_FOUND,
            GatewayError::Server { .. } => SERVER_ERROR,
        }
    }
}

/// Successful envelope. `meta` and `filters` only appear on listing responses.
#[derive(Debug, Serialize)]
pub struct SuccessEnvelope<T, M = (), F = ()> {
    pub success: bool,
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<M>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filters: Option<F>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
}

#[derive(Debug, Serialize)]
pub struct ErrorEnvelope {
    pub success: bool,
    pub error: String,
    pub error_code: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Renders outcomes into envelopes. Internal failure text is only exposed when
/// `expose_details` is set (non-production deployments).
#[derive(Debug, Clone, Copy)]
pub struct ResponseFormatter {
    expose_details: bool,
}

impl ResponseFormatter {
    pub fn new(expose_details: bool) -> Self {
        Self { expose_details }
    }

    pub fn success<T: Serialize>(&self, data: T, message: Option<&'static str>) -> Response {
        let body: SuccessEnvelope<T> = SuccessEnvelope {
            success: true,
            data,
            meta: None,
            filters: None,
            message,
        };
        (StatusCode::OK, Json(body)).into_response()
    }

    pub fn page<T, M, F>(&self, data: T, meta: M, filters: F) -> Response
    where
        T: Serialize,
        M: Serialize,
        F: Serialize,
    {
        let body = SuccessEnvelope {
            success: true,
            data,
            meta: Some(meta),
            filters: Some(filters),
            message: None,
        };
        (StatusCode::OK, Json(body)).into_response()
    }

    pub fn error_envelope(&self, error: &GatewayError) -> ErrorEnvelope {
        let details = match error {
            // Engine-supplied text, not internals.
            GatewayError::Upstream { message, .. } => Some(message.clone()),
            GatewayError::Server { detail, .. } if self.expose_details => Some(detail.clone()),
            _ => None,
        };

        ErrorEnvelope {
            success: false,
            error: error.to_string(),
            error_code: error.error_code(),
            details,
        }
    }

    pub fn failure(&self, error: &GatewayError) -> Response {
        match error {
            GatewayError::Server { detail, .. } => {
                tracing::error!(code = error.error_code(), %detail, "request failed");
            }
            _ => {
                tracing::warn!(code = error.error_code(), error = %error, "request rejected");
            }
        }

        (error.status(), Json(self.error_envelope(error))).into_response()
    }

    pub fn respond<T: Serialize>(
        &self,
        outcome: Result<T, GatewayError>,
        message: Option<&'static str>,
    ) -> Response {
        match outcome {
            Ok(data) => self.success(data, message),
            Err(error) => self.failure(&error),
        }
    }
}

impl Default for ResponseFormatter {
    fn default() -> Self {
        Self::new(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    async fn body_json(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), 64 * 1024)
            .await
            .expect("body readable");
        serde_json::from_slice(&bytes).expect("body is json")
    }

    #[test]
    fn maps_each_kind_to_a_fixed_status_and_code() {
        let cases = [
            (
                GatewayError::Validation("bad".into()),
                StatusCode::BAD_REQUEST,
                VALIDATION_ERROR,
            ),
            (
                GatewayError::Upstream {
                    status: 422,
                    message: "flow disabled".into(),
                },
                StatusCode::UNPROCESSABLE_ENTITY,
                KESTRA_ERROR,
            ),
            (
                GatewayError::ExecutionNotFound {
                    execution_id: "abc".into(),
                },
                StatusCode::NOT_FOUND,
                EXECUTION_NOT_FOUND,
            ),
            (GatewayError::DataNotFound, StatusCode::NOT_FOUND, DATA_NOT_FOUND),
            (
                GatewayError::server("Failed to retrieve jobs data", "disk on fire"),
                StatusCode::INTERNAL_SERVER_ERROR,
                SERVER_ERROR,
            ),
        ];

        for (error, status, code) in cases {
            assert_eq!(error.status(), status, "{error:?}");
            assert_eq!(error.error_code(), code, "{error:?}");
        }
    }

    #[test]
    fn unusable_upstream_status_becomes_bad_gateway() {
        let error = GatewayError::Upstream {
            status: 42,
            message: "odd".into(),
        };
        assert_eq!(error.status(), StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn server_details_are_hidden_in_production() {
        let error = GatewayError::server("Failed to process application request", "socket closed");

        let production = ResponseFormatter::new(false).failure(&error);
        assert_eq!(production.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(production).await;
        assert_eq!(
            body,
            json!({
                "success": false,
                "error": "Failed to process application request",
                "error_code": "SERVER_ERROR",
            })
        );

        let development = body_json(ResponseFormatter::new(true).failure(&error)).await;
        assert_eq!(development["details"], "socket closed");
    }

    #[tokio::test]
    async fn upstream_message_is_always_reported() {
        let error = GatewayError::Upstream {
            status: 401,
            message: "Invalid token".into(),
        };
        let response = ResponseFormatter::new(false).failure(&error);
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = body_json(response).await;
        assert_eq!(body["error_code"], "KESTRA_ERROR");
        assert_eq!(body["details"], "Invalid token");
    }

    #[tokio::test]
    async fn success_envelope_omits_absent_sections() {
        let response =
            ResponseFormatter::default().success(json!({ "execution_id": "e1" }), Some("done"));
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(
            body,
            json!({
                "success": true,
                "data": { "execution_id": "e1" },
                "message": "done",
            })
        );
    }
}
