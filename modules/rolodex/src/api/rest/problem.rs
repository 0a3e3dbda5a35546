use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::domain::error::DomainError;

/// Content type for Problem Details as per RFC 9457.
pub const APPLICATION_PROBLEM_JSON: &str = "application/problem+json";

/// RFC 9457 Problem Details for HTTP APIs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Problem {
    /// A URI reference that identifies the problem type.
    #[serde(rename = "type")]
    pub type_url: String,
    /// A short, human-readable summary of the problem type.
    pub title: String,
    /// The HTTP status code for this occurrence of the problem.
    pub status: u16,
    /// A human-readable explanation specific to this occurrence.
    pub detail: String,
    /// Optional machine-readable error code defined by the application.
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub code: String,
}

impl Problem {
    pub fn new(status: StatusCode, title: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            type_url: "about:blank".to_string(),
            title: title.into(),
            status: status.as_u16(),
            detail: detail.into(),
            code: String::new(),
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = code.into();
        self
    }
}

/// Axum response wrapper that renders `Problem` with correct status and
/// content type.
#[derive(Debug, Clone)]
pub struct ProblemResponse(pub Problem);

impl From<Problem> for ProblemResponse {
    fn from(p: Problem) -> Self {
        Self(p)
    }
}

impl IntoResponse for ProblemResponse {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.0.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let mut resp = axum::Json(self.0).into_response();
        *resp.status_mut() = status;
        resp.headers_mut().insert(
            axum::http::header::CONTENT_TYPE,
            HeaderValue::from_static(APPLICATION_PROBLEM_JSON),
        );
        resp
    }
}

/// Handlers return `Result<_, DomainError>`; this mapping is the single
/// place HTTP status codes are assigned. Storage failure details stay in
/// the log, not the response body.
impl IntoResponse for DomainError {
    fn into_response(self) -> Response {
        let problem = match &self {
            DomainError::Unauthorized => {
                Problem::new(
                    StatusCode::UNAUTHORIZED,
                    "Unauthorized",
                    "Authentication required",
                )
                .with_code("unauthorized")
            }
            DomainError::Forbidden { message } => {
                Problem::new(StatusCode::FORBIDDEN, "Forbidden", message).with_code("forbidden")
            }
            DomainError::NotFound { entity } => Problem::new(
                StatusCode::NOT_FOUND,
                "Not Found",
                format!("{entity} not found"),
            )
            .with_code("not_found"),
            DomainError::Conflict { message } => {
                Problem::new(StatusCode::CONFLICT, "Conflict", message).with_code("conflict")
            }
            DomainError::Validation { field, message } => Problem::new(
                StatusCode::UNPROCESSABLE_ENTITY,
                "Validation Failed",
                format!("{field}: {message}"),
            )
            .with_code("validation_failed"),
            DomainError::Unavailable { message } => {
                error!(%message, "storage unavailable");
                Problem::new(
                    StatusCode::SERVICE_UNAVAILABLE,
                    "Service Unavailable",
                    "The service is temporarily unavailable",
                )
                .with_code("unavailable")
            }
            DomainError::Database { message } => {
                error!(%message, "internal error");
                Problem::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error",
                    "An internal error occurred",
                )
                .with_code("internal")
            }
        };
        ProblemResponse(problem).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping() {
        let cases = [
            (DomainError::Unauthorized, StatusCode::UNAUTHORIZED),
            (DomainError::forbidden("x"), StatusCode::FORBIDDEN),
            (DomainError::not_found("tag"), StatusCode::NOT_FOUND),
            (DomainError::conflict("x"), StatusCode::CONFLICT),
            (
                DomainError::validation("name", "blank"),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (DomainError::database("boom"), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }

    #[test]
    fn internal_detail_is_not_leaked() {
        let resp = DomainError::database("secret dsn").into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
