//! Error handling module
//!
//! Centralized error types and HTTP response conversion.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::domain::DomainError;

/// Application-wide Result type
pub type AppResult<T> = Result<T, AppError>;

/// Application error types
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // Client errors (4xx)
    #[error("Malformed request body: {0}")]
    MalformedInput(String),

    // Domain errors
    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::MalformedInput(rejection.body_text())
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub error_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_code, details) = match &self {
            // 400 Bad Request
            AppError::MalformedInput(msg) => {
                (StatusCode::BAD_REQUEST, "malformed_input", Some(msg.clone()))
            }

            // Domain errors - map to appropriate HTTP status
            AppError::Domain(domain_err) => match domain_err {
                DomainError::LoanNotFound(id) => {
                    (StatusCode::NOT_FOUND, "loan_not_found", Some(id.to_string()))
                }
                DomainError::InvalidState { actual, .. } => {
                    (StatusCode::BAD_REQUEST, "invalid_state", Some(actual.to_string()))
                }
                DomainError::OverAllocation { principal, invested, .. } => (
                    StatusCode::BAD_REQUEST,
                    "over_allocation",
                    Some(format!("remaining {}", *principal - *invested)),
                ),
                DomainError::InvalidInput(msg) => {
                    (StatusCode::BAD_REQUEST, "invalid_input", Some(msg.clone()))
                }
                DomainError::DuplicateLoan(id) => {
                    tracing::error!(loan_id = %id, "Generated loan ID collided");
                    (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", None)
                }
            },
        };

        let body = ErrorResponse {
            error: self.to_string(),
            error_code: error_code.to_string(),
            details,
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{LoanId, LoanState};
    use rust_decimal_macros::dec;

    fn status_of(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_domain_error_status_codes() {
        let id = LoanId::from("loan-1");

        assert_eq!(
            status_of(DomainError::LoanNotFound(id.clone()).into()),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(DomainError::invalid_state(&id, LoanState::Proposed, LoanState::Approved).into()),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(DomainError::over_allocation(dec!(1000), dec!(700), dec!(400)).into()),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(DomainError::InvalidInput("rate".to_string()).into()),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(DomainError::DuplicateLoan(id).into()),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_malformed_input_is_bad_request() {
        let err = AppError::MalformedInput("expected value at line 1".to_string());
        assert_eq!(status_of(err), StatusCode::BAD_REQUEST);
    }
}
