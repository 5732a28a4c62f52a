//! API error types with HTTP response mapping.
//!
//! Business-rule failures answer with the violated constraint; upstream
//! and internal failures are logged with full context and answered with
//! a generic message.

use auth::AuthError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use domain::OrderError;
use workflow::WorkflowError;

/// API-level error type that maps to HTTP responses.
#[derive(Debug)]
pub enum ApiError {
    /// Missing or invalid credential.
    Unauthorized(String),
    /// Malformed request.
    BadRequest(String),
    /// Workflow error.
    Workflow(WorkflowError),
    /// Upstream service unreachable.
    Upstream(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "unauthorized", msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "validation", msg),
            ApiError::Workflow(err) => workflow_error_to_response(err),
            ApiError::Upstream(msg) => {
                tracing::error!(error = %msg, "upstream service unavailable");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "upstream_unavailable",
                    "upstream service unavailable".to_string(),
                )
            }
        };

        let body = serde_json::json!({ "error": message, "code": code });
        (status, axum::Json(body)).into_response()
    }
}

fn workflow_error_to_response(err: WorkflowError) -> (StatusCode, &'static str, String) {
    match &err {
        WorkflowError::OrderNotFound(_) => (StatusCode::NOT_FOUND, "not_found", err.to_string()),
        WorkflowError::ProductNotFound(_) => {
            (StatusCode::BAD_REQUEST, "product_not_found", err.to_string())
        }
        WorkflowError::InsufficientStock(_) => {
            (StatusCode::BAD_REQUEST, "insufficient_stock", err.to_string())
        }
        WorkflowError::AdminRequired => (StatusCode::FORBIDDEN, "forbidden", err.to_string()),
        WorkflowError::Order(order_err) => match order_err {
            OrderError::InvalidTransition { .. } => {
                (StatusCode::BAD_REQUEST, "invalid_transition", err.to_string())
            }
            OrderError::NotCancellable(_) => {
                (StatusCode::BAD_REQUEST, "invalid_state", err.to_string())
            }
            _ => (StatusCode::BAD_REQUEST, "validation", err.to_string()),
        },
        WorkflowError::Upstream(msg) => {
            tracing::error!(error = %msg, "upstream service unavailable");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                "upstream_unavailable",
                "upstream service unavailable".to_string(),
            )
        }
        WorkflowError::Store(store_err) => {
            tracing::error!(error = %store_err, "order store failure");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal",
                "internal server error".to_string(),
            )
        }
    }
}

impl From<WorkflowError> for ApiError {
    fn from(err: WorkflowError) -> Self {
        ApiError::Workflow(err)
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidToken => ApiError::Unauthorized("invalid token".to_string()),
            AuthError::Unavailable(msg) => ApiError::Upstream(msg),
        }
    }
}
