// ABOUTME: HTTP API handlers for the eventday server, grouped by concern.
// ABOUTME: Maps typed service errors onto status codes with JSON error bodies.

pub mod auth;
pub mod registrations;
pub mod roster;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use eventday_core::{CacheError, ServiceError};

/// One status code per error kind; the body always carries the message.
pub(crate) fn error_response(err: ServiceError) -> Response {
    let status = match &err {
        ServiceError::Auth(_) => StatusCode::UNAUTHORIZED,
        ServiceError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
        ServiceError::UnknownFellow(_) => StatusCode::NOT_FOUND,
        ServiceError::Store(_) => StatusCode::SERVICE_UNAVAILABLE,
        ServiceError::Cache(CacheError::Store(_)) => StatusCode::SERVICE_UNAVAILABLE,
        ServiceError::Cache(CacheError::Reconcile(_)) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    if status.is_server_error() {
        tracing::error!(error = %err, "registration request failed");
    }

    (
        status,
        Json(serde_json::json!({ "error": err.to_string() })),
    )
        .into_response()
}
