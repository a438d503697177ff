// ABOUTME: Registration CRUD handlers: list, create, show, update, delete (tombstone).
// ABOUTME: The fellow's email rides in the path; the school is resolved server-side.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use eventday_core::RegistrationForm;

use crate::api::error_response;
use crate::app_state::SharedState;

/// GET /api/fellows/{email}/registrations - Current registrations for a fellow.
pub async fn list(
    State(state): State<SharedState>,
    Path(email): Path<String>,
) -> impl IntoResponse {
    match state.service.list_registrations(&email).await {
        Ok(registrations) => Json(registrations.as_ref().clone()).into_response(),
        Err(err) => error_response(err),
    }
}

/// POST /api/fellows/{email}/registrations - Register a student.
pub async fn create(
    State(state): State<SharedState>,
    Path(email): Path<String>,
    Json(form): Json<RegistrationForm>,
) -> impl IntoResponse {
    match state.service.create_registration(&email, form).await {
        Ok(()) => (
            StatusCode::CREATED,
            Json(serde_json::json!({ "status": "recorded" })),
        )
            .into_response(),
        Err(err) => error_response(err),
    }
}

/// GET /api/fellows/{email}/registrations/{student} - One current registration.
pub async fn show(
    State(state): State<SharedState>,
    Path((email, student)): Path<(String, String)>,
) -> impl IntoResponse {
    match state.service.registration(&email, &student).await {
        Ok(registration) => Json(registration).into_response(),
        Err(err) => error_response(err),
    }
}

/// PUT /api/fellows/{email}/registrations/{student} - Supersede a registration.
pub async fn update(
    State(state): State<SharedState>,
    Path((email, student)): Path<(String, String)>,
    Json(form): Json<RegistrationForm>,
) -> impl IntoResponse {
    match state.service.update_registration(&email, &student, form).await {
        Ok(()) => (
            StatusCode::OK,
            Json(serde_json::json!({ "status": "recorded" })),
        )
            .into_response(),
        Err(err) => error_response(err),
    }
}

/// DELETE /api/fellows/{email}/registrations/{student} - Append a tombstone.
pub async fn remove(
    State(state): State<SharedState>,
    Path((email, student)): Path<(String, String)>,
) -> impl IntoResponse {
    match state.service.delete_registration(&email, &student).await {
        Ok(()) => (
            StatusCode::OK,
            Json(serde_json::json!({ "status": "deleted" })),
        )
            .into_response(),
        Err(err) => error_response(err),
    }
}
