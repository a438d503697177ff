// ABOUTME: Login check handler. Verifies a fellow's credentials against the directory.
// ABOUTME: Session management is the surrounding deployment's concern, not ours.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::Deserialize;

use crate::api::error_response;
use crate::app_state::SharedState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// POST /api/login - Check credentials; returns the fellow's school.
pub async fn login(
    State(state): State<SharedState>,
    Json(req): Json<LoginRequest>,
) -> impl IntoResponse {
    match state
        .service
        .login_check(req.email.trim(), req.password.trim())
    {
        Ok(school) => (
            StatusCode::OK,
            Json(serde_json::json!({ "school": school })),
        )
            .into_response(),
        Err(err) => error_response(err.into()),
    }
}
