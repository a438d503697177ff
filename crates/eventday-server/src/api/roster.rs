// ABOUTME: Aggregated views: the per-event roster and the per-grade slot options.
// ABOUTME: Rosters are recomputed from the current snapshot on every read.

use axum::Json;
use axum::extract::{Path, State};
use axum::response::IntoResponse;

use crate::api::error_response;
use crate::app_state::SharedState;

/// GET /api/fellows/{email}/roster - Per-event roster over current registrations.
pub async fn event_roster(
    State(state): State<SharedState>,
    Path(email): Path<String>,
) -> impl IntoResponse {
    match state.service.event_roster(&email).await {
        Ok(roster) => Json(roster).into_response(),
        Err(err) => error_response(err),
    }
}

/// GET /api/options/{grade} - Slot options for a grade, sentinel first.
/// Unknown grades get empty options rather than an error.
pub async fn grade_options(
    State(state): State<SharedState>,
    Path(grade): Path<String>,
) -> impl IntoResponse {
    let catalog = state.service.catalog();
    match catalog.options_for(&grade) {
        Some(options) => Json(serde_json::json!({
            "grade": grade,
            "options": options,
            "double_slot": catalog.double_slot_events(),
        }))
        .into_response(),
        None => Json(serde_json::json!({
            "grade": grade,
            "options": {},
            "double_slot": [],
        }))
        .into_response(),
    }
}
