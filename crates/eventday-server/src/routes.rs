// ABOUTME: Route definitions for the eventday HTTP API.
// ABOUTME: Assembles all API routes into a single Axum Router with shared state.

use axum::Router;
use axum::routing::{get, post};
use tower_http::trace::TraceLayer;

use crate::api;
use crate::app_state::SharedState;

/// Build the complete Axum router with all routes and shared state.
pub fn create_router(state: SharedState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/login", post(api::auth::login))
        .route(
            "/api/fellows/{email}/registrations",
            get(api::registrations::list).post(api::registrations::create),
        )
        .route(
            "/api/fellows/{email}/registrations/{student}",
            get(api::registrations::show)
                .put(api::registrations::update)
                .delete(api::registrations::remove),
        )
        .route("/api/fellows/{email}/roster", get(api::roster::event_roster))
        .route("/api/options/{grade}", get(api::roster::grade_options))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check handler. Returns 200 OK with a simple JSON body.
async fn health() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({ "status": "ok" }))
}
