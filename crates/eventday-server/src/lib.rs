// ABOUTME: HTTP server for eventday, exposing the registration core as a JSON API.
// ABOUTME: Axum routes over shared service state; config comes from the environment.

pub mod api;
pub mod app_state;
pub mod config;
pub mod routes;

pub use app_state::{AppState, SharedState};
pub use config::{ConfigError, ServerConfig};
pub use routes::create_router;
