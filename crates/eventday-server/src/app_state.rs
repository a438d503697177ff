// ABOUTME: Shared application state for the eventday HTTP server.
// ABOUTME: Wraps the registration service for Axum's State extractor.

use std::sync::Arc;

use eventday_core::RegistrationService;

/// Shared state accessible by all Axum handlers. The service owns the cache,
/// the store handle, and the static lookup tables; it is built once at
/// startup and shared from there.
pub struct AppState {
    pub service: RegistrationService,
}

/// Type alias for the Arc-wrapped state used with Axum's State extractor.
pub type SharedState = Arc<AppState>;

impl AppState {
    pub fn new(service: RegistrationService) -> Self {
        Self { service }
    }
}
