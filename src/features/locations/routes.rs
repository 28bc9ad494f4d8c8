use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::features::locations::handlers;
use crate::features::locations::services::LocationService;

/// Routes open to anyone: lookup and viewport search
pub fn public_routes(service: Arc<LocationService>) -> Router {
    Router::new()
        .route("/api/locations/search", post(handlers::search_locations))
        .route("/api/locations/{id}", get(handlers::get_location))
        .with_state(service)
}

/// Routes that need an authenticated user
///
/// The caller applies the auth middleware; handlers check permissions.
pub fn protected_routes(service: Arc<LocationService>) -> Router {
    Router::new()
        .route("/api/locations", post(handlers::create_location))
        .with_state(service)
}
