//! API route definitions
//!
//! Endpoints for the clinical decision-support front end:
//! - /api/knowledge/search — knowledge retrieval (GET querystring, POST body)
//! - /api/auth/me — verified principal behind the session cookie
//! - /health — liveness and corpus size (root level)

use axum::routing::get;
use axum::Router;

use super::handlers::{self, ApiState};

/// Create the /api routes.
pub fn api_routes(state: ApiState) -> Router {
    Router::new()
        .route(
            "/knowledge/search",
            get(handlers::search_get).post(handlers::search_post),
        )
        .route("/auth/me", get(handlers::get_me))
        .with_state(state)
}

/// Health endpoint at root level.
pub fn health_routes(state: ApiState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .with_state(state)
}
