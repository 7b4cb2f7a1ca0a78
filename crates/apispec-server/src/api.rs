//! HTTP API routes and handlers.
//!
//! - `health` - Service health checks
//! - `specification` - The generated document and regeneration
//! - `error` - API error types

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::state::SharedState;

pub mod error;
pub mod health;
pub mod specification;

pub use error::{ApiError, ApiResult, ErrorResponse};

/// Creates the combined API router with all endpoints.
///
/// # Route Structure
///
/// ```text
/// /health                      - Health check
/// /api/specification
/// ├── /                        - Current document
/// ├── /types/{id}              - One catalog entry
/// └── /regenerate (POST)       - Reload the inventory and regenerate
/// ```
pub fn create_router(state: SharedState) -> Router {
    Router::new()
        .nest("/health", health::router())
        .nest(
            "/api",
            Router::new().nest("/specification", specification::router()),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
