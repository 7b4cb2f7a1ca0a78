//! Specification API endpoints.
//!
//! Serves the generated document and regenerates it from the inventory on
//! disk.

use apispec_core::model::Type;
use apispec_core::Specification;
use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::api::error::{ApiError, ApiResult};
use crate::state::{self, SharedState};

/// Summary returned after a successful regeneration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegenerateResponse {
    /// Catalog size.
    pub types: usize,
    /// Number of modules.
    pub modules: usize,
    /// Number of documented endpoints.
    pub endpoints: usize,
}

/// Creates the specification router.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/", get(get_specification))
        .route("/types/{id}", get(get_type))
        .route("/regenerate", post(regenerate))
}

/// Get the current specification document.
pub async fn get_specification(State(state): State<SharedState>) -> Json<Specification> {
    Json(state.read().await.specification.clone())
}

/// Get one catalog entry by type id.
pub async fn get_type(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Type>> {
    let state_guard = state.read().await;
    state_guard
        .specification
        .type_by_id(&id)
        .cloned()
        .map(Json)
        .ok_or_else(|| ApiError::NotFound {
            error_code: "TYPE_NOT_FOUND".to_string(),
            message: format!("No type with id '{id}'"),
        })
}

/// Reload the inventory and regenerate the document.
///
/// The previous document stays in place when generation fails.
#[instrument(skip(state))]
pub async fn regenerate(State(state): State<SharedState>) -> ApiResult<Json<RegenerateResponse>> {
    let specification = state::regenerate(&state).await?;
    let response = RegenerateResponse {
        types: specification.types.len(),
        modules: specification.modules.len(),
        endpoints: specification.endpoints().count(),
    };
    info!(endpoints = response.endpoints, "Regenerated via API");
    Ok(Json(response))
}
