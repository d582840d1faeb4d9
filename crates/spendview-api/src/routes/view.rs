//! JSON view endpoints
//!
//! Endpoints:
//! - api_view: current view snapshot
//! - api_filter: change the employee filter
//! - api_load_more: append the next feed page

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use spendview_core::ViewSnapshot;

use crate::{ApiError, ApiResult, AppState};

/// Body of `POST /api/filter`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterRequest {
    /// Employee id; null or "all" clears the filter
    #[serde(default)]
    pub employee_id: Option<String>,
}

/// Current view state (JSON API)
pub async fn api_view(state: State<AppState>) -> Json<ViewSnapshot> {
    Json(state.controller.snapshot().await)
}

/// Apply a filter selection (JSON API)
pub async fn api_filter(
    state: State<AppState>,
    payload: Result<Json<FilterRequest>, JsonRejection>,
) -> ApiResult<Json<ViewSnapshot>> {
    let Json(request) = payload.map_err(|rejection| ApiError::BadRequest { message: rejection.body_text() })?;
    log::debug!("filter selection: {:?}", request.employee_id);
    let snapshot = state.controller.select(request.employee_id).await?;
    Ok(Json(snapshot))
}

/// Load the next feed page (JSON API)
pub async fn api_load_more(state: State<AppState>) -> Json<ViewSnapshot> {
    Json(state.controller.load_more().await)
}
