//! Dashboard routes: the rendered view and the date-filter controls.

use axum::extract::State;
use axum::Json;
use chrono::NaiveDate;
use serde::Deserialize;

use crate::errors::ApiResponse;
use crate::services::filter::IntervalSelection;
use crate::services::view::{self, DashboardView, FilterView};
use crate::AppState;

/// GET /api/v1/dashboard — latest snapshot rendered under the current
/// filter state.
pub async fn view(State(state): State<AppState>) -> Json<ApiResponse<DashboardView>> {
    let snapshot = state.dashboard.snapshot().await;
    let filter = state.filter.read().await;
    ApiResponse::success(view::render(&snapshot, &filter))
}

#[derive(Debug, Deserialize)]
pub struct FilterSelectionRequest {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

/// PUT /api/v1/dashboard/filter — store a new interval selection. A
/// complete interval turns filtering on.
pub async fn select_filter(
    State(state): State<AppState>,
    Json(body): Json<FilterSelectionRequest>,
) -> Json<ApiResponse<FilterView>> {
    let mut filter = state.filter.write().await;
    filter.select_range(IntervalSelection {
        start: body.start,
        end: body.end,
    });
    tracing::debug!(start = ?body.start, end = ?body.end, "date range selected");
    ApiResponse::success(FilterView::from(&*filter))
}

#[derive(Debug, Deserialize)]
pub struct FilterToggleRequest {
    pub active: bool,
}

/// PUT /api/v1/dashboard/filter/active — toggle filtering; the stored
/// interval is kept for the next activation.
pub async fn toggle_filter(
    State(state): State<AppState>,
    Json(body): Json<FilterToggleRequest>,
) -> Json<ApiResponse<FilterView>> {
    let mut filter = state.filter.write().await;
    filter.set_active(body.active);
    tracing::debug!(active = body.active, "date filter toggled");
    ApiResponse::success(FilterView::from(&*filter))
}

/// POST /api/v1/dashboard/refresh — request an extra fetch cycle.
pub async fn refresh(State(state): State<AppState>) -> Json<ApiResponse<&'static str>> {
    state.dashboard.request_refresh();
    ApiResponse::success("Refresh requested")
}
