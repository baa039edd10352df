//! Prometheus scrape endpoint

use crate::state::AppState;
use axum::{extract::State, http::StatusCode};

/// GET /metrics - Prometheus text exposition, 404 when the exporter is off
pub async fn render_metrics(State(state): State<AppState>) -> Result<String, StatusCode> {
    state
        .metrics
        .as_ref()
        .map(|handle| handle.render())
        .ok_or(StatusCode::NOT_FOUND)
}
