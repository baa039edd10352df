//! Insights API routes

use super::parse_id;
use crate::error::ApiError;
use crate::services::InsightService;
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use chrono::Utc;
use vitality_shared::insights::{InsightFilter, InsightReport};
use vitality_shared::types::{InsightFilterQuery, InsightsResponse};

/// Create insights routes
pub fn insights_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(get_insights))
        .route("/report", get(get_insight_report))
}

/// GET /api/v1/users/:user_id/insights - Ranked insights and recommendations
async fn get_insights(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<InsightsResponse>, ApiError> {
    let user_id = parse_id(&user_id, "user_id")?;
    let response = InsightService::generate_insights(
        state.store(),
        user_id,
        Utc::now(),
        &state.config().analytics,
    )
    .await?;
    Ok(Json(response))
}

/// GET /api/v1/users/:user_id/insights/report - Filtered, grouped insights
async fn get_insight_report(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Query(query): Query<InsightFilterQuery>,
) -> Result<Json<InsightReport>, ApiError> {
    let user_id = parse_id(&user_id, "user_id")?;
    let filter = InsightFilter::from_query(&query)?;
    let report = InsightService::report(
        state.store(),
        user_id,
        &filter,
        Utc::now(),
        &state.config().analytics,
    )
    .await?;
    Ok(Json(report))
}
