//! Analytics API routes

use super::parse_id;
use crate::error::ApiError;
use crate::services::AnalyticsService;
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use chrono::Utc;
use validator::Validate;
use vitality_shared::types::{AnalyticsQuery, EducationAnalytics, HealthAnalytics};
use vitality_shared::validation::{resolve_days, SubjectFilter};

/// Create analytics routes
pub fn analytics_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(get_health_analytics))
        .route("/education", get(get_education_analytics))
}

/// GET /api/v1/users/:user_id/analytics/health - Health metric aggregates
async fn get_health_analytics(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Query(query): Query<AnalyticsQuery>,
) -> Result<Json<HealthAnalytics>, ApiError> {
    let user_id = parse_id(&user_id, "user_id")?;
    query.validate()?;
    let settings = &state.config().analytics;
    let days = resolve_days(query.days, settings.default_window_days, settings.max_window_days)?;

    let analytics =
        AnalyticsService::health_analytics(state.store(), user_id, days, Utc::now(), settings)
            .await?;
    Ok(Json(analytics))
}

/// GET /api/v1/users/:user_id/analytics/education - Study and task aggregates
///
/// `subjects` is `all` (the default) or a comma-separated list of codes.
async fn get_education_analytics(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Query(query): Query<AnalyticsQuery>,
) -> Result<Json<EducationAnalytics>, ApiError> {
    let user_id = parse_id(&user_id, "user_id")?;
    query.validate()?;
    let settings = &state.config().analytics;
    let days = resolve_days(query.days, settings.default_window_days, settings.max_window_days)?;
    let subjects = SubjectFilter::parse(query.subjects.as_deref());

    let analytics = AnalyticsService::education_analytics(
        state.store(),
        user_id,
        days,
        &subjects,
        Utc::now(),
        settings,
    )
    .await?;
    Ok(Json(analytics))
}
