//! Activity streak API routes

use super::parse_id;
use crate::error::ApiError;
use crate::services::StreakService;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use vitality_shared::types::{ActivityStreak, RecordActivityRequest, StreaksResponse};

/// Create streak routes
pub fn streaks_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(get_streaks))
        .route("/:activity_type", post(record_activity))
}

/// GET /api/v1/users/:user_id/streaks - All activity streaks
async fn get_streaks(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<StreaksResponse>, ApiError> {
    let user_id = parse_id(&user_id, "user_id")?;
    let streaks = StreakService::get_streaks(state.store(), user_id, Utc::now().date_naive()).await?;
    Ok(Json(streaks))
}

/// POST /api/v1/users/:user_id/streaks/:activity_type - Record an activity
///
/// `date` defaults to today.
async fn record_activity(
    State(state): State<AppState>,
    Path((user_id, activity_type)): Path<(String, String)>,
    Json(req): Json<RecordActivityRequest>,
) -> Result<Json<ActivityStreak>, ApiError> {
    let user_id = parse_id(&user_id, "user_id")?;
    let today = Utc::now().date_naive();
    let date = req.date.unwrap_or(today);

    let streak =
        StreakService::record_activity(state.store(), user_id, &activity_type, date, today).await?;
    Ok(Json(streak))
}
