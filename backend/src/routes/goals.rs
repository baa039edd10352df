//! Goals API routes

use super::parse_id;
use crate::error::ApiError;
use crate::services::GoalTracker;
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    routing::{get, post, put},
    Json, Router,
};
use chrono::Utc;
use vitality_shared::types::{
    AchievementCheckResponse, GoalProgressResponse, GoalStreakQuery, UpdateGoalStatusRequest,
};
use vitality_shared::{Goal, GoalCompletionStats, GoalStatus, GoalStreak, GoalType, MetricKey};

/// Create goals routes
pub fn goals_routes() -> Router<AppState> {
    Router::new()
        .route("/progress", get(get_progress))
        .route("/achievements/check", post(check_achievements))
        .route("/streaks/:metric", get(get_goal_streak))
        .route("/stats", get(get_completion_stats))
        .route("/:goal_id/status", put(update_status))
}

/// GET /api/v1/users/:user_id/goals/progress - Progress of every active goal
async fn get_progress(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<GoalProgressResponse>, ApiError> {
    let user_id = parse_id(&user_id, "user_id")?;
    let goals = GoalTracker::active_progress(
        state.store(),
        user_id,
        Utc::now(),
        state.config().analytics.goal_lookback_days,
    )
    .await?;
    Ok(Json(GoalProgressResponse { goals }))
}

/// POST /api/v1/users/:user_id/goals/achievements/check - Complete reached goals
///
/// Goals that were already completed are not reported again.
async fn check_achievements(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<AchievementCheckResponse>, ApiError> {
    let user_id = parse_id(&user_id, "user_id")?;
    let achieved = GoalTracker::check_achievements(
        state.store(),
        user_id,
        Utc::now(),
        state.config().analytics.goal_lookback_days,
    )
    .await?;
    Ok(Json(AchievementCheckResponse {
        count: achieved.len(),
        achieved,
    }))
}

/// GET /api/v1/users/:user_id/goals/streaks/:metric - Days in a row at target
async fn get_goal_streak(
    State(state): State<AppState>,
    Path((user_id, metric)): Path<(String, String)>,
    Query(query): Query<GoalStreakQuery>,
) -> Result<Json<GoalStreak>, ApiError> {
    let user_id = parse_id(&user_id, "user_id")?;
    let metric: MetricKey = metric.parse()?;
    let goal_type = query
        .goal_type
        .as_deref()
        .map(str::parse::<GoalType>)
        .transpose()?;

    let streak = GoalTracker::calculate_streak(
        state.store(),
        user_id,
        metric,
        goal_type,
        Utc::now().date_naive(),
        state.config().analytics.goal_lookback_days,
    )
    .await?;
    Ok(Json(streak))
}

/// GET /api/v1/users/:user_id/goals/stats - Historical completion rates
async fn get_completion_stats(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<GoalCompletionStats>, ApiError> {
    let user_id = parse_id(&user_id, "user_id")?;
    let stats = GoalTracker::historical_completion_rate(
        state.store(),
        user_id,
        Utc::now(),
        state.config().analytics.recent_achievement_days,
    )
    .await?;
    Ok(Json(stats))
}

/// PUT /api/v1/users/:user_id/goals/:goal_id/status - Pause, resume or reopen a goal
async fn update_status(
    State(state): State<AppState>,
    Path((user_id, goal_id)): Path<(String, String)>,
    Json(req): Json<UpdateGoalStatusRequest>,
) -> Result<Json<Goal>, ApiError> {
    let user_id = parse_id(&user_id, "user_id")?;
    let goal_id = parse_id(&goal_id, "goal_id")?;
    let status: GoalStatus = req.status.parse()?;

    let goal = GoalTracker::set_status(state.store(), user_id, goal_id, status).await?;
    Ok(Json(goal))
}
