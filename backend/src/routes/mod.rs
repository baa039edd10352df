//! Route definitions for the Vitality API
//!
//! This module organizes all API routes and applies middleware.

use crate::error::ApiError;
use crate::state::AppState;
use axum::{
    http::{header, Method},
    routing::get,
    Router,
};
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use uuid::Uuid;

mod analytics;
mod goals;
mod health;
mod insights;
mod metrics;
mod streaks;

pub use analytics::analytics_routes;
pub use goals::goals_routes;
pub use insights::insights_routes;
pub use streaks::streaks_routes;

/// Create the main application router with all middleware
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
        .route("/health/live", get(health::liveness_check))
        .route("/metrics", get(metrics::render_metrics))
        .nest("/api/v1", api_routes())
        // Apply middleware layers
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(30)))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([Method::GET, Method::POST, Method::PUT])
                .allow_headers([header::CONTENT_TYPE]),
        )
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// API v1 routes
fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(|| async { "Vitality API v1" }))
        .nest("/users/:user_id", user_routes())
}

/// Routes scoped to one user
fn user_routes() -> Router<AppState> {
    Router::new()
        .nest("/analytics", analytics::analytics_routes())
        .nest("/insights", insights::insights_routes())
        .nest("/goals", goals::goals_routes())
        .nest("/streaks", streaks::streaks_routes())
}

/// Parse a UUID path segment
pub(crate) fn parse_id(raw: &str, field: &str) -> Result<Uuid, ApiError> {
    raw.parse::<Uuid>()
        .map_err(|_| ApiError::Validation(format!("Invalid {}: {}", field, raw)))
}
