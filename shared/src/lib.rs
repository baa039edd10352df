//! Vitality Shared Library
//!
//! Pure analytics domain shared by the backend and the WASM module: the
//! metric registry, trend / period / consistency algorithms, goal progress,
//! the rule-based insight engine and its ranking.

pub mod aggregation;
pub mod consistency;
pub mod errors;
pub mod goals;
pub mod insights;
pub mod metrics;
pub mod models;
pub mod scoring;
pub mod stats;
pub mod trend;
pub mod types;
pub mod validation;

// Re-export commonly used items
pub use aggregation::{aggregate, AggregationWindow, PeriodAggregate, PreviousPeriodStats, WeekBucket};
pub use consistency::{calculate_streaks, ConsistencyPatterns, ConsistencyReport};
pub use errors::DomainError;
pub use goals::{GoalCompletionStats, GoalProgress, GoalStreak, ProgressStatus};
pub use insights::{
    Insight, InsightKind, InsightRanker, InsightReport, InsightSet, Level, Milestone,
    MilestoneKind, RankingConfig, Recommendation, Severity,
};
pub use metrics::{DateRange, MetricDescriptor, MetricKey, MetricPoint, MetricSource, Reduction};
pub use models::{Goal, GoalAchievement, GoalStatus, GoalType, NewGoal, StreakState};
pub use scoring::WellnessScores;
pub use trend::{calculate_trend, Trend, TrendResult};
pub use types::*;
