//! Data access layer
//!
//! Services depend on the store traits below, never on a concrete backend.
//! `PgStore` serves production; `InMemoryStore` serves tests and local runs.

pub mod daily;
pub mod education;
pub mod goals;
pub mod health;
pub mod memory;
pub mod postgres;
pub mod streaks;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;
use vitality_shared::{
    DateRange, Goal, GoalAchievement, GoalStatus, GoalType, MetricKey, MetricPoint, MetricSource,
    NewGoal, StreakState,
};

pub use education::{StudyLog, SubjectRecord, TaskRecord, TASK_TYPE_NPTEL, TASK_TYPE_REGULAR};
pub use health::{ConstipationLog, ExerciseLog, KriyaLog, PeriodLog, TypingLog, WaterLog};
pub use memory::InMemoryStore;
pub use postgres::PgStore;

/// Read access to per-user daily records
#[async_trait]
pub trait MetricStore: Send + Sync {
    async fn water_logs(&self, user_id: Uuid, range: DateRange) -> Result<Vec<WaterLog>>;

    async fn exercise_logs(&self, user_id: Uuid, range: DateRange) -> Result<Vec<ExerciseLog>>;

    async fn period_logs(&self, user_id: Uuid, range: DateRange) -> Result<Vec<PeriodLog>>;

    async fn constipation_logs(
        &self,
        user_id: Uuid,
        range: DateRange,
    ) -> Result<Vec<ConstipationLog>>;

    async fn kriya_logs(&self, user_id: Uuid, range: DateRange) -> Result<Vec<KriyaLog>>;

    async fn typing_logs(&self, user_id: Uuid, range: DateRange) -> Result<Vec<TypingLog>>;

    async fn study_logs(&self, user_id: Uuid, range: DateRange) -> Result<Vec<StudyLog>>;

    /// Tasks whose due date falls in `range`
    async fn tasks(&self, user_id: Uuid, range: DateRange) -> Result<Vec<TaskRecord>>;

    async fn subjects(&self, user_id: Uuid) -> Result<Vec<SubjectRecord>>;

    /// Daily values of one registry source, ascending by date
    async fn daily_values(
        &self,
        user_id: Uuid,
        source: MetricSource,
        range: DateRange,
    ) -> Result<Vec<MetricPoint>>;

    /// Connectivity check for readiness probes
    async fn ping(&self) -> Result<()>;
}

/// Goals and their achievement log
#[async_trait]
pub trait GoalStore: Send + Sync {
    /// Goals of a user, newest first
    async fn goals(&self, user_id: Uuid, status: Option<GoalStatus>) -> Result<Vec<Goal>>;

    async fn goal(&self, user_id: Uuid, goal_id: Uuid) -> Result<Option<Goal>>;

    /// Most recently created goal for a metric matching the optional filters
    async fn latest_goal(
        &self,
        user_id: Uuid,
        metric: MetricKey,
        goal_type: Option<GoalType>,
        status: Option<GoalStatus>,
    ) -> Result<Option<Goal>>;

    async fn create_goal(&self, input: NewGoal) -> Result<Goal>;

    /// Conditional status change; `None` when the goal is not in `from`
    async fn set_goal_status(
        &self,
        user_id: Uuid,
        goal_id: Uuid,
        from: GoalStatus,
        to: GoalStatus,
    ) -> Result<Option<Goal>>;

    /// Atomically complete an active goal and log the achievement.
    /// `None` when the goal was not active.
    async fn complete_goal(
        &self,
        user_id: Uuid,
        goal_id: Uuid,
        achieved_value: f64,
    ) -> Result<Option<GoalAchievement>>;

    /// Achievements of a user, newest first
    async fn achievements(
        &self,
        user_id: Uuid,
        since: Option<DateTime<Utc>>,
    ) -> Result<Vec<GoalAchievement>>;
}

/// Persisted activity streaks
#[async_trait]
pub trait StreakStore: Send + Sync {
    /// Atomically apply one activity to the (user, activity type) streak
    async fn record_activity(
        &self,
        user_id: Uuid,
        activity_type: &str,
        date: NaiveDate,
    ) -> Result<StreakState>;

    async fn streaks(&self, user_id: Uuid) -> Result<Vec<StreakState>>;
}

/// Everything the services need from storage
pub trait Store: MetricStore + GoalStore + StreakStore {}

impl<T: MetricStore + GoalStore + StreakStore> Store for T {}
