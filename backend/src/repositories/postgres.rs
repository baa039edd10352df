//! PostgreSQL store

use super::daily::DailyValueRepository;
use super::education::EducationRepository;
use super::goals::{AchievementRepository, GoalRepository};
use super::health::HealthRepository;
use super::streaks::StreakRepository;
use super::*;
use crate::db;
use sqlx::PgPool;

/// Store backed by a connection pool
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[inline]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl MetricStore for PgStore {
    async fn water_logs(&self, user_id: Uuid, range: DateRange) -> Result<Vec<WaterLog>> {
        HealthRepository::water(&self.pool, user_id, range).await
    }

    async fn exercise_logs(&self, user_id: Uuid, range: DateRange) -> Result<Vec<ExerciseLog>> {
        HealthRepository::exercise(&self.pool, user_id, range).await
    }

    async fn period_logs(&self, user_id: Uuid, range: DateRange) -> Result<Vec<PeriodLog>> {
        HealthRepository::period(&self.pool, user_id, range).await
    }

    async fn constipation_logs(
        &self,
        user_id: Uuid,
        range: DateRange,
    ) -> Result<Vec<ConstipationLog>> {
        HealthRepository::constipation(&self.pool, user_id, range).await
    }

    async fn kriya_logs(&self, user_id: Uuid, range: DateRange) -> Result<Vec<KriyaLog>> {
        HealthRepository::kriya(&self.pool, user_id, range).await
    }

    async fn typing_logs(&self, user_id: Uuid, range: DateRange) -> Result<Vec<TypingLog>> {
        HealthRepository::typing(&self.pool, user_id, range).await
    }

    async fn study_logs(&self, user_id: Uuid, range: DateRange) -> Result<Vec<StudyLog>> {
        EducationRepository::study(&self.pool, user_id, range).await
    }

    async fn tasks(&self, user_id: Uuid, range: DateRange) -> Result<Vec<TaskRecord>> {
        EducationRepository::tasks(&self.pool, user_id, range).await
    }

    async fn subjects(&self, user_id: Uuid) -> Result<Vec<SubjectRecord>> {
        EducationRepository::subjects(&self.pool, user_id).await
    }

    async fn daily_values(
        &self,
        user_id: Uuid,
        source: MetricSource,
        range: DateRange,
    ) -> Result<Vec<MetricPoint>> {
        DailyValueRepository::fetch(&self.pool, user_id, source, range).await
    }

    async fn ping(&self) -> Result<()> {
        db::health_check(&self.pool).await
    }
}

#[async_trait]
impl GoalStore for PgStore {
    async fn goals(&self, user_id: Uuid, status: Option<GoalStatus>) -> Result<Vec<Goal>> {
        GoalRepository::get_by_user(&self.pool, user_id, status).await
    }

    async fn goal(&self, user_id: Uuid, goal_id: Uuid) -> Result<Option<Goal>> {
        GoalRepository::get_by_id(&self.pool, goal_id, user_id).await
    }

    async fn latest_goal(
        &self,
        user_id: Uuid,
        metric: MetricKey,
        goal_type: Option<GoalType>,
        status: Option<GoalStatus>,
    ) -> Result<Option<Goal>> {
        GoalRepository::get_latest(&self.pool, user_id, metric, goal_type, status).await
    }

    async fn create_goal(&self, input: NewGoal) -> Result<Goal> {
        GoalRepository::create(&self.pool, input).await
    }

    async fn set_goal_status(
        &self,
        user_id: Uuid,
        goal_id: Uuid,
        from: GoalStatus,
        to: GoalStatus,
    ) -> Result<Option<Goal>> {
        GoalRepository::update_status(&self.pool, goal_id, user_id, from, to).await
    }

    async fn complete_goal(
        &self,
        user_id: Uuid,
        goal_id: Uuid,
        achieved_value: f64,
    ) -> Result<Option<GoalAchievement>> {
        AchievementRepository::complete_goal(&self.pool, goal_id, user_id, achieved_value).await
    }

    async fn achievements(
        &self,
        user_id: Uuid,
        since: Option<DateTime<Utc>>,
    ) -> Result<Vec<GoalAchievement>> {
        AchievementRepository::get_by_user(&self.pool, user_id, since).await
    }
}

#[async_trait]
impl StreakStore for PgStore {
    async fn record_activity(
        &self,
        user_id: Uuid,
        activity_type: &str,
        date: NaiveDate,
    ) -> Result<StreakState> {
        StreakRepository::record_activity(&self.pool, user_id, activity_type, date).await
    }

    async fn streaks(&self, user_id: Uuid) -> Result<Vec<StreakState>> {
        StreakRepository::get_by_user(&self.pool, user_id).await
    }
}
