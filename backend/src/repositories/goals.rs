//! Goals repository for database operations

use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;
use vitality_shared::{Goal, GoalAchievement, GoalStatus, GoalType, MetricKey, NewGoal};

// ============================================================================
// Goals
// ============================================================================

/// Goal record from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct GoalRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub goal_type: String,
    pub metric: String,
    pub target: Decimal,
    pub description: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<GoalRecord> for Goal {
    type Error = anyhow::Error;

    fn try_from(record: GoalRecord) -> Result<Self> {
        Ok(Goal {
            id: record.id,
            user_id: record.user_id,
            goal_type: record.goal_type.parse()?,
            metric: record.metric.parse()?,
            target: to_f64(record.target)?,
            description: record.description,
            status: record.status.parse()?,
            created_at: record.created_at,
            updated_at: record.updated_at,
        })
    }
}

fn to_f64(value: Decimal) -> Result<f64> {
    value
        .to_f64()
        .ok_or_else(|| anyhow!("decimal {} out of range", value))
}

fn to_decimal(value: f64) -> Result<Decimal> {
    Decimal::try_from(value).map_err(|e| anyhow!("invalid decimal {}: {}", value, e))
}

fn into_goals(records: Vec<GoalRecord>) -> Result<Vec<Goal>> {
    records.into_iter().map(Goal::try_from).collect()
}

/// Goal repository
pub struct GoalRepository;

impl GoalRepository {
    /// Create a new active goal
    pub async fn create(pool: &PgPool, input: NewGoal) -> Result<Goal> {
        let record = sqlx::query_as::<_, GoalRecord>(
            r#"
            INSERT INTO goals (user_id, goal_type, metric, target, description, status)
            VALUES ($1, $2, $3, $4, $5, 'active')
            RETURNING id, user_id, goal_type, metric, target, description, status,
                      created_at, updated_at
            "#,
        )
        .bind(input.user_id)
        .bind(input.goal_type.as_str())
        .bind(input.metric.as_str())
        .bind(to_decimal(input.target)?)
        .bind(&input.description)
        .fetch_one(pool)
        .await?;

        Goal::try_from(record)
    }

    /// Get a goal by ID
    pub async fn get_by_id(pool: &PgPool, id: Uuid, user_id: Uuid) -> Result<Option<Goal>> {
        let record = sqlx::query_as::<_, GoalRecord>(
            r#"
            SELECT id, user_id, goal_type, metric, target, description, status,
                   created_at, updated_at
            FROM goals
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        record.map(Goal::try_from).transpose()
    }

    /// Goals of a user, newest first, optionally restricted to one status
    pub async fn get_by_user(
        pool: &PgPool,
        user_id: Uuid,
        status: Option<GoalStatus>,
    ) -> Result<Vec<Goal>> {
        let records = sqlx::query_as::<_, GoalRecord>(
            r#"
            SELECT id, user_id, goal_type, metric, target, description, status,
                   created_at, updated_at
            FROM goals
            WHERE user_id = $1 AND ($2::text IS NULL OR status = $2)
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .bind(status.map(|s| s.as_str()))
        .fetch_all(pool)
        .await?;

        into_goals(records)
    }

    /// Most recently created goal for a metric
    pub async fn get_latest(
        pool: &PgPool,
        user_id: Uuid,
        metric: MetricKey,
        goal_type: Option<GoalType>,
        status: Option<GoalStatus>,
    ) -> Result<Option<Goal>> {
        let record = sqlx::query_as::<_, GoalRecord>(
            r#"
            SELECT id, user_id, goal_type, metric, target, description, status,
                   created_at, updated_at
            FROM goals
            WHERE user_id = $1
              AND metric = $2
              AND ($3::text IS NULL OR goal_type = $3)
              AND ($4::text IS NULL OR status = $4)
            ORDER BY created_at DESC
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .bind(metric.as_str())
        .bind(goal_type.map(|t| t.as_str()))
        .bind(status.map(|s| s.as_str()))
        .fetch_optional(pool)
        .await?;

        record.map(Goal::try_from).transpose()
    }

    /// Move a goal from `from` to `to`; `None` when the goal is no longer in `from`
    pub async fn update_status(
        pool: &PgPool,
        id: Uuid,
        user_id: Uuid,
        from: GoalStatus,
        to: GoalStatus,
    ) -> Result<Option<Goal>> {
        let record = sqlx::query_as::<_, GoalRecord>(
            r#"
            UPDATE goals SET status = $4, updated_at = NOW()
            WHERE id = $1 AND user_id = $2 AND status = $3
            RETURNING id, user_id, goal_type, metric, target, description, status,
                      created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(from.as_str())
        .bind(to.as_str())
        .fetch_optional(pool)
        .await?;

        record.map(Goal::try_from).transpose()
    }
}

// ============================================================================
// Goal Achievements
// ============================================================================

/// Achievement record from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AchievementRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub goal_id: Uuid,
    pub achieved_value: Decimal,
    pub achieved_at: DateTime<Utc>,
}

impl TryFrom<AchievementRecord> for GoalAchievement {
    type Error = anyhow::Error;

    fn try_from(record: AchievementRecord) -> Result<Self> {
        Ok(GoalAchievement {
            id: record.id,
            user_id: record.user_id,
            goal_id: record.goal_id,
            achieved_value: to_f64(record.achieved_value)?,
            achieved_at: record.achieved_at,
        })
    }
}

/// Achievement repository
pub struct AchievementRepository;

impl AchievementRepository {
    /// Complete an active goal and record the achievement in one transaction.
    ///
    /// Returns `None` without writing anything when the goal is not active,
    /// so concurrent checks record at most one achievement per crossing.
    pub async fn complete_goal(
        pool: &PgPool,
        goal_id: Uuid,
        user_id: Uuid,
        achieved_value: f64,
    ) -> Result<Option<GoalAchievement>> {
        let mut tx = pool.begin().await?;

        let updated = sqlx::query(
            r#"
            UPDATE goals SET status = 'completed', updated_at = NOW()
            WHERE id = $1 AND user_id = $2 AND status = 'active'
            "#,
        )
        .bind(goal_id)
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

        if updated.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(None);
        }

        let record = sqlx::query_as::<_, AchievementRecord>(
            r#"
            INSERT INTO goal_achievements (user_id, goal_id, achieved_value)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, goal_id, achieved_value, achieved_at
            "#,
        )
        .bind(user_id)
        .bind(goal_id)
        .bind(to_decimal(achieved_value)?)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        GoalAchievement::try_from(record).map(Some)
    }

    /// Achievements of a user, newest first, optionally since a point in time
    pub async fn get_by_user(
        pool: &PgPool,
        user_id: Uuid,
        since: Option<DateTime<Utc>>,
    ) -> Result<Vec<GoalAchievement>> {
        let records = sqlx::query_as::<_, AchievementRecord>(
            r#"
            SELECT id, user_id, goal_id, achieved_value, achieved_at
            FROM goal_achievements
            WHERE user_id = $1 AND ($2::timestamptz IS NULL OR achieved_at >= $2)
            ORDER BY achieved_at DESC
            "#,
        )
        .bind(user_id)
        .bind(since)
        .fetch_all(pool)
        .await?;

        records.into_iter().map(GoalAchievement::try_from).collect()
    }
}
