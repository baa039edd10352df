//! Health log repository for database operations
//!
//! One row per (user, date) in every table; the analytics layer only reads.

use anyhow::Result;
use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;
use vitality_shared::DateRange;

// ============================================================================
// Records
// ============================================================================

/// Daily water intake
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct WaterLog {
    pub date: NaiveDate,
    pub amount_ml: i32,
}

/// Daily exercise summary
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct ExerciseLog {
    pub date: NaiveDate,
    pub steps: i32,
    pub activity_type: String,
    pub duration_minutes: i32,
}

/// Menstrual period day
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct PeriodLog {
    pub date: NaiveDate,
    pub is_period_day: bool,
    pub flow: Option<String>,
}

/// Bowel regularity
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct ConstipationLog {
    pub date: NaiveDate,
    pub had_bowel_movement: bool,
}

/// Kriya practice session
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct KriyaLog {
    pub date: NaiveDate,
    pub completed: bool,
    pub duration_minutes: Option<i32>,
}

/// Typing practice session
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct TypingLog {
    pub date: NaiveDate,
    pub completed: bool,
    pub wpm: Option<f64>,
}

// ============================================================================
// Repository
// ============================================================================

/// Health log repository
pub struct HealthRepository;

impl HealthRepository {
    /// Water logs within a date range, ascending
    pub async fn water(pool: &PgPool, user_id: Uuid, range: DateRange) -> Result<Vec<WaterLog>> {
        let records = sqlx::query_as::<_, WaterLog>(
            r#"
            SELECT date, amount_ml
            FROM water_intake
            WHERE user_id = $1 AND date >= $2 AND date <= $3
            ORDER BY date ASC
            "#,
        )
        .bind(user_id)
        .bind(range.start)
        .bind(range.end)
        .fetch_all(pool)
        .await?;

        Ok(records)
    }

    /// Exercise logs within a date range, ascending
    pub async fn exercise(
        pool: &PgPool,
        user_id: Uuid,
        range: DateRange,
    ) -> Result<Vec<ExerciseLog>> {
        let records = sqlx::query_as::<_, ExerciseLog>(
            r#"
            SELECT date, steps, activity_type, duration_minutes
            FROM exercise_logs
            WHERE user_id = $1 AND date >= $2 AND date <= $3
            ORDER BY date ASC
            "#,
        )
        .bind(user_id)
        .bind(range.start)
        .bind(range.end)
        .fetch_all(pool)
        .await?;

        Ok(records)
    }

    /// Period logs within a date range, ascending
    pub async fn period(pool: &PgPool, user_id: Uuid, range: DateRange) -> Result<Vec<PeriodLog>> {
        let records = sqlx::query_as::<_, PeriodLog>(
            r#"
            SELECT date, is_period_day, flow
            FROM period_logs
            WHERE user_id = $1 AND date >= $2 AND date <= $3
            ORDER BY date ASC
            "#,
        )
        .bind(user_id)
        .bind(range.start)
        .bind(range.end)
        .fetch_all(pool)
        .await?;

        Ok(records)
    }

    /// Constipation logs within a date range, ascending
    pub async fn constipation(
        pool: &PgPool,
        user_id: Uuid,
        range: DateRange,
    ) -> Result<Vec<ConstipationLog>> {
        let records = sqlx::query_as::<_, ConstipationLog>(
            r#"
            SELECT date, had_bowel_movement
            FROM constipation_logs
            WHERE user_id = $1 AND date >= $2 AND date <= $3
            ORDER BY date ASC
            "#,
        )
        .bind(user_id)
        .bind(range.start)
        .bind(range.end)
        .fetch_all(pool)
        .await?;

        Ok(records)
    }

    /// Kriya logs within a date range, ascending
    pub async fn kriya(pool: &PgPool, user_id: Uuid, range: DateRange) -> Result<Vec<KriyaLog>> {
        let records = sqlx::query_as::<_, KriyaLog>(
            r#"
            SELECT date, completed, duration_minutes
            FROM kriya_logs
            WHERE user_id = $1 AND date >= $2 AND date <= $3
            ORDER BY date ASC
            "#,
        )
        .bind(user_id)
        .bind(range.start)
        .bind(range.end)
        .fetch_all(pool)
        .await?;

        Ok(records)
    }

    /// Typing logs within a date range, ascending
    pub async fn typing(pool: &PgPool, user_id: Uuid, range: DateRange) -> Result<Vec<TypingLog>> {
        let records = sqlx::query_as::<_, TypingLog>(
            r#"
            SELECT date, completed, wpm
            FROM typing_logs
            WHERE user_id = $1 AND date >= $2 AND date <= $3
            ORDER BY date ASC
            "#,
        )
        .bind(user_id)
        .bind(range.start)
        .bind(range.end)
        .fetch_all(pool)
        .await?;

        Ok(records)
    }
}
