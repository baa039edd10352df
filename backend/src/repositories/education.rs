//! Education repository for database operations

use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;
use uuid::Uuid;
use vitality_shared::DateRange;

/// Task type for regular coursework
pub const TASK_TYPE_REGULAR: &str = "regular";

/// Task type for NPTEL course assignments
pub const TASK_TYPE_NPTEL: &str = "nptel";

/// Daily study time
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct StudyLog {
    pub date: NaiveDate,
    pub hours: f64,
}

/// Task with a due date
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct TaskRecord {
    pub id: Uuid,
    pub subject_code: String,
    pub task_type: String,
    pub due_date: NaiveDate,
    pub completed: bool,
    pub completed_at: Option<DateTime<Utc>>,
}

/// Subject with unit progress
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct SubjectRecord {
    pub code: String,
    pub name: String,
    pub total_units: i32,
    pub completed_units: i32,
}

/// Education repository
pub struct EducationRepository;

impl EducationRepository {
    /// Study logs within a date range, ascending
    pub async fn study(pool: &PgPool, user_id: Uuid, range: DateRange) -> Result<Vec<StudyLog>> {
        let records = sqlx::query_as::<_, StudyLog>(
            r#"
            SELECT date, hours
            FROM study_logs
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

    /// Tasks due within a date range
    pub async fn tasks(pool: &PgPool, user_id: Uuid, range: DateRange) -> Result<Vec<TaskRecord>> {
        let records = sqlx::query_as::<_, TaskRecord>(
            r#"
            SELECT id, subject_code, task_type, due_date, completed, completed_at
            FROM tasks
            WHERE user_id = $1 AND due_date >= $2 AND due_date <= $3
            ORDER BY due_date ASC, id ASC
            "#,
        )
        .bind(user_id)
        .bind(range.start)
        .bind(range.end)
        .fetch_all(pool)
        .await?;

        Ok(records)
    }

    /// All subjects of a user ordered by code
    pub async fn subjects(pool: &PgPool, user_id: Uuid) -> Result<Vec<SubjectRecord>> {
        let records = sqlx::query_as::<_, SubjectRecord>(
            r#"
            SELECT code, name, total_units, completed_units
            FROM subjects
            WHERE user_id = $1
            ORDER BY code ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(records)
    }
}
