//! Per-day metric values backing goal tracking
//!
//! Each `MetricSource` owns exactly one static query. All queries take the
//! same parameters (user, start, end) and return `(date, value)` rows in the
//! unit goal targets are expressed in.

use anyhow::Result;
use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;
use vitality_shared::{DateRange, MetricPoint, MetricSource};

/// One day of a metric
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct DailyValueRecord {
    pub date: NaiveDate,
    pub value: f64,
}

impl From<DailyValueRecord> for MetricPoint {
    fn from(record: DailyValueRecord) -> Self {
        MetricPoint::new(record.date, record.value)
    }
}

const WATER_SQL: &str = r#"
    SELECT date, amount_ml::float8 AS value
    FROM water_intake
    WHERE user_id = $1 AND date >= $2 AND date <= $3
    ORDER BY date ASC
"#;

const EXERCISE_STEPS_SQL: &str = r#"
    SELECT date, steps::float8 AS value
    FROM exercise_logs
    WHERE user_id = $1 AND date >= $2 AND date <= $3
    ORDER BY date ASC
"#;

const STUDY_HOURS_SQL: &str = r#"
    SELECT date, hours::float8 AS value
    FROM study_logs
    WHERE user_id = $1 AND date >= $2 AND date <= $3
    ORDER BY date ASC
"#;

const KRIYA_SESSIONS_SQL: &str = r#"
    SELECT date, (CASE WHEN completed THEN 1 ELSE 0 END)::float8 AS value
    FROM kriya_logs
    WHERE user_id = $1 AND date >= $2 AND date <= $3
    ORDER BY date ASC
"#;

const TYPING_COMPLETION_SQL: &str = r#"
    SELECT date, (CASE WHEN completed THEN 100 ELSE 0 END)::float8 AS value
    FROM typing_logs
    WHERE user_id = $1 AND date >= $2 AND date <= $3
    ORDER BY date ASC
"#;

const CONSTIPATION_POSITIVE_SQL: &str = r#"
    SELECT date, (CASE WHEN had_bowel_movement THEN 100 ELSE 0 END)::float8 AS value
    FROM constipation_logs
    WHERE user_id = $1 AND date >= $2 AND date <= $3
    ORDER BY date ASC
"#;

const TASK_COMPLETION_SQL: &str = r#"
    SELECT due_date AS date,
           (100.0 * COUNT(*) FILTER (WHERE completed) / COUNT(*))::float8 AS value
    FROM tasks
    WHERE user_id = $1 AND due_date >= $2 AND due_date <= $3
    GROUP BY due_date
    ORDER BY due_date ASC
"#;

/// Query owned by a metric source
pub fn daily_value_sql(source: MetricSource) -> &'static str {
    match source {
        MetricSource::Water => WATER_SQL,
        MetricSource::ExerciseSteps => EXERCISE_STEPS_SQL,
        MetricSource::StudyHours => STUDY_HOURS_SQL,
        MetricSource::KriyaSessions => KRIYA_SESSIONS_SQL,
        MetricSource::TypingCompletion => TYPING_COMPLETION_SQL,
        MetricSource::ConstipationPositive => CONSTIPATION_POSITIVE_SQL,
        MetricSource::TaskCompletion => TASK_COMPLETION_SQL,
    }
}

/// Daily value repository
pub struct DailyValueRepository;

impl DailyValueRepository {
    /// Daily values of one source within a date range, ascending
    pub async fn fetch(
        pool: &PgPool,
        user_id: Uuid,
        source: MetricSource,
        range: DateRange,
    ) -> Result<Vec<MetricPoint>> {
        let records = sqlx::query_as::<_, DailyValueRecord>(daily_value_sql(source))
            .bind(user_id)
            .bind(range.start)
            .bind(range.end)
            .fetch_all(pool)
            .await?;

        Ok(records.into_iter().map(MetricPoint::from).collect())
    }
}
