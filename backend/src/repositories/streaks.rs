//! Activity streak repository for database operations

use anyhow::Result;
use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;
use vitality_shared::StreakState;

/// Streak record from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct StreakRecord {
    pub user_id: Uuid,
    pub activity_type: String,
    pub current_streak: i32,
    pub longest_streak: i32,
    pub last_activity_date: Option<NaiveDate>,
}

impl From<StreakRecord> for StreakState {
    fn from(record: StreakRecord) -> Self {
        StreakState {
            user_id: record.user_id,
            activity_type: record.activity_type,
            current_streak: u32::try_from(record.current_streak).unwrap_or(0),
            longest_streak: u32::try_from(record.longest_streak).unwrap_or(0),
            last_activity_date: record.last_activity_date,
        }
    }
}

/// Activity streak repository
pub struct StreakRepository;

impl StreakRepository {
    /// Apply one activity to a streak in a single statement.
    ///
    /// Mirrors `StreakState::advance`: the same date leaves the row as is,
    /// the following day extends it, any other date restarts at 1.
    pub async fn record_activity(
        pool: &PgPool,
        user_id: Uuid,
        activity_type: &str,
        date: NaiveDate,
    ) -> Result<StreakState> {
        let record = sqlx::query_as::<_, StreakRecord>(
            r#"
            INSERT INTO activity_streaks
                (user_id, activity_type, current_streak, longest_streak, last_activity_date)
            VALUES ($1, $2, 1, 1, $3)
            ON CONFLICT (user_id, activity_type) DO UPDATE SET
                current_streak = CASE
                    WHEN EXCLUDED.last_activity_date = activity_streaks.last_activity_date
                        THEN activity_streaks.current_streak
                    WHEN EXCLUDED.last_activity_date = activity_streaks.last_activity_date + 1
                        THEN activity_streaks.current_streak + 1
                    ELSE 1
                END,
                longest_streak = GREATEST(
                    activity_streaks.longest_streak,
                    CASE
                        WHEN EXCLUDED.last_activity_date = activity_streaks.last_activity_date
                            THEN activity_streaks.current_streak
                        WHEN EXCLUDED.last_activity_date = activity_streaks.last_activity_date + 1
                            THEN activity_streaks.current_streak + 1
                        ELSE 1
                    END
                ),
                last_activity_date = EXCLUDED.last_activity_date,
                updated_at = NOW()
            RETURNING user_id, activity_type, current_streak, longest_streak, last_activity_date
            "#,
        )
        .bind(user_id)
        .bind(activity_type)
        .bind(date)
        .fetch_one(pool)
        .await?;

        Ok(record.into())
    }

    /// All streaks of a user ordered by activity type
    pub async fn get_by_user(pool: &PgPool, user_id: Uuid) -> Result<Vec<StreakState>> {
        let records = sqlx::query_as::<_, StreakRecord>(
            r#"
            SELECT user_id, activity_type, current_streak, longest_streak, last_activity_date
            FROM activity_streaks
            WHERE user_id = $1
            ORDER BY activity_type ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(records.into_iter().map(StreakState::from).collect())
    }
}
