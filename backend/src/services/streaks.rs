//! Activity streak service

use crate::error::ApiError;
use crate::repositories::Store;
use chrono::NaiveDate;
use metrics::counter;
use tracing::info;
use uuid::Uuid;
use vitality_shared::types::{ActivityStreak, StreaksResponse};
use vitality_shared::validation::validate_activity_type;
use vitality_shared::StreakState;

/// Activity streak service
pub struct StreakService;

impl StreakService {
    /// Record one activity on `date` and return the streak as seen on `today`
    pub async fn record_activity(
        store: &dyn Store,
        user_id: Uuid,
        activity_type: &str,
        date: NaiveDate,
        today: NaiveDate,
    ) -> Result<ActivityStreak, ApiError> {
        validate_activity_type(activity_type)?;
        if date > today {
            return Err(ApiError::Validation(
                "Activity date cannot be in the future".to_string(),
            ));
        }

        let state = store
            .record_activity(user_id, activity_type, date)
            .await
            .map_err(ApiError::Internal)?;

        counter!("vitality_streak_updates_total").increment(1);
        info!(
            %user_id,
            activity_type,
            current = state.current_streak,
            longest = state.longest_streak,
            "Activity recorded"
        );

        Ok(view(&state, today))
    }

    /// Every streak of a user, lapsed streaks reported with a current value of 0
    pub async fn get_streaks(
        store: &dyn Store,
        user_id: Uuid,
        today: NaiveDate,
    ) -> Result<StreaksResponse, ApiError> {
        let mut streaks: Vec<ActivityStreak> = store
            .streaks(user_id)
            .await
            .map_err(ApiError::Internal)?
            .iter()
            .map(|s| view(s, today))
            .collect();
        streaks.sort_by(|a, b| a.activity_type.cmp(&b.activity_type));

        Ok(StreaksResponse { streaks })
    }
}

fn view(state: &StreakState, today: NaiveDate) -> ActivityStreak {
    ActivityStreak {
        activity_type: state.activity_type.clone(),
        current_streak: state.live_current(today),
        longest_streak: state.longest_streak,
        last_activity_date: state.last_activity_date,
    }
}
