//! Goal tracker service
//!
//! Provides business logic for:
//! - Current value of a goal metric over the lookback window
//! - Live progress of active goals
//! - Achievement detection, recorded at most once per goal
//! - Consecutive-day goal streaks
//! - Historical completion rates
//! - Goal status transitions

use crate::error::ApiError;
use crate::repositories::Store;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use metrics::counter;
use tracing::{debug, info};
use uuid::Uuid;
use vitality_shared::goals::{
    calculate_goal_streak, completion_stats, current_value, evaluate_progress, is_achieved,
    reduce_current_value,
};
use vitality_shared::types::{AchievedGoal, GoalWithProgress};
use vitality_shared::{
    DateRange, Goal, GoalCompletionStats, GoalProgress, GoalStatus, GoalStreak, GoalType,
    MetricKey, MetricPoint,
};

/// Goal tracker service
pub struct GoalTracker;

impl GoalTracker {
    /// Daily values of a goal metric over the `lookback`-day window ending today
    async fn lookback_values(
        store: &dyn Store,
        user_id: Uuid,
        metric: MetricKey,
        today: NaiveDate,
        lookback: u32,
    ) -> Result<Vec<MetricPoint>, ApiError> {
        let range = DateRange::trailing(today, lookback);
        store
            .daily_values(user_id, metric.descriptor().source, range)
            .await
            .map_err(ApiError::Internal)
    }

    /// Current value of a metric, reduced the way its registry entry says
    pub async fn compute_current_value(
        store: &dyn Store,
        user_id: Uuid,
        metric: MetricKey,
        today: NaiveDate,
        lookback: u32,
    ) -> Result<f64, ApiError> {
        let daily = Self::lookback_values(store, user_id, metric, today, lookback).await?;
        Ok(current_value(metric, &daily))
    }

    /// Progress of a single goal
    pub async fn evaluate_progress(
        store: &dyn Store,
        goal: &Goal,
        now: DateTime<Utc>,
        lookback: u32,
    ) -> Result<GoalProgress, ApiError> {
        let daily =
            Self::lookback_values(store, goal.user_id, goal.metric, now.date_naive(), lookback)
                .await?;
        Ok(evaluate_progress(goal, &daily, now))
    }

    /// Progress of every active goal, newest first
    pub async fn active_progress(
        store: &dyn Store,
        user_id: Uuid,
        now: DateTime<Utc>,
        lookback: u32,
    ) -> Result<Vec<GoalWithProgress>, ApiError> {
        let goals = store
            .goals(user_id, Some(GoalStatus::Active))
            .await
            .map_err(ApiError::Internal)?;

        let mut results = Vec::with_capacity(goals.len());
        for goal in goals {
            let progress = Self::evaluate_progress(store, &goal, now, lookback).await?;
            results.push(GoalWithProgress { goal, progress });
        }
        Ok(results)
    }

    /// Complete every active goal whose uncapped current value reached its target
    ///
    /// Completion is conditional on the goal still being active, so a goal
    /// raced by a concurrent check is reported by exactly one of them.
    pub async fn check_achievements(
        store: &dyn Store,
        user_id: Uuid,
        now: DateTime<Utc>,
        lookback: u32,
    ) -> Result<Vec<AchievedGoal>, ApiError> {
        let goals = store
            .goals(user_id, Some(GoalStatus::Active))
            .await
            .map_err(ApiError::Internal)?;
        debug!(%user_id, active = goals.len(), "Checking goal achievements");

        let mut achieved = Vec::new();
        for mut goal in goals {
            let daily =
                Self::lookback_values(store, user_id, goal.metric, now.date_naive(), lookback)
                    .await?;
            let value = reduce_current_value(goal.metric, &daily);
            if !is_achieved(value, goal.target) {
                continue;
            }

            let Some(achievement) = store
                .complete_goal(user_id, goal.id, value)
                .await
                .map_err(ApiError::Internal)?
            else {
                continue;
            };

            info!(
                %user_id,
                goal_id = %goal.id,
                metric = goal.metric.as_str(),
                value,
                target = goal.target,
                "Goal achieved"
            );
            counter!("vitality_goal_achievements_total", "goal_type" => goal.goal_type.as_str())
                .increment(1);

            let progress = evaluate_progress(&goal, &daily, now);
            goal.status = GoalStatus::Completed;
            goal.updated_at = achievement.achieved_at;
            achieved.push(AchievedGoal {
                goal,
                achievement,
                progress,
            });
        }
        Ok(achieved)
    }

    /// Consecutive days at or above the target of the newest goal for `metric`
    ///
    /// The goal type defaults to the metric's own type. Goals of any status
    /// count, so a completed goal keeps its streak visible.
    pub async fn calculate_streak(
        store: &dyn Store,
        user_id: Uuid,
        metric: MetricKey,
        goal_type: Option<GoalType>,
        today: NaiveDate,
        lookback: u32,
    ) -> Result<GoalStreak, ApiError> {
        let goal_type = goal_type.unwrap_or(metric.descriptor().goal_type);
        let goal = store
            .latest_goal(user_id, metric, Some(goal_type), None)
            .await
            .map_err(ApiError::Internal)?;

        let Some(goal) = goal else {
            return Ok(GoalStreak::empty(metric));
        };
        let daily = Self::lookback_values(store, user_id, metric, today, lookback).await?;
        Ok(calculate_goal_streak(&goal, &daily))
    }

    /// Completion rates over all goals plus the recent achievement log
    pub async fn historical_completion_rate(
        store: &dyn Store,
        user_id: Uuid,
        now: DateTime<Utc>,
        recent_days: u32,
    ) -> Result<GoalCompletionStats, ApiError> {
        let (goals, achievements) =
            tokio::try_join!(store.goals(user_id, None), store.achievements(user_id, None))
                .map_err(ApiError::Internal)?;
        let recent_since = now - Duration::days(i64::from(recent_days));
        Ok(completion_stats(&goals, &achievements, recent_since))
    }

    /// Move a goal to `status`
    pub async fn set_status(
        store: &dyn Store,
        user_id: Uuid,
        goal_id: Uuid,
        status: GoalStatus,
    ) -> Result<Goal, ApiError> {
        let goal = store
            .goal(user_id, goal_id)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound("Goal not found".to_string()))?;

        goal.status.ensure_transition(status)?;

        let updated = store
            .set_goal_status(user_id, goal_id, goal.status, status)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::Conflict("Goal status changed concurrently".to_string()))?;

        info!(
            %user_id,
            %goal_id,
            from = goal.status.as_str(),
            to = status.as_str(),
            "Goal status changed"
        );
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::{GoalStore, InMemoryStore, StudyLog, WaterLog};
    use vitality_shared::{NewGoal, ProgressStatus};

    fn today() -> NaiveDate {
        Utc::now().date_naive()
    }

    fn days_ago(n: i64) -> NaiveDate {
        today() - Duration::days(n)
    }

    async fn seed_goal(store: &InMemoryStore, user_id: Uuid, metric: MetricKey, target: f64) -> Goal {
        store
            .create_goal(NewGoal {
                user_id,
                goal_type: metric.descriptor().goal_type,
                metric,
                target,
                description: None,
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_current_value_uses_registry_reduction() {
        let store = InMemoryStore::new();
        let user = Uuid::new_v4();
        for (n, ml) in [(0, 1500), (1, 2500)] {
            store.upsert_water(user, WaterLog { date: days_ago(n), amount_ml: ml }).await;
        }

        let value =
            GoalTracker::compute_current_value(&store, user, MetricKey::WaterIntake, today(), 30)
                .await
                .unwrap();
        assert_eq!(value, 2000.0);
    }

    #[tokio::test]
    async fn test_check_achievements_is_idempotent() {
        let store = InMemoryStore::new();
        let user = Uuid::new_v4();
        let goal = seed_goal(&store, user, MetricKey::WaterIntake, 2000.0).await;
        let pending = seed_goal(&store, user, MetricKey::StudyHours, 6.0).await;
        store.upsert_water(user, WaterLog { date: today(), amount_ml: 2400 }).await;
        store.upsert_study(user, StudyLog { date: today(), hours: 2.0 }).await;

        let first = GoalTracker::check_achievements(&store, user, Utc::now(), 30)
            .await
            .unwrap();
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].goal.id, goal.id);
        assert_eq!(first[0].goal.status, GoalStatus::Completed);
        assert_eq!(first[0].achievement.achieved_value, 2400.0);
        assert_eq!(first[0].progress.progress_status, ProgressStatus::Achieved);

        let second = GoalTracker::check_achievements(&store, user, Utc::now(), 30)
            .await
            .unwrap();
        assert!(second.is_empty());

        let remaining = GoalTracker::active_progress(&store, user, Utc::now(), 30)
            .await
            .unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].goal.id, pending.id);
        assert_eq!(remaining[0].progress.progress, 33);
    }

    #[tokio::test]
    async fn test_mean_just_below_target_is_not_achieved() {
        let store = InMemoryStore::new();
        let user = Uuid::new_v4();
        let goal = seed_goal(&store, user, MetricKey::StudyHours, 4.0).await;
        for (n, hours) in [(0, 3.99), (1, 4.0), (2, 4.0)] {
            store.upsert_study(user, StudyLog { date: days_ago(n), hours }).await;
        }

        let achieved = GoalTracker::check_achievements(&store, user, Utc::now(), 30)
            .await
            .unwrap();
        assert!(achieved.is_empty());

        let stored = store.goal(user, goal.id).await.unwrap().unwrap();
        assert_eq!(stored.status, GoalStatus::Active);
        assert!(store.achievements(user, None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_streak_without_goal_is_empty() {
        let store = InMemoryStore::new();
        let streak = GoalTracker::calculate_streak(
            &store,
            Uuid::new_v4(),
            MetricKey::StudyHours,
            None,
            today(),
            30,
        )
        .await
        .unwrap();
        assert_eq!(streak, GoalStreak::empty(MetricKey::StudyHours));
    }

    #[tokio::test]
    async fn test_streak_counts_days_at_target() {
        let store = InMemoryStore::new();
        let user = Uuid::new_v4();
        seed_goal(&store, user, MetricKey::StudyHours, 3.0).await;
        for (n, hours) in [(0, 3.5), (1, 4.0), (2, 1.0), (3, 5.0), (4, 5.0), (5, 5.0)] {
            store.upsert_study(user, StudyLog { date: days_ago(n), hours }).await;
        }

        let streak =
            GoalTracker::calculate_streak(&store, user, MetricKey::StudyHours, None, today(), 30)
                .await
                .unwrap();
        assert_eq!(streak.current_streak, 2);
        assert_eq!(streak.longest_streak, 3);
        assert_eq!(streak.target, Some(3.0));
    }

    #[tokio::test]
    async fn test_invalid_transition_is_conflict() {
        let store = InMemoryStore::new();
        let user = Uuid::new_v4();
        let goal = seed_goal(&store, user, MetricKey::KriyaSessions, 20.0).await;

        let paused = GoalTracker::set_status(&store, user, goal.id, GoalStatus::Paused)
            .await
            .unwrap();
        assert_eq!(paused.status, GoalStatus::Paused);

        let err = GoalTracker::set_status(&store, user, goal.id, GoalStatus::Completed)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Conflict(_)));

        let missing = GoalTracker::set_status(&store, user, Uuid::new_v4(), GoalStatus::Active)
            .await
            .unwrap_err();
        assert!(matches!(missing, ApiError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_completion_rate_counts_all_goals() {
        let store = InMemoryStore::new();
        let user = Uuid::new_v4();
        seed_goal(&store, user, MetricKey::WaterIntake, 1000.0).await;
        seed_goal(&store, user, MetricKey::ExerciseSteps, 10000.0).await;
        store.upsert_water(user, WaterLog { date: today(), amount_ml: 1200 }).await;
        GoalTracker::check_achievements(&store, user, Utc::now(), 30)
            .await
            .unwrap();

        let stats = GoalTracker::historical_completion_rate(&store, user, Utc::now(), 30)
            .await
            .unwrap();
        assert_eq!(stats.overall.total, 2);
        assert_eq!(stats.overall.completed, 1);
        assert_eq!(stats.recent_achievements.len(), 1);
    }
}
