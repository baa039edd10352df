//! Goal progress calculations
//!
//! Pure functions behind goal tracking: progress percentage and status,
//! the goal streak walk and historical completion statistics.

use crate::metrics::{MetricKey, MetricPoint};
use crate::models::{Goal, GoalAchievement, GoalStatus, GoalType};
use crate::stats::{mean, percentage, round_half_up, round_to};
use crate::trend::{calculate_trend, Trend};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use uuid::Uuid;

/// Progress classification
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ProgressStatus {
    NeedsAttention,
    Behind,
    OnTrack,
    Achieved,
}

/// Derived progress of one goal
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GoalProgress {
    pub current_value: f64,
    /// Display progress, always within 0..=100
    pub progress: i64,
    pub progress_status: ProgressStatus,
    pub trend: Trend,
    pub trend_percentage: i64,
    pub days_since_creation: i64,
}

/// Progress percentage capped to 0..=100; a non-positive target reports 0
pub fn calculate_progress(current_value: f64, target: f64) -> i64 {
    if target <= 0.0 {
        return 0;
    }
    round_half_up(current_value / target * 100.0).clamp(0, 100)
}

/// Classify a display progress percentage
pub fn classify_progress(progress: i64) -> ProgressStatus {
    match progress {
        p if p >= 100 => ProgressStatus::Achieved,
        p if p >= 80 => ProgressStatus::OnTrack,
        p if p >= 50 => ProgressStatus::Behind,
        _ => ProgressStatus::NeedsAttention,
    }
}

/// Achievement uses the raw value, never the capped display percentage
pub fn is_achieved(current_value: f64, target: f64) -> bool {
    current_value >= target
}

/// Unrounded reduction of a metric's trailing daily values
///
/// Achievement checks compare this value; only responses are rounded.
pub fn reduce_current_value(metric: MetricKey, daily: &[MetricPoint]) -> f64 {
    let values: Vec<f64> = daily.iter().map(|p| p.value).collect();
    metric.descriptor().reduction.apply(&values)
}

/// Current value of a metric rounded for display
pub fn current_value(metric: MetricKey, daily: &[MetricPoint]) -> f64 {
    round_to(reduce_current_value(metric, daily), 2)
}

/// Evaluate a goal against its trailing daily values
///
/// A value just short of the target never displays as 100 or achieved.
pub fn evaluate_progress(goal: &Goal, daily: &[MetricPoint], now: DateTime<Utc>) -> GoalProgress {
    let raw = reduce_current_value(goal.metric, daily);
    let mut progress = calculate_progress(raw, goal.target);
    if !is_achieved(raw, goal.target) {
        progress = progress.min(99);
    }
    let values: Vec<f64> = daily.iter().map(|p| p.value).collect();
    let trend = calculate_trend(&values);

    GoalProgress {
        current_value: round_to(raw, 2),
        progress,
        progress_status: classify_progress(progress),
        trend: trend.trend,
        trend_percentage: trend.percentage,
        days_since_creation: (now - goal.created_at).num_days().max(0),
    }
}

/// Streak of days meeting a goal target
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GoalStreak {
    pub goal_id: Option<Uuid>,
    pub metric: MetricKey,
    pub target: Option<f64>,
    pub current_streak: usize,
    pub longest_streak: usize,
    pub last_achieved_date: Option<NaiveDate>,
    pub days_evaluated: usize,
}

impl GoalStreak {
    /// Result for a metric without a matching goal
    pub fn empty(metric: MetricKey) -> Self {
        Self {
            goal_id: None,
            metric,
            target: None,
            current_streak: 0,
            longest_streak: 0,
            last_achieved_date: None,
            days_evaluated: 0,
        }
    }
}

/// Walk daily values from newest to oldest counting days at or above target.
///
/// Only the run that ends on the newest point is the current streak: when the
/// newest point misses the target the current streak is 0 even if an older
/// run was longer. Days without a point are skipped, not failed.
pub fn calculate_goal_streak(
    goal: &Goal,
    daily: &[MetricPoint],
) -> GoalStreak {
    let mut points = daily.to_vec();
    points.sort_by_key(|p| p.date);

    let mut running = 0usize;
    let mut longest = 0usize;
    let mut current: Option<usize> = None;
    let mut last_achieved_date = None;

    for point in points.iter().rev() {
        if point.value >= goal.target {
            running += 1;
            if last_achieved_date.is_none() {
                last_achieved_date = Some(point.date);
            }
        } else {
            if current.is_none() {
                current = Some(running);
            }
            longest = longest.max(running);
            running = 0;
        }
    }
    longest = longest.max(running);

    GoalStreak {
        goal_id: Some(goal.id),
        metric: goal.metric,
        target: Some(goal.target),
        current_streak: current.unwrap_or(running),
        longest_streak: longest,
        last_achieved_date,
        days_evaluated: points.len(),
    }
}

/// Completed / total ratio
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CompletionRate {
    pub total: usize,
    pub completed: usize,
    pub rate: i64,
}

impl CompletionRate {
    fn from_goals<'a>(goals: impl Iterator<Item = &'a Goal>) -> Self {
        let (total, completed) = goals.fold((0, 0), |(t, c), g| {
            (t + 1, c + usize::from(g.status == GoalStatus::Completed))
        });
        Self {
            total,
            completed,
            rate: percentage(completed as f64, total as f64),
        }
    }
}

/// All-time goal completion statistics
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GoalCompletionStats {
    pub overall: CompletionRate,
    pub by_type: BTreeMap<GoalType, CompletionRate>,
    pub recent_achievements: Vec<GoalAchievement>,
    pub average_days_to_complete: f64,
}

/// Completion statistics over all goals of a user
///
/// `recent_since` bounds the achievement log only; rates are all-time.
/// A goal completed through a status change has no achievement row, so its
/// days to complete run to `updated_at`.
pub fn completion_stats(
    goals: &[Goal],
    achievements: &[GoalAchievement],
    recent_since: DateTime<Utc>,
) -> GoalCompletionStats {
    let by_type = [GoalType::Health, GoalType::Education]
        .into_iter()
        .map(|t| (t, CompletionRate::from_goals(goals.iter().filter(|g| g.goal_type == t))))
        .collect();

    let mut latest: HashMap<Uuid, &GoalAchievement> = HashMap::new();
    for achievement in achievements {
        latest
            .entry(achievement.goal_id)
            .and_modify(|a| {
                if achievement.achieved_at > a.achieved_at {
                    *a = achievement;
                }
            })
            .or_insert(achievement);
    }

    let days_to_complete: Vec<f64> = goals
        .iter()
        .filter(|g| g.status == GoalStatus::Completed)
        .map(|g| {
            let completed_at = latest.get(&g.id).map_or(g.updated_at, |a| a.achieved_at);
            (completed_at - g.created_at).num_days() as f64
        })
        .collect();

    let mut recent_achievements: Vec<GoalAchievement> = achievements
        .iter()
        .filter(|a| a.achieved_at >= recent_since)
        .cloned()
        .collect();
    recent_achievements.sort_by(|a, b| b.achieved_at.cmp(&a.achieved_at));

    GoalCompletionStats {
        overall: CompletionRate::from_goals(goals.iter()),
        by_type,
        recent_achievements,
        average_days_to_complete: round_to(mean(&days_to_complete), 1),
    }
}
