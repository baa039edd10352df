//! Milestones derived from persisted state rather than aggregates

use super::{InsightSet, MilestoneKind};
use crate::models::{Goal, GoalAchievement, StreakState};
use chrono::{DateTime, NaiveDate, Utc};
use std::collections::HashMap;
use uuid::Uuid;

/// Streak lengths worth celebrating, ascending
pub const STREAK_MILESTONES: [u32; 5] = [7, 14, 30, 60, 100];

/// Highest streak milestone reached by `streak`, if any
pub fn streak_milestone(streak: u32) -> Option<u32> {
    STREAK_MILESTONES.iter().rev().copied().find(|m| streak >= *m)
}

/// One milestone per live activity streak at or past a threshold
pub fn streak_milestones(streaks: &[StreakState], today: NaiveDate, now: DateTime<Utc>) -> InsightSet {
    let mut set = InsightSet::at(now);
    for streak in streaks {
        let current = streak.live_current(today);
        if let Some(reached) = streak_milestone(current) {
            set.milestone(
                MilestoneKind::Achievement,
                &streak.activity_type,
                "flame",
                format!(
                    "{} day {} streak",
                    reached,
                    streak.activity_type.replace('_', " ")
                ),
            );
        }
    }
    set
}

/// One milestone per recorded goal achievement
pub fn achievement_milestones(
    achievements: &[GoalAchievement],
    goals: &[Goal],
    now: DateTime<Utc>,
) -> InsightSet {
    let by_id: HashMap<Uuid, &Goal> = goals.iter().map(|g| (g.id, g)).collect();
    let mut set = InsightSet::at(now);

    for achievement in achievements {
        let Some(goal) = by_id.get(&achievement.goal_id) else {
            continue;
        };
        let descriptor = goal.metric.descriptor();
        set.milestone(
            MilestoneKind::GoalAchievement,
            goal.goal_type.as_str(),
            "award",
            format!(
                "Goal achieved: {} reached {} (target {})",
                descriptor.label,
                trim_number(achievement.achieved_value),
                trim_number(goal.target)
            ),
        );
    }
    set
}

fn trim_number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        format!("{:.2}", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::insights::fixtures::now;
    use crate::metrics::MetricKey;
    use crate::models::{GoalStatus, GoalType};

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, day).unwrap()
    }

    fn streak(activity: &str, current: u32, last: NaiveDate) -> StreakState {
        StreakState {
            user_id: Uuid::nil(),
            activity_type: activity.to_string(),
            current_streak: current,
            longest_streak: current,
            last_activity_date: Some(last),
        }
    }

    #[test]
    fn test_streak_milestone_thresholds() {
        assert_eq!(streak_milestone(6), None);
        assert_eq!(streak_milestone(7), Some(7));
        assert_eq!(streak_milestone(29), Some(14));
        assert_eq!(streak_milestone(150), Some(100));
    }

    #[test]
    fn test_lapsed_streak_has_no_milestone() {
        let streaks = vec![
            streak("study", 10, d(10)),
            streak("kriya", 30, d(5)),
        ];
        let set = streak_milestones(&streaks, d(10), now());
        assert_eq!(set.milestones.len(), 1);
        assert_eq!(set.milestones[0].message, "7 day study streak");
        assert_eq!(set.milestones[0].kind, MilestoneKind::Achievement);
    }

    #[test]
    fn test_achievement_milestones_skip_unknown_goals() {
        let goal = Goal {
            id: Uuid::new_v4(),
            user_id: Uuid::nil(),
            goal_type: GoalType::Health,
            metric: MetricKey::WaterIntake,
            target: 2000.0,
            description: None,
            status: GoalStatus::Completed,
            created_at: now(),
            updated_at: now(),
        };
        let achievements = vec![
            GoalAchievement {
                id: Uuid::new_v4(),
                user_id: Uuid::nil(),
                goal_id: goal.id,
                achieved_value: 2150.5,
                achieved_at: now(),
            },
            GoalAchievement {
                id: Uuid::new_v4(),
                user_id: Uuid::nil(),
                goal_id: Uuid::new_v4(),
                achieved_value: 1.0,
                achieved_at: now(),
            },
        ];

        let set = achievement_milestones(&achievements, &[goal], now());
        assert_eq!(set.milestones.len(), 1);
        assert_eq!(set.milestones[0].kind, MilestoneKind::GoalAchievement);
        assert_eq!(
            set.milestones[0].message,
            "Goal achieved: water intake reached 2150.50 (target 2000)"
        );
    }
}
