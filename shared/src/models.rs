//! Data models for the Vitality application

use crate::errors::DomainError;
use crate::metrics::MetricKey;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Goal status
///
/// `active → completed` is terminal unless a user resets the goal,
/// `active ⇄ paused` is user-driven.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum GoalStatus {
    Active,
    Completed,
    Paused,
}

impl GoalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            GoalStatus::Active => "active",
            GoalStatus::Completed => "completed",
            GoalStatus::Paused => "paused",
        }
    }

    /// Check whether a goal may move from this status to `to`
    pub fn ensure_transition(self, to: GoalStatus) -> Result<(), DomainError> {
        use GoalStatus::*;
        match (self, to) {
            (Active, Completed) | (Active, Paused) | (Paused, Active) | (Completed, Active) => {
                Ok(())
            }
            _ => Err(DomainError::InvalidGoalTransition {
                from: self.to_string(),
                to: to.to_string(),
            }),
        }
    }
}

impl fmt::Display for GoalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GoalStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "active" => Ok(GoalStatus::Active),
            "completed" => Ok(GoalStatus::Completed),
            "paused" => Ok(GoalStatus::Paused),
            other => Err(DomainError::UnknownGoalStatus(other.to_string())),
        }
    }
}

/// Goal type (which tracking domain a goal belongs to)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum GoalType {
    Health,
    Education,
}

impl GoalType {
    pub fn as_str(&self) -> &'static str {
        match self {
            GoalType::Health => "health",
            GoalType::Education => "education",
        }
    }
}

impl fmt::Display for GoalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GoalType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "health" => Ok(GoalType::Health),
            "education" => Ok(GoalType::Education),
            other => Err(DomainError::UnknownGoalType(other.to_string())),
        }
    }
}

/// User-defined goal
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Goal {
    pub id: Uuid,
    pub user_id: Uuid,
    pub goal_type: GoalType,
    pub metric: MetricKey,
    pub target: f64,
    pub description: Option<String>,
    pub status: GoalStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a goal
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewGoal {
    pub user_id: Uuid,
    pub goal_type: GoalType,
    pub metric: MetricKey,
    pub target: f64,
    pub description: Option<String>,
}

/// Recorded crossing of a goal target
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GoalAchievement {
    pub id: Uuid,
    pub user_id: Uuid,
    pub goal_id: Uuid,
    pub achieved_value: f64,
    pub achieved_at: DateTime<Utc>,
}

/// Persisted activity streak for one (user, activity type)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StreakState {
    pub user_id: Uuid,
    pub activity_type: String,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub last_activity_date: Option<NaiveDate>,
}

impl StreakState {
    /// Empty streak for a user and activity
    pub fn new(user_id: Uuid, activity_type: impl Into<String>) -> Self {
        Self {
            user_id,
            activity_type: activity_type.into(),
            current_streak: 0,
            longest_streak: 0,
            last_activity_date: None,
        }
    }

    /// Apply an activity on `date`.
    ///
    /// Same day is a no-op, the following day extends the streak, anything
    /// else (a gap, or a backfilled older date) starts over at 1 from `date`.
    /// `longest_streak` never decreases.
    pub fn advance(&mut self, date: NaiveDate) {
        match self.last_activity_date {
            Some(last) if last == date => return,
            Some(last) if (date - last).num_days() == 1 => self.current_streak += 1,
            _ => self.current_streak = 1,
        }
        self.last_activity_date = Some(date);
        self.longest_streak = self.longest_streak.max(self.current_streak);
    }

    /// Current streak as seen on `today`: a streak whose last activity is
    /// older than yesterday has lapsed.
    pub fn live_current(&self, today: NaiveDate) -> u32 {
        match self.last_activity_date {
            Some(last) if (today - last).num_days() <= 1 => self.current_streak,
            _ => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, day).unwrap()
    }

    #[test]
    fn test_goal_transitions() {
        assert!(GoalStatus::Active.ensure_transition(GoalStatus::Completed).is_ok());
        assert!(GoalStatus::Active.ensure_transition(GoalStatus::Paused).is_ok());
        assert!(GoalStatus::Paused.ensure_transition(GoalStatus::Active).is_ok());
        assert!(GoalStatus::Completed.ensure_transition(GoalStatus::Active).is_ok());
        assert!(GoalStatus::Completed.ensure_transition(GoalStatus::Paused).is_err());
        assert!(GoalStatus::Paused.ensure_transition(GoalStatus::Completed).is_err());
        assert!(GoalStatus::Active.ensure_transition(GoalStatus::Active).is_err());
    }

    #[test]
    fn test_status_parsing() {
        assert_eq!("Paused".parse::<GoalStatus>().unwrap(), GoalStatus::Paused);
        assert!("abandoned".parse::<GoalStatus>().is_err());
        assert_eq!("education".parse::<GoalType>().unwrap(), GoalType::Education);
    }

    #[test]
    fn test_streak_advance_consecutive_days() {
        let mut streak = StreakState::new(Uuid::nil(), "water");
        streak.advance(d(1));
        streak.advance(d(2));
        streak.advance(d(2));
        streak.advance(d(3));
        assert_eq!(streak.current_streak, 3);
        assert_eq!(streak.longest_streak, 3);
        assert_eq!(streak.last_activity_date, Some(d(3)));
    }

    #[test]
    fn test_streak_resets_after_gap_but_keeps_longest() {
        let mut streak = StreakState::new(Uuid::nil(), "kriya");
        for day in 1..=4 {
            streak.advance(d(day));
        }
        streak.advance(d(7));
        assert_eq!(streak.current_streak, 1);
        assert_eq!(streak.longest_streak, 4);
    }

    #[test]
    fn test_streak_restarts_on_backfilled_date() {
        let mut streak = StreakState::new(Uuid::nil(), "typing");
        for day in 8..=10 {
            streak.advance(d(day));
        }
        streak.advance(d(5));
        assert_eq!(streak.current_streak, 1);
        assert_eq!(streak.longest_streak, 3);
        assert_eq!(streak.last_activity_date, Some(d(5)));

        streak.advance(d(6));
        assert_eq!(streak.current_streak, 2);
        assert_eq!(streak.longest_streak, 3);
    }

    #[test]
    fn test_live_current_lapses_after_yesterday() {
        let mut streak = StreakState::new(Uuid::nil(), "study");
        streak.advance(d(1));
        streak.advance(d(2));
        assert_eq!(streak.live_current(d(3)), 2);
        assert_eq!(streak.live_current(d(4)), 0);
    }
}
