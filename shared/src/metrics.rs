//! Metric registry
//!
//! Every goal-capable metric is described once here: which domain it belongs
//! to, which daily source feeds it, how the trailing window is reduced to a
//! single value and the recommended daily target used by the insight rules.
//! Callers iterate the registry instead of branching on metric names.

use crate::errors::DomainError;
use crate::models::GoalType;
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Recommended daily water intake in ml
pub const RECOMMENDED_WATER_ML: f64 = 2000.0;

/// Recommended daily step count
pub const RECOMMENDED_STEPS: f64 = 8000.0;

/// Recommended daily study hours
pub const RECOMMENDED_STUDY_HOURS: f64 = 4.0;

/// Supported goal metric keys
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum MetricKey {
    WaterIntake,
    ExerciseSteps,
    StudyHours,
    KriyaSessions,
    TypingCompletionRate,
    ConstipationPositiveRate,
    TaskCompletionRate,
    DailyStudyHours,
}

impl MetricKey {
    pub const ALL: [MetricKey; 8] = [
        MetricKey::WaterIntake,
        MetricKey::ExerciseSteps,
        MetricKey::StudyHours,
        MetricKey::KriyaSessions,
        MetricKey::TypingCompletionRate,
        MetricKey::ConstipationPositiveRate,
        MetricKey::TaskCompletionRate,
        MetricKey::DailyStudyHours,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MetricKey::WaterIntake => "water_intake",
            MetricKey::ExerciseSteps => "exercise_steps",
            MetricKey::StudyHours => "study_hours",
            MetricKey::KriyaSessions => "kriya_sessions",
            MetricKey::TypingCompletionRate => "typing_completion_rate",
            MetricKey::ConstipationPositiveRate => "constipation_positive_rate",
            MetricKey::TaskCompletionRate => "task_completion_rate",
            MetricKey::DailyStudyHours => "daily_study_hours",
        }
    }

    /// Registry entry for this metric
    pub fn descriptor(&self) -> &'static MetricDescriptor {
        // REGISTRY is ordered like `ALL`
        &REGISTRY[*self as usize]
    }
}

impl fmt::Display for MetricKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MetricKey {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MetricKey::ALL
            .iter()
            .copied()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| DomainError::UnknownMetric(s.to_string()))
    }
}

/// Daily value source backing one or more metric keys
///
/// A store resolves each source to one fixed query; the per-day value is
/// already in the unit the goal target is expressed in.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum MetricSource {
    /// ml of water per day
    Water,
    /// steps per day
    ExerciseSteps,
    /// study hours per day
    StudyHours,
    /// 1 when a kriya session was completed that day
    KriyaSessions,
    /// 100 when typing practice was completed that day, else 0
    TypingCompletion,
    /// 100 on a positive (regular) day, else 0
    ConstipationPositive,
    /// percentage of tasks due that day which are completed
    TaskCompletion,
}

/// How a trailing window of daily values collapses into a current value
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Reduction {
    Average,
    Sum,
}

impl Reduction {
    /// Reduce daily values; an empty window reduces to 0
    pub fn apply(&self, values: &[f64]) -> f64 {
        if values.is_empty() {
            return 0.0;
        }
        let sum: f64 = values.iter().sum();
        match self {
            Reduction::Average => sum / values.len() as f64,
            Reduction::Sum => sum,
        }
    }
}

/// Static description of a goal metric
#[derive(Debug, Clone, PartialEq)]
pub struct MetricDescriptor {
    pub key: MetricKey,
    pub goal_type: GoalType,
    pub source: MetricSource,
    pub reduction: Reduction,
    pub recommended_target: Option<f64>,
    pub label: &'static str,
}

static REGISTRY: [MetricDescriptor; 8] = [
    MetricDescriptor {
        key: MetricKey::WaterIntake,
        goal_type: GoalType::Health,
        source: MetricSource::Water,
        reduction: Reduction::Average,
        recommended_target: Some(RECOMMENDED_WATER_ML),
        label: "water intake",
    },
    MetricDescriptor {
        key: MetricKey::ExerciseSteps,
        goal_type: GoalType::Health,
        source: MetricSource::ExerciseSteps,
        reduction: Reduction::Average,
        recommended_target: Some(RECOMMENDED_STEPS),
        label: "daily steps",
    },
    MetricDescriptor {
        key: MetricKey::StudyHours,
        goal_type: GoalType::Education,
        source: MetricSource::StudyHours,
        reduction: Reduction::Average,
        recommended_target: Some(RECOMMENDED_STUDY_HOURS),
        label: "study hours",
    },
    MetricDescriptor {
        key: MetricKey::KriyaSessions,
        goal_type: GoalType::Health,
        source: MetricSource::KriyaSessions,
        reduction: Reduction::Sum,
        recommended_target: None,
        label: "kriya sessions",
    },
    MetricDescriptor {
        key: MetricKey::TypingCompletionRate,
        goal_type: GoalType::Health,
        source: MetricSource::TypingCompletion,
        reduction: Reduction::Average,
        recommended_target: Some(80.0),
        label: "typing completion rate",
    },
    MetricDescriptor {
        key: MetricKey::ConstipationPositiveRate,
        goal_type: GoalType::Health,
        source: MetricSource::ConstipationPositive,
        reduction: Reduction::Average,
        recommended_target: Some(80.0),
        label: "digestive regularity",
    },
    MetricDescriptor {
        key: MetricKey::TaskCompletionRate,
        goal_type: GoalType::Education,
        source: MetricSource::TaskCompletion,
        reduction: Reduction::Average,
        recommended_target: Some(75.0),
        label: "task completion rate",
    },
    MetricDescriptor {
        key: MetricKey::DailyStudyHours,
        goal_type: GoalType::Education,
        source: MetricSource::StudyHours,
        reduction: Reduction::Average,
        recommended_target: Some(RECOMMENDED_STUDY_HOURS),
        label: "daily study hours",
    },
];

/// All registered metrics
pub fn registry() -> &'static [MetricDescriptor] {
    &REGISTRY
}

/// One point of a metric series
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct MetricPoint {
    pub date: NaiveDate,
    pub value: f64,
}

impl MetricPoint {
    pub fn new(date: NaiveDate, value: f64) -> Self {
        Self { date, value }
    }
}

/// Inclusive date range
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// The `days`-day window ending on `today` (inclusive)
    pub fn trailing(today: NaiveDate, days: u32) -> Self {
        let span = i64::from(days.max(1)) - 1;
        Self {
            start: today - Duration::days(span),
            end: today,
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// Number of calendar days covered
    pub fn len_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_matches_key_order() {
        for key in MetricKey::ALL {
            assert_eq!(key.descriptor().key, key);
        }
        assert_eq!(registry().len(), MetricKey::ALL.len());
    }

    #[test]
    fn test_metric_key_round_trips_through_str() {
        for key in MetricKey::ALL {
            assert_eq!(key.as_str().parse::<MetricKey>().unwrap(), key);
        }
        assert!("sleep_hours".parse::<MetricKey>().is_err());
    }

    #[test]
    fn test_study_aliases_share_source() {
        assert_eq!(
            MetricKey::StudyHours.descriptor().source,
            MetricKey::DailyStudyHours.descriptor().source
        );
    }

    #[test]
    fn test_reduction_empty_is_zero() {
        assert_eq!(Reduction::Average.apply(&[]), 0.0);
        assert_eq!(Reduction::Sum.apply(&[]), 0.0);
        assert_eq!(Reduction::Average.apply(&[1.0, 3.0]), 2.0);
        assert_eq!(Reduction::Sum.apply(&[1.0, 1.0, 1.0]), 3.0);
    }

    #[test]
    fn test_trailing_range() {
        let today = NaiveDate::from_ymd_opt(2024, 1, 30).unwrap();
        let range = DateRange::trailing(today, 30);
        assert_eq!(range.start, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(range.len_days(), 30);
        assert!(range.contains(today));
    }
}
