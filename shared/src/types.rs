//! API request and response types

use crate::aggregation::PeriodAggregate;
use crate::consistency::ConsistencyReport;
use crate::goals::GoalProgress;
use crate::insights::{Insight, Milestone, Recommendation};
use crate::models::{Goal, GoalAchievement};
use crate::scoring::WellnessScores;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use validator::Validate;

// ============================================================================
// Query Types
// ============================================================================

/// Analytics time range query
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct AnalyticsQuery {
    /// Window length in days (defaults to 30)
    #[validate(range(min = 1, max = 365))]
    pub days: Option<u32>,
    /// `all` or comma-separated subject codes
    pub subjects: Option<String>,
}

/// Post-hoc filter applied to an insight report
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InsightFilterQuery {
    pub category: Option<String>,
    pub severity: Option<String>,
    pub actionable: Option<bool>,
}

/// Goal streak query
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GoalStreakQuery {
    pub goal_type: Option<String>,
}

/// Goal status change request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateGoalStatusRequest {
    pub status: String,
}

/// Activity streak write request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordActivityRequest {
    pub date: Option<NaiveDate>,
}

// ============================================================================
// Health Analytics Types
// ============================================================================

/// Water intake analytics (values in ml)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WaterAnalytics {
    #[serde(flatten)]
    pub aggregate: PeriodAggregate,
    pub recommended_daily_ml: f64,
}

/// Exercise analytics (values in steps)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExerciseAnalytics {
    #[serde(flatten)]
    pub aggregate: PeriodAggregate,
    pub average_steps: f64,
    pub total_duration_minutes: i64,
    /// Number of logged days per activity type
    pub activity_types: BTreeMap<String, usize>,
}

/// Menstrual period analytics (value 1 on a period day)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PeriodAnalytics {
    #[serde(flatten)]
    pub aggregate: PeriodAggregate,
    pub period_days: usize,
    pub cycle_starts: Vec<NaiveDate>,
    pub average_cycle_length: Option<f64>,
}

/// Bowel regularity analytics (value 1 on a positive day)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConstipationAnalytics {
    #[serde(flatten)]
    pub aggregate: PeriodAggregate,
    pub positive_rate: i64,
}

/// Kriya practice analytics (value 1 on a completed session)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct KriyaAnalytics {
    #[serde(flatten)]
    pub aggregate: PeriodAggregate,
    pub total_sessions: usize,
    pub consistency_rate: i64,
    pub consistency: ConsistencyReport,
}

/// Typing practice analytics (value 1 on a completed practice)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TypingAnalytics {
    #[serde(flatten)]
    pub aggregate: PeriodAggregate,
    pub completion_rate: i64,
    pub completed_count: usize,
    pub average_wpm: Option<f64>,
}

/// Health analytics summary
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HealthSummary {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub window_days: i64,
    pub metrics_tracked: usize,
    pub health_score: i64,
}

/// Health analytics response
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HealthAnalytics {
    pub water: Option<WaterAnalytics>,
    pub exercise: Option<ExerciseAnalytics>,
    pub period: Option<PeriodAnalytics>,
    pub constipation: Option<ConstipationAnalytics>,
    pub kriya: Option<KriyaAnalytics>,
    pub typing: Option<TypingAnalytics>,
    pub summary: HealthSummary,
}

impl HealthAnalytics {
    /// Number of health sub-metrics with data
    pub fn metrics_tracked(&self) -> usize {
        [
            self.water.is_some(),
            self.exercise.is_some(),
            self.period.is_some(),
            self.constipation.is_some(),
            self.kriya.is_some(),
            self.typing.is_some(),
        ]
        .iter()
        .filter(|present| **present)
        .count()
    }

    pub fn is_empty(&self) -> bool {
        self.metrics_tracked() == 0
    }
}

// ============================================================================
// Education Analytics Types
// ============================================================================

/// Study hours analytics (values in hours)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StudyHoursAnalytics {
    #[serde(flatten)]
    pub aggregate: PeriodAggregate,
    pub average_hours: f64,
    pub total_hours: f64,
    pub consistency: ConsistencyReport,
}

/// Progress of a single subject
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SubjectProgress {
    pub subject_code: String,
    pub subject_name: String,
    pub total_tasks: usize,
    pub completed_tasks: usize,
    pub task_completion_rate: i64,
    pub total_units: i32,
    pub completed_units: i32,
    pub unit_completion_rate: i64,
    /// Mean of task and unit completion (task rate alone without units)
    pub completion_rate: i64,
}

/// Completion of one task type
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TaskTypeStats {
    pub total: usize,
    pub completed: usize,
    pub completion_rate: i64,
}

/// Task completion analytics
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TaskCompletionAnalytics {
    pub total_tasks: usize,
    pub completed_tasks: usize,
    pub overall_completion_rate: i64,
    pub regular: TaskTypeStats,
    pub nptel: TaskTypeStats,
}

/// Education analytics summary
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EducationSummary {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub window_days: i64,
    pub subjects_tracked: usize,
    pub total_study_hours: f64,
    pub productivity_score: i64,
}

/// Education analytics response
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EducationAnalytics {
    pub study_hours: Option<StudyHoursAnalytics>,
    pub subject_progress: Vec<SubjectProgress>,
    pub task_completion: Option<TaskCompletionAnalytics>,
    pub summary: EducationSummary,
}

impl EducationAnalytics {
    pub fn is_empty(&self) -> bool {
        self.study_hours.is_none()
            && self.subject_progress.is_empty()
            && self.task_completion.is_none()
    }
}

// ============================================================================
// Insight Types
// ============================================================================

/// Ranked insight response
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InsightsResponse {
    pub insights: Vec<Insight>,
    pub recommendations: Vec<Recommendation>,
    pub milestones: Vec<Milestone>,
    pub scores: WellnessScores,
    pub generated_at: DateTime<Utc>,
    pub total_insights: usize,
    pub actionable_recommendations: usize,
}

// ============================================================================
// Goal Types
// ============================================================================

/// A goal together with its live progress
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GoalWithProgress {
    #[serde(flatten)]
    pub goal: Goal,
    pub progress: GoalProgress,
}

/// Progress of every active goal
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GoalProgressResponse {
    pub goals: Vec<GoalWithProgress>,
}

/// A goal that crossed its target during an achievement check
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AchievedGoal {
    #[serde(flatten)]
    pub goal: Goal,
    pub achievement: GoalAchievement,
    pub progress: GoalProgress,
}

/// Result of an achievement check
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AchievementCheckResponse {
    pub achieved: Vec<AchievedGoal>,
    pub count: usize,
}

// ============================================================================
// Streak Types
// ============================================================================

/// Activity streak as seen today
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ActivityStreak {
    pub activity_type: String,
    /// 0 once the last activity is older than yesterday
    pub current_streak: u32,
    pub longest_streak: u32,
    pub last_activity_date: Option<NaiveDate>,
}

/// All activity streaks of a user
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StreaksResponse {
    pub streaks: Vec<ActivityStreak>,
}
