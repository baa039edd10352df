//! Rule-based insight engine
//!
//! Each domain analyzer is a pure function from an analytics snapshot to an
//! `InsightSet`. Thresholds are fixed; nothing is learned from data.

pub mod correlation;
pub mod education;
pub mod health;
pub mod milestones;
pub mod ranking;
pub mod report;

use crate::errors::DomainError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub use correlation::{analyze_correlation, analyze_overall_wellness};
pub use education::{analyze_study_hours, analyze_subject_progress, analyze_task_completion};
pub use health::{
    analyze_constipation, analyze_exercise, analyze_kriya, analyze_typing, analyze_water_intake,
};
pub use milestones::{achievement_milestones, streak_milestones};
pub use ranking::{InsightRanker, RankingConfig};
pub use report::{InsightFilter, InsightReport};

/// Domain an insight or recommendation comes from
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum InsightKind {
    Health,
    Education,
    Correlation,
}

/// How urgent an insight is
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Critical,
    Warning,
    Info,
    Positive,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "critical",
            Severity::Warning => "warning",
            Severity::Info => "info",
            Severity::Positive => "positive",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "critical" => Ok(Severity::Critical),
            "warning" => Ok(Severity::Warning),
            "info" => Ok(Severity::Info),
            "positive" => Ok(Severity::Positive),
            other => Err(DomainError::UnknownSeverity(other.to_string())),
        }
    }
}

/// High / medium / low scale used for priority and estimated impact
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Level {
    High,
    Medium,
    Low,
}

/// Kind of celebratory marker
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum MilestoneKind {
    Achievement,
    Milestone,
    GoalAchievement,
}

/// Observation derived from aggregates
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Insight {
    #[serde(rename = "type")]
    pub kind: InsightKind,
    pub category: String,
    pub message: String,
    pub severity: Severity,
    pub actionable: bool,
    pub icon: String,
    pub timestamp: DateTime<Utc>,
}

/// Suggested action
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Recommendation {
    #[serde(rename = "type")]
    pub kind: InsightKind,
    pub category: String,
    pub message: String,
    pub actionable: bool,
    pub priority: Level,
    pub estimated_impact: Level,
    pub icon: String,
}

/// Celebratory marker
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Milestone {
    #[serde(rename = "type")]
    pub kind: MilestoneKind,
    pub category: String,
    pub message: String,
    pub icon: String,
    pub timestamp: DateTime<Utc>,
}

/// Output of one analyzer
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InsightSet {
    pub generated_at: DateTime<Utc>,
    pub insights: Vec<Insight>,
    pub recommendations: Vec<Recommendation>,
    pub milestones: Vec<Milestone>,
}

impl InsightSet {
    pub fn at(generated_at: DateTime<Utc>) -> Self {
        Self {
            generated_at,
            insights: Vec::new(),
            recommendations: Vec::new(),
            milestones: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.insights.is_empty() && self.recommendations.is_empty() && self.milestones.is_empty()
    }

    pub fn insight(
        &mut self,
        kind: InsightKind,
        category: &str,
        severity: Severity,
        actionable: bool,
        icon: &str,
        message: impl Into<String>,
    ) -> &mut Self {
        self.insights.push(Insight {
            kind,
            category: category.to_string(),
            message: message.into(),
            severity,
            actionable,
            icon: icon.to_string(),
            timestamp: self.generated_at,
        });
        self
    }

    /// Suggest an action the user can take
    pub fn recommend(
        &mut self,
        kind: InsightKind,
        category: &str,
        priority: Level,
        estimated_impact: Level,
        icon: &str,
        message: impl Into<String>,
    ) -> &mut Self {
        self.push_recommendation(kind, category, priority, estimated_impact, icon, message, true)
    }

    /// Reinforce a pattern that is already working; nothing to act on
    pub fn encourage(
        &mut self,
        kind: InsightKind,
        category: &str,
        priority: Level,
        estimated_impact: Level,
        icon: &str,
        message: impl Into<String>,
    ) -> &mut Self {
        self.push_recommendation(kind, category, priority, estimated_impact, icon, message, false)
    }

    #[allow(clippy::too_many_arguments)]
    fn push_recommendation(
        &mut self,
        kind: InsightKind,
        category: &str,
        priority: Level,
        estimated_impact: Level,
        icon: &str,
        message: impl Into<String>,
        actionable: bool,
    ) -> &mut Self {
        self.recommendations.push(Recommendation {
            kind,
            category: category.to_string(),
            message: message.into(),
            actionable,
            priority,
            estimated_impact,
            icon: icon.to_string(),
        });
        self
    }

    pub fn milestone(
        &mut self,
        kind: MilestoneKind,
        category: &str,
        icon: &str,
        message: impl Into<String>,
    ) -> &mut Self {
        self.milestones.push(Milestone {
            kind,
            category: category.to_string(),
            message: message.into(),
            icon: icon.to_string(),
            timestamp: self.generated_at,
        });
        self
    }

    /// Append another set, keeping this set's timestamp
    pub fn merge(&mut self, other: InsightSet) {
        self.insights.extend(other.insights);
        self.recommendations.extend(other.recommendations);
        self.milestones.extend(other.milestones);
    }
}
