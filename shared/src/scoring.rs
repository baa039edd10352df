//! Composite wellness and productivity scores

use crate::metrics::{RECOMMENDED_STEPS, RECOMMENDED_STUDY_HOURS, RECOMMENDED_WATER_ML};
use crate::stats::{mean, round_half_up};
use crate::types::{EducationAnalytics, HealthAnalytics};
use serde::{Deserialize, Serialize};

/// Both scores are 0..=100
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct WellnessScores {
    pub health_score: i64,
    pub productivity_score: i64,
}

impl WellnessScores {
    pub fn compute(health: &HealthAnalytics, education: &EducationAnalytics) -> Self {
        Self {
            health_score: health_score(health),
            productivity_score: productivity_score(education),
        }
    }
}

/// Percentage of a target, capped at 100
pub fn capped_ratio(value: f64, target: f64) -> f64 {
    if target <= 0.0 {
        return 0.0;
    }
    (value / target * 100.0).clamp(0.0, 100.0)
}

/// Mean over present health components; period days are not scored
pub fn health_score(health: &HealthAnalytics) -> i64 {
    let mut parts = Vec::with_capacity(5);

    if let Some(water) = &health.water {
        parts.push(capped_ratio(water.aggregate.average, RECOMMENDED_WATER_ML));
    }
    if let Some(exercise) = &health.exercise {
        parts.push(capped_ratio(exercise.average_steps, RECOMMENDED_STEPS));
    }
    if let Some(constipation) = &health.constipation {
        parts.push(constipation.positive_rate as f64);
    }
    if let Some(kriya) = &health.kriya {
        parts.push(kriya.consistency_rate as f64);
    }
    if let Some(typing) = &health.typing {
        parts.push(typing.completion_rate as f64);
    }

    score(&parts)
}

pub fn productivity_score(education: &EducationAnalytics) -> i64 {
    let mut parts = Vec::with_capacity(3);

    if let Some(study) = &education.study_hours {
        parts.push(capped_ratio(study.average_hours, RECOMMENDED_STUDY_HOURS));
    }
    if let Some(tasks) = &education.task_completion {
        parts.push(tasks.overall_completion_rate as f64);
    }
    if !education.subject_progress.is_empty() {
        let rates: Vec<f64> = education
            .subject_progress
            .iter()
            .map(|s| s.task_completion_rate as f64)
            .collect();
        parts.push(mean(&rates));
    }

    score(&parts)
}

fn score(parts: &[f64]) -> i64 {
    if parts.is_empty() {
        return 0;
    }
    round_half_up(mean(parts)).clamp(0, 100)
}
