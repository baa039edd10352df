//! Query parameter validation
//!
//! Structural checks (ranges) use the `validator` derive on the query types;
//! the helpers here normalize what the derive cannot express.

use crate::errors::DomainError;
use serde::{Deserialize, Serialize};

/// Default analytics window in days
pub const DEFAULT_WINDOW_DAYS: u32 = 30;

/// Largest accepted analytics window in days
pub const MAX_WINDOW_DAYS: u32 = 365;

/// Longest accepted activity type name
pub const MAX_ACTIVITY_TYPE_LEN: usize = 50;

/// Resolve an optional `days` parameter against a default and a ceiling
pub fn resolve_days(days: Option<u32>, default: u32, max: u32) -> Result<u32, DomainError> {
    let days = days.unwrap_or(default);
    if days == 0 {
        return Err(DomainError::invalid_parameter("days", "must be at least 1"));
    }
    if days > max {
        return Err(DomainError::invalid_parameter(
            "days",
            format!("must be at most {}", max),
        ));
    }
    Ok(days)
}

/// Which subjects an education query covers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SubjectFilter {
    #[default]
    All,
    Codes(Vec<String>),
}

impl SubjectFilter {
    /// `all`, empty, or absent selects every subject; otherwise a comma list
    /// of codes, compared case-insensitively
    pub fn parse(raw: Option<&str>) -> Self {
        let Some(raw) = raw.map(str::trim).filter(|r| !r.is_empty()) else {
            return SubjectFilter::All;
        };
        if raw.eq_ignore_ascii_case("all") {
            return SubjectFilter::All;
        }

        let mut codes: Vec<String> = raw
            .split(',')
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_uppercase)
            .collect();
        codes.dedup();

        if codes.is_empty() {
            SubjectFilter::All
        } else {
            SubjectFilter::Codes(codes)
        }
    }

    pub fn includes(&self, code: &str) -> bool {
        match self {
            SubjectFilter::All => true,
            SubjectFilter::Codes(codes) => codes.iter().any(|c| c.eq_ignore_ascii_case(code)),
        }
    }
}

/// Activity types are short snake_case identifiers such as `study` or `kriya`
pub fn validate_activity_type(activity_type: &str) -> Result<(), DomainError> {
    if activity_type.is_empty() {
        return Err(DomainError::invalid_parameter(
            "activity_type",
            "cannot be empty",
        ));
    }
    if activity_type.len() > MAX_ACTIVITY_TYPE_LEN {
        return Err(DomainError::invalid_parameter(
            "activity_type",
            format!("must be at most {} characters", MAX_ACTIVITY_TYPE_LEN),
        ));
    }
    let valid = activity_type
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_');
    if !valid {
        return Err(DomainError::invalid_parameter(
            "activity_type",
            "may only contain lowercase letters, digits and underscores",
        ));
    }
    Ok(())
}
