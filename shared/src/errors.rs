//! Error types for the Vitality domain

use thiserror::Error;

/// Domain-level errors raised while parsing or transitioning domain values
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Unknown metric: {0}")]
    UnknownMetric(String),

    #[error("Unknown goal status: {0}")]
    UnknownGoalStatus(String),

    #[error("Unknown goal type: {0}")]
    UnknownGoalType(String),

    #[error("Unknown severity: {0}")]
    UnknownSeverity(String),

    #[error("Cannot move goal from {from} to {to}")]
    InvalidGoalTransition { from: String, to: String },

    #[error("Invalid parameter {field}: {message}")]
    InvalidParameter { field: String, message: String },
}

impl DomainError {
    pub fn invalid_parameter(field: impl Into<String>, message: impl Into<String>) -> Self {
        DomainError::InvalidParameter {
            field: field.into(),
            message: message.into(),
        }
    }
}
