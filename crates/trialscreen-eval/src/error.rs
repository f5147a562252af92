//! Configuration errors for criteria sets

use thiserror::Error;

/// Result type for evaluator operations
pub type EvalResult<T> = Result<T, EvalError>;

/// Errors raised while assembling a criteria set
///
/// Evaluation itself never fails: missing patient data is a failed criterion.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EvalError {
    /// A criterion with this id is already registered
    #[error("Duplicate criterion id: {criterion_id}")]
    DuplicateCriterion { criterion_id: String },

    /// Lower bound above upper bound
    #[error("Invalid range for {subject}: minimum {min} exceeds maximum {max}")]
    InvalidRange {
        subject: String,
        min: String,
        max: String,
    },

    /// Combinator with no operands
    #[error("Empty predicate group in {combinator}")]
    EmptyGroup { combinator: String },
}

impl EvalError {
    /// Create a duplicate criterion error
    pub fn duplicate_criterion(criterion_id: impl Into<String>) -> Self {
        Self::DuplicateCriterion {
            criterion_id: criterion_id.into(),
        }
    }

    /// Create an invalid range error
    pub fn invalid_range(
        subject: impl Into<String>,
        min: impl ToString,
        max: impl ToString,
    ) -> Self {
        Self::InvalidRange {
            subject: subject.into(),
            min: min.to_string(),
            max: max.to_string(),
        }
    }
}
