//! Criterion predicates
//!
//! A predicate is plain data: a tagged variant carrying its parameters. The
//! dispatch in [`CriterionPredicate::evaluate`] is total, so a well-formed
//! patient record can never make evaluation fail. Text matching is
//! case-insensitive substring containment; lab and vital lookups use the exact
//! key.

use crate::error::{EvalError, EvalResult};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use trialscreen_record::PatientRecord;

/// Test applied to a patient record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CriterionPredicate {
    /// Age within `[min_age, max_age]`, inclusive at both ends
    AgeRange { min_age: u32, max_age: u32 },

    /// Condition present in history or comorbidities (`required`) or absent (`!required`)
    Condition { condition: String, required: bool },

    /// Medication present in current medications (`required`) or absent
    Medication { medication: String, required: bool },

    /// Lab test recorded and within the optional bounds
    LabRange {
        lab_test: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min_value: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max_value: Option<f64>,
    },

    /// No recorded allergy mentions the allergen
    Allergy { allergen: String },

    /// Numeric vital sign recorded and within the optional bounds
    VitalRange {
        vital: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min_value: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max_value: Option<f64>,
    },

    /// Every nested predicate holds
    AllOf { predicates: Vec<CriterionPredicate> },

    /// At least one nested predicate holds
    AnyOf { predicates: Vec<CriterionPredicate> },

    /// The nested predicate does not hold
    Not { predicate: Box<CriterionPredicate> },
}

impl CriterionPredicate {
    pub fn age_range(min_age: u32, max_age: u32) -> Self {
        Self::AgeRange { min_age, max_age }
    }

    pub fn condition(condition: impl Into<String>, required: bool) -> Self {
        Self::Condition {
            condition: condition.into(),
            required,
        }
    }

    pub fn medication(medication: impl Into<String>, required: bool) -> Self {
        Self::Medication {
            medication: medication.into(),
            required,
        }
    }

    pub fn lab_range(
        lab_test: impl Into<String>,
        min_value: Option<f64>,
        max_value: Option<f64>,
    ) -> Self {
        Self::LabRange {
            lab_test: lab_test.into(),
            min_value,
            max_value,
        }
    }

    pub fn allergy(allergen: impl Into<String>) -> Self {
        Self::Allergy {
            allergen: allergen.into(),
        }
    }

    pub fn vital_range(
        vital: impl Into<String>,
        min_value: Option<f64>,
        max_value: Option<f64>,
    ) -> Self {
        Self::VitalRange {
            vital: vital.into(),
            min_value,
            max_value,
        }
    }

    pub fn all_of(predicates: Vec<CriterionPredicate>) -> Self {
        Self::AllOf { predicates }
    }

    pub fn any_of(predicates: Vec<CriterionPredicate>) -> Self {
        Self::AnyOf { predicates }
    }

    pub fn negate(predicate: CriterionPredicate) -> Self {
        Self::Not {
            predicate: Box::new(predicate),
        }
    }

    /// Evaluate against a patient, computing age relative to `as_of`
    pub fn evaluate(&self, patient: &PatientRecord, as_of: NaiveDate) -> bool {
        match self {
            Self::AgeRange { min_age, max_age } => {
                let age = i64::from(patient.age_on(as_of));
                i64::from(*min_age) <= age && age <= i64::from(*max_age)
            }
            Self::Condition {
                condition,
                required,
            } => patient.has_condition(condition) == *required,
            Self::Medication {
                medication,
                required,
            } => patient.is_on_medication(medication) == *required,
            Self::LabRange {
                lab_test,
                min_value,
                max_value,
            } => patient
                .lab_value(lab_test)
                .is_some_and(|value| within(value, *min_value, *max_value)),
            Self::Allergy { allergen } => !patient.has_allergy(allergen),
            Self::VitalRange {
                vital,
                min_value,
                max_value,
            } => patient
                .vital_sign(vital)
                .and_then(|v| v.as_number())
                .is_some_and(|value| within(value, *min_value, *max_value)),
            Self::AllOf { predicates } => predicates.iter().all(|p| p.evaluate(patient, as_of)),
            Self::AnyOf { predicates } => predicates.iter().any(|p| p.evaluate(patient, as_of)),
            Self::Not { predicate } => !predicate.evaluate(patient, as_of),
        }
    }

    /// Check parameters for contradictions that would make the predicate meaningless
    pub fn validate(&self) -> EvalResult<()> {
        match self {
            Self::AgeRange { min_age, max_age } if min_age > max_age => {
                Err(EvalError::invalid_range("age", min_age, max_age))
            }
            Self::LabRange {
                lab_test: subject,
                min_value: Some(min),
                max_value: Some(max),
            }
            | Self::VitalRange {
                vital: subject,
                min_value: Some(min),
                max_value: Some(max),
            } if min > max => Err(EvalError::invalid_range(subject.as_str(), min, max)),
            Self::AllOf { predicates } | Self::AnyOf { predicates } => {
                if predicates.is_empty() {
                    return Err(EvalError::EmptyGroup {
                        combinator: self.kind().to_string(),
                    });
                }
                predicates.iter().try_for_each(CriterionPredicate::validate)
            }
            Self::Not { predicate } => predicate.validate(),
            _ => Ok(()),
        }
    }

    /// Serialized tag of this variant
    pub fn kind(&self) -> &'static str {
        match self {
            Self::AgeRange { .. } => "age_range",
            Self::Condition { .. } => "condition",
            Self::Medication { .. } => "medication",
            Self::LabRange { .. } => "lab_range",
            Self::Allergy { .. } => "allergy",
            Self::VitalRange { .. } => "vital_range",
            Self::AllOf { .. } => "all_of",
            Self::AnyOf { .. } => "any_of",
            Self::Not { .. } => "not",
        }
    }
}

fn within(value: f64, min: Option<f64>, max: Option<f64>) -> bool {
    min.is_none_or(|lo| value >= lo) && max.is_none_or(|hi| value <= hi)
}

/// Human-readable bound description, e.g. `between 6.5 and 11.0`
///
/// Bounds always carry a decimal point, so whole values read `11.0`.
pub(crate) fn range_phrase(min: Option<f64>, max: Option<f64>) -> String {
    match (min, max) {
        (Some(lo), Some(hi)) => format!("between {:?} and {:?}", lo, hi),
        (Some(lo), None) => format!(">= {:?}", lo),
        (None, Some(hi)) => format!("<= {:?}", hi),
        (None, None) => "within acceptable range".to_string(),
    }
}
