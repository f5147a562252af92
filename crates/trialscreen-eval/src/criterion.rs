//! Eligibility criteria

use crate::predicate::CriterionPredicate;
use crate::report::EvaluationResult;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use trialscreen_record::PatientRecord;

/// Whether a criterion admits or excludes patients
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CriteriaType {
    /// Must pass for eligibility
    Inclusion,
    /// Must pass (the excluded finding is absent) for eligibility
    Exclusion,
}

impl fmt::Display for CriteriaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CriteriaType::Inclusion => write!(f, "inclusion"),
            CriteriaType::Exclusion => write!(f, "exclusion"),
        }
    }
}

fn default_weight() -> f64 {
    1.0
}

/// A single named pass/fail test applied to a patient record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EligibilityCriterion {
    /// Unique within one evaluator
    pub criterion_id: String,
    pub name: String,
    pub description: String,
    pub criterion_type: CriteriaType,
    pub predicate: CriterionPredicate,
    /// Stored for weighted scoring; the eligibility score does not use it
    #[serde(default = "default_weight")]
    pub weight: f64,
}

impl EligibilityCriterion {
    /// Create a criterion with the default weight of 1.0
    pub fn new(
        criterion_id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        criterion_type: CriteriaType,
        predicate: CriterionPredicate,
    ) -> Self {
        Self {
            criterion_id: criterion_id.into(),
            name: name.into(),
            description: description.into(),
            criterion_type,
            predicate,
            weight: default_weight(),
        }
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    pub fn is_inclusion(&self) -> bool {
        self.criterion_type == CriteriaType::Inclusion
    }

    /// Test one patient and describe the outcome
    pub fn evaluate(&self, patient: &PatientRecord, as_of: NaiveDate) -> EvaluationResult {
        let passed = self.predicate.evaluate(patient, as_of);
        log::debug!(
            "criterion {} ({}) for patient {}: {}",
            self.criterion_id,
            self.criterion_type,
            patient.patient_id,
            if passed { "pass" } else { "fail" }
        );
        EvaluationResult {
            criterion_id: self.criterion_id.clone(),
            criterion_name: self.name.clone(),
            passed,
            reason: self.description.clone(),
            criterion_type: self.criterion_type,
        }
    }
}

/// Slug used for default criterion ids: lowercased, spaces replaced by `_`
pub(crate) fn slug(text: &str) -> String {
    text.to_lowercase().replace(' ', "_")
}
