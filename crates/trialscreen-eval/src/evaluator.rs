//! Criteria evaluator
//!
//! Holds an insertion-ordered set of criteria and evaluates patients against
//! all of them. The factory methods build the standard criterion kinds with
//! their default ids, names and types.

use crate::criterion::{CriteriaType, EligibilityCriterion, slug};
use crate::error::{EvalError, EvalResult};
use crate::predicate::{CriterionPredicate, range_phrase};
use crate::report::PatientEligibilityReport;
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use trialscreen_record::PatientRecord;

/// Evaluates patient records against an ordered set of criteria
///
/// Serializes as the bare criteria list; deserializing goes through
/// [`CriteriaEvaluator::add_criterion`], so duplicates are rejected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(
    try_from = "Vec<EligibilityCriterion>",
    into = "Vec<EligibilityCriterion>"
)]
pub struct CriteriaEvaluator {
    criteria: Vec<EligibilityCriterion>,
}

impl CriteriaEvaluator {
    /// Create an evaluator with no criteria
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an evaluator from a list of criteria, rejecting the first duplicate id
    pub fn from_criteria(
        criteria: impl IntoIterator<Item = EligibilityCriterion>,
    ) -> EvalResult<Self> {
        let mut evaluator = Self::new();
        for criterion in criteria {
            evaluator.add_criterion(criterion)?;
        }
        Ok(evaluator)
    }

    /// Criteria in insertion order
    pub fn criteria(&self) -> &[EligibilityCriterion] {
        &self.criteria
    }

    /// Look up a criterion by id
    pub fn get(&self, criterion_id: &str) -> Option<&EligibilityCriterion> {
        self.criteria.iter().find(|c| c.criterion_id == criterion_id)
    }

    pub fn len(&self) -> usize {
        self.criteria.len()
    }

    pub fn is_empty(&self) -> bool {
        self.criteria.is_empty()
    }

    /// Append a criterion
    ///
    /// Fails without modifying the evaluator if the id is already present or
    /// the predicate's parameters are contradictory.
    pub fn add_criterion(&mut self, criterion: EligibilityCriterion) -> EvalResult<()> {
        if self.get(&criterion.criterion_id).is_some() {
            return Err(EvalError::duplicate_criterion(criterion.criterion_id));
        }
        criterion.predicate.validate()?;
        self.criteria.push(criterion);
        Ok(())
    }

    /// Age range criterion, inclusive at both ends
    ///
    /// Defaults: id `age`, type inclusion.
    pub fn add_age_criterion(
        &mut self,
        min_age: u32,
        max_age: u32,
        criterion_id: Option<&str>,
        criterion_type: Option<CriteriaType>,
    ) -> EvalResult<()> {
        self.add_criterion(EligibilityCriterion::new(
            criterion_id.unwrap_or("age"),
            format!("Age {}-{} years", min_age, max_age),
            format!(
                "Patient age must be between {} and {} years",
                min_age, max_age
            ),
            criterion_type.unwrap_or(CriteriaType::Inclusion),
            CriterionPredicate::age_range(min_age, max_age),
        ))
    }

    /// Condition presence (`required`) or absence (`!required`) criterion
    ///
    /// Defaults: id `condition_<slug>`, type inclusion when required and
    /// exclusion otherwise.
    pub fn add_condition_criterion(
        &mut self,
        condition: &str,
        required: bool,
        criterion_id: Option<&str>,
        criterion_type: Option<CriteriaType>,
    ) -> EvalResult<()> {
        let (action, must) = if required {
            ("has", "have")
        } else {
            ("does not have", "not have")
        };
        self.add_criterion(EligibilityCriterion::new(
            id_or(criterion_id, "condition", condition),
            format!("Patient {} {}", action, condition),
            format!("Patient must {} {}", must, condition),
            criterion_type.unwrap_or_else(|| default_type(required)),
            CriterionPredicate::condition(condition, required),
        ))
    }

    /// Medication presence or absence criterion
    ///
    /// Defaults: id `med_<slug>`, type as for conditions.
    pub fn add_medication_criterion(
        &mut self,
        medication: &str,
        required: bool,
        criterion_id: Option<&str>,
        criterion_type: Option<CriteriaType>,
    ) -> EvalResult<()> {
        let (action, state) = if required {
            ("taking", "on")
        } else {
            ("not taking", "off")
        };
        self.add_criterion(EligibilityCriterion::new(
            id_or(criterion_id, "med", medication),
            format!("Patient {} {}", action, medication),
            format!("Patient must be {} {}", state, medication),
            criterion_type.unwrap_or_else(|| default_type(required)),
            CriterionPredicate::medication(medication, required),
        ))
    }

    /// Lab value range criterion; always inclusion
    ///
    /// A patient without the named test fails. Default id `lab_<slug>`.
    pub fn add_lab_criterion(
        &mut self,
        lab_test: &str,
        min_value: Option<f64>,
        max_value: Option<f64>,
        criterion_id: Option<&str>,
    ) -> EvalResult<()> {
        let range = range_phrase(min_value, max_value);
        self.add_criterion(EligibilityCriterion::new(
            id_or(criterion_id, "lab", lab_test),
            format!("{} {}", lab_test, range),
            format!("{} must be {}", lab_test, range),
            CriteriaType::Inclusion,
            CriterionPredicate::lab_range(lab_test, min_value, max_value),
        ))
    }

    /// Allergy exclusion criterion; always exclusion
    ///
    /// Default id `allergy_<slug>`.
    pub fn add_allergy_exclusion(
        &mut self,
        allergen: &str,
        criterion_id: Option<&str>,
    ) -> EvalResult<()> {
        self.add_criterion(EligibilityCriterion::new(
            id_or(criterion_id, "allergy", allergen),
            format!("No allergy to {}", allergen),
            format!("Patient must not be allergic to {}", allergen),
            CriteriaType::Exclusion,
            CriterionPredicate::allergy(allergen),
        ))
    }

    /// Numeric vital sign range criterion; always inclusion
    ///
    /// Absent or non-numeric readings fail. Default id `vital_<slug>`.
    pub fn add_vital_criterion(
        &mut self,
        vital: &str,
        min_value: Option<f64>,
        max_value: Option<f64>,
        criterion_id: Option<&str>,
    ) -> EvalResult<()> {
        let range = range_phrase(min_value, max_value);
        self.add_criterion(EligibilityCriterion::new(
            id_or(criterion_id, "vital", vital),
            format!("{} {}", vital, range),
            format!("{} must be {}", vital, range),
            CriteriaType::Inclusion,
            CriterionPredicate::vital_range(vital, min_value, max_value),
        ))
    }

    /// Evaluate a patient as of the local current date
    pub fn evaluate_patient(&self, patient: &PatientRecord) -> PatientEligibilityReport {
        self.evaluate_patient_at(patient, Local::now().date_naive())
    }

    /// Evaluate a patient against every criterion, computing ages relative to `as_of`
    ///
    /// All criteria run in insertion order even after a failure, so the report
    /// is always complete.
    pub fn evaluate_patient_at(
        &self,
        patient: &PatientRecord,
        as_of: NaiveDate,
    ) -> PatientEligibilityReport {
        let mut inclusion_results = Vec::new();
        let mut exclusion_results = Vec::new();

        for criterion in &self.criteria {
            let result = criterion.evaluate(patient, as_of);
            match criterion.criterion_type {
                CriteriaType::Inclusion => inclusion_results.push(result),
                CriteriaType::Exclusion => exclusion_results.push(result),
            }
        }

        PatientEligibilityReport::from_results(
            patient.patient_id.as_str(),
            patient.name.as_str(),
            inclusion_results,
            exclusion_results,
        )
    }
}

impl TryFrom<Vec<EligibilityCriterion>> for CriteriaEvaluator {
    type Error = EvalError;

    fn try_from(criteria: Vec<EligibilityCriterion>) -> EvalResult<Self> {
        Self::from_criteria(criteria)
    }
}

impl From<CriteriaEvaluator> for Vec<EligibilityCriterion> {
    fn from(evaluator: CriteriaEvaluator) -> Self {
        evaluator.criteria
    }
}

fn default_type(required: bool) -> CriteriaType {
    if required {
        CriteriaType::Inclusion
    } else {
        CriteriaType::Exclusion
    }
}

fn id_or(criterion_id: Option<&str>, prefix: &str, key: &str) -> String {
    criterion_id
        .map(str::to_string)
        .unwrap_or_else(|| format!("{}_{}", prefix, slug(key)))
}
