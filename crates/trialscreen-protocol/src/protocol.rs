//! Trial protocols
//!
//! A protocol is a named, reusable bundle of criteria. It adds identity and
//! descriptive metadata around a `CriteriaEvaluator` and delegates evaluation
//! to it unchanged.

use crate::error::{TrialError, TrialResult};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use trialscreen_eval::{
    CriteriaEvaluator, EligibilityCriterion, EvalError, PatientEligibilityReport,
};
use trialscreen_record::PatientRecord;

/// A clinical trial protocol
///
/// Immutable once built: fields are read through accessors, and every
/// instance passed [`TrialProtocolBuilder::build`]. Serializes through
/// [`ProtocolDefinition`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ProtocolDefinition", into = "ProtocolDefinition")]
pub struct TrialProtocol {
    trial_id: String,
    trial_name: String,
    description: String,
    phase: String,
    target_enrollment: u32,
    disease_area: String,
    primary_objective: String,
    evaluator: CriteriaEvaluator,
}

impl TrialProtocol {
    /// Start building a protocol
    pub fn builder(
        trial_id: impl Into<String>,
        trial_name: impl Into<String>,
    ) -> TrialProtocolBuilder {
        TrialProtocolBuilder::new(trial_id, trial_name)
    }

    /// Unique trial identifier, e.g. `TRIAL-DM-2024-001`
    pub fn trial_id(&self) -> &str {
        &self.trial_id
    }

    pub fn trial_name(&self) -> &str {
        &self.trial_name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// e.g. `Phase III`, `Phase II/III`
    pub fn phase(&self) -> &str {
        &self.phase
    }

    /// Always positive
    pub fn target_enrollment(&self) -> u32 {
        self.target_enrollment
    }

    pub fn disease_area(&self) -> &str {
        &self.disease_area
    }

    pub fn primary_objective(&self) -> &str {
        &self.primary_objective
    }

    /// The protocol's criteria set
    pub fn evaluator(&self) -> &CriteriaEvaluator {
        &self.evaluator
    }

    /// Evaluate a patient against this trial's criteria as of today
    pub fn evaluate_patient(&self, patient: &PatientRecord) -> PatientEligibilityReport {
        self.evaluator.evaluate_patient(patient)
    }

    /// Evaluate a patient against this trial's criteria as of `as_of`
    pub fn evaluate_patient_at(
        &self,
        patient: &PatientRecord,
        as_of: NaiveDate,
    ) -> PatientEligibilityReport {
        self.evaluator.evaluate_patient_at(patient, as_of)
    }

    /// File form of this protocol
    pub fn to_definition(&self) -> ProtocolDefinition {
        self.clone().into()
    }
}

/// Builder for [`TrialProtocol`]
///
/// Criteria errors are held until [`TrialProtocolBuilder::build`] so the
/// builder chain stays flat.
#[derive(Debug)]
pub struct TrialProtocolBuilder {
    trial_id: String,
    trial_name: String,
    description: String,
    phase: String,
    target_enrollment: u32,
    disease_area: String,
    primary_objective: String,
    evaluator: CriteriaEvaluator,
    error: Option<EvalError>,
}

impl TrialProtocolBuilder {
    /// Create a builder; `target_enrollment` must be set before `build`
    pub fn new(trial_id: impl Into<String>, trial_name: impl Into<String>) -> Self {
        Self {
            trial_id: trial_id.into(),
            trial_name: trial_name.into(),
            description: String::new(),
            phase: String::new(),
            target_enrollment: 0,
            disease_area: String::new(),
            primary_objective: String::new(),
            evaluator: CriteriaEvaluator::new(),
            error: None,
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn phase(mut self, phase: impl Into<String>) -> Self {
        self.phase = phase.into();
        self
    }

    pub fn target_enrollment(mut self, target: u32) -> Self {
        self.target_enrollment = target;
        self
    }

    pub fn disease_area(mut self, area: impl Into<String>) -> Self {
        self.disease_area = area.into();
        self
    }

    pub fn primary_objective(mut self, objective: impl Into<String>) -> Self {
        self.primary_objective = objective.into();
        self
    }

    /// Add criteria through the evaluator's factories
    ///
    /// Only the first error is kept; later calls are skipped once one fails.
    pub fn criteria<F>(mut self, add: F) -> Self
    where
        F: FnOnce(&mut CriteriaEvaluator) -> Result<(), EvalError>,
    {
        if self.error.is_none() {
            if let Err(e) = add(&mut self.evaluator) {
                self.error = Some(e);
            }
        }
        self
    }

    /// Add one prebuilt criterion
    pub fn criterion(self, criterion: EligibilityCriterion) -> Self {
        self.criteria(|evaluator| evaluator.add_criterion(criterion))
    }

    /// Finish the protocol
    pub fn build(self) -> TrialResult<TrialProtocol> {
        if let Some(e) = self.error {
            return Err(TrialError::criteria(self.trial_id, e));
        }
        if self.trial_id.trim().is_empty() {
            return Err(TrialError::invalid_protocol(
                self.trial_id,
                "trial_id must not be empty",
            ));
        }
        if self.target_enrollment == 0 {
            return Err(TrialError::invalid_protocol(
                self.trial_id,
                "target_enrollment must be positive",
            ));
        }
        Ok(TrialProtocol {
            trial_id: self.trial_id,
            trial_name: self.trial_name,
            description: self.description,
            phase: self.phase,
            target_enrollment: self.target_enrollment,
            disease_area: self.disease_area,
            primary_objective: self.primary_objective,
            evaluator: self.evaluator,
        })
    }
}

/// Serializable form of a protocol, as read from and written to JSON files
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProtocolDefinition {
    pub trial_id: String,
    pub trial_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub phase: String,
    pub target_enrollment: u32,
    #[serde(default)]
    pub disease_area: String,
    #[serde(default)]
    pub primary_objective: String,
    #[serde(default)]
    pub criteria: Vec<EligibilityCriterion>,
}

impl TryFrom<ProtocolDefinition> for TrialProtocol {
    type Error = TrialError;

    fn try_from(def: ProtocolDefinition) -> TrialResult<Self> {
        def.criteria
            .into_iter()
            .fold(
                TrialProtocol::builder(def.trial_id, def.trial_name)
                    .description(def.description)
                    .phase(def.phase)
                    .target_enrollment(def.target_enrollment)
                    .disease_area(def.disease_area)
                    .primary_objective(def.primary_objective),
                TrialProtocolBuilder::criterion,
            )
            .build()
    }
}

impl From<TrialProtocol> for ProtocolDefinition {
    fn from(protocol: TrialProtocol) -> Self {
        Self {
            trial_id: protocol.trial_id,
            trial_name: protocol.trial_name,
            description: protocol.description,
            phase: protocol.phase,
            target_enrollment: protocol.target_enrollment,
            disease_area: protocol.disease_area,
            primary_objective: protocol.primary_objective,
            criteria: protocol.evaluator.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trialscreen_eval::CriteriaType;

    fn minimal() -> TrialProtocolBuilder {
        TrialProtocol::builder("TRIAL-X", "Example").target_enrollment(10)
    }

    #[test]
    fn test_build_minimal() {
        let trial = minimal().build().unwrap();
        assert_eq!(trial.trial_id(), "TRIAL-X");
        assert!(trial.evaluator().is_empty());
    }

    #[test]
    fn test_metadata_read_through_accessors() {
        let trial = minimal()
            .description("Example study")
            .phase("Phase II/III")
            .disease_area("Pulmonology")
            .primary_objective("Reduce exacerbations")
            .build()
            .unwrap();

        assert_eq!(trial.trial_name(), "Example");
        assert_eq!(trial.description(), "Example study");
        assert_eq!(trial.phase(), "Phase II/III");
        assert_eq!(trial.target_enrollment(), 10);
        assert_eq!(trial.disease_area(), "Pulmonology");
        assert_eq!(trial.primary_objective(), "Reduce exacerbations");
    }

    #[test]
    fn test_invalid_definition_never_yields_protocol() {
        let mut def = minimal().build().unwrap().to_definition();
        def.target_enrollment = 0;
        assert!(matches!(
            TrialProtocol::try_from(def.clone()),
            Err(TrialError::InvalidProtocol { .. })
        ));

        def.target_enrollment = 10;
        def.trial_id = "  ".to_string();
        assert!(TrialProtocol::try_from(def).is_err());
    }

    #[test]
    fn test_zero_enrollment_rejected() {
        let err = minimal().target_enrollment(0).build().unwrap_err();
        assert!(matches!(err, TrialError::InvalidProtocol { .. }));
    }

    #[test]
    fn test_first_criteria_error_kept() {
        let err = minimal()
            .criteria(|c| c.add_age_criterion(18, 75, None, None))
            .criteria(|c| c.add_age_criterion(20, 30, None, None))
            .criteria(|c| c.add_age_criterion(90, 10, Some("other"), None))
            .build()
            .unwrap_err();
        match err {
            TrialError::Criteria { source, .. } => {
                assert_eq!(source, EvalError::duplicate_criterion("age"))
            }
            other => panic!("Expected Criteria error, got: {:?}", other),
        }
    }

    #[test]
    fn test_definition_round_trip_keeps_criteria() {
        let trial = minimal()
            .phase("Phase II")
            .criteria(|c| {
                c.add_condition_criterion("asthma", true, None, None)?;
                c.add_allergy_exclusion("latex", None)
            })
            .build()
            .unwrap();

        let def = trial.to_definition();
        assert_eq!(def.criteria.len(), 2);
        assert_eq!(def.criteria[1].criterion_type, CriteriaType::Exclusion);

        let rebuilt = TrialProtocol::try_from(def).unwrap();
        assert_eq!(rebuilt, trial);
    }
}
