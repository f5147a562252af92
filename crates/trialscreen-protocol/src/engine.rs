//! Screening engine
//!
//! Ties a patient population to a trial catalog and answers the screening
//! questions: one patient against one trial, every patient against one trial,
//! one patient against every trial, and recruitment status across the catalog.

use crate::catalog::TrialCatalog;
use crate::error::{TrialError, TrialResult};
use crate::filter::{FilterOutcome, TrialEligibilityFilter};
use crate::protocol::TrialProtocol;
use crate::recruitment::{RecruitmentReport, RecruitmentStatus, TrialRecruitmentSummary};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::path::Path;
use trialscreen_eval::PatientEligibilityReport;
use trialscreen_record::{PatientRecord, load_patients_from_file};

/// One patient screened against one trial
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialScreening {
    pub trial_id: String,
    pub trial_name: String,
    #[serde(flatten)]
    pub report: PatientEligibilityReport,
}

/// Verdict for one trial in a cross-trial match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialMatch {
    pub trial_id: String,
    pub trial_name: String,
    pub is_eligible: bool,
    pub eligibility_score: f64,
}

/// One patient screened against every registered trial
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientTrialMatches {
    pub patient_id: String,
    pub patient_name: String,
    /// All trials, in catalog order
    pub trial_matches: Vec<TrialMatch>,
    pub eligible_trials: Vec<TrialMatch>,
    pub ineligible_trials: Vec<TrialMatch>,
}

/// Patients and trials for screening
#[derive(Debug, Clone, Default)]
pub struct ScreeningEngine {
    patients: Vec<PatientRecord>,
    catalog: TrialCatalog,
    as_of: Option<NaiveDate>,
}

impl ScreeningEngine {
    /// Create an engine with no patients and an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an engine over an existing catalog
    pub fn with_catalog(catalog: TrialCatalog) -> Self {
        Self {
            catalog,
            ..Self::default()
        }
    }

    /// Fix the date ages are computed against; defaults to the local current date
    pub fn with_reference_date(mut self, as_of: NaiveDate) -> Self {
        self.as_of = Some(as_of);
        self
    }

    pub fn reference_date(&self) -> NaiveDate {
        self.as_of.unwrap_or_else(|| Local::now().date_naive())
    }

    /// Add a patient; a record with the same id replaces the earlier one in place
    pub fn load_patient(&mut self, patient: PatientRecord) {
        match self
            .patients
            .iter_mut()
            .find(|p| p.patient_id == patient.patient_id)
        {
            Some(existing) => {
                log::warn!("replacing previously loaded patient {}", patient.patient_id);
                *existing = patient;
            }
            None => self.patients.push(patient),
        }
    }

    /// Load every record in a JSON file (object or array)
    pub fn load_patients_from_file(&mut self, path: impl AsRef<Path>) -> TrialResult<usize> {
        let patients = load_patients_from_file(path)?;
        let count = patients.len();
        for patient in patients {
            self.load_patient(patient);
        }
        Ok(count)
    }

    /// Register a trial protocol
    pub fn register_trial(&mut self, trial: TrialProtocol) -> TrialResult<()> {
        self.catalog.register(trial)
    }

    pub fn catalog(&self) -> &TrialCatalog {
        &self.catalog
    }

    /// Loaded patients in load order
    pub fn patients(&self) -> &[PatientRecord] {
        &self.patients
    }

    pub fn patient(&self, patient_id: &str) -> TrialResult<&PatientRecord> {
        self.patients
            .iter()
            .find(|p| p.patient_id == patient_id)
            .ok_or_else(|| TrialError::patient_not_found(patient_id))
    }

    pub fn trial(&self, trial_id: &str) -> TrialResult<&TrialProtocol> {
        self.catalog.get(trial_id)
    }

    /// Screen one patient for one trial
    pub fn screen_patient_for_trial(
        &self,
        patient_id: &str,
        trial_id: &str,
    ) -> TrialResult<TrialScreening> {
        let patient = self.patient(patient_id)?;
        let trial = self.trial(trial_id)?;
        Ok(TrialScreening {
            trial_id: trial.trial_id().to_string(),
            trial_name: trial.trial_name().to_string(),
            report: trial.evaluate_patient_at(patient, self.reference_date()),
        })
    }

    /// Screen every loaded patient for one trial
    pub fn screen_patients_for_trial(&self, trial_id: &str) -> TrialResult<FilterOutcome> {
        let trial = self.trial(trial_id)?;
        Ok(TrialEligibilityFilter::filter_patients_at(
            &self.patients,
            trial,
            self.reference_date(),
        ))
    }

    /// Screen one patient against every registered trial
    pub fn screen_patient_for_all_trials(
        &self,
        patient_id: &str,
    ) -> TrialResult<PatientTrialMatches> {
        let patient = self.patient(patient_id)?;
        let as_of = self.reference_date();

        let trial_matches: Vec<TrialMatch> = self
            .catalog
            .iter()
            .map(|trial| {
                let report = trial.evaluate_patient_at(patient, as_of);
                TrialMatch {
                    trial_id: trial.trial_id().to_string(),
                    trial_name: trial.trial_name().to_string(),
                    is_eligible: report.is_eligible,
                    eligibility_score: report.eligibility_score,
                }
            })
            .collect();

        let (eligible_trials, ineligible_trials) = trial_matches
            .iter()
            .cloned()
            .partition(|m| m.is_eligible);

        Ok(PatientTrialMatches {
            patient_id: patient.patient_id.clone(),
            patient_name: patient.name.clone(),
            trial_matches,
            eligible_trials,
            ineligible_trials,
        })
    }

    /// Eligible candidate counts and recruitment status for every trial
    pub fn generate_recruitment_report(&self) -> RecruitmentReport {
        let as_of = self.reference_date();

        let trial_summaries = self
            .catalog
            .iter()
            .map(|trial| {
                let outcome =
                    TrialEligibilityFilter::filter_patients_at(&self.patients, trial, as_of);
                let eligible = outcome.summary.eligible_count;
                TrialRecruitmentSummary {
                    trial_id: trial.trial_id().to_string(),
                    trial_name: trial.trial_name().to_string(),
                    phase: trial.phase().to_string(),
                    target_enrollment: trial.target_enrollment(),
                    eligible_candidates: eligible,
                    eligible_rate: outcome.summary.eligibility_rate,
                    recruitment_status: RecruitmentStatus::assess(
                        eligible,
                        trial.target_enrollment(),
                    ),
                }
            })
            .collect();

        RecruitmentReport {
            total_patients_screened: self.patients.len(),
            total_trials: self.catalog.len(),
            trial_summaries,
        }
    }
}
