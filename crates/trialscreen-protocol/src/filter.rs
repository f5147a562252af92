//! Batch eligibility filtering
//!
//! Applies one protocol to an ordered patient list. Every patient is evaluated
//! independently, so the work can be spread across threads; the output keeps
//! the input order either way.

use crate::protocol::TrialProtocol;
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use trialscreen_eval::PatientEligibilityReport;
use trialscreen_record::PatientRecord;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Eligible patient entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EligiblePatient {
    pub patient_id: String,
    pub name: String,
    pub eligibility_score: f64,
}

/// Ineligible patient entry with one reason per failed criterion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IneligiblePatient {
    pub patient_id: String,
    pub name: String,
    pub reasons: Vec<String>,
}

/// Summary counts for one filter run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterSummary {
    pub eligible_count: usize,
    pub ineligible_count: usize,
    /// Percentage of screened patients found eligible; 0 when nobody was screened
    pub eligibility_rate: f64,
}

/// Result of filtering a patient list against one trial
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterOutcome {
    pub trial_id: String,
    pub trial_name: String,
    pub total_patients_screened: usize,
    pub eligible_patients: Vec<EligiblePatient>,
    pub ineligible_patients: Vec<IneligiblePatient>,
    /// Full per-patient reports, in input order
    pub eligibility_reports: Vec<PatientEligibilityReport>,
    pub summary: FilterSummary,
}

/// Filters patients against trial criteria
pub struct TrialEligibilityFilter;

impl TrialEligibilityFilter {
    /// Filter patients as of the local current date
    pub fn filter_patients(patients: &[PatientRecord], trial: &TrialProtocol) -> FilterOutcome {
        Self::filter_patients_at(patients, trial, Local::now().date_naive())
    }

    /// Filter patients, computing ages relative to `as_of`
    pub fn filter_patients_at(
        patients: &[PatientRecord],
        trial: &TrialProtocol,
        as_of: NaiveDate,
    ) -> FilterOutcome {
        let reports = evaluate_all(patients, trial, as_of);

        let mut eligible_patients = Vec::new();
        let mut ineligible_patients = Vec::new();
        for (patient, report) in patients.iter().zip(&reports) {
            if report.is_eligible {
                eligible_patients.push(EligiblePatient {
                    patient_id: patient.patient_id.clone(),
                    name: patient.name.clone(),
                    eligibility_score: report.eligibility_score,
                });
            } else {
                ineligible_patients.push(IneligiblePatient {
                    patient_id: patient.patient_id.clone(),
                    name: patient.name.clone(),
                    reasons: report.ineligibility_reasons(),
                });
            }
        }

        let total = patients.len();
        let summary = FilterSummary {
            eligible_count: eligible_patients.len(),
            ineligible_count: ineligible_patients.len(),
            eligibility_rate: if total > 0 {
                eligible_patients.len() as f64 / total as f64 * 100.0
            } else {
                0.0
            },
        };

        log::info!(
            "screened {} patient(s) for {}: {} eligible ({:.1}%)",
            total,
            trial.trial_id(),
            summary.eligible_count,
            summary.eligibility_rate
        );

        FilterOutcome {
            trial_id: trial.trial_id().to_string(),
            trial_name: trial.trial_name().to_string(),
            total_patients_screened: total,
            eligible_patients,
            ineligible_patients,
            eligibility_reports: reports,
            summary,
        }
    }
}

#[cfg(feature = "parallel")]
fn evaluate_all(
    patients: &[PatientRecord],
    trial: &TrialProtocol,
    as_of: NaiveDate,
) -> Vec<PatientEligibilityReport> {
    patients
        .par_iter()
        .map(|p| trial.evaluate_patient_at(p, as_of))
        .collect()
}

#[cfg(not(feature = "parallel"))]
fn evaluate_all(
    patients: &[PatientRecord],
    trial: &TrialProtocol,
    as_of: NaiveDate,
) -> Vec<PatientEligibilityReport> {
    patients
        .iter()
        .map(|p| trial.evaluate_patient_at(p, as_of))
        .collect()
}
