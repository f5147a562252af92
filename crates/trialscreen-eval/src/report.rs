//! Evaluation results and aggregated eligibility reports

use crate::criterion::CriteriaType;
use serde::{Deserialize, Serialize};

/// Outcome of testing one criterion against one patient
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub criterion_id: String,
    pub criterion_name: String,
    pub passed: bool,
    /// Description of the criterion that was tested
    pub reason: String,
    pub criterion_type: CriteriaType,
}

/// Aggregate verdict for one patient against one criteria set
///
/// Field names are the stable keys used by persistence and rendering layers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientEligibilityReport {
    pub patient_id: String,
    pub patient_name: String,
    pub is_eligible: bool,
    pub total_criteria: usize,
    pub passed_criteria: usize,
    pub failed_criteria: usize,
    /// Percentage of all criteria that passed; 0 when there are none
    pub eligibility_score: f64,
    pub inclusion_results: Vec<EvaluationResult>,
    pub exclusion_results: Vec<EvaluationResult>,
}

impl PatientEligibilityReport {
    /// Aggregate per-criterion results into a report
    ///
    /// Counts, score and verdict are all derived here so they cannot disagree
    /// with the result lists.
    pub fn from_results(
        patient_id: impl Into<String>,
        patient_name: impl Into<String>,
        inclusion_results: Vec<EvaluationResult>,
        exclusion_results: Vec<EvaluationResult>,
    ) -> Self {
        let all = || inclusion_results.iter().chain(exclusion_results.iter());

        let total_criteria = inclusion_results.len() + exclusion_results.len();
        let passed_criteria = all().filter(|r| r.passed).count();
        let failed_criteria = total_criteria - passed_criteria;
        let is_eligible = all().all(|r| r.passed);

        let scored = passed_criteria + failed_criteria;
        let eligibility_score = if scored > 0 {
            passed_criteria as f64 / scored as f64 * 100.0
        } else {
            0.0
        };

        Self {
            patient_id: patient_id.into(),
            patient_name: patient_name.into(),
            is_eligible,
            total_criteria,
            passed_criteria,
            failed_criteria,
            eligibility_score,
            inclusion_results,
            exclusion_results,
        }
    }

    /// Failed results in report order: inclusion failures first, then exclusions
    pub fn failed_results(&self) -> impl Iterator<Item = &EvaluationResult> {
        self.inclusion_results
            .iter()
            .chain(self.exclusion_results.iter())
            .filter(|r| !r.passed)
    }

    /// Reasons for ineligibility, e.g. `Failed: Age 18-75 years` or
    /// `Excluded: No allergy to metformin`
    pub fn ineligibility_reasons(&self) -> Vec<String> {
        self.failed_results()
            .map(|r| match r.criterion_type {
                CriteriaType::Inclusion => format!("Failed: {}", r.criterion_name),
                CriteriaType::Exclusion => format!("Excluded: {}", r.criterion_name),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(id: &str, passed: bool, criterion_type: CriteriaType) -> EvaluationResult {
        EvaluationResult {
            criterion_id: id.to_string(),
            criterion_name: format!("{} name", id),
            passed,
            reason: format!("{} description", id),
            criterion_type,
        }
    }

    #[test]
    fn test_empty_report_is_eligible_with_zero_score() {
        let report = PatientEligibilityReport::from_results("PT-1", "A", vec![], vec![]);
        assert!(report.is_eligible);
        assert_eq!(report.total_criteria, 0);
        assert_eq!(report.eligibility_score, 0.0);
    }

    #[test]
    fn test_counts_and_score() {
        let report = PatientEligibilityReport::from_results(
            "PT-1",
            "A",
            vec![
                result("a", true, CriteriaType::Inclusion),
                result("b", false, CriteriaType::Inclusion),
            ],
            vec![
                result("c", true, CriteriaType::Exclusion),
                result("d", true, CriteriaType::Exclusion),
            ],
        );
        assert!(!report.is_eligible);
        assert_eq!(report.passed_criteria, 3);
        assert_eq!(report.failed_criteria, 1);
        assert_eq!(report.eligibility_score, 75.0);
    }

    #[test]
    fn test_reasons_follow_report_order() {
        let report = PatientEligibilityReport::from_results(
            "PT-1",
            "A",
            vec![
                result("a", false, CriteriaType::Inclusion),
                result("b", true, CriteriaType::Inclusion),
                result("c", false, CriteriaType::Inclusion),
            ],
            vec![result("d", false, CriteriaType::Exclusion)],
        );
        assert_eq!(
            report.ineligibility_reasons(),
            vec!["Failed: a name", "Failed: c name", "Excluded: d name"]
        );
    }
}
