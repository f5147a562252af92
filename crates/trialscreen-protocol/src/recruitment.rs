//! Recruitment reporting

use serde::{Deserialize, Serialize};
use std::fmt;

/// Fraction of the enrollment target at which a trial counts as actively recruiting
const ACTIVE_THRESHOLD: f64 = 0.75;

/// How the eligible pool compares to a trial's enrollment target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecruitmentStatus {
    #[serde(rename = "RECRUITING - GOAL MET")]
    GoalMet,
    #[serde(rename = "ACTIVELY RECRUITING")]
    ActivelyRecruiting,
    #[serde(rename = "RECRUITING - EXPANSION NEEDED")]
    ExpansionNeeded,
    #[serde(rename = "INSUFFICIENT ELIGIBLE CANDIDATES")]
    InsufficientCandidates,
}

impl RecruitmentStatus {
    /// Classify an eligible-candidate count against the enrollment target
    pub fn assess(eligible_count: usize, target_enrollment: u32) -> Self {
        let target = target_enrollment as usize;
        if eligible_count >= target {
            Self::GoalMet
        } else if eligible_count as f64 >= target as f64 * ACTIVE_THRESHOLD {
            Self::ActivelyRecruiting
        } else if eligible_count > 0 {
            Self::ExpansionNeeded
        } else {
            Self::InsufficientCandidates
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GoalMet => "RECRUITING - GOAL MET",
            Self::ActivelyRecruiting => "ACTIVELY RECRUITING",
            Self::ExpansionNeeded => "RECRUITING - EXPANSION NEEDED",
            Self::InsufficientCandidates => "INSUFFICIENT ELIGIBLE CANDIDATES",
        }
    }
}

impl fmt::Display for RecruitmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-trial line of the recruitment report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialRecruitmentSummary {
    pub trial_id: String,
    pub trial_name: String,
    pub phase: String,
    pub target_enrollment: u32,
    pub eligible_candidates: usize,
    pub eligible_rate: f64,
    pub recruitment_status: RecruitmentStatus,
}

/// Recruitment statistics across every registered trial
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecruitmentReport {
    pub total_patients_screened: usize,
    pub total_trials: usize,
    pub trial_summaries: Vec<TrialRecruitmentSummary>,
}
