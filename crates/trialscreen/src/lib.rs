//! Clinical trial eligibility screening for Rust
//!
//! This crate bundles the screening workspace:
//! - Patient records and EHR parsing (`record`)
//! - Eligibility criteria and their evaluation (`eval`)
//! - Trial protocols, the trial catalog and batch screening (`protocol`)
//!
//! # Example
//!
//! ```ignore
//! use trialscreen::{EhrParser, ScreeningEngine, TrialCatalog};
//!
//! let mut engine = ScreeningEngine::with_catalog(TrialCatalog::builtin()?);
//! engine.load_patient(EhrParser::parse_json(&json)?);
//!
//! let outcome = engine.screen_patients_for_trial("TRIAL-DM-2024-001")?;
//! println!("{} eligible", outcome.summary.eligible_count);
//! ```

// Re-export all public APIs from internal crates
pub use trialscreen_eval as eval;
pub use trialscreen_protocol as protocol;
pub use trialscreen_record as record;

// Convenience re-exports
pub use trialscreen_eval::{
    CriteriaEvaluator, CriteriaType, CriterionPredicate, EligibilityCriterion,
    PatientEligibilityReport,
};
pub use trialscreen_protocol::{
    FilterOutcome, RecruitmentReport, ScreeningEngine, TrialCatalog, TrialEligibilityFilter,
    TrialError, TrialProtocol, TrialResult,
};
pub use trialscreen_record::{EhrParser, PatientRecord};

/// Sample patient records bundled with the crate, one JSON array
pub const SAMPLE_PATIENTS_JSON: &str = include_str!("../data/sample_patients.json");

/// Parse the bundled sample patients
pub fn sample_patients() -> record::RecordResult<Vec<PatientRecord>> {
    EhrParser::parse_many(SAMPLE_PATIENTS_JSON)
}

// CLI module (only available with cli feature)
#[cfg(feature = "cli")]
pub mod cli;
