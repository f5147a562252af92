//! Clinical trial protocols and batch screening
//!
//! This crate gives criteria sets a stable identity and runs them over patient
//! populations:
//!
//! - `TrialProtocol`: trial metadata plus one owned `CriteriaEvaluator`
//! - `ProtocolDefinition`: the JSON file form of a protocol
//! - `TrialCatalog`: insertion-ordered registry, with the built-in sample trials
//! - `TrialEligibilityFilter`: partitions patients into eligible and ineligible
//! - `ScreeningEngine`: patients plus catalog, with single, batch, cross-trial
//!   and recruitment screening
//!
//! # Example
//!
//! ```ignore
//! use trialscreen_protocol::{TrialEligibilityFilter, builtin_catalog};
//!
//! let catalog = builtin_catalog()?;
//! let trial = catalog.get("TRIAL-DM-2024-001")?;
//! let outcome = TrialEligibilityFilter::filter_patients(&patients, trial);
//! println!("{:.1}% eligible", outcome.summary.eligibility_rate);
//! ```
//!
//! # Parallelism
//!
//! With the `parallel` feature, the filter evaluates patients on the rayon
//! thread pool. Output order always matches input order.

pub mod catalog;
pub mod engine;
pub mod error;
pub mod filter;
pub mod protocol;
pub mod recruitment;

pub use catalog::{TrialCatalog, builtin_catalog, load_protocols_from_file};
pub use engine::{PatientTrialMatches, ScreeningEngine, TrialMatch, TrialScreening};
pub use error::{TrialError, TrialResult};
pub use filter::{
    EligiblePatient, FilterOutcome, FilterSummary, IneligiblePatient, TrialEligibilityFilter,
};
pub use protocol::{ProtocolDefinition, TrialProtocol, TrialProtocolBuilder};
pub use recruitment::{RecruitmentReport, RecruitmentStatus, TrialRecruitmentSummary};
