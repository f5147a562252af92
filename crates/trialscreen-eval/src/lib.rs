//! Eligibility Criteria Evaluation Engine
//!
//! This crate screens a `PatientRecord` against an ordered set of inclusion and
//! exclusion criteria and aggregates the outcome into an eligibility verdict:
//!
//! - **Predicates**: age range, condition and medication presence/absence,
//!   lab value range, allergy exclusion, vital sign range, and the
//!   `all_of` / `any_of` / `not` combinators
//! - **Criteria**: a predicate plus identity, wording, type and weight
//! - **Evaluator**: insertion-ordered criteria with factory helpers and
//!   fail-fast duplicate detection
//! - **Reports**: per-criterion results and the aggregated score
//!
//! # Example
//!
//! ```ignore
//! use trialscreen_eval::{CriteriaEvaluator, CriteriaType};
//!
//! let mut evaluator = CriteriaEvaluator::new();
//! evaluator.add_age_criterion(18, 75, None, None)?;
//! evaluator.add_condition_criterion("Type 2 Diabetes", true, None, None)?;
//! evaluator.add_allergy_exclusion("metformin", None)?;
//!
//! let report = evaluator.evaluate_patient(&patient);
//! println!("{} eligible: {}", report.patient_id, report.is_eligible);
//! ```
//!
//! # Aggregation
//!
//! Every criterion is evaluated exactly once, in insertion order, with no
//! short-circuiting. A patient is eligible when every inclusion criterion and
//! every exclusion criterion passes; an exclusion criterion passes when the
//! excluded finding is absent. Missing data (an absent lab test or vital sign)
//! fails the criterion rather than raising an error.

pub mod criterion;
pub mod error;
pub mod evaluator;
pub mod predicate;
pub mod report;

pub use criterion::{CriteriaType, EligibilityCriterion};
pub use error::{EvalError, EvalResult};
pub use evaluator::CriteriaEvaluator;
pub use predicate::CriterionPredicate;
pub use report::{EvaluationResult, PatientEligibilityReport};
