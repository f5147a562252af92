//! Patient health records for clinical trial screening
//!
//! This crate provides the normalized patient record consumed by the criteria
//! evaluation engine, together with the EHR parsing layer that builds records
//! from JSON:
//!
//! - `PatientRecord`: demographics, history, medications, allergies, labs and vitals
//! - `VitalValue`: numeric or free-text vital sign reading
//! - `EhrParser`: JSON parsing with required-field and date validation
//! - Loaders for single files, arrays of records and whole directories
//!
//! # Example
//!
//! ```ignore
//! use trialscreen_record::EhrParser;
//!
//! let patient = EhrParser::parse_json(json)?;
//! assert!(patient.has_condition("type 2 diabetes"));
//! ```

pub mod error;
pub mod parser;
pub mod patient;

pub use error::{RecordError, RecordResult};
pub use parser::{EhrParser, load_ehr_from_file, load_patients_from_dir, load_patients_from_file};
pub use patient::{PatientRecord, VitalValue};
