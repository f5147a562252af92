//! Errors for protocol construction, catalog lookup and screening

use std::path::PathBuf;
use thiserror::Error;
use trialscreen_eval::EvalError;
use trialscreen_record::RecordError;

/// Result type for protocol operations
pub type TrialResult<T> = Result<T, TrialError>;

/// Errors that can occur while building protocols or screening patients
#[derive(Debug, Error)]
pub enum TrialError {
    /// Protocol metadata is unusable
    #[error("Invalid protocol {trial_id}: {message}")]
    InvalidProtocol { trial_id: String, message: String },

    /// A criterion could not be added to the protocol
    #[error("Invalid criteria for {trial_id}: {source}")]
    Criteria {
        trial_id: String,
        #[source]
        source: EvalError,
    },

    /// Trial id already registered
    #[error("Duplicate trial id: {trial_id}")]
    DuplicateTrial { trial_id: String },

    /// Unknown trial id
    #[error("Trial {trial_id} not found")]
    TrialNotFound { trial_id: String },

    /// Unknown patient id
    #[error("Patient {patient_id} not found")]
    PatientNotFound { patient_id: String },

    /// Protocol definition file could not be decoded
    #[error("Invalid protocol definition: {message}")]
    InvalidDefinition { message: String },

    /// The built-in catalog failed to build
    #[error("Built-in trial catalog unavailable: {message}")]
    Builtin { message: String },

    /// Patient data could not be loaded
    #[error(transparent)]
    Record(#[from] RecordError),

    /// File system failure
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl TrialError {
    /// Create an invalid protocol error
    pub fn invalid_protocol(trial_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidProtocol {
            trial_id: trial_id.into(),
            message: message.into(),
        }
    }

    /// Create a criteria error for a trial
    pub fn criteria(trial_id: impl Into<String>, source: EvalError) -> Self {
        Self::Criteria {
            trial_id: trial_id.into(),
            source,
        }
    }

    /// Create a trial not found error
    pub fn trial_not_found(trial_id: impl Into<String>) -> Self {
        Self::TrialNotFound {
            trial_id: trial_id.into(),
        }
    }

    /// Create a patient not found error
    pub fn patient_not_found(patient_id: impl Into<String>) -> Self {
        Self::PatientNotFound {
            patient_id: patient_id.into(),
        }
    }

    /// Whether this error reports an unknown identifier
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::TrialNotFound { .. } | Self::PatientNotFound { .. })
    }
}
