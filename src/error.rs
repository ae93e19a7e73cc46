//! Error types for the waitlist wizard.

use crate::form::field::Field;
use crate::form::validation::ValidationErrors;
use crate::skills::TagRejection;
use crate::wizard::state::WizardStep;

/// Top-level error type for the crate.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Wizard error: {0}")]
    Wizard(#[from] WizardError),

    #[error("Submission error: {0}")]
    Submit(#[from] SubmitError),

    #[error("CV error: {0}")]
    Cv(#[from] CvError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Key-value storage errors.
///
/// These never escape the draft store: callers that persist form data log
/// them and carry on without persistence.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    #[error("Storage quota exceeded writing {key}")]
    QuotaExceeded { key: String },

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors reported by the backing store behind the final submission.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmitError {
    #[error("{0}")]
    Rejected(String),

    #[error("Transport failure: {0}")]
    Transport(String),
}

/// CV file acceptance errors.
#[derive(Debug, thiserror::Error)]
pub enum CvError {
    #[error("Please select a PDF file only")]
    NotPdf { mime: String },

    #[error("File size must be less than 5 MB")]
    TooLarge { size: u64, max: u64 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Wizard state machine errors.
#[derive(Debug, thiserror::Error)]
pub enum WizardError {
    #[error("Cannot transition from {from} to {to}")]
    InvalidTransition { from: WizardStep, to: WizardStep },

    #[error("Already at the first step")]
    AtFirstStep,

    #[error("{field} is not editable on {step}")]
    InactiveField { field: Field, step: WizardStep },

    #[error("Invalid value for {field}: {message}")]
    InvalidInput { field: Field, message: String },

    #[error("Unknown option for {field}: {value}")]
    UnknownOption { field: Field, value: String },

    #[error("{0}")]
    Skill(#[from] TagRejection),

    #[error("{0}")]
    Validation(#[from] ValidationErrors),

    #[error("Submission failed: {0}")]
    Submit(#[from] SubmitError),

    #[error("A submission is already in progress")]
    SubmitInProgress,

    #[error("The application has already been submitted")]
    Finished,

    #[error("No proof of work entry at index {index}")]
    NoSuchEntry { index: usize },

    #[error("{0}")]
    EntryLimit(String),
}

/// Result type alias for the crate.
pub type Result<T> = std::result::Result<T, Error>;
