//! Error types for telemetry decoding.
//!
//! The forecasting engine itself is total; these only surface while turning
//! stored progress rows into engine input.

use thiserror::Error;

/// An unrecognized dyslexia level or type token.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown dyslexia {kind} '{value}'")]
pub struct ProfileParseError {
    pub kind: &'static str,
    pub value: String,
}

/// A progress row that cannot be turned into engine input.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TelemetryError {
    /// Module ids run from 1 to 6.
    #[error("module id {0} is outside 1..=6")]
    InvalidModule(i64),

    /// A row claims more successes than attempts.
    #[error("module {module} reports {successes} successes out of {attempts} attempts")]
    SuccessesExceedAttempts {
        module: u8,
        attempts: u32,
        successes: u32,
    },

    /// Storage returned a negative counter.
    #[error("negative {field} count: {value}")]
    NegativeCount { field: &'static str, value: i64 },

    #[error(transparent)]
    Profile(#[from] ProfileParseError),
}
