//! Calibration error taxonomy.
//!
//! Only conditions that abort a run are errors. Non-convergence is
//! reported through `CalibrationResult::converged`, and numerical
//! degeneracy (near-zero information) is absorbed locally by the
//! estimators, so neither appears here.

use thiserror::Error;

/// Errors surfaced by the public calibration operations.
#[derive(Debug, Error)]
pub enum CalibrationError {
    /// The referenced competency does not exist.
    #[error("Competency not found: {competency_id}")]
    CompetencyNotFound { competency_id: String },

    /// Too few distinct respondents for JMLE to be trustworthy.
    ///
    /// JMLE suffers from the incidental-parameter problem: item-parameter
    /// bias grows as the respondent sample shrinks. Both counts are kept
    /// as fields so callers can act on them without parsing the message.
    #[error("Insufficient respondents: {actual} < {required}")]
    InsufficientRespondents { actual: usize, required: usize },

    /// Too few items remain after extreme-item filtering.
    #[error("Insufficient items: {actual} < {required}")]
    InsufficientItems { actual: usize, required: usize },

    /// A caller-supplied configuration value is unusable.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A storage collaborator reported a failure.
    #[error("store error: {0}")]
    Store(String),
}
