//! Error types for the triad core.
//!
//! Only malformed input and invalid configuration are errors. Missing
//! knowledge-base entries are recovered by the resolver and out-of-range
//! numbers are clamped, so neither appears here.

use thiserror::Error;

use crate::types::Subsystem;

/// Malformed or incomplete questionnaire input.
///
/// Raised before any scoring happens; meant to be surfaced to the caller as a
/// user-input problem.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The answer set does not have the expected length.
    #[error("expected {expected} answers, got {actual}")]
    WrongAnswerCount { expected: usize, actual: usize },

    /// The question is not part of the configured partition table.
    #[error("question {question_id} is not part of the questionnaire")]
    UnknownQuestion { question_id: u32 },

    /// The answer's subsystem tag disagrees with the partition table.
    #[error("question {question_id} belongs to {expected}, but was tagged {actual}")]
    SubsystemMismatch {
        question_id: u32,
        expected: Subsystem,
        actual: Subsystem,
    },

    /// The same question was answered more than once.
    #[error("question {question_id} answered more than once")]
    DuplicateQuestion { question_id: u32 },

    /// The selected value is not one of the four ordinals.
    #[error("question {question_id} has out-of-domain choice {value:?}")]
    InvalidChoice { question_id: u32, value: String },

    /// The raw answer carries no subsystem tag.
    #[error("question {question_id} is missing its subsystem tag")]
    MissingSubsystemTag { question_id: u32 },

    /// The raw answer carries a tag outside the three subsystems.
    #[error("question {question_id} has unknown subsystem tag {tag:?}")]
    UnknownSubsystemTag { question_id: u32, tag: String },
}

/// Top-level error for engine operations.
#[derive(Debug, Error)]
pub enum PersonaError {
    /// Input validation failed.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// Engine configuration is inconsistent.
    #[error("configuration error: {0}")]
    Configuration(String),
}

/// Result type for engine operations.
pub type PersonaResult<T> = Result<T, PersonaError>;
