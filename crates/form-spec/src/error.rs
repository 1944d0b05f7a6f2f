use std::path::PathBuf;

use thiserror::Error;

use crate::ids::{QuestionId, RecipientKey, RespondentSlot};

/// Inconsistent question configuration detected while building a registry.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SpecError {
    #[error("question {0} is defined more than once")]
    DuplicateQuestion(QuestionId),
    #[error("question {0} has no recipients")]
    NoRecipients(QuestionId),
    #[error("question {0} has no options")]
    NoOptions(QuestionId),
    #[error("question {question}: minimum {min} exceeds maximum {max}")]
    InvertedBounds {
        question: QuestionId,
        min: usize,
        max: usize,
    },
    #[error("question {question}: numeric range {min}..={max} is empty")]
    EmptyRange {
        question: QuestionId,
        min: i64,
        max: i64,
    },
}

/// Errors raised by [`crate::AnswerStore`] mutations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("slot {0} does not belong to any question")]
    UnknownSlot(RespondentSlot),
    #[error("recipient row {0} does not belong to any question")]
    UnknownRecipient(RecipientKey),
    #[error("answer for slot {slot} does not fit its question: {reason}")]
    MismatchedAnswer {
        slot: RespondentSlot,
        reason: &'static str,
    },
}

/// Errors raised while loading a form definition document.
#[derive(Debug, Error)]
pub enum DefinitionError {
    #[error("failed to read {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid JSON form definition")]
    Json(#[from] serde_json::Error),
    #[error("invalid TOML form definition")]
    Toml(#[from] toml::de::Error),
    #[error("unsupported definition format '{0}' (expected .json or .toml)")]
    UnsupportedFormat(String),
    #[error(transparent)]
    Spec(#[from] SpecError),
}
