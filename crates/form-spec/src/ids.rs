use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Question identifier. Displayed as the question number shown to respondents.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(transparent)]
pub struct QuestionId(pub u32);

impl QuestionId {
    pub fn number(self) -> u32 {
        self.0
    }
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for QuestionId {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

/// One recipient row of a question: the unit that owns a recipient selector and a response id.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
pub struct RecipientKey {
    pub question: QuestionId,
    pub recipient: usize,
}

impl RecipientKey {
    pub fn new(question: impl Into<QuestionId>, recipient: usize) -> Self {
        Self {
            question: question.into(),
            recipient,
        }
    }
}

impl fmt::Display for RecipientKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.question, self.recipient)
    }
}

/// A single answerable unit: question × recipient × option.
///
/// `option` is `None` for questions that store one answer per recipient (text, choices,
/// numeric scale) and `Some(k)` for questions that spread one recipient's answer over several
/// inputs (distribution and ranking boxes, rubric sub-questions).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
pub struct RespondentSlot {
    pub question: QuestionId,
    pub recipient: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub option: Option<usize>,
}

impl RespondentSlot {
    pub fn new(question: impl Into<QuestionId>, recipient: usize) -> Self {
        Self {
            question: question.into(),
            recipient,
            option: None,
        }
    }

    pub fn with_option(question: impl Into<QuestionId>, recipient: usize, option: usize) -> Self {
        Self {
            question: question.into(),
            recipient,
            option: Some(option),
        }
    }

    pub fn recipient_key(&self) -> RecipientKey {
        RecipientKey {
            question: self.question,
            recipient: self.recipient,
        }
    }
}

impl fmt::Display for RespondentSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.option {
            Some(option) => write!(f, "{}-{}-{}", self.question, self.recipient, option),
            None => write!(f, "{}-{}", self.question, self.recipient),
        }
    }
}
