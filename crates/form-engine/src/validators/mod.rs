//! One validator per question type. Validators only read the store; anything they want
//! written back (the distribution zero-fill) is returned in [`GroupReport::fills`] and applied
//! by the caller, so the write happens at a well-defined point between validators.
//!
//! [`GroupReport::fills`]: crate::report::GroupReport::fills

use form_spec::{AnswerStore, QuestionConfig, QuestionId};

use crate::report::{QuestionReport, ValidatorKind, VerdictMessage};

pub mod distribution;
pub mod multi_select;
pub mod ranking;
pub mod recipient;

pub use distribution::DistributionValidator;
pub use multi_select::MultiSelectValidator;
pub use ranking::RankingValidator;
pub use recipient::RecipientRequiredValidator;

pub trait TypeValidator {
    fn kind(&self) -> ValidatorKind;

    fn applies_to(&self, question: &QuestionConfig) -> bool;

    fn check(&self, question: &QuestionConfig, store: &AnswerStore) -> QuestionReport;

    /// Turns the blocking reports of this validator into status messages.
    fn summarize(&self, blocked: &[&QuestionReport]) -> Vec<VerdictMessage>;

    /// Whether group messages are rendered next to the question while the respondent types.
    fn shows_inline(&self) -> bool {
        false
    }
}

/// `recipients` or `options`, depending on what the respondent is asked to spread over.
pub(crate) fn target_noun(distribute_to_recipients: bool) -> &'static str {
    if distribute_to_recipients {
        "recipients"
    } else {
        "options"
    }
}

pub(crate) fn question_numbers(reports: &[&QuestionReport]) -> Vec<QuestionId> {
    reports.iter().map(|report| report.question).collect()
}
