use form_spec::{AnswerStore, QuestionConfig, RecipientKey};
use tracing::debug;

use crate::report::{
    DerivedState, GroupReport, GroupStatus, QuestionReport, Severity, ValidatorKind,
    VerdictMessage, join_questions,
};
use crate::validators::{TypeValidator, question_numbers};

/// A row whose recipient selector is blank must not carry an answer.
#[derive(Debug, Default, Clone, Copy)]
pub struct RecipientRequiredValidator;

impl RecipientRequiredValidator {
    /// A row is answered as soon as any of its slots is non-blank.
    pub fn row_answered(store: &AnswerStore, key: RecipientKey) -> bool {
        store
            .all_slots_for(key.question)
            .iter()
            .filter(|slot| slot.recipient == key.recipient)
            .any(|slot| !store.get(slot).is_blank())
    }
}

impl TypeValidator for RecipientRequiredValidator {
    fn kind(&self) -> ValidatorKind {
        ValidatorKind::RecipientRequired
    }

    fn applies_to(&self, question: &QuestionConfig) -> bool {
        question.recipient_selection
    }

    fn check(&self, question: &QuestionConfig, store: &AnswerStore) -> QuestionReport {
        let groups = store
            .recipients_for(question.number)
            .into_iter()
            .map(|(key, recipient)| {
                let status = if recipient.is_none() && Self::row_answered(store, key) {
                    GroupStatus::ConsistencyViolation
                } else {
                    GroupStatus::Clear
                };
                GroupReport {
                    group: key.recipient,
                    status,
                    message: None,
                    derived: DerivedState::None,
                    fills: Vec::new(),
                }
            })
            .collect::<Vec<_>>();

        debug!(question = %question.number, rows = groups.len(), "recipients checked");
        QuestionReport {
            question: question.number,
            validator: self.kind(),
            groups,
        }
    }

    fn summarize(&self, blocked: &[&QuestionReport]) -> Vec<VerdictMessage> {
        if blocked.is_empty() {
            return Vec::new();
        }
        let questions = question_numbers(blocked);
        vec![VerdictMessage {
            text: format!(
                "You did not specify a recipient for your response in question(s) {}.",
                join_questions(&questions)
            ),
            questions,
            severity: Severity::Error,
        }]
    }
}
