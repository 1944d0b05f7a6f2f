use form_spec::{AnswerStore, QuestionConfig, QuestionKind, RespondentSlot};
use tracing::debug;

use crate::report::{
    DerivedState, GroupMessage, GroupReport, GroupStatus, QuestionReport, Severity,
    ValidatorKind, VerdictMessage,
};
use crate::validators::TypeValidator;

/// Checks the number of checked choices of every multi-select recipient row.
///
/// Leaving a row untouched is always allowed. "None of the above" counts as a checked choice.
#[derive(Debug, Default, Clone, Copy)]
pub struct MultiSelectValidator;

impl TypeValidator for MultiSelectValidator {
    fn kind(&self) -> ValidatorKind {
        ValidatorKind::MultiSelect
    }

    fn applies_to(&self, question: &QuestionConfig) -> bool {
        matches!(question.kind, QuestionKind::MultiSelect(_))
    }

    fn check(&self, question: &QuestionConfig, store: &AnswerStore) -> QuestionReport {
        let QuestionKind::MultiSelect(params) = &question.kind else {
            return QuestionReport {
                question: question.number,
                validator: self.kind(),
                groups: Vec::new(),
            };
        };
        let min = params.min_selectable.unwrap_or(0);
        let max = params.max_selectable.unwrap_or(usize::MAX);
        let number = question.number;

        let groups = (0..question.recipients)
            .map(|recipient| {
                let slot = RespondentSlot::new(number, recipient);
                let selected = store.get(&slot).choices().map_or(0, |choices| choices.len());
                let (status, message) = if selected == 0 {
                    (GroupStatus::Clear, None)
                } else if selected < min {
                    (
                        GroupStatus::ConstraintViolation,
                        Some(GroupMessage::error(format!(
                            "Minimum selectable choices for question {number} is {min}."
                        ))),
                    )
                } else if selected > max {
                    (
                        GroupStatus::ConstraintViolation,
                        Some(GroupMessage::error(format!(
                            "Maximum selectable choices for question {number} is {max}."
                        ))),
                    )
                } else {
                    (GroupStatus::Satisfied, None)
                };
                GroupReport {
                    group: recipient,
                    status,
                    message,
                    derived: DerivedState::Selection { selected },
                    fills: Vec::new(),
                }
            })
            .collect::<Vec<_>>();

        debug!(question = %number, groups = groups.len(), "multi-select checked");
        QuestionReport {
            question: number,
            validator: self.kind(),
            groups,
        }
    }

    /// One message per question, taken from its first offending row.
    fn summarize(&self, blocked: &[&QuestionReport]) -> Vec<VerdictMessage> {
        blocked
            .iter()
            .filter_map(|report| {
                let group = report.blocking_groups().next()?;
                let message = group.message.as_ref()?;
                Some(VerdictMessage {
                    questions: vec![report.question],
                    text: message.text.clone(),
                    severity: Severity::Error,
                })
            })
            .collect()
    }
}
