use std::collections::BTreeSet;

use form_spec::{AnswerStore, DistributionParams, QuestionConfig, QuestionKind, RespondentSlot};
use tracing::debug;

use crate::report::{
    DerivedState, GroupMessage, GroupReport, GroupStatus, QuestionReport, Severity,
    ValidatorKind, VerdictMessage, join_questions,
};
use crate::validators::{TypeValidator, question_numbers, target_noun};

const UNEVEN_VIOLATION: &str = "The same amount of points should not be given multiple times.";

/// Constant-sum questions: the points of every group must add up to the configured total.
#[derive(Debug, Default, Clone, Copy)]
pub struct DistributionValidator;

impl DistributionValidator {
    /// Total the group has to reach.
    pub fn points(question: &QuestionConfig, params: &DistributionParams) -> i64 {
        if !params.points_per_option {
            return params.total_points;
        }
        let options = if params.distribute_to_recipients {
            question.recipients
        } else {
            params.num_options
        };
        params.total_points.saturating_mul(options as i64)
    }

    /// Slot groups of the question, each paired with the recipient row its message sits on.
    pub fn groups(
        question: &QuestionConfig,
        params: &DistributionParams,
    ) -> Vec<(usize, Vec<RespondentSlot>)> {
        let number = question.number;
        if params.distribute_to_recipients {
            let slots = (0..question.recipients)
                .map(|recipient| RespondentSlot::with_option(number, recipient, 0))
                .collect();
            return vec![(question.recipients.saturating_sub(1), slots)];
        }
        (0..question.recipients)
            .map(|recipient| {
                let slots = (0..params.num_options)
                    .map(|option| RespondentSlot::with_option(number, recipient, option))
                    .collect();
                (recipient, slots)
            })
            .collect()
    }
}

struct Tally {
    sum: i64,
    any_numeric: bool,
    all_unique: bool,
    blanks: Vec<RespondentSlot>,
}

fn tally(slots: &[RespondentSlot], store: &AnswerStore) -> Tally {
    let mut tally = Tally {
        sum: 0,
        any_numeric: false,
        all_unique: true,
        blanks: Vec::new(),
    };
    let mut seen = BTreeSet::new();
    for slot in slots {
        // Unparsable entries count as zero, including for the repeat check.
        let value = match store.get(slot).as_int() {
            Some(value) => {
                tally.any_numeric = true;
                value
            }
            None => {
                tally.blanks.push(*slot);
                0
            }
        };
        tally.sum = tally.sum.saturating_add(value);
        if !seen.insert(value) {
            tally.all_unique = false;
        }
    }
    tally
}

fn check_group(
    question: &QuestionConfig,
    group: usize,
    slots: &[RespondentSlot],
    points: i64,
    params: &DistributionParams,
    store: &AnswerStore,
) -> GroupReport {
    let tally = tally(slots, store);
    let derived = DerivedState::Distribution {
        points,
        sum: tally.sum,
        all_unique: tally.all_unique,
    };

    if !tally.any_numeric {
        return GroupReport {
            group,
            status: GroupStatus::Incomplete,
            message: Some(GroupMessage::info(format!(
                "Please distribute {points} points among the above {}.",
                target_noun(params.distribute_to_recipients)
            ))),
            derived,
            fills: Vec::new(),
        };
    }

    let uneven_violated = params.force_uneven && !tally.all_unique;
    let remaining = points.saturating_sub(tally.sum);
    let (status, message, fills) = if remaining == 0 && !uneven_violated {
        (
            GroupStatus::Satisfied,
            GroupMessage::success("All points distributed!"),
            fillable(question, tally.blanks, store),
        )
    } else {
        let mut text = if remaining > 0 {
            format!("{remaining} points left to distribute.")
        } else if remaining < 0 {
            format!("Over allocated {} points.", remaining.saturating_neg())
        } else {
            String::new()
        };
        if uneven_violated {
            if !text.is_empty() {
                text.push(' ');
            }
            text.push_str(UNEVEN_VIOLATION);
        }
        (
            GroupStatus::ConstraintViolation,
            GroupMessage::error(text),
            Vec::new(),
        )
    };

    GroupReport {
        group,
        status,
        message: Some(message),
        derived,
        fills,
    }
}

/// Blank slots that may be zero-filled. Rows without a chosen recipient stay blank, otherwise
/// the fill itself would count as an answer for a missing recipient.
fn fillable(
    question: &QuestionConfig,
    blanks: Vec<RespondentSlot>,
    store: &AnswerStore,
) -> Vec<RespondentSlot> {
    if !question.recipient_selection {
        return blanks;
    }
    blanks
        .into_iter()
        .filter(|slot| store.recipient(&slot.recipient_key()).is_some())
        .collect()
}

impl TypeValidator for DistributionValidator {
    fn kind(&self) -> ValidatorKind {
        ValidatorKind::Distribution
    }

    fn applies_to(&self, question: &QuestionConfig) -> bool {
        matches!(question.kind, QuestionKind::Distribution(_))
    }

    fn check(&self, question: &QuestionConfig, store: &AnswerStore) -> QuestionReport {
        let groups = match &question.kind {
            QuestionKind::Distribution(params) => {
                let points = Self::points(question, params);
                Self::groups(question, params)
                    .iter()
                    .map(|(group, slots)| {
                        check_group(question, *group, slots, points, params, store)
                    })
                    .collect()
            }
            _ => Vec::new(),
        };
        debug!(question = %question.number, groups = groups.len(), "distribution checked");
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
                "Please fix the error(s) for distribution question(s) {}. \
                 To skip a distribution question, leave the boxes blank.",
                join_questions(&questions)
            ),
            questions,
            severity: Severity::Error,
        }]
    }

    fn shows_inline(&self) -> bool {
        true
    }
}
