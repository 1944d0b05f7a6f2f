use std::collections::BTreeSet;

use form_spec::{AnswerStore, QuestionConfig, QuestionKind, RankingParams, RespondentSlot};
use tracing::debug;

use crate::report::{
    DerivedState, GroupMessage, GroupReport, GroupStatus, QuestionReport, Severity,
    ValidatorKind, VerdictMessage, join_questions,
};
use crate::validators::{TypeValidator, question_numbers, target_noun};

/// Rank questions: ranks must be unique per group and the ranked count must respect the bounds.
#[derive(Debug, Default, Clone, Copy)]
pub struct RankingValidator;

impl RankingValidator {
    /// Highest rank a respondent can pick, which is also the number of rank inputs per group.
    pub fn max_rank(question: &QuestionConfig, params: &RankingParams) -> usize {
        if params.distribute_to_recipients {
            question.recipients
        } else {
            params.num_options
        }
    }

    /// Slot groups of the question, each paired with the recipient row its message sits on.
    pub fn groups(
        question: &QuestionConfig,
        params: &RankingParams,
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

fn check_group(
    group: usize,
    slots: &[RespondentSlot],
    max_rank: usize,
    params: &RankingParams,
    store: &AnswerStore,
) -> GroupReport {
    let mut taken = BTreeSet::new();
    let mut all_unique = true;
    let mut ranked = 0usize;
    let mut out_of_range = false;
    let highest = i64::try_from(max_rank).unwrap_or(i64::MAX);
    for slot in slots {
        let Some(rank) = store.get(slot).as_int() else {
            continue;
        };
        ranked += 1;
        if !(1..=highest).contains(&rank) {
            out_of_range = true;
        }
        if !taken.insert(rank) {
            all_unique = false;
        }
    }
    let all_ranked = ranked == slots.len();

    // Bounds only count once the respondent has started ranking the group.
    let mut bounds_active = false;
    let mut below_min = None;
    let mut above_max = None;
    if ranked > 0 {
        if let Some(min) = params.min_to_rank {
            bounds_active = true;
            if ranked < min {
                below_min = Some(min);
            }
        }
        if let Some(max) = params.max_to_rank {
            bounds_active = true;
            if ranked > max {
                above_max = Some(max);
            }
        }
    }

    let noun = target_noun(params.distribute_to_recipients);
    let (status, message) = if !params.duplicates_allowed && !all_unique {
        (
            GroupStatus::ConstraintViolation,
            Some(GroupMessage::error(
                "The same rank should not be given multiple times.",
            )),
        )
    } else if out_of_range {
        (
            GroupStatus::ConstraintViolation,
            Some(GroupMessage::error(format!(
                "Ranks must be between 1 and {max_rank}."
            ))),
        )
    } else if let Some(min) = below_min {
        (
            GroupStatus::ConstraintViolation,
            Some(GroupMessage::error(format!(
                "You need to rank at least {min} {noun}."
            ))),
        )
    } else if let Some(max) = above_max {
        (
            GroupStatus::ConstraintViolation,
            Some(GroupMessage::error(format!("Rank no more than {max} {noun}."))),
        )
    } else if !all_ranked && !bounds_active {
        (
            GroupStatus::Incomplete,
            Some(GroupMessage::info(format!("Please rank the above {noun}."))),
        )
    } else if ranked > 0 {
        (GroupStatus::Satisfied, None)
    } else {
        (GroupStatus::Clear, None)
    };

    GroupReport {
        group,
        status,
        message,
        derived: DerivedState::Ranking {
            taken,
            ranked,
            max_rank,
        },
        fills: Vec::new(),
    }
}

impl TypeValidator for RankingValidator {
    fn kind(&self) -> ValidatorKind {
        ValidatorKind::Ranking
    }

    fn applies_to(&self, question: &QuestionConfig) -> bool {
        matches!(question.kind, QuestionKind::Ranking(_))
    }

    fn check(&self, question: &QuestionConfig, store: &AnswerStore) -> QuestionReport {
        let groups = match &question.kind {
            QuestionKind::Ranking(params) => {
                let max_rank = Self::max_rank(question, params);
                Self::groups(question, params)
                    .iter()
                    .map(|(group, slots)| check_group(*group, slots, max_rank, params, store))
                    .collect()
            }
            _ => Vec::new(),
        };
        debug!(question = %question.number, groups = groups.len(), "ranking checked");
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
                "Please fix the error(s) for rank question(s) {}. \
                 To skip a rank question, leave all the boxes blank.",
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
