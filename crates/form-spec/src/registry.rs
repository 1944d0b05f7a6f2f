use std::collections::BTreeMap;

use crate::answer::{Answer, Choice};
use crate::error::{SpecError, StoreError};
use crate::ids::{QuestionId, RecipientKey, RespondentSlot};
use crate::question::{QuestionConfig, QuestionKind};

/// Immutable lookup from question id to its configuration.
#[derive(Debug, Clone, Default)]
pub struct QuestionRegistry {
    questions: BTreeMap<QuestionId, QuestionConfig>,
}

impl QuestionRegistry {
    pub fn new(questions: impl IntoIterator<Item = QuestionConfig>) -> Result<Self, SpecError> {
        let mut map = BTreeMap::new();
        for question in questions {
            check_question(&question)?;
            let number = question.number;
            if map.insert(number, question).is_some() {
                return Err(SpecError::DuplicateQuestion(number));
            }
        }
        Ok(Self { questions: map })
    }

    pub fn get(&self, question: QuestionId) -> Option<&QuestionConfig> {
        self.questions.get(&question)
    }

    /// Questions in ascending question-number order.
    pub fn iter(&self) -> impl Iterator<Item = &QuestionConfig> {
        self.questions.values()
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Every slot of `question`, ordered by recipient then option.
    pub fn slots_for(&self, question: QuestionId) -> Vec<RespondentSlot> {
        let Some(config) = self.get(question) else {
            return Vec::new();
        };
        let mut slots = Vec::new();
        for recipient in 0..config.recipients {
            match config.options_per_recipient() {
                Some(options) => slots.extend(
                    (0..options).map(|option| {
                        RespondentSlot::with_option(question, recipient, option)
                    }),
                ),
                None => slots.push(RespondentSlot::new(question, recipient)),
            }
        }
        slots
    }

    pub fn all_slots(&self) -> Vec<RespondentSlot> {
        self.questions
            .keys()
            .flat_map(|question| self.slots_for(*question))
            .collect()
    }

    pub fn recipient_keys(&self, question: QuestionId) -> Vec<RecipientKey> {
        self.get(question)
            .map(|config| {
                (0..config.recipients)
                    .map(|recipient| RecipientKey::new(question, recipient))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn owns(&self, slot: &RespondentSlot) -> bool {
        let Some(config) = self.get(slot.question) else {
            return false;
        };
        if slot.recipient >= config.recipients {
            return false;
        }
        match (config.options_per_recipient(), slot.option) {
            (Some(options), Some(option)) => option < options,
            (None, None) => true,
            _ => false,
        }
    }

    /// Checks that `answer` has the shape the question of `slot` takes: text for typed inputs,
    /// offered choices for choice inputs. Blank answers always fit.
    pub fn check_answer(&self, slot: &RespondentSlot, answer: &Answer) -> Result<(), StoreError> {
        let Some(config) = self.get(slot.question).filter(|_| self.owns(slot)) else {
            return Err(StoreError::UnknownSlot(*slot));
        };
        if answer.is_blank() {
            return Ok(());
        }
        let mismatch = |reason: &'static str| StoreError::MismatchedAnswer {
            slot: *slot,
            reason,
        };
        match &config.kind {
            QuestionKind::Distribution(_)
            | QuestionKind::Ranking(_)
            | QuestionKind::FreeText(_)
            | QuestionKind::Numeric(_) => match answer {
                Answer::Text(_) => Ok(()),
                _ => Err(mismatch("expected text")),
            },
            QuestionKind::MultiSelect(params) => {
                let choices = answer.choices().ok_or(mismatch("expected choices"))?;
                let offered = choices.iter().all(|choice| match choice {
                    Choice::Option(index) => *index < params.choices.len(),
                    Choice::Other => params.other_enabled,
                    Choice::NoneOfTheAbove => params.none_of_the_above,
                });
                if !offered {
                    return Err(mismatch("choice not offered"));
                }
                if choices.contains(&Choice::NoneOfTheAbove) && choices.len() > 1 {
                    return Err(mismatch("none of the above is exclusive"));
                }
                Ok(())
            }
            QuestionKind::SingleSelect(params) => {
                let choices = answer.choices().ok_or(mismatch("expected a choice"))?;
                let mut iter = choices.iter();
                match (iter.next(), iter.next()) {
                    (Some(Choice::Option(index)), None) if *index < params.choices.len() => Ok(()),
                    (Some(Choice::Other), None) if params.other_enabled => Ok(()),
                    (Some(_), None) => Err(mismatch("choice not offered")),
                    _ => Err(mismatch("expected a single choice")),
                }
            }
            QuestionKind::Rubric(params) => {
                let choices = answer.choices().ok_or(mismatch("expected a column"))?;
                let mut iter = choices.iter();
                match (iter.next(), iter.next()) {
                    (Some(Choice::Option(column)), None) if *column < params.choices => Ok(()),
                    _ => Err(mismatch("expected a single column")),
                }
            }
        }
    }
}

fn check_question(question: &QuestionConfig) -> Result<(), SpecError> {
    let number = question.number;
    if question.recipients == 0 {
        return Err(SpecError::NoRecipients(number));
    }
    match &question.kind {
        QuestionKind::Distribution(params) => {
            if !params.distribute_to_recipients && params.num_options == 0 {
                return Err(SpecError::NoOptions(number));
            }
        }
        QuestionKind::Ranking(params) => {
            if !params.distribute_to_recipients && params.num_options == 0 {
                return Err(SpecError::NoOptions(number));
            }
            check_bounds(number, params.min_to_rank, params.max_to_rank)?;
        }
        QuestionKind::MultiSelect(params) => {
            if params.choices.is_empty() && !params.other_enabled {
                return Err(SpecError::NoOptions(number));
            }
            check_bounds(number, params.min_selectable, params.max_selectable)?;
        }
        QuestionKind::SingleSelect(params) => {
            if params.choices.is_empty() && !params.other_enabled {
                return Err(SpecError::NoOptions(number));
            }
        }
        QuestionKind::Numeric(params) => {
            if params.min > params.max {
                return Err(SpecError::EmptyRange {
                    question: number,
                    min: params.min,
                    max: params.max,
                });
            }
        }
        QuestionKind::Rubric(params) => {
            if params.sub_questions == 0 || params.choices == 0 {
                return Err(SpecError::NoOptions(number));
            }
        }
        QuestionKind::FreeText(_) => {}
    }
    Ok(())
}

fn check_bounds(
    question: QuestionId,
    min: Option<usize>,
    max: Option<usize>,
) -> Result<(), SpecError> {
    if let (Some(min), Some(max)) = (min, max)
        && min > max
    {
        return Err(SpecError::InvertedBounds { question, min, max });
    }
    Ok(())
}
