use std::collections::BTreeMap;

use crate::answer::Answer;
use crate::error::StoreError;
use crate::ids::{QuestionId, RecipientKey, RespondentSlot};
use crate::registry::QuestionRegistry;

static BLANK: Answer = Answer::Blank;

/// Current value of every slot on the form.
///
/// The store is created with one blank entry per slot of the registry and never grows
/// afterwards, so a slot that is not present simply does not exist on the form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnswerStore {
    answers: BTreeMap<RespondentSlot, Answer>,
    recipients: BTreeMap<RecipientKey, Option<String>>,
    other_texts: BTreeMap<RecipientKey, String>,
    response_ids: BTreeMap<RecipientKey, String>,
}

impl AnswerStore {
    pub fn new(registry: &QuestionRegistry) -> Self {
        let answers = registry
            .all_slots()
            .into_iter()
            .map(|slot| (slot, Answer::Blank))
            .collect();
        let recipients = registry
            .iter()
            .flat_map(|question| registry.recipient_keys(question.number))
            .map(|key| (key, None))
            .collect();
        Self {
            answers,
            recipients,
            other_texts: BTreeMap::new(),
            response_ids: BTreeMap::new(),
        }
    }

    pub fn get(&self, slot: &RespondentSlot) -> &Answer {
        self.answers.get(slot).unwrap_or(&BLANK)
    }

    /// Replaces the value of `slot`, returning the previous one.
    pub fn set(&mut self, slot: RespondentSlot, answer: Answer) -> Result<Answer, StoreError> {
        let entry = self
            .answers
            .get_mut(&slot)
            .ok_or(StoreError::UnknownSlot(slot))?;
        Ok(std::mem::replace(entry, answer))
    }

    pub fn contains(&self, slot: &RespondentSlot) -> bool {
        self.answers.contains_key(slot)
    }

    pub fn all_slots_for(&self, question: QuestionId) -> Vec<RespondentSlot> {
        self.answers
            .range(RespondentSlot::new(question, 0)..)
            .map(|(slot, _)| *slot)
            .take_while(|slot| slot.question == question)
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&RespondentSlot, &Answer)> {
        self.answers.iter()
    }

    /// Selected recipient of a row; `None` when the selector is blank.
    pub fn recipient(&self, key: &RecipientKey) -> Option<&str> {
        self.recipients
            .get(key)
            .and_then(|value| value.as_deref())
            .filter(|value| !value.trim().is_empty())
    }

    pub fn set_recipient(
        &mut self,
        key: RecipientKey,
        recipient: Option<String>,
    ) -> Result<Option<String>, StoreError> {
        let entry = self
            .recipients
            .get_mut(&key)
            .ok_or(StoreError::UnknownRecipient(key))?;
        Ok(std::mem::replace(entry, recipient))
    }

    pub fn recipients_for(&self, question: QuestionId) -> Vec<(RecipientKey, Option<&str>)> {
        self.recipients
            .range(RecipientKey::new(question, 0)..)
            .take_while(|(key, _)| key.question == question)
            .map(|(key, _)| (*key, self.recipient(key)))
            .collect()
    }

    pub fn other_text(&self, key: &RecipientKey) -> Option<&str> {
        self.other_texts.get(key).map(String::as_str)
    }

    pub fn set_other_text(
        &mut self,
        key: RecipientKey,
        text: impl Into<String>,
    ) -> Result<(), StoreError> {
        if !self.recipients.contains_key(&key) {
            return Err(StoreError::UnknownRecipient(key));
        }
        self.other_texts.insert(key, text.into());
        Ok(())
    }

    pub fn response_id(&self, key: &RecipientKey) -> Option<&str> {
        self.response_ids.get(key).map(String::as_str)
    }

    /// Stores or drops the server-side identifier of an existing response.
    pub fn set_response_id(
        &mut self,
        key: RecipientKey,
        id: Option<String>,
    ) -> Result<(), StoreError> {
        if !self.recipients.contains_key(&key) {
            return Err(StoreError::UnknownRecipient(key));
        }
        match id {
            Some(id) => {
                self.response_ids.insert(key, id);
            }
            None => {
                self.response_ids.remove(&key);
            }
        }
        Ok(())
    }
}
