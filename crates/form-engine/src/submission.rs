use std::collections::BTreeMap;

use form_spec::{
    Answer, AnswerStore, Choice, QuestionConfig, QuestionId, QuestionKind, QuestionRegistry,
    RecipientKey, RespondentSlot, StoreError,
};
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

pub const SUBMIT_FAILURE_TITLE: &str = "Could not submit feedback!";
pub const SUBMIT_FAILURE_BODY: &str =
    "Please try again. If the problem persists, backup your responses and reload this page.";

/// One serialized value of a recipient row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SnapshotValue {
    /// Option index for distribution and rank boxes, `None` for single-valued rows.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub option: Option<usize>,
    pub values: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowSnapshot {
    pub key: RecipientKey,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recipient: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_id: Option<String>,
    /// Set for choice questions that offer an "other" option.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub other_selected: Option<bool>,
    pub values: Vec<SnapshotValue>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuestionSnapshot {
    pub question: QuestionId,
    pub question_type: &'static str,
    pub recipient_selection: bool,
    pub rows: Vec<RowSnapshot>,
}

/// Normalized copy of every answer on the form, taken right before submission.
///
/// Every slot is enumerated, whether or not its input is currently enabled. Rubric sub-question
/// choices are collapsed into one `<sub>-<choice>` list per row and "other" texts replace the
/// "other" choice they belong to.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct AnswerSnapshot {
    pub questions: Vec<QuestionSnapshot>,
}

impl AnswerSnapshot {
    pub fn capture(registry: &QuestionRegistry, store: &AnswerStore) -> Self {
        let questions = registry
            .iter()
            .map(|question| capture_question(question, store))
            .collect();
        Self { questions }
    }

    pub fn question(&self, question: QuestionId) -> Option<&QuestionSnapshot> {
        self.questions.iter().find(|entry| entry.question == question)
    }

    /// Flattens the snapshot into the named form fields the server expects.
    pub fn payload(&self) -> SubmissionPayload {
        let mut payload = SubmissionPayload::default();
        for question in &self.questions {
            let q = question.question;
            payload.push(
                format!("questionresponsetotal-{q}"),
                question.rows.len().to_string(),
            );
            payload.push(format!("questiontype-{q}"), question.question_type);
            for row in &question.rows {
                let key = row.key;
                if question.recipient_selection || row.recipient.is_some() {
                    payload.push(
                        format!("responserecipient-{key}"),
                        row.recipient.clone().unwrap_or_default(),
                    );
                }
                if let Some(id) = &row.response_id {
                    payload.push(format!("responseid-{key}"), id.clone());
                }
                if let Some(other) = row.other_selected {
                    let flag_name = match question.question_type {
                        "MSQ" => "msqIsOtherOptionAnswer",
                        _ => "mcqIsOtherOptionAnswer",
                    };
                    payload.push(
                        format!("{flag_name}-{key}"),
                        if other { "1" } else { "0" },
                    );
                }
                for value in &row.values {
                    let name = match value.option {
                        Some(option) => format!("responsetext-{key}-{option}"),
                        None => format!("responsetext-{key}"),
                    };
                    for text in &value.values {
                        payload.push(name.clone(), text.clone());
                    }
                }
            }
        }
        payload
    }
}

fn capture_question(question: &QuestionConfig, store: &AnswerStore) -> QuestionSnapshot {
    let rows = store
        .recipients_for(question.number)
        .into_iter()
        .map(|(key, recipient)| RowSnapshot {
            key,
            recipient: recipient.map(str::to_string),
            response_id: store.response_id(&key).map(str::to_string),
            other_selected: other_flag(question, store, key),
            values: row_values(question, store, key),
        })
        .collect();
    QuestionSnapshot {
        question: question.number,
        question_type: question.kind.wire_label(),
        recipient_selection: question.recipient_selection,
        rows,
    }
}

fn other_flag(question: &QuestionConfig, store: &AnswerStore, key: RecipientKey) -> Option<bool> {
    let enabled = match &question.kind {
        QuestionKind::MultiSelect(params) => params.other_enabled,
        QuestionKind::SingleSelect(params) => params.other_enabled,
        _ => false,
    };
    enabled.then(|| {
        store
            .get(&RespondentSlot::new(key.question, key.recipient))
            .is_checked(Choice::Other)
    })
}

fn row_values(
    question: &QuestionConfig,
    store: &AnswerStore,
    key: RecipientKey,
) -> Vec<SnapshotValue> {
    let row_slot = RespondentSlot::new(key.question, key.recipient);
    match &question.kind {
        QuestionKind::Distribution(_) | QuestionKind::Ranking(_) => store
            .all_slots_for(key.question)
            .into_iter()
            .filter(|slot| slot.recipient == key.recipient)
            .map(|slot| SnapshotValue {
                option: slot.option,
                values: vec![plain_text(store.get(&slot))],
            })
            .collect(),
        QuestionKind::Rubric(params) => vec![SnapshotValue {
            option: None,
            values: vec![collapse_rubric(store, key, params.sub_questions)],
        }],
        QuestionKind::MultiSelect(params) => {
            let values = store
                .get(&row_slot)
                .choices()
                .map(|choices| {
                    choices
                        .iter()
                        .map(|choice| choice_value(*choice, &params.choices, store, key))
                        .collect()
                })
                .unwrap_or_default();
            vec![SnapshotValue {
                option: None,
                values,
            }]
        }
        QuestionKind::SingleSelect(params) => {
            let value = store
                .get(&row_slot)
                .choices()
                .and_then(|choices| choices.iter().next())
                .map(|choice| choice_value(*choice, &params.choices, store, key))
                .unwrap_or_default();
            vec![SnapshotValue {
                option: None,
                values: vec![value],
            }]
        }
        QuestionKind::FreeText(_) | QuestionKind::Numeric(_) => vec![SnapshotValue {
            option: None,
            values: vec![plain_text(store.get(&row_slot))],
        }],
    }
}

fn plain_text(answer: &Answer) -> String {
    answer.as_text().unwrap_or_default().to_string()
}

fn choice_value(
    choice: Choice,
    labels: &[String],
    store: &AnswerStore,
    key: RecipientKey,
) -> String {
    match choice {
        Choice::Option(index) => labels.get(index).cloned().unwrap_or_default(),
        Choice::Other => store.other_text(&key).unwrap_or_default().to_string(),
        Choice::NoneOfTheAbove => String::new(),
    }
}

/// `"<sub>-<choice>,..."` over the answered sub-questions of one rubric row.
pub fn collapse_rubric(store: &AnswerStore, key: RecipientKey, sub_questions: usize) -> String {
    (0..sub_questions)
        .filter_map(|sub| {
            let slot = RespondentSlot::with_option(key.question, key.recipient, sub);
            store
                .get(&slot)
                .choices()
                .and_then(|choices| choices.iter().find_map(|choice| match choice {
                    Choice::Option(column) => Some(*column),
                    _ => None,
                }))
                .map(|column| format!("{sub}-{column}"))
        })
        .collect::<Vec<_>>()
        .join(",")
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PayloadField {
    pub name: String,
    pub value: String,
}

/// Ordered form fields sent to the server. Names may repeat (one per checked choice).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct SubmissionPayload {
    pub fields: Vec<PayloadField>,
}

impl SubmissionPayload {
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields.push(PayloadField {
            name: name.into(),
            value: value.into(),
        });
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|field| field.name == name)
            .map(|field| field.value.as_str())
    }

    pub fn get_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.fields
            .iter()
            .filter(move |field| field.name == name)
            .map(|field| field.value.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// What the server reports back after accepting a submission.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SubmissionReceipt {
    /// Identifier of the stored response per row; `None` when the server kept no response.
    pub response_ids: BTreeMap<RecipientKey, Option<String>>,
    pub status: String,
}

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("submission request failed: {0}")]
    Request(String),
    #[error("server rejected the submission with status {status}")]
    Rejected { status: u16 },
}

/// Sends a payload to the server. Implementations must not retry on their own.
pub trait SubmissionCollaborator {
    fn submit(&mut self, payload: &SubmissionPayload) -> Result<SubmissionReceipt, TransportError>;
}

/// Counts of what [`merge_response_ids`] changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct IdMerge {
    pub added: usize,
    pub replaced: usize,
    pub dropped: usize,
}

/// Brings the stored response ids in line with the receipt so a later resubmission edits the
/// same responses. Rows missing from the receipt lose their id.
pub fn merge_response_ids(
    registry: &QuestionRegistry,
    store: &mut AnswerStore,
    receipt: &SubmissionReceipt,
) -> Result<IdMerge, StoreError> {
    let mut merge = IdMerge::default();
    for question in registry.iter() {
        for key in registry.recipient_keys(question.number) {
            let current = store.response_id(&key).map(str::to_string);
            let returned = receipt.response_ids.get(&key).cloned().flatten();
            match (&current, &returned) {
                (None, Some(_)) => merge.added += 1,
                (Some(old), Some(new)) if old != new => merge.replaced += 1,
                (Some(_), None) => merge.dropped += 1,
                _ => {}
            }
            store.set_response_id(key, returned)?;
        }
    }
    debug!(
        added = merge.added,
        replaced = merge.replaced,
        dropped = merge.dropped,
        "response ids merged"
    );
    Ok(merge)
}
