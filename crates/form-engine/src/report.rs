use std::collections::BTreeSet;
use std::fmt;

use form_spec::{QuestionId, RespondentSlot};
use serde::Serialize;

/// Presentation weight of a message. Colour is derived from this and never read back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Success,
    Error,
}

/// Outcome of one validated group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupStatus {
    /// Nothing to report: untouched optional input or a fully valid group without message.
    Clear,
    /// The respondent has not finished the group. Never blocks submission.
    Incomplete,
    /// All rules satisfied.
    Satisfied,
    /// Bounds or uniqueness broken.
    ConstraintViolation,
    /// An answer exists for a row whose recipient is missing.
    ConsistencyViolation,
}

impl GroupStatus {
    pub fn blocks(self) -> bool {
        matches!(
            self,
            GroupStatus::ConstraintViolation | GroupStatus::ConsistencyViolation
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupMessage {
    pub text: String,
    pub severity: Severity,
}

impl GroupMessage {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            severity: Severity::Info,
        }
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            severity: Severity::Success,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            severity: Severity::Error,
        }
    }
}

/// Validator-specific state the projector turns into highlighting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DerivedState {
    None,
    Distribution {
        points: i64,
        sum: i64,
        all_unique: bool,
    },
    Ranking {
        taken: BTreeSet<i64>,
        ranked: usize,
        max_rank: usize,
    },
    Selection {
        selected: usize,
    },
}

/// Result of validating one group of slots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupReport {
    /// Recipient row the group message is anchored to.
    pub group: usize,
    pub status: GroupStatus,
    pub message: Option<GroupMessage>,
    pub derived: DerivedState,
    /// Blank slots the validator wants set to zero before anything else reads the store.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fills: Vec<RespondentSlot>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidatorKind {
    Distribution,
    Ranking,
    RecipientRequired,
    MultiSelect,
}

impl fmt::Display for ValidatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ValidatorKind::Distribution => "distribution",
            ValidatorKind::Ranking => "ranking",
            ValidatorKind::RecipientRequired => "recipient-required",
            ValidatorKind::MultiSelect => "multi-select",
        };
        f.write_str(label)
    }
}

/// Everything one validator found for one question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuestionReport {
    pub question: QuestionId,
    pub validator: ValidatorKind,
    pub groups: Vec<GroupReport>,
}

impl QuestionReport {
    pub fn blocks(&self) -> bool {
        self.groups.iter().any(|group| group.status.blocks())
    }

    pub fn blocking_groups(&self) -> impl Iterator<Item = &GroupReport> {
        self.groups.iter().filter(|group| group.status.blocks())
    }
}

/// One entry of the aggregated report shown to the respondent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerdictMessage {
    pub questions: Vec<QuestionId>,
    pub text: String,
    pub severity: Severity,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationVerdict {
    pub valid: bool,
    pub messages: Vec<VerdictMessage>,
}

impl ValidationVerdict {
    /// Every question number named by a blocking message, ascending and deduplicated.
    pub fn offending_questions(&self) -> Vec<QuestionId> {
        let set: BTreeSet<QuestionId> = self
            .messages
            .iter()
            .filter(|message| message.severity == Severity::Error)
            .flat_map(|message| message.questions.iter().copied())
            .collect();
        set.into_iter().collect()
    }
}

/// Joins question numbers the way status messages list them: `1, 3, 4`.
pub(crate) fn join_questions(questions: &[QuestionId]) -> String {
    questions
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
