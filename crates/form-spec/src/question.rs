use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::ids::QuestionId;

/// Point distribution (constant sum) settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DistributionParams {
    pub total_points: i64,
    #[serde(default = "one")]
    pub num_options: usize,
    #[serde(default)]
    pub distribute_to_recipients: bool,
    #[serde(default)]
    pub points_per_option: bool,
    #[serde(default)]
    pub force_uneven: bool,
}

impl Default for DistributionParams {
    fn default() -> Self {
        Self {
            total_points: 100,
            num_options: 1,
            distribute_to_recipients: false,
            points_per_option: false,
            force_uneven: false,
        }
    }
}

/// Ranking settings. `None` bounds are disabled.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
pub struct RankingParams {
    #[serde(default = "one")]
    pub num_options: usize,
    #[serde(default)]
    pub distribute_to_recipients: bool,
    #[serde(default)]
    pub duplicates_allowed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_to_rank: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_to_rank: Option<usize>,
}

/// Multiple-choice, multiple-answer settings. `None` bounds are disabled.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
pub struct MultiSelectParams {
    pub choices: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_selectable: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_selectable: Option<usize>,
    #[serde(default)]
    pub other_enabled: bool,
    #[serde(default)]
    pub none_of_the_above: bool,
}

/// Multiple-choice, single-answer settings.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
pub struct SingleSelectParams {
    pub choices: Vec<String>,
    #[serde(default)]
    pub other_enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
pub struct FreeTextParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommended_length: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct NumericParams {
    pub min: i64,
    pub max: i64,
}

/// Rubric grid: every sub-question takes one of `choices` columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RubricParams {
    pub sub_questions: usize,
    pub choices: usize,
}

/// Question type together with its type-specific configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QuestionKind {
    Distribution(DistributionParams),
    Ranking(RankingParams),
    MultiSelect(MultiSelectParams),
    SingleSelect(SingleSelectParams),
    FreeText(FreeTextParams),
    Numeric(NumericParams),
    Rubric(RubricParams),
}

impl QuestionKind {
    /// Wire label used for the `questiontype-<q>` payload field.
    pub fn wire_label(&self) -> &'static str {
        match self {
            QuestionKind::Distribution(_) => "CONSTSUM",
            QuestionKind::Ranking(params) if params.distribute_to_recipients => "RANK_RECIPIENTS",
            QuestionKind::Ranking(_) => "RANK_OPTIONS",
            QuestionKind::MultiSelect(_) => "MSQ",
            QuestionKind::SingleSelect(_) => "MCQ",
            QuestionKind::FreeText(_) => "TEXT",
            QuestionKind::Numeric(_) => "NUMSCALE",
            QuestionKind::Rubric(_) => "RUBRIC",
        }
    }
}

/// Definition of a single question on the submission form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct QuestionConfig {
    pub number: QuestionId,
    /// How many recipient rows the question is answered for.
    #[serde(default = "one")]
    pub recipients: usize,
    /// Recipients are picked by the respondent and may be left blank.
    #[serde(default)]
    pub recipient_selection: bool,
    /// Recipients a respondent can pick from when `recipient_selection` is set.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub recipient_options: Vec<String>,
    pub kind: QuestionKind,
}

impl QuestionConfig {
    pub fn new(number: impl Into<QuestionId>, recipients: usize, kind: QuestionKind) -> Self {
        Self {
            number: number.into(),
            recipients,
            recipient_selection: false,
            recipient_options: Vec::new(),
            kind,
        }
    }

    pub fn with_recipient_selection(mut self) -> Self {
        self.recipient_selection = true;
        self
    }

    pub fn with_recipient_options<S: Into<String>>(
        mut self,
        options: impl IntoIterator<Item = S>,
    ) -> Self {
        self.recipient_selection = true;
        self.recipient_options = options.into_iter().map(Into::into).collect();
        self
    }

    /// Number of option inputs per recipient row, or `None` when the row holds one answer.
    pub fn options_per_recipient(&self) -> Option<usize> {
        match &self.kind {
            QuestionKind::Distribution(params) if params.distribute_to_recipients => Some(1),
            QuestionKind::Distribution(params) => Some(params.num_options),
            QuestionKind::Ranking(params) if params.distribute_to_recipients => Some(1),
            QuestionKind::Ranking(params) => Some(params.num_options),
            QuestionKind::Rubric(params) => Some(params.sub_questions),
            _ => None,
        }
    }
}

fn one() -> usize {
    1
}
