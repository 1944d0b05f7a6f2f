//! Data model of a feedback submission form: question configuration, the immutable
//! [`QuestionRegistry`] built from it, and the [`AnswerStore`] holding what the respondent has
//! entered so far. Nothing in this crate validates answers; see `feedback-form-engine`.

pub mod answer;
pub mod definition;
pub mod error;
pub mod ids;
pub mod question;
pub mod registry;
pub mod store;

pub use answer::{Answer, Choice, parse_leading_int};
pub use definition::{AnswerDocument, AnswerEntry, FormDefinition, RecipientEntry};
pub use error::{DefinitionError, SpecError, StoreError};
pub use ids::{QuestionId, RecipientKey, RespondentSlot};
pub use question::{
    DistributionParams, FreeTextParams, MultiSelectParams, NumericParams, QuestionConfig,
    QuestionKind, RankingParams, RubricParams, SingleSelectParams,
};
pub use registry::QuestionRegistry;
pub use store::AnswerStore;
