//! Validation and state consistency for feedback submission forms.
//!
//! Validators read an [`AnswerStore`](form_spec::AnswerStore) and report per group; the
//! [`ValidationOrchestrator`] runs them in order and decides whether the form may be submitted;
//! the [`DerivedStateProjector`] turns reports into instructions for a [`RenderSink`]. The
//! [`FeedbackForm`] ties these together for a live page.

pub mod choices;
pub mod form;
pub mod inputs;
pub mod orchestrator;
pub mod projector;
pub mod report;
pub mod session;
pub mod submission;
pub mod sync;
pub mod validators;

pub use choices::{ChoiceEvent, OtherOptionState, apply_multi_select, apply_single_select};
pub use form::{DispatchError, FeedbackForm, FormEvent, SubmitOutcome};
pub use inputs::{WordCount, WordCountTone, assess_word_count, clamp_numeric, word_count};
pub use orchestrator::{FormValidation, ValidationOrchestrator};
pub use projector::{
    DerivedStateProjector, ElementRef, FormMode, RecordingSink, RenderInstruction, RenderSink,
};
pub use report::{
    DerivedState, GroupMessage, GroupReport, GroupStatus, QuestionReport, Severity,
    ValidationVerdict, ValidatorKind, VerdictMessage,
};
pub use session::{Banner, FixedSession, ScheduledSession, SessionState, session_banner};
pub use submission::{
    AnswerSnapshot, IdMerge, PayloadField, SubmissionCollaborator, SubmissionPayload,
    SubmissionReceipt, TransportError, merge_response_ids,
};
pub use sync::{RubricView, RubricViews, ViewChange};
pub use validators::{
    DistributionValidator, MultiSelectValidator, RankingValidator, RecipientRequiredValidator,
    TypeValidator,
};
