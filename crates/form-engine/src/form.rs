use form_spec::{
    Answer, AnswerStore, Choice, QuestionConfig, QuestionId, QuestionKind, QuestionRegistry,
    RecipientKey, RespondentSlot, StoreError,
};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::choices::{ChoiceEvent, OtherOptionState, apply_multi_select, apply_single_select};
use crate::inputs::{assess_word_count, clamp_numeric};
use crate::orchestrator::ValidationOrchestrator;
use crate::projector::{DerivedStateProjector, FormMode, RenderSink};
use crate::report::{QuestionReport, Severity, ValidationVerdict};
use crate::session::{Banner, SessionState, session_banner, submitted_banner};
use crate::submission::{
    IdMerge, SUBMIT_FAILURE_BODY, SUBMIT_FAILURE_TITLE, SubmissionCollaborator, SubmissionReceipt,
    TransportError, merge_response_ids,
};
use crate::sync::{RubricView, RubricViews};

/// One respondent interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormEvent {
    /// Typed or picked value of a text-valued slot: distribution and rank boxes, free text,
    /// numeric scale.
    TextChanged { slot: RespondentSlot, text: String },
    /// Checkbox of a multi-select row.
    ChoiceToggled { slot: RespondentSlot, event: ChoiceEvent },
    /// Radio button of a single-select row.
    ChoiceClicked { slot: RespondentSlot, choice: Choice },
    OtherTextChanged { key: RecipientKey, text: String },
    RecipientChanged {
        key: RecipientKey,
        recipient: Option<String>,
    },
    RubricClicked {
        slot: RespondentSlot,
        view: RubricView,
        column: usize,
    },
}

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("question {0} is not on this form")]
    UnknownQuestion(QuestionId),
    #[error("slot {slot} does not take {expected} input")]
    WrongInput {
        slot: RespondentSlot,
        expected: &'static str,
    },
    #[error("question {question} does not offer choice '{choice}'")]
    UnknownChoice { question: QuestionId, choice: Choice },
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug)]
pub enum SubmitOutcome {
    /// Validation failed; nothing was sent.
    Blocked(ValidationVerdict),
    Submitted {
        receipt: SubmissionReceipt,
        ids: IdMerge,
    },
    /// The collaborator failed. Answers are untouched and submission is enabled again.
    TransportFailed(TransportError),
}

impl SubmitOutcome {
    pub fn is_submitted(&self) -> bool {
        matches!(self, SubmitOutcome::Submitted { .. })
    }
}

/// Live form: owns the answers, routes every interaction through the matching rule and keeps
/// the render sink up to date.
pub struct FeedbackForm {
    registry: QuestionRegistry,
    store: AnswerStore,
    orchestrator: ValidationOrchestrator,
    projector: DerivedStateProjector,
    rubric_views: RubricViews,
    mode: FormMode,
}

impl FeedbackForm {
    pub fn new(registry: QuestionRegistry, store: AnswerStore, mode: FormMode) -> Self {
        Self {
            registry,
            store,
            orchestrator: ValidationOrchestrator::default(),
            projector: DerivedStateProjector,
            rubric_views: RubricViews::new(),
            mode,
        }
    }

    pub fn with_orchestrator(mut self, orchestrator: ValidationOrchestrator) -> Self {
        self.orchestrator = orchestrator;
        self
    }

    pub fn registry(&self) -> &QuestionRegistry {
        &self.registry
    }

    pub fn store(&self) -> &AnswerStore {
        &self.store
    }

    pub fn rubric_views(&self) -> &RubricViews {
        &self.rubric_views
    }

    pub fn mode(&self) -> FormMode {
        self.mode
    }

    /// Renders the initial state of every question and the session banner.
    pub fn initialize(&mut self, session: &dyn SessionState, sink: &mut dyn RenderSink) {
        let numbers: Vec<QuestionId> = self.registry.iter().map(|config| config.number).collect();
        for question in numbers {
            let Some(config) = self.registry.get(question) else {
                continue;
            };
            self.projector.project_info_lines(config, self.mode, sink);
            self.projector
                .project_recipient_options(config, &self.store, sink);
            match &config.kind {
                QuestionKind::MultiSelect(params) if params.other_enabled => {
                    project_other_options(&self.projector, config, &self.store, sink);
                }
                QuestionKind::SingleSelect(params) if params.other_enabled => {
                    project_other_options(&self.projector, config, &self.store, sink);
                }
                QuestionKind::FreeText(params) => {
                    if let Some(recommended) = params.recommended_length {
                        for slot in self.store.all_slots_for(question) {
                            let text = self.store.get(&slot).as_text().unwrap_or_default();
                            self.projector.project_word_count(
                                slot,
                                assess_word_count(text, recommended),
                                sink,
                            );
                        }
                    }
                }
                QuestionKind::Rubric(params) => {
                    let columns = params.choices;
                    for slot in self.store.all_slots_for(question) {
                        let column = rubric_column(self.store.get(&slot));
                        self.rubric_views.select(RubricView::Desktop, slot, column);
                        self.projector.project_rubric_row(slot, columns, column, sink);
                    }
                }
                _ => {}
            }
            self.revalidate(question, sink);
        }
        if let Some(banner) = session_banner(session) {
            info!(title = %banner.title, "session banner");
            sink.show_banner(&banner);
        }
        self.projector
            .project_submit_enabled(self.mode.submission_enabled, sink);
    }

    /// Applies one interaction, then refreshes the feedback of the question it touched.
    pub fn dispatch(
        &mut self,
        event: FormEvent,
        sink: &mut dyn RenderSink,
    ) -> Result<(), DispatchError> {
        let question = match &event {
            FormEvent::TextChanged { slot, .. }
            | FormEvent::ChoiceToggled { slot, .. }
            | FormEvent::ChoiceClicked { slot, .. }
            | FormEvent::RubricClicked { slot, .. } => slot.question,
            FormEvent::OtherTextChanged { key, .. } | FormEvent::RecipientChanged { key, .. } => {
                key.question
            }
        };
        let config = self
            .registry
            .get(question)
            .cloned()
            .ok_or(DispatchError::UnknownQuestion(question))?;
        debug!(question = %question, ?event, "dispatch");

        match event {
            FormEvent::TextChanged { slot, text } => self.change_text(&config, slot, text, sink)?,
            FormEvent::ChoiceToggled { slot, event } => {
                let QuestionKind::MultiSelect(params) = &config.kind else {
                    return Err(wrong_input(slot, "multi-select"));
                };
                check_choice(
                    &config,
                    event.choice(),
                    params.choices.len(),
                    params.other_enabled,
                    params.none_of_the_above,
                )?;
                let next = apply_multi_select(self.store.get(&slot), event);
                self.set_choice(slot, next, sink)?;
            }
            FormEvent::ChoiceClicked { slot, choice } => {
                let QuestionKind::SingleSelect(params) = &config.kind else {
                    return Err(wrong_input(slot, "single-select"));
                };
                check_choice(&config, choice, params.choices.len(), params.other_enabled, false)?;
                let next = apply_single_select(self.store.get(&slot), choice);
                self.set_choice(slot, next, sink)?;
            }
            FormEvent::OtherTextChanged { key, text } => {
                self.store.set_other_text(key, text)?;
            }
            FormEvent::RecipientChanged { key, recipient } => {
                self.store.set_recipient(key, recipient)?;
                self.projector
                    .project_recipient_options(&config, &self.store, sink);
            }
            FormEvent::RubricClicked { slot, view, column } => {
                let QuestionKind::Rubric(params) = &config.kind else {
                    return Err(wrong_input(slot, "rubric"));
                };
                if column >= params.choices || !self.store.contains(&slot) {
                    return Err(wrong_input(slot, "rubric"));
                }
                let changes = self.rubric_views.click(view, slot, column);
                let selected = self.rubric_views.selected(view, &slot);
                let answer = match selected {
                    Some(column) => Answer::selected([Choice::Option(column)]),
                    None => Answer::Blank,
                };
                self.store.set(slot, answer)?;
                debug!(%slot, changes = changes.len(), "rubric views synced");
                self.projector
                    .project_rubric_row(slot, params.choices, selected, sink);
            }
        }

        self.revalidate(question, sink);
        Ok(())
    }

    /// Validates the whole form and, when it passes, hands the payload to `collaborator`.
    /// Exactly one submission attempt is made per passing call and none otherwise.
    pub fn submit(
        &mut self,
        collaborator: &mut dyn SubmissionCollaborator,
        sink: &mut dyn RenderSink,
    ) -> SubmitOutcome {
        self.projector.project_submit_enabled(false, sink);

        let validation = self.orchestrator.validate_all(&self.registry, &mut self.store);
        self.project_reports(&validation.reports, sink);

        let Some(snapshot) = validation.snapshot else {
            info!(
                offending = validation.verdict.offending_questions().len(),
                "submission blocked"
            );
            self.projector
                .project_verdict(&validation.verdict.messages, sink);
            self.projector.project_submit_enabled(true, sink);
            return SubmitOutcome::Blocked(validation.verdict);
        };

        let payload = snapshot.payload();
        info!(fields = payload.len(), "submitting feedback");
        let outcome = match collaborator.submit(&payload) {
            Ok(receipt) => {
                let ids = match merge_response_ids(&self.registry, &mut self.store, &receipt) {
                    Ok(ids) => ids,
                    Err(err) => {
                        warn!(error = %err, "response ids not merged");
                        IdMerge::default()
                    }
                };
                sink.show_banner(&submitted_banner(&receipt.status));
                SubmitOutcome::Submitted { receipt, ids }
            }
            Err(err) => {
                warn!(error = %err, "submission failed");
                sink.show_banner(&Banner {
                    title: SUBMIT_FAILURE_TITLE.to_string(),
                    body: SUBMIT_FAILURE_BODY.to_string(),
                    severity: Severity::Error,
                });
                SubmitOutcome::TransportFailed(err)
            }
        };
        self.projector.project_submit_enabled(true, sink);
        outcome
    }

    fn change_text(
        &mut self,
        config: &QuestionConfig,
        slot: RespondentSlot,
        text: String,
        sink: &mut dyn RenderSink,
    ) -> Result<(), DispatchError> {
        let value = match &config.kind {
            QuestionKind::Distribution(_) | QuestionKind::Ranking(_) => text,
            QuestionKind::Numeric(params) => match clamp_numeric(&text, params) {
                Some(clamped) => clamped.to_string(),
                None => text,
            },
            QuestionKind::FreeText(params) => {
                if let Some(recommended) = params.recommended_length {
                    self.projector
                        .project_word_count(slot, assess_word_count(&text, recommended), sink);
                }
                text
            }
            _ => return Err(wrong_input(slot, "text")),
        };
        self.store.set(slot, Answer::Text(value))?;
        Ok(())
    }

    fn set_choice(
        &mut self,
        slot: RespondentSlot,
        answer: Answer,
        sink: &mut dyn RenderSink,
    ) -> Result<(), DispatchError> {
        let state = OtherOptionState::of(&answer);
        self.store.set(slot, answer)?;
        self.projector
            .project_other_option(slot.recipient_key(), state, sink);
        Ok(())
    }

    fn revalidate(&mut self, question: QuestionId, sink: &mut dyn RenderSink) {
        let reports = self
            .orchestrator
            .validate_question(&self.registry, &mut self.store, question);
        self.project_reports(&reports, sink);
    }

    fn project_reports(&self, reports: &[QuestionReport], sink: &mut dyn RenderSink) {
        for report in reports {
            let Some(config) = self.registry.get(report.question) else {
                continue;
            };
            if let Some(validator) = self
                .orchestrator
                .validators()
                .find(|validator| validator.kind() == report.validator)
            {
                self.projector.project_report(validator, config, report, sink);
            }
        }
    }
}

fn project_other_options(
    projector: &DerivedStateProjector,
    config: &QuestionConfig,
    store: &AnswerStore,
    sink: &mut dyn RenderSink,
) {
    for slot in store.all_slots_for(config.number) {
        let state = OtherOptionState::of(store.get(&slot));
        projector.project_other_option(slot.recipient_key(), state, sink);
    }
}

fn rubric_column(answer: &Answer) -> Option<usize> {
    answer.choices()?.iter().find_map(|choice| match choice {
        Choice::Option(column) => Some(*column),
        _ => None,
    })
}

fn wrong_input(slot: RespondentSlot, expected: &'static str) -> DispatchError {
    DispatchError::WrongInput { slot, expected }
}

fn check_choice(
    config: &QuestionConfig,
    choice: Choice,
    options: usize,
    other_enabled: bool,
    none_enabled: bool,
) -> Result<(), DispatchError> {
    let offered = match choice {
        Choice::Option(index) => index < options,
        Choice::Other => other_enabled,
        Choice::NoneOfTheAbove => none_enabled,
    };
    if offered {
        Ok(())
    } else {
        Err(DispatchError::UnknownChoice {
            question: config.number,
            choice,
        })
    }
}
