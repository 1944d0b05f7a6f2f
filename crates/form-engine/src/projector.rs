//! Turns validation reports and answer state into render instructions.
//!
//! The engine never draws anything itself. Everything visible goes through a [`RenderSink`],
//! and every projection re-emits the full state of the elements it covers, so projecting the
//! same state twice leaves the page unchanged.

use std::collections::BTreeSet;

use form_spec::{
    AnswerStore, QuestionConfig, QuestionId, QuestionKind, RecipientKey, RespondentSlot,
};
use serde::Serialize;

use crate::choices::OtherOptionState;
use crate::inputs::{WordCount, WordCountTone};
use crate::report::{DerivedState, GroupReport, QuestionReport, Severity, VerdictMessage};
use crate::session::Banner;
use crate::validators::{RankingValidator, TypeValidator};

pub const HIDDEN: &str = "hidden";
pub const TAKEN_RANK: &str = "color_neutral";
pub const CELL_SELECTED: &str = "cell-selected";
pub const ROW_ANSWERED: &str = "row-answered";
pub const PANEL_SUCCESS: &str = "panel-success";

/// Addressable element of the rendered form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "element", rename_all = "snake_case")]
pub enum ElementRef {
    Message { question: QuestionId, group: usize },
    Separator { question: QuestionId, group: usize },
    InfoLine { question: QuestionId, group: usize },
    RankOption { slot: RespondentSlot, rank: i64 },
    OtherText { key: RecipientKey },
    RecipientOption { key: RecipientKey, recipient: String },
    RubricCell { slot: RespondentSlot, column: usize },
    RubricRow { slot: RespondentSlot },
    RubricPanel { slot: RespondentSlot },
    WordCount { slot: RespondentSlot },
    SubmitButton,
}

/// Presentation collaborator.
pub trait RenderSink {
    fn show_message(&mut self, question: QuestionId, group: usize, text: &str, severity: Severity);

    fn set_highlight(&mut self, element: &ElementRef, style_class: &str, on: bool);

    fn set_field_enabled(&mut self, element: &ElementRef, enabled: bool);

    fn set_text(&mut self, _element: &ElementRef, _text: &str) {}

    /// Form-level status line, used for the aggregated validation report.
    fn show_status(&mut self, _message: &VerdictMessage) {}

    fn show_banner(&mut self, _banner: &Banner) {}
}

pub fn severity_class(severity: Severity) -> &'static str {
    match severity {
        Severity::Info => "text-color-blue",
        Severity::Success => "text-color-green",
        Severity::Error => "text-color-red",
    }
}

const SEVERITIES: [Severity; 3] = [Severity::Info, Severity::Success, Severity::Error];

/// How the form is being shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FormMode {
    pub submission_enabled: bool,
    pub preview: bool,
}

impl Default for FormMode {
    fn default() -> Self {
        Self {
            submission_enabled: true,
            preview: false,
        }
    }
}

impl FormMode {
    fn shows_info(self) -> bool {
        self.submission_enabled || self.preview
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DerivedStateProjector;

impl DerivedStateProjector {
    /// Inline messages and rank highlighting for one question. Validators without inline
    /// feedback only contribute to the status line.
    pub fn project_report(
        &self,
        validator: &dyn TypeValidator,
        config: &QuestionConfig,
        report: &QuestionReport,
        sink: &mut dyn RenderSink,
    ) {
        if !validator.shows_inline() {
            return;
        }
        for group in &report.groups {
            project_group_message(report.question, group, sink);
            if let DerivedState::Ranking { taken, max_rank, .. } = &group.derived {
                project_taken_ranks(config, group.group, taken, *max_rank, sink);
            }
        }
    }

    pub fn project_verdict(&self, messages: &[VerdictMessage], sink: &mut dyn RenderSink) {
        for message in messages {
            sink.show_status(message);
        }
    }

    /// Info lines of recipient-mode distribution and rank questions sit on the last row and are
    /// only shown while the form can be submitted or previewed.
    pub fn project_info_lines(
        &self,
        config: &QuestionConfig,
        mode: FormMode,
        sink: &mut dyn RenderSink,
    ) {
        let to_recipients = match &config.kind {
            QuestionKind::Distribution(params) => params.distribute_to_recipients,
            QuestionKind::Ranking(params) => params.distribute_to_recipients,
            _ => return,
        };
        let question = config.number;
        if mode.shows_info() {
            if to_recipients {
                let group = config.recipients.saturating_sub(1);
                sink.set_highlight(&ElementRef::InfoLine { question, group }, HIDDEN, false);
            }
        } else {
            for group in 0..config.recipients {
                sink.set_highlight(&ElementRef::InfoLine { question, group }, HIDDEN, true);
            }
        }
    }

    /// Hides every recipient already picked in another row of the same question.
    pub fn project_recipient_options(
        &self,
        config: &QuestionConfig,
        store: &AnswerStore,
        sink: &mut dyn RenderSink,
    ) {
        if !config.recipient_selection {
            return;
        }
        let rows = store.recipients_for(config.number);
        for (key, _) in &rows {
            let taken_elsewhere: BTreeSet<&str> = rows
                .iter()
                .filter(|(other, _)| other != key)
                .filter_map(|(_, recipient)| *recipient)
                .collect();
            for recipient in &config.recipient_options {
                let element = ElementRef::RecipientOption {
                    key: *key,
                    recipient: recipient.clone(),
                };
                sink.set_highlight(&element, HIDDEN, taken_elsewhere.contains(recipient.as_str()));
            }
        }
    }

    pub fn project_other_option(
        &self,
        key: RecipientKey,
        state: OtherOptionState,
        sink: &mut dyn RenderSink,
    ) {
        sink.set_field_enabled(&ElementRef::OtherText { key }, state.text_enabled());
    }

    /// Cell, row and panel highlighting of one rubric sub-question.
    pub fn project_rubric_row(
        &self,
        slot: RespondentSlot,
        columns: usize,
        selected: Option<usize>,
        sink: &mut dyn RenderSink,
    ) {
        for column in 0..columns {
            sink.set_highlight(
                &ElementRef::RubricCell { slot, column },
                CELL_SELECTED,
                selected == Some(column),
            );
        }
        sink.set_highlight(&ElementRef::RubricRow { slot }, ROW_ANSWERED, selected.is_some());
        sink.set_highlight(&ElementRef::RubricPanel { slot }, PANEL_SUCCESS, selected.is_some());
    }

    pub fn project_word_count(
        &self,
        slot: RespondentSlot,
        count: WordCount,
        sink: &mut dyn RenderSink,
    ) {
        let element = ElementRef::WordCount { slot };
        sink.set_text(&element, &count.words.to_string());
        for tone in [WordCountTone::OnTarget, WordCountTone::OffTarget] {
            sink.set_highlight(&element, tone.style_class(), tone == count.tone);
        }
    }

    pub fn project_submit_enabled(&self, enabled: bool, sink: &mut dyn RenderSink) {
        sink.set_field_enabled(&ElementRef::SubmitButton, enabled);
    }
}

fn project_group_message(question: QuestionId, report: &GroupReport, sink: &mut dyn RenderSink) {
    let group = report.group;
    let message_ref = ElementRef::Message { question, group };
    let active = report.message.as_ref().map(|message| message.severity);
    for severity in SEVERITIES {
        sink.set_highlight(&message_ref, severity_class(severity), active == Some(severity));
    }
    match &report.message {
        Some(message) => sink.show_message(question, group, &message.text, message.severity),
        None => sink.show_message(question, group, "", Severity::Info),
    }
    sink.set_highlight(
        &ElementRef::Separator { question, group },
        HIDDEN,
        report.message.is_none(),
    );
}

fn project_taken_ranks(
    config: &QuestionConfig,
    group: usize,
    taken: &BTreeSet<i64>,
    max_rank: usize,
    sink: &mut dyn RenderSink,
) {
    let QuestionKind::Ranking(params) = &config.kind else {
        return;
    };
    let Some((_, slots)) = RankingValidator::groups(config, params)
        .into_iter()
        .find(|(anchor, _)| *anchor == group)
    else {
        return;
    };
    for slot in slots {
        for rank in 1..=max_rank as i64 {
            sink.set_highlight(
                &ElementRef::RankOption { slot, rank },
                TAKEN_RANK,
                taken.contains(&rank),
            );
        }
    }
}

/// Everything a [`RecordingSink`] was told, in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "instruction", rename_all = "snake_case")]
pub enum RenderInstruction {
    Message {
        question: QuestionId,
        group: usize,
        text: String,
        severity: Severity,
    },
    Highlight {
        element: ElementRef,
        style_class: String,
        on: bool,
    },
    Enabled {
        element: ElementRef,
        enabled: bool,
    },
    Text {
        element: ElementRef,
        text: String,
    },
    Status(VerdictMessage),
    Banner(Banner),
}

/// Sink that records instructions instead of drawing them. Used by the CLI and in tests.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RecordingSink {
    pub instructions: Vec<RenderInstruction>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.instructions.clear();
    }

    /// Latest message shown for a group.
    pub fn message(&self, question: QuestionId, group: usize) -> Option<(&str, Severity)> {
        self.instructions.iter().rev().find_map(|instruction| match instruction {
            RenderInstruction::Message {
                question: q,
                group: g,
                text,
                severity,
            } if *q == question && *g == group => Some((text.as_str(), *severity)),
            _ => None,
        })
    }

    /// Latest state of `style_class` on `element`.
    pub fn highlight(&self, element: &ElementRef, style_class: &str) -> Option<bool> {
        self.instructions.iter().rev().find_map(|instruction| match instruction {
            RenderInstruction::Highlight {
                element: e,
                style_class: class,
                on,
            } if e == element && class == style_class => Some(*on),
            _ => None,
        })
    }

    pub fn enabled(&self, element: &ElementRef) -> Option<bool> {
        self.instructions.iter().rev().find_map(|instruction| match instruction {
            RenderInstruction::Enabled { element: e, enabled } if e == element => Some(*enabled),
            _ => None,
        })
    }

    pub fn text(&self, element: &ElementRef) -> Option<&str> {
        self.instructions.iter().rev().find_map(|instruction| match instruction {
            RenderInstruction::Text { element: e, text } if e == element => Some(text.as_str()),
            _ => None,
        })
    }

    pub fn statuses(&self) -> impl Iterator<Item = &VerdictMessage> {
        self.instructions.iter().filter_map(|instruction| match instruction {
            RenderInstruction::Status(message) => Some(message),
            _ => None,
        })
    }

    pub fn banners(&self) -> impl Iterator<Item = &Banner> {
        self.instructions.iter().filter_map(|instruction| match instruction {
            RenderInstruction::Banner(banner) => Some(banner),
            _ => None,
        })
    }
}

impl RenderSink for RecordingSink {
    fn show_message(&mut self, question: QuestionId, group: usize, text: &str, severity: Severity) {
        self.instructions.push(RenderInstruction::Message {
            question,
            group,
            text: text.to_string(),
            severity,
        });
    }

    fn set_highlight(&mut self, element: &ElementRef, style_class: &str, on: bool) {
        self.instructions.push(RenderInstruction::Highlight {
            element: element.clone(),
            style_class: style_class.to_string(),
            on,
        });
    }

    fn set_field_enabled(&mut self, element: &ElementRef, enabled: bool) {
        self.instructions.push(RenderInstruction::Enabled {
            element: element.clone(),
            enabled,
        });
    }

    fn set_text(&mut self, element: &ElementRef, text: &str) {
        self.instructions.push(RenderInstruction::Text {
            element: element.clone(),
            text: text.to_string(),
        });
    }

    fn show_status(&mut self, message: &VerdictMessage) {
        self.instructions.push(RenderInstruction::Status(message.clone()));
    }

    fn show_banner(&mut self, banner: &Banner) {
        self.instructions.push(RenderInstruction::Banner(banner.clone()));
    }
}
