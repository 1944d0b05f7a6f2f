use form_engine::projector::{CELL_SELECTED, HIDDEN, PANEL_SUCCESS, ROW_ANSWERED, TAKEN_RANK};
use form_engine::{
    ChoiceEvent, DispatchError, ElementRef, FeedbackForm, FixedSession, FormEvent, FormMode,
    RecordingSink, RubricView, Severity, SubmissionCollaborator, SubmissionPayload,
    SubmissionReceipt, SubmitOutcome, TransportError,
};
use form_spec::{
    Answer, AnswerStore, Choice, FormDefinition, QuestionId, RecipientKey, RespondentSlot,
};
use serde_json::json;
use time::Duration;

fn definition() -> FormDefinition {
    serde_json::from_value(json!({
        "id": "team-feedback",
        "title": "Team feedback",
        "questions": [
            {
                "number": 1,
                "kind": { "type": "distribution", "total_points": 10, "num_options": 2 }
            },
            {
                "number": 2,
                "recipients": 3,
                "kind": { "type": "ranking", "distribute_to_recipients": true }
            },
            {
                "number": 3,
                "recipients": 2,
                "recipient_selection": true,
                "recipient_options": ["alice", "bob"],
                "kind": { "type": "free_text", "recommended_length": 10 }
            },
            {
                "number": 4,
                "kind": {
                    "type": "multi_select",
                    "choices": ["red", "green"],
                    "other_enabled": true,
                    "none_of_the_above": true
                }
            },
            {
                "number": 5,
                "kind": { "type": "single_select", "choices": ["yes", "no"], "other_enabled": true }
            },
            {
                "number": 6,
                "kind": { "type": "numeric", "min": 1, "max": 5 }
            },
            {
                "number": 7,
                "kind": { "type": "rubric", "sub_questions": 2, "choices": 3 }
            }
        ]
    }))
    .expect("fixture should deserialize")
}

fn form(mode: FormMode) -> FeedbackForm {
    let registry = definition().registry().expect("valid definition");
    let store = AnswerStore::new(&registry);
    FeedbackForm::new(registry, store, mode)
}

fn text(slot: RespondentSlot, value: &str) -> FormEvent {
    FormEvent::TextChanged {
        slot,
        text: value.to_string(),
    }
}

#[derive(Default)]
struct StubServer {
    calls: usize,
    fail: bool,
    last: Option<SubmissionPayload>,
}

impl SubmissionCollaborator for StubServer {
    fn submit(&mut self, payload: &SubmissionPayload) -> Result<SubmissionReceipt, TransportError> {
        self.calls += 1;
        self.last = Some(payload.clone());
        if self.fail {
            return Err(TransportError::Request("connection reset".into()));
        }
        let mut receipt = SubmissionReceipt {
            status: "Submitted".into(),
            ..Default::default()
        };
        receipt
            .response_ids
            .insert(RecipientKey::new(1, 0), Some("resp-1".into()));
        receipt.response_ids.insert(RecipientKey::new(3, 0), None);
        Ok(receipt)
    }
}

#[test]
fn distribution_feedback_follows_typing() {
    let mut form = form(FormMode::default());
    let mut sink = RecordingSink::new();
    let q1 = QuestionId(1);

    form.dispatch(text(RespondentSlot::with_option(1, 0, 0), "4"), &mut sink)
        .expect("dispatch");
    assert_eq!(
        sink.message(q1, 0),
        Some(("6 points left to distribute.", Severity::Error))
    );
    let message = ElementRef::Message { question: q1, group: 0 };
    assert_eq!(sink.highlight(&message, "text-color-red"), Some(true));

    form.dispatch(text(RespondentSlot::with_option(1, 0, 1), "6"), &mut sink)
        .expect("dispatch");
    assert_eq!(
        sink.message(q1, 0),
        Some(("All points distributed!", Severity::Success))
    );
    assert_eq!(sink.highlight(&message, "text-color-red"), Some(false));
    assert_eq!(sink.highlight(&message, "text-color-green"), Some(true));
}

#[test]
fn taken_ranks_are_greyed_out_for_every_row() {
    let mut form = form(FormMode::default());
    let mut sink = RecordingSink::new();

    form.dispatch(text(RespondentSlot::with_option(2, 0, 0), "2"), &mut sink)
        .expect("dispatch");
    for recipient in 0..3 {
        let slot = RespondentSlot::with_option(2, recipient, 0);
        let taken = ElementRef::RankOption { slot, rank: 2 };
        let free = ElementRef::RankOption { slot, rank: 1 };
        assert_eq!(sink.highlight(&taken, TAKEN_RANK), Some(true));
        assert_eq!(sink.highlight(&free, TAKEN_RANK), Some(false));
    }
    assert_eq!(
        sink.message(QuestionId(2), 2),
        Some(("Please rank the above recipients.", Severity::Info))
    );
}

#[test]
fn info_lines_follow_form_mode() {
    let mut sink = RecordingSink::new();
    form(FormMode::default()).initialize(&FixedSession::open(), &mut sink);
    let last = ElementRef::InfoLine {
        question: QuestionId(2),
        group: 2,
    };
    assert_eq!(sink.highlight(&last, HIDDEN), Some(false));

    let mut sink = RecordingSink::new();
    let closed = FormMode {
        submission_enabled: false,
        preview: false,
    };
    form(closed).initialize(&FixedSession::open(), &mut sink);
    assert_eq!(sink.highlight(&last, HIDDEN), Some(true));
    assert_eq!(sink.enabled(&ElementRef::SubmitButton), Some(false));

    let mut sink = RecordingSink::new();
    let preview = FormMode {
        submission_enabled: false,
        preview: true,
    };
    form(preview).initialize(&FixedSession::open(), &mut sink);
    assert_eq!(sink.highlight(&last, HIDDEN), Some(false));
}

#[test]
fn picked_recipients_are_hidden_in_sibling_rows() {
    let mut form = form(FormMode::default());
    let mut sink = RecordingSink::new();
    let first = RecipientKey::new(3, 0);
    let second = RecipientKey::new(3, 1);
    let option = |key: RecipientKey, name: &str| ElementRef::RecipientOption {
        key,
        recipient: name.to_string(),
    };

    form.dispatch(
        FormEvent::RecipientChanged {
            key: first,
            recipient: Some("alice".into()),
        },
        &mut sink,
    )
    .expect("dispatch");
    assert_eq!(sink.highlight(&option(second, "alice"), HIDDEN), Some(true));
    assert_eq!(sink.highlight(&option(first, "alice"), HIDDEN), Some(false));

    form.dispatch(
        FormEvent::RecipientChanged {
            key: first,
            recipient: Some("bob".into()),
        },
        &mut sink,
    )
    .expect("dispatch");
    assert_eq!(sink.highlight(&option(second, "alice"), HIDDEN), Some(false));
    assert_eq!(sink.highlight(&option(second, "bob"), HIDDEN), Some(true));
}

#[test]
fn none_of_the_above_disables_other_text() {
    let mut form = form(FormMode::default());
    let mut sink = RecordingSink::new();
    let slot = RespondentSlot::new(4, 0);
    let other_text = ElementRef::OtherText {
        key: slot.recipient_key(),
    };

    form.dispatch(
        FormEvent::ChoiceToggled {
            slot,
            event: ChoiceEvent::Check(Choice::Other),
        },
        &mut sink,
    )
    .expect("dispatch");
    assert_eq!(sink.enabled(&other_text), Some(true));

    form.dispatch(
        FormEvent::ChoiceToggled {
            slot,
            event: ChoiceEvent::Check(Choice::NoneOfTheAbove),
        },
        &mut sink,
    )
    .expect("dispatch");
    assert_eq!(sink.enabled(&other_text), Some(false));
    assert_eq!(
        form.store().get(&slot),
        &Answer::selected([Choice::NoneOfTheAbove])
    );
}

#[test]
fn unknown_choices_are_rejected() {
    let mut form = form(FormMode::default());
    let mut sink = RecordingSink::new();
    let err = form
        .dispatch(
            FormEvent::ChoiceClicked {
                slot: RespondentSlot::new(5, 0),
                choice: Choice::NoneOfTheAbove,
            },
            &mut sink,
        )
        .expect_err("single select has no none-of-the-above");
    assert!(matches!(err, DispatchError::UnknownChoice { .. }));

    let err = form
        .dispatch(
            FormEvent::ChoiceClicked {
                slot: RespondentSlot::new(4, 0),
                choice: Choice::Option(0),
            },
            &mut sink,
        )
        .expect_err("question 4 is multi-select");
    assert!(matches!(err, DispatchError::WrongInput { .. }));
}

#[test]
fn radio_reclick_unchecks() {
    let mut form = form(FormMode::default());
    let mut sink = RecordingSink::new();
    let slot = RespondentSlot::new(5, 0);
    let click = FormEvent::ChoiceClicked {
        slot,
        choice: Choice::Option(1),
    };
    form.dispatch(click.clone(), &mut sink).expect("dispatch");
    assert!(form.store().get(&slot).is_checked(Choice::Option(1)));
    form.dispatch(click, &mut sink).expect("dispatch");
    assert_eq!(form.store().get(&slot), &Answer::Blank);
}

#[test]
fn numeric_scale_is_clamped() {
    let mut form = form(FormMode::default());
    let mut sink = RecordingSink::new();
    let slot = RespondentSlot::new(6, 0);
    form.dispatch(text(slot, "9"), &mut sink).expect("dispatch");
    assert_eq!(form.store().get(&slot), &Answer::text("5"));
    form.dispatch(text(slot, "3"), &mut sink).expect("dispatch");
    assert_eq!(form.store().get(&slot), &Answer::text("3"));
}

#[test]
fn word_count_is_rendered_for_free_text() {
    let mut form = form(FormMode::default());
    let mut sink = RecordingSink::new();
    let slot = RespondentSlot::new(3, 0);
    form.dispatch(text(slot, "one two three four five six seven eight nine ten"), &mut sink)
        .expect("dispatch");
    let counter = ElementRef::WordCount { slot };
    assert_eq!(sink.text(&counter), Some("10"));
    assert_eq!(sink.highlight(&counter, "color_green"), Some(true));
    assert_eq!(sink.highlight(&counter, "color_gray"), Some(false));
}

#[test]
fn rubric_views_stay_in_sync() {
    let mut form = form(FormMode::default());
    let mut sink = RecordingSink::new();
    let slot = RespondentSlot::with_option(7, 0, 1);
    let click = FormEvent::RubricClicked {
        slot,
        view: RubricView::Mobile,
        column: 2,
    };

    form.dispatch(click.clone(), &mut sink).expect("dispatch");
    assert_eq!(form.rubric_views().selected(RubricView::Desktop, &slot), Some(2));
    assert!(form.rubric_views().in_sync());
    assert_eq!(form.store().get(&slot), &Answer::selected([Choice::Option(2)]));
    assert_eq!(
        sink.highlight(&ElementRef::RubricCell { slot, column: 2 }, CELL_SELECTED),
        Some(true)
    );
    assert_eq!(sink.highlight(&ElementRef::RubricRow { slot }, ROW_ANSWERED), Some(true));
    assert_eq!(sink.highlight(&ElementRef::RubricPanel { slot }, PANEL_SUCCESS), Some(true));

    form.dispatch(click, &mut sink).expect("dispatch");
    assert_eq!(form.rubric_views().selected(RubricView::Desktop, &slot), None);
    assert!(form.rubric_views().in_sync());
    assert_eq!(form.store().get(&slot), &Answer::Blank);
    assert_eq!(sink.highlight(&ElementRef::RubricRow { slot }, ROW_ANSWERED), Some(false));
}

#[test]
fn blocked_submission_sends_nothing() {
    let mut form = form(FormMode::default());
    let mut sink = RecordingSink::new();
    let mut server = StubServer::default();
    form.dispatch(text(RespondentSlot::with_option(1, 0, 0), "3"), &mut sink)
        .expect("dispatch");

    let verdict = match form.submit(&mut server, &mut sink) {
        SubmitOutcome::Blocked(verdict) => verdict,
        other => panic!("expected a blocked submission, got {other:?}"),
    };
    assert_eq!(server.calls, 0);
    assert_eq!(verdict.offending_questions(), vec![QuestionId(1)]);
    assert_eq!(sink.statuses().count(), 1);
    assert_eq!(sink.enabled(&ElementRef::SubmitButton), Some(true));
}

#[test]
fn passing_submission_sends_once_and_merges_ids() {
    let mut form = form(FormMode::default());
    let mut sink = RecordingSink::new();
    let mut server = StubServer::default();
    form.dispatch(text(RespondentSlot::with_option(1, 0, 0), "10"), &mut sink)
        .expect("dispatch");

    let outcome = form.submit(&mut server, &mut sink);
    assert!(outcome.is_submitted());
    assert_eq!(server.calls, 1);
    let payload = server.last.as_ref().expect("payload sent");
    assert_eq!(payload.get("responsetext-1-0-1"), Some("0"));
    assert_eq!(
        form.store().response_id(&RecipientKey::new(1, 0)),
        Some("resp-1")
    );
    assert!(sink.banners().any(|banner| banner.severity == Severity::Success));
}

#[test]
fn transport_failure_keeps_answers_and_reenables_submit() {
    let mut form = form(FormMode::default());
    let mut sink = RecordingSink::new();
    let mut server = StubServer {
        fail: true,
        ..Default::default()
    };
    let slot = RespondentSlot::new(6, 0);
    form.dispatch(text(slot, "4"), &mut sink).expect("dispatch");

    let outcome = form.submit(&mut server, &mut sink);
    assert!(matches!(outcome, SubmitOutcome::TransportFailed(_)));
    assert_eq!(server.calls, 1);
    assert_eq!(form.store().get(&slot), &Answer::text("4"));
    let banner = sink.banners().last().expect("failure banner");
    assert_eq!(banner.title, "Could not submit feedback!");
    assert_eq!(
        banner.body,
        "Please try again. If the problem persists, backup your responses and reload this page."
    );
    assert_eq!(sink.enabled(&ElementRef::SubmitButton), Some(true));
}

#[test]
fn closing_session_shows_warning_on_start() {
    let mut sink = RecordingSink::new();
    form(FormMode::default())
        .initialize(&FixedSession::closing_in(Duration::minutes(10)), &mut sink);
    let banner = sink.banners().next().expect("banner");
    assert_eq!(banner.title, "Feedback Session Will Be Closing Soon");
}
