use form_engine::{ValidationOrchestrator, ValidatorKind};
use form_spec::{
    Answer, AnswerDocument, AnswerStore, FormDefinition, QuestionId, QuestionRegistry,
    RespondentSlot,
};
use serde_json::json;

fn definition() -> FormDefinition {
    serde_json::from_value(json!({
        "id": "peer-review",
        "title": "Peer review",
        "questions": [
            {
                "number": 1,
                "kind": { "type": "distribution", "total_points": 10, "num_options": 2 }
            },
            {
                "number": 2,
                "kind": { "type": "ranking", "num_options": 3, "min_to_rank": 2 }
            },
            {
                "number": 3,
                "recipients": 2,
                "recipient_selection": true,
                "recipient_options": ["alice", "bob"],
                "kind": { "type": "free_text" }
            },
            {
                "number": 4,
                "kind": {
                    "type": "multi_select",
                    "choices": ["red", "green", "blue"],
                    "min_selectable": 1,
                    "max_selectable": 2,
                    "other_enabled": true
                }
            },
            {
                "number": 5,
                "kind": { "type": "rubric", "sub_questions": 2, "choices": 3 }
            }
        ]
    }))
    .expect("fixture should deserialize")
}

fn seeded(answers: serde_json::Value) -> (QuestionRegistry, AnswerStore) {
    let registry = definition().registry().expect("valid definition");
    let mut store = AnswerStore::new(&registry);
    let document: AnswerDocument =
        serde_json::from_value(answers).expect("fixture should deserialize");
    document.apply_to(&registry, &mut store).expect("answers fit the form");
    (registry, store)
}

#[test]
fn untouched_form_passes() {
    let (registry, mut store) = seeded(json!({}));
    let validation = ValidationOrchestrator::default().validate_all(&registry, &mut store);
    assert!(validation.is_valid());
    assert!(validation.verdict.messages.is_empty());
    assert!(validation.snapshot.is_some());
}

#[test]
fn ranking_end_to_end() {
    let (registry, mut store) = seeded(json!({
        "answers": [
            { "question": 2, "recipient": 0, "option": 0, "value": "1" },
            { "question": 2, "recipient": 0, "option": 1, "value": "" },
            { "question": 2, "recipient": 0, "option": 2, "value": "3" }
        ]
    }));
    let orchestrator = ValidationOrchestrator::default();
    assert!(orchestrator.validate_all(&registry, &mut store).is_valid());

    store
        .set(RespondentSlot::with_option(2, 0, 2), Answer::text("1"))
        .expect("slot");
    let validation = orchestrator.validate_all(&registry, &mut store);
    assert!(!validation.is_valid());
    let rank_report = validation
        .reports
        .iter()
        .find(|report| report.validator == ValidatorKind::Ranking)
        .expect("rank question reported");
    let message = rank_report.groups[0].message.as_ref().expect("message");
    assert_eq!(message.text, "The same rank should not be given multiple times.");
    assert_eq!(validation.verdict.offending_questions(), vec![QuestionId(2)]);
}

#[test]
fn every_validator_runs_after_a_failure() {
    let (registry, mut store) = seeded(json!({
        "answers": [
            { "question": 1, "recipient": 0, "option": 0, "value": "3" },
            { "question": 2, "recipient": 0, "option": 0, "value": "2" },
            { "question": 2, "recipient": 0, "option": 1, "value": "2" },
            { "question": 3, "recipient": 1, "value": "no recipient" },
            { "question": 4, "recipient": 0, "value": [0, 1, 2] }
        ]
    }));
    let validation = ValidationOrchestrator::default().validate_all(&registry, &mut store);
    assert!(!validation.is_valid());
    assert!(validation.snapshot.is_none());

    let texts: Vec<&str> = validation
        .verdict
        .messages
        .iter()
        .map(|message| message.text.as_str())
        .collect();
    assert_eq!(
        texts,
        vec![
            "Please fix the error(s) for distribution question(s) 1. \
             To skip a distribution question, leave the boxes blank.",
            "Please fix the error(s) for rank question(s) 2. \
             To skip a rank question, leave all the boxes blank.",
            "You did not specify a recipient for your response in question(s) 3.",
            "Maximum selectable choices for question 4 is 2.",
        ]
    );
    assert_eq!(
        validation.verdict.offending_questions(),
        vec![QuestionId(1), QuestionId(2), QuestionId(3), QuestionId(4)]
    );
}

#[test]
fn distribution_zero_fill_lands_in_the_store() {
    let (registry, mut store) = seeded(json!({
        "answers": [
            { "question": 1, "recipient": 0, "option": 0, "value": "10" }
        ]
    }));
    let validation = ValidationOrchestrator::default().validate_all(&registry, &mut store);
    assert!(validation.is_valid());
    assert_eq!(
        store.get(&RespondentSlot::with_option(1, 0, 1)),
        &Answer::text("0")
    );
    let payload = validation.snapshot.expect("snapshot").payload();
    assert_eq!(payload.get("responsetext-1-0-1"), Some("0"));
}

#[test]
fn live_validation_only_touches_one_question() {
    let (registry, mut store) = seeded(json!({
        "answers": [
            { "question": 1, "recipient": 0, "option": 0, "value": "3" }
        ]
    }));
    let reports = ValidationOrchestrator::default().validate_question(
        &registry,
        &mut store,
        QuestionId(1),
    );
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].validator, ValidatorKind::Distribution);
    assert!(reports[0].blocks());
}

#[test]
fn snapshot_normalizes_multi_valued_answers() {
    let (registry, mut store) = seeded(json!({
        "answers": [
            { "question": 3, "recipient": 0, "value": "thanks" },
            { "question": 4, "recipient": 0, "value": [1, "other"] },
            { "question": 5, "recipient": 0, "option": 0, "value": [2] },
            { "question": 5, "recipient": 0, "option": 1, "value": [0] }
        ],
        "recipients": [
            { "question": 3, "recipient": 0, "value": "alice" }
        ],
        "other_texts": [
            { "question": 4, "recipient": 0, "value": "purple" }
        ],
        "response_ids": [
            { "question": 3, "recipient": 0, "value": "resp-17" }
        ]
    }));
    let validation = ValidationOrchestrator::default().validate_all(&registry, &mut store);
    let payload = validation.snapshot.expect("form is valid").payload();

    assert_eq!(payload.get("questiontype-1"), Some("CONSTSUM"));
    assert_eq!(payload.get("questiontype-2"), Some("RANK_OPTIONS"));
    assert_eq!(payload.get("questionresponsetotal-3"), Some("2"));
    assert_eq!(payload.get("responserecipient-3-0"), Some("alice"));
    assert_eq!(payload.get("responserecipient-3-1"), Some(""));
    assert_eq!(payload.get("responseid-3-0"), Some("resp-17"));
    assert_eq!(payload.get("responseid-3-1"), None);
    assert_eq!(payload.get("responsetext-3-0"), Some("thanks"));
    assert_eq!(
        payload.get_all("responsetext-4-0").collect::<Vec<_>>(),
        vec!["green", "purple"]
    );
    assert_eq!(payload.get("msqIsOtherOptionAnswer-4-0"), Some("1"));
    assert_eq!(payload.get("responsetext-5-0"), Some("0-2,1-0"));
}
