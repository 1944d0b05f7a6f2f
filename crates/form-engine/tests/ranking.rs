use std::collections::BTreeSet;

use form_engine::{
    DerivedState, GroupReport, GroupStatus, RankingValidator, Severity, TypeValidator,
};
use form_spec::{
    Answer, AnswerStore, QuestionConfig, QuestionKind, QuestionRegistry, RankingParams,
    RespondentSlot,
};

fn rank_options(params: RankingParams) -> QuestionConfig {
    QuestionConfig::new(
        2,
        1,
        QuestionKind::Ranking(RankingParams {
            num_options: 3,
            ..params
        }),
    )
}

fn check(config: &QuestionConfig, values: &[&str]) -> GroupReport {
    let registry = QuestionRegistry::new([config.clone()]).expect("registry");
    let mut store = AnswerStore::new(&registry);
    for (option, value) in values.iter().enumerate() {
        store
            .set(
                RespondentSlot::with_option(2, 0, option),
                Answer::text(*value),
            )
            .expect("slot exists");
    }
    let mut report = RankingValidator.check(config, &store);
    assert_eq!(report.groups.len(), 1);
    report.groups.remove(0)
}

fn text(group: &GroupReport) -> Option<&str> {
    group.message.as_ref().map(|message| message.text.as_str())
}

#[test]
fn duplicate_ranks_block_even_when_all_filled() {
    let group = check(&rank_options(RankingParams::default()), &["1", "1", "3"]);
    assert!(group.status.blocks());
    assert_eq!(
        text(&group),
        Some("The same rank should not be given multiple times.")
    );
    assert_eq!(
        group.message.as_ref().map(|message| message.severity),
        Some(Severity::Error)
    );
}

#[test]
fn partially_ranked_group_within_bounds_passes() {
    let config = rank_options(RankingParams {
        min_to_rank: Some(2),
        ..Default::default()
    });
    let group = check(&config, &["1", "", "3"]);
    assert_eq!(group.status, GroupStatus::Satisfied);
    assert_eq!(group.message, None);
    assert_eq!(
        group.derived,
        DerivedState::Ranking {
            taken: BTreeSet::from([1, 3]),
            ranked: 2,
            max_rank: 3,
        }
    );
}

#[test]
fn duplicate_takes_priority_over_bounds() {
    let config = rank_options(RankingParams {
        min_to_rank: Some(3),
        ..Default::default()
    });
    let group = check(&config, &["1", "", "1"]);
    assert_eq!(
        text(&group),
        Some("The same rank should not be given multiple times.")
    );
}

#[test]
fn ranks_outside_the_option_count_block() {
    for values in [["0", "9", "-4"], ["1", "2", "4"], ["0", "", ""]] {
        let group = check(&rank_options(RankingParams::default()), &values);
        assert_eq!(group.status, GroupStatus::ConstraintViolation, "{values:?}");
        assert_eq!(text(&group), Some("Ranks must be between 1 and 3."));
    }
}

#[test]
fn duplicate_outranks_range_error() {
    let group = check(&rank_options(RankingParams::default()), &["5", "5", ""]);
    assert_eq!(
        text(&group),
        Some("The same rank should not be given multiple times.")
    );
}

#[test]
fn too_few_ranked_options() {
    let config = rank_options(RankingParams {
        min_to_rank: Some(2),
        ..Default::default()
    });
    let group = check(&config, &["1", "", ""]);
    assert!(group.status.blocks());
    assert_eq!(text(&group), Some("You need to rank at least 2 options."));
}

#[test]
fn too_many_ranked_options() {
    let config = rank_options(RankingParams {
        max_to_rank: Some(2),
        ..Default::default()
    });
    let group = check(&config, &["1", "2", "3"]);
    assert!(group.status.blocks());
    assert_eq!(text(&group), Some("Rank no more than 2 options."));
}

#[test]
fn unranked_options_prompt_without_bounds() {
    let group = check(&rank_options(RankingParams::default()), &["1", "", ""]);
    assert_eq!(group.status, GroupStatus::Incomplete);
    assert!(!group.status.blocks());
    assert_eq!(text(&group), Some("Please rank the above options."));
}

#[test]
fn bounds_are_ignored_until_something_is_ranked() {
    let config = rank_options(RankingParams {
        min_to_rank: Some(2),
        ..Default::default()
    });
    let group = check(&config, &["", "", ""]);
    assert!(!group.status.blocks());
    assert_eq!(text(&group), Some("Please rank the above options."));
}

#[test]
fn active_bound_suppresses_the_prompt() {
    let config = rank_options(RankingParams {
        max_to_rank: Some(3),
        ..Default::default()
    });
    let group = check(&config, &["2", "", ""]);
    assert_eq!(group.status, GroupStatus::Satisfied);
    assert_eq!(group.message, None);
}

#[test]
fn duplicates_may_be_allowed() {
    let config = rank_options(RankingParams {
        duplicates_allowed: true,
        ..Default::default()
    });
    let group = check(&config, &["1", "1", "2"]);
    assert_eq!(group.status, GroupStatus::Satisfied);
}

#[test]
fn recipient_mode_groups_every_row() {
    let config = QuestionConfig::new(
        2,
        3,
        QuestionKind::Ranking(RankingParams {
            distribute_to_recipients: true,
            ..Default::default()
        }),
    );
    let registry = QuestionRegistry::new([config.clone()]).expect("registry");
    let mut store = AnswerStore::new(&registry);
    store
        .set(RespondentSlot::with_option(2, 0, 0), Answer::number(2))
        .expect("slot");
    store
        .set(RespondentSlot::with_option(2, 2, 0), Answer::number(1))
        .expect("slot");

    let report = RankingValidator.check(&config, &store);
    assert_eq!(report.groups.len(), 1);
    let group = &report.groups[0];
    assert_eq!(group.group, 2);
    assert_eq!(text(group), Some("Please rank the above recipients."));
    assert_eq!(
        group.derived,
        DerivedState::Ranking {
            taken: BTreeSet::from([1, 2]),
            ranked: 2,
            max_rank: 3,
        }
    );
}

#[test]
fn summary_names_rank_questions() {
    let config = rank_options(RankingParams::default());
    let registry = QuestionRegistry::new([config.clone()]).expect("registry");
    let mut store = AnswerStore::new(&registry);
    store
        .set(RespondentSlot::with_option(2, 0, 0), Answer::number(1))
        .expect("slot");
    store
        .set(RespondentSlot::with_option(2, 0, 1), Answer::number(1))
        .expect("slot");
    let report = RankingValidator.check(&config, &store);
    let messages = RankingValidator.summarize(&[&report]);
    assert_eq!(
        messages[0].text,
        "Please fix the error(s) for rank question(s) 2. \
         To skip a rank question, leave all the boxes blank."
    );
}
