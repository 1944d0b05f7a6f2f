//! Choice bookkeeping for single- and multi-select rows.
//!
//! Every function here maps the current answer and one click to the next answer. The
//! exclusivity rules hold after every single call, and repeating a call is a no-op.

use std::collections::BTreeSet;

use form_spec::{Answer, Choice};
use serde::Serialize;

/// Whether the free-text input paired with an "other" choice is live.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OtherOptionState {
    Unselected,
    Selected,
}

impl OtherOptionState {
    pub fn of(answer: &Answer) -> Self {
        if answer.is_checked(Choice::Other) {
            OtherOptionState::Selected
        } else {
            OtherOptionState::Unselected
        }
    }

    /// Value of the `…IsOtherOptionAnswer` flag.
    pub fn flag(self) -> u8 {
        match self {
            OtherOptionState::Unselected => 0,
            OtherOptionState::Selected => 1,
        }
    }

    pub fn text_enabled(self) -> bool {
        self == OtherOptionState::Selected
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChoiceEvent {
    Check(Choice),
    Uncheck(Choice),
}

impl ChoiceEvent {
    pub fn choice(self) -> Choice {
        match self {
            ChoiceEvent::Check(choice) | ChoiceEvent::Uncheck(choice) => choice,
        }
    }
}

fn from_set(choices: BTreeSet<Choice>) -> Answer {
    if choices.is_empty() {
        Answer::Blank
    } else {
        Answer::Selected(choices)
    }
}

/// Multi-select: "none of the above" and every other choice exclude each other.
pub fn apply_multi_select(current: &Answer, event: ChoiceEvent) -> Answer {
    let mut choices = current.choices().cloned().unwrap_or_default();
    match event {
        ChoiceEvent::Check(Choice::NoneOfTheAbove) => {
            choices.clear();
            choices.insert(Choice::NoneOfTheAbove);
        }
        ChoiceEvent::Check(choice) => {
            choices.remove(&Choice::NoneOfTheAbove);
            choices.insert(choice);
        }
        ChoiceEvent::Uncheck(choice) => {
            choices.remove(&choice);
        }
    }
    from_set(choices)
}

/// Single-select radio click. Clicking the checked choice again clears the row.
pub fn apply_single_select(current: &Answer, clicked: Choice) -> Answer {
    if current.is_checked(clicked) {
        Answer::Blank
    } else {
        Answer::selected([clicked])
    }
}
