use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A choice that can be checked inside a single- or multi-select group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "ChoiceRepr", into = "ChoiceRepr")]
pub enum Choice {
    Option(usize),
    Other,
    NoneOfTheAbove,
}

impl fmt::Display for Choice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Choice::Option(index) => write!(f, "{index}"),
            Choice::Other => f.write_str("other"),
            Choice::NoneOfTheAbove => f.write_str("none"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum ChoiceRepr {
    Index(usize),
    Named(String),
}

impl TryFrom<ChoiceRepr> for Choice {
    type Error = String;

    fn try_from(value: ChoiceRepr) -> Result<Self, Self::Error> {
        match value {
            ChoiceRepr::Index(index) => Ok(Choice::Option(index)),
            ChoiceRepr::Named(name) => match name.as_str() {
                "other" => Ok(Choice::Other),
                "none" | "none_of_the_above" => Ok(Choice::NoneOfTheAbove),
                other => Err(format!("unknown choice '{other}'")),
            },
        }
    }
}

impl From<Choice> for ChoiceRepr {
    fn from(value: Choice) -> Self {
        match value {
            Choice::Option(index) => ChoiceRepr::Index(index),
            Choice::Other => ChoiceRepr::Named("other".into()),
            Choice::NoneOfTheAbove => ChoiceRepr::Named("none".into()),
        }
    }
}

/// Raw value held by one slot.
///
/// Text is kept exactly as typed; numeric interpretation happens in the validators through
/// [`Answer::as_int`], so partially typed input never gets rejected at the store level.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Answer {
    #[default]
    Blank,
    Text(String),
    Selected(BTreeSet<Choice>),
}

impl Answer {
    pub fn text(value: impl Into<String>) -> Self {
        Answer::Text(value.into())
    }

    pub fn number(value: i64) -> Self {
        Answer::Text(value.to_string())
    }

    pub fn selected(choices: impl IntoIterator<Item = Choice>) -> Self {
        Answer::Selected(choices.into_iter().collect())
    }

    /// Unchecked for choice answers, empty after trimming for text.
    pub fn is_blank(&self) -> bool {
        match self {
            Answer::Blank => true,
            Answer::Text(text) => text.trim().is_empty(),
            Answer::Selected(choices) => choices.is_empty(),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Answer::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        self.as_text().and_then(parse_leading_int)
    }

    pub fn choices(&self) -> Option<&BTreeSet<Choice>> {
        match self {
            Answer::Selected(choices) => Some(choices),
            _ => None,
        }
    }

    pub fn is_checked(&self, choice: Choice) -> bool {
        self.choices().is_some_and(|choices| choices.contains(&choice))
    }
}

/// Parses the leading integer of `raw` the way form inputs are read: leading whitespace is
/// skipped, an optional sign is accepted and trailing garbage is ignored.
pub fn parse_leading_int(raw: &str) -> Option<i64> {
    let trimmed = raw.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let digits_len = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits_len == 0 {
        return None;
    }
    let magnitude: i64 = rest[..digits_len].parse().ok()?;
    Some(if negative { -magnitude } else { magnitude })
}
