use form_spec::NumericParams;
use regex::Regex;
use serde::Serialize;

/// Number of whitespace-separated tokens that contain at least one word character.
pub fn word_count(text: &str) -> usize {
    let tokens = text.split_whitespace();
    match Regex::new(r"\w") {
        Ok(word_char) => tokens.filter(|token| word_char.is_match(token)).count(),
        Err(_) => tokens.count(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WordCountTone {
    /// Within ten percent of the recommended length, bounds excluded.
    OnTarget,
    OffTarget,
}

impl WordCountTone {
    pub fn style_class(self) -> &'static str {
        match self {
            WordCountTone::OnTarget => "color_green",
            WordCountTone::OffTarget => "color_gray",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WordCount {
    pub words: usize,
    pub tone: WordCountTone,
}

pub fn assess_word_count(text: &str, recommended: u32) -> WordCount {
    let words = word_count(text);
    let recommended = f64::from(recommended);
    let margin = recommended * 0.1;
    let lower = recommended - margin;
    let upper = recommended + margin;
    let count = words as f64;
    let tone = if count > lower && count < upper {
        WordCountTone::OnTarget
    } else {
        WordCountTone::OffTarget
    };
    WordCount { words, tone }
}

/// Clamps a numeric-scale entry to its range. Returns `None` when the entry is not a number
/// or already inside the range, i.e. when the input should be left as typed.
pub fn clamp_numeric(raw: &str, params: &NumericParams) -> Option<i64> {
    let value = form_spec::parse_leading_int(raw)?;
    if value < params.min {
        Some(params.min)
    } else if value > params.max {
        Some(params.max)
    } else {
        None
    }
}
