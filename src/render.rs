// src/render.rs

//! Display helpers for whatever UI draws a question.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::models::question::{BlankKey, Question, QuestionKind};
use crate::utils::html::clean_html;

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[(DD\d+)\]|_(Q\d+)_").expect("placeholder pattern is valid"));

/// A piece of question text in display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Segment {
    /// Sanitized text to show as-is.
    Text { html: String },
    /// A text input for blank `id`.
    Blank { id: String },
    /// A select element for dropdown `id`.
    Dropdown { id: String, options: Vec<String> },
}

/// Splits the prompt into text, blank and dropdown segments.
///
/// `[DDn]` placeholders only become dropdowns on dropdown questions, and
/// `_Qn_` only becomes a blank on multi-blank questions; a placeholder with
/// no matching slot stays in the text.
pub fn prompt_segments(question: &Question) -> Vec<Segment> {
    let text = question.prompt().unwrap_or_default();
    let mut segments = Vec::new();
    let mut pending = String::new();
    let mut last = 0;

    for caps in PLACEHOLDER.captures_iter(text) {
        let Some(whole) = caps.get(0) else { continue };
        let slot = match (&question.kind, caps.get(1), caps.get(2)) {
            (QuestionKind::Dropdown(dropdown), Some(id), _) => dropdown
                .dropdowns
                .get(id.as_str())
                .map(|slot| Segment::Dropdown {
                    id: id.as_str().to_string(),
                    options: slot.options.clone(),
                }),
            (QuestionKind::FillInBlank(fill), _, Some(id)) => match &fill.correct {
                BlankKey::Multi(key) if key.contains_key(id.as_str()) => Some(Segment::Blank {
                    id: id.as_str().to_string(),
                }),
                _ => None,
            },
            _ => None,
        };

        pending.push_str(&text[last..whole.start()]);
        match slot {
            Some(slot) => {
                flush_text(&mut pending, &mut segments);
                segments.push(slot);
            }
            None => pending.push_str(whole.as_str()),
        }
        last = whole.end();
    }

    pending.push_str(&text[last..]);
    flush_text(&mut pending, &mut segments);
    segments
}

fn flush_text(pending: &mut String, segments: &mut Vec<Segment>) {
    if !pending.is_empty() {
        segments.push(Segment::Text {
            html: clean_html(pending),
        });
        pending.clear();
    }
}

/// Option labels shown for choice questions. True/false has none stored, so
/// they are synthesized; non-choice types return an empty list.
pub fn display_options(question: &Question) -> Vec<String> {
    match &question.kind {
        QuestionKind::MultipleChoice(choice) => choice.options.clone(),
        QuestionKind::MultipleChoiceMultiple(choice) => choice.options.clone(),
        QuestionKind::TrueFalse(_) => vec!["True".to_string(), "False".to_string()],
        _ => Vec::new(),
    }
}

/// Sanitized passage of a reading comprehension question.
pub fn passage_html(question: &Question) -> Option<String> {
    match &question.kind {
        QuestionKind::ReadingComprehension(reading) => Some(clean_html(&reading.passage)),
        _ => None,
    }
}
