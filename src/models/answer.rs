// src/models/answer.rs

use std::collections::BTreeMap;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::models::question::Question;

/// A user's raw response, shaped by the question type it answers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Answer {
    /// Selected option index (multiple choice), or 0 = True / 1 = False.
    Choice(usize),

    /// Selected option indices of a multi-select question. Order is irrelevant.
    Choices(Vec<usize>),

    /// Typed text for a single-blank fill-in question.
    Text(String),

    /// Blank id -> typed text.
    Blanks(IndexMap<String, String>),

    /// Dropdown id -> selected option index, `None` while unselected.
    Dropdowns(IndexMap<String, Option<usize>>),

    /// Pair id -> chosen right-hand label, in the order the user made selections.
    Matches(IndexMap<String, String>),

    /// `order` values of the items as the user arranged them.
    Order(Vec<i64>),

    /// Sub-question index -> selected option index.
    Readings(BTreeMap<usize, Option<usize>>),
}

impl Answer {
    /// The only "empty" representation an answer value can have.
    pub fn is_blank(&self) -> bool {
        matches!(self, Answer::Text(text) if text.is_empty())
    }
}

/// Outcome of one submitted question. Created at submit time, never edited.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionResult {
    pub question: Question,
    pub answer: Option<Answer>,
    pub is_correct: bool,
}

/// Returns `None` for the "no answer" sentinel values.
pub fn provided(answer: Option<&Answer>) -> Option<&Answer> {
    answer.filter(|answer| !answer.is_blank())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_empty_text_is_blank() {
        assert!(Answer::Text(String::new()).is_blank());
        assert!(!Answer::Text(" ".to_string()).is_blank());
        assert!(!Answer::Choices(vec![]).is_blank());
        assert!(provided(Some(&Answer::Text(String::new()))).is_none());
        assert!(provided(Some(&Answer::Choice(0))).is_some());
    }

    #[test]
    fn serializes_with_kind_tag() {
        let value = serde_json::to_value(Answer::Order(vec![2, 1])).unwrap();
        assert_eq!(value, serde_json::json!({"kind": "order", "value": [2, 1]}));
    }
}
