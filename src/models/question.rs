// src/models/question.rs

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::authoring::{
    validate_blank_key, validate_choice_index, validate_choice_indices, validate_dropdowns,
    validate_matching, validate_non_blank_entries, validate_reorder_items,
    validate_sub_question_index,
};
use crate::config::{
    DEFAULT_IMAGE_SCALE, MIN_CORRECT_ANSWERS_MCM, MIN_ITEMS_REORDERING, MIN_OPTIONS_MC,
    MIN_PAIRS_MATCHING, MIN_SUBQUESTIONS_READING,
};

fn default_enabled() -> bool {
    true
}

fn default_image_scale() -> u32 {
    DEFAULT_IMAGE_SCALE
}

/// One entry of a subject's `questions` array.
///
/// Fields shared by every question type live here; the type-specific payload
/// is the flattened [`QuestionKind`], tagged by the JSON `type` key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: i64,

    /// Prompt text. Reading comprehension questions usually omit it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question: Option<String>,

    /// `None` means the question belongs to the "Others" pseudo-lesson.
    #[serde(default)]
    pub lesson_id: Option<String>,

    #[serde(default = "default_enabled")]
    pub enabled: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question_image: Option<String>,

    #[serde(default = "default_image_scale")]
    pub question_image_scale: u32,

    #[serde(flatten)]
    pub kind: QuestionKind,
}

impl Question {
    pub fn new(id: i64, question: impl Into<String>, kind: QuestionKind) -> Self {
        Self {
            id,
            question: Some(question.into()),
            lesson_id: None,
            enabled: true,
            question_image: None,
            question_image_scale: DEFAULT_IMAGE_SCALE,
            kind,
        }
    }

    pub fn with_lesson(mut self, lesson_id: impl Into<String>) -> Self {
        self.lesson_id = Some(lesson_id.into());
        self
    }

    pub fn question_type(&self) -> QuestionType {
        self.kind.question_type()
    }

    /// Prompt text with surrounding whitespace removed; `None` when absent or blank.
    pub fn prompt(&self) -> Option<&str> {
        self.question
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty())
    }
}

/// Type-specific payload of a [`Question`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QuestionKind {
    MultipleChoice(MultipleChoice),
    MultipleChoiceMultiple(MultipleChoiceMultiple),
    TrueFalse(TrueFalse),
    FillInBlank(FillInBlank),
    Dropdown(Dropdown),
    Matching(Matching),
    Reordering(Reordering),
    ReadingComprehension(ReadingComprehension),
}

impl QuestionKind {
    pub fn question_type(&self) -> QuestionType {
        match self {
            QuestionKind::MultipleChoice(_) => QuestionType::MultipleChoice,
            QuestionKind::MultipleChoiceMultiple(_) => QuestionType::MultipleChoiceMultiple,
            QuestionKind::TrueFalse(_) => QuestionType::TrueFalse,
            QuestionKind::FillInBlank(_) => QuestionType::FillInBlank,
            QuestionKind::Dropdown(_) => QuestionType::Dropdown,
            QuestionKind::Matching(_) => QuestionType::Matching,
            QuestionKind::Reordering(_) => QuestionType::Reordering,
            QuestionKind::ReadingComprehension(_) => QuestionType::ReadingComprehension,
        }
    }
}

/// Fieldless mirror of the `type` tag, used for filtering and display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    MultipleChoice,
    MultipleChoiceMultiple,
    TrueFalse,
    FillInBlank,
    Dropdown,
    Matching,
    Reordering,
    ReadingComprehension,
}

impl QuestionType {
    pub const ALL: [QuestionType; 8] = [
        QuestionType::MultipleChoice,
        QuestionType::MultipleChoiceMultiple,
        QuestionType::TrueFalse,
        QuestionType::FillInBlank,
        QuestionType::Dropdown,
        QuestionType::Matching,
        QuestionType::Reordering,
        QuestionType::ReadingComprehension,
    ];

    /// The `type` tag as written in subject files.
    pub fn key(self) -> &'static str {
        match self {
            QuestionType::MultipleChoice => "multiple_choice",
            QuestionType::MultipleChoiceMultiple => "multiple_choice_multiple",
            QuestionType::TrueFalse => "true_false",
            QuestionType::FillInBlank => "fill_in_blank",
            QuestionType::Dropdown => "dropdown",
            QuestionType::Matching => "matching",
            QuestionType::Reordering => "reordering",
            QuestionType::ReadingComprehension => "reading_comprehension",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            QuestionType::MultipleChoice => "Multiple Choice",
            QuestionType::MultipleChoiceMultiple => "Multiple Choice (Multiple Answers)",
            QuestionType::TrueFalse => "True/False",
            QuestionType::FillInBlank => "Fill in the Blank",
            QuestionType::Dropdown => "Drop-Down Selection",
            QuestionType::Matching => "Matching",
            QuestionType::Reordering => "Reordering",
            QuestionType::ReadingComprehension => "Reading Comprehension",
        }
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Single-answer choice; `correct` indexes into `options`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[validate(schema(function = validate_choice_index))]
pub struct MultipleChoice {
    #[validate(
        length(min = MIN_OPTIONS_MC, message = "Need at least 2 options"),
        custom(function = validate_non_blank_entries)
    )]
    pub options: Vec<String>,
    pub correct: usize,
}

/// Multi-select choice; the answer must match `correct` exactly, in any order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[validate(schema(function = validate_choice_indices))]
pub struct MultipleChoiceMultiple {
    #[validate(
        length(min = MIN_OPTIONS_MC, message = "Need at least 2 options"),
        custom(function = validate_non_blank_entries)
    )]
    pub options: Vec<String>,
    #[validate(length(
        min = MIN_CORRECT_ANSWERS_MCM,
        message = "Select at least one correct answer"
    ))]
    pub correct: Vec<usize>,
}

/// `correct` is 0 for True and 1 for False.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct TrueFalse {
    #[validate(range(max = 1, message = "Correct answer must be 0 (True) or 1 (False)"))]
    pub correct: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct FillInBlank {
    #[validate(custom(function = validate_blank_key))]
    pub correct: BlankKey,
}

/// Answer key of a fill-in-the-blank question.
///
/// Older subject files store a flat list of acceptable strings for a single
/// blank; newer ones map each blank id (`Q1`, `Q2`, ...) to its own list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BlankKey {
    Single(Vec<String>),
    Multi(IndexMap<String, Vec<String>>),
}

/// Inline drop-downs; the prompt embeds `[DD1]`, `[DD2]`, ... placeholders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Dropdown {
    #[validate(custom(function = validate_dropdowns))]
    pub dropdowns: IndexMap<String, DropdownSlot>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DropdownSlot {
    pub options: Vec<String>,
    pub correct: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[validate(schema(function = validate_matching))]
pub struct Matching {
    #[validate(length(min = MIN_PAIRS_MATCHING, message = "Need at least 2 pairs"))]
    pub pairs: Vec<MatchingPair>,
    /// Pair id -> expected right-hand label.
    #[serde(default)]
    pub correct: IndexMap<String, String>,
}

/// Subject files keep the original `country`/`capital` key names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchingPair {
    pub id: String,
    #[serde(rename = "country")]
    pub left: String,
    #[serde(rename = "capital")]
    pub right: String,
}

/// The correct arrangement is the items sorted ascending by `order`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Reordering {
    #[validate(
        length(min = MIN_ITEMS_REORDERING, message = "Need at least 2 items"),
        custom(function = validate_reorder_items)
    )]
    pub items: Vec<ReorderItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReorderItem {
    pub text: String,
    pub order: i64,
}

impl Reordering {
    /// `order` values in their correct (ascending) sequence.
    pub fn correct_order(&self) -> Vec<i64> {
        let mut orders: Vec<i64> = self.items.iter().map(|item| item.order).collect();
        orders.sort_unstable();
        orders
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct ReadingComprehension {
    #[validate(length(min = 1, message = "Passage text is required"))]
    pub passage: String,
    #[serde(
        default,
        rename = "passageId",
        skip_serializing_if = "Option::is_none"
    )]
    pub passage_id: Option<String>,
    #[validate(
        length(min = MIN_SUBQUESTIONS_READING, message = "Need at least 1 sub-question"),
        nested
    )]
    pub questions: Vec<SubQuestion>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[validate(schema(function = validate_sub_question_index))]
pub struct SubQuestion {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[validate(length(min = 1, message = "Sub-question text is empty"))]
    pub question: String,
    #[validate(
        length(min = MIN_OPTIONS_MC, message = "Need at least 2 options"),
        custom(function = validate_non_blank_entries)
    )]
    pub options: Vec<String>,
    pub correct: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_multiple_choice_with_defaults() {
        let question: Question = serde_json::from_value(json!({
            "id": 3,
            "type": "multiple_choice",
            "question": "Capital of France?",
            "options": ["Paris", "Rome"],
            "correct": 0
        }))
        .unwrap();

        assert!(question.enabled);
        assert_eq!(question.lesson_id, None);
        assert_eq!(question.question_image_scale, DEFAULT_IMAGE_SCALE);
        assert_eq!(question.question_type(), QuestionType::MultipleChoice);
    }

    #[test]
    fn fill_in_blank_shape_picks_variant() {
        let legacy: Question = serde_json::from_value(json!({
            "id": 1, "type": "fill_in_blank", "question": "2+2=?", "correct": ["4", "four"]
        }))
        .unwrap();
        let multi: Question = serde_json::from_value(json!({
            "id": 2, "type": "fill_in_blank", "question": "_Q1_ and _Q2_",
            "correct": {"Q1": ["salt"], "Q2": ["pepper"]}
        }))
        .unwrap();

        assert!(matches!(
            legacy.kind,
            QuestionKind::FillInBlank(FillInBlank {
                correct: BlankKey::Single(_),
            })
        ));
        match multi.kind {
            QuestionKind::FillInBlank(FillInBlank {
                correct: BlankKey::Multi(map),
            }) => {
                assert_eq!(map.keys().collect::<Vec<_>>(), vec!["Q1", "Q2"]);
            }
            other => panic!("unexpected kind: {:?}", other),
        }
    }

    #[test]
    fn matching_keeps_wire_names() {
        let question: Question = serde_json::from_value(json!({
            "id": 9,
            "type": "matching",
            "question": "Match",
            "pairs": [{"id": "p1", "country": "Japan", "capital": "Tokyo"}],
            "correct": {"p1": "Tokyo"}
        }))
        .unwrap();

        let value = serde_json::to_value(&question).unwrap();
        assert_eq!(value["type"], "matching");
        assert_eq!(value["pairs"][0]["country"], "Japan");
        assert_eq!(value["lessonId"], serde_json::Value::Null);
    }

    #[test]
    fn unknown_type_is_rejected() {
        let parsed = serde_json::from_value::<Question>(json!({
            "id": 1, "type": "essay", "question": "Discuss."
        }));
        assert!(parsed.is_err());
    }

    #[test]
    fn every_type_key_matches_its_serde_tag() {
        for question_type in QuestionType::ALL {
            let value = serde_json::to_value(question_type).unwrap();
            assert_eq!(value, json!(question_type.key()));
        }
        assert_eq!(QuestionType::TrueFalse.to_string(), "True/False");
    }

    #[test]
    fn correct_order_sorts_ascending() {
        let reordering = Reordering {
            items: vec![
                ReorderItem {
                    text: "c".into(),
                    order: 3,
                },
                ReorderItem {
                    text: "a".into(),
                    order: 1,
                },
                ReorderItem {
                    text: "b".into(),
                    order: 2,
                },
            ],
        };
        assert_eq!(reordering.correct_order(), vec![1, 2, 3]);
    }
}
