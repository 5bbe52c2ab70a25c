// src/authoring.rs

//! Authoring-time checks for subject documents.
//!
//! The quiz runtime never calls these: a bank that slips through unvalidated
//! still grades, with broken questions degrading to "N/A". They exist so that
//! whoever writes a subject file can catch mistakes before a quiz does.

use std::collections::HashSet;

use indexmap::IndexMap;
use validator::{Validate, ValidationError};

use crate::config::{
    MAX_BLANKS_FILL, MAX_DROPDOWNS, MAX_OPTIONS_PER_DROPDOWN, MIN_DROPDOWNS,
    MIN_OPTIONS_PER_DROPDOWN,
};
use crate::engine::slots::slot_number;
use crate::error::QuizError;
use crate::models::lesson::Lesson;
use crate::models::question::{
    BlankKey, DropdownSlot, Matching, MultipleChoice, MultipleChoiceMultiple, Question,
    QuestionKind, ReorderItem, SubQuestion,
};

const INVALID_SUBJECT_CHARS: [char; 9] = ['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

fn invalid(code: &'static str, message: String) -> ValidationError {
    ValidationError::new(code).with_message(message.into())
}

/// Validates one question for authoring.
///
/// Every type needs prompt text except reading comprehension, whose passage
/// plays that role.
pub fn validate_question(question: &Question) -> Result<(), QuizError> {
    let needs_prompt = !matches!(question.kind, QuestionKind::ReadingComprehension(_));
    if needs_prompt && question.prompt().is_none() {
        return Err(QuizError::Validation("Question text is required".to_string()));
    }

    match &question.kind {
        QuestionKind::MultipleChoice(payload) => payload.validate()?,
        QuestionKind::MultipleChoiceMultiple(payload) => payload.validate()?,
        QuestionKind::TrueFalse(payload) => payload.validate()?,
        QuestionKind::FillInBlank(payload) => payload.validate()?,
        QuestionKind::Dropdown(payload) => payload.validate()?,
        QuestionKind::Matching(payload) => payload.validate()?,
        QuestionKind::Reordering(payload) => payload.validate()?,
        QuestionKind::ReadingComprehension(payload) => {
            if payload.passage.trim().is_empty() {
                return Err(QuizError::Validation("Passage text is required".to_string()));
            }
            payload.validate()?
        }
    }

    Ok(())
}

/// Validates a lesson and rejects a name already used by another lesson.
pub fn validate_lesson(lesson: &Lesson, existing: &[Lesson]) -> Result<(), QuizError> {
    lesson.validate()?;

    if lesson.name.trim().is_empty() {
        return Err(QuizError::Validation("Lesson name cannot be empty".to_string()));
    }

    let duplicate = existing
        .iter()
        .any(|other| other.id != lesson.id && other.name == lesson.name);
    if duplicate {
        return Err(QuizError::Validation("Lesson name already exists".to_string()));
    }

    Ok(())
}

/// Subject names become file names, so path-hostile characters are refused.
pub fn validate_subject_name(name: &str) -> Result<(), QuizError> {
    if name.trim().is_empty() {
        return Err(QuizError::Validation("Subject name cannot be empty".to_string()));
    }

    if let Some(bad) = name.chars().find(|c| INVALID_SUBJECT_CHARS.contains(c)) {
        return Err(QuizError::Validation(format!(
            "Subject name cannot contain '{}'",
            bad
        )));
    }

    if name.chars().count() > 50 {
        return Err(QuizError::Validation(
            "Subject name too long (max 50 characters)".to_string(),
        ));
    }

    Ok(())
}

pub(crate) fn validate_non_blank_entries(entries: &[String]) -> Result<(), ValidationError> {
    if let Some(position) = entries.iter().position(|entry| entry.trim().is_empty()) {
        return Err(invalid(
            "blank_entry",
            format!("Entry {} is empty", position + 1),
        ));
    }
    Ok(())
}

pub(crate) fn validate_choice_index(question: &MultipleChoice) -> Result<(), ValidationError> {
    if question.correct >= question.options.len() {
        return Err(invalid(
            "correct_out_of_range",
            format!(
                "Correct index must be below {}",
                question.options.len()
            ),
        ));
    }
    Ok(())
}

pub(crate) fn validate_choice_indices(
    question: &MultipleChoiceMultiple,
) -> Result<(), ValidationError> {
    let mut seen = HashSet::new();
    for &index in &question.correct {
        if index >= question.options.len() {
            return Err(invalid(
                "correct_out_of_range",
                format!("Correct index {} has no option", index),
            ));
        }
        if !seen.insert(index) {
            return Err(invalid(
                "duplicate_correct",
                format!("Correct index {} is listed twice", index),
            ));
        }
    }
    Ok(())
}

pub(crate) fn validate_blank_key(key: &BlankKey) -> Result<(), ValidationError> {
    match key {
        BlankKey::Single(answers) => validate_acceptable_answers("Q1", answers),
        BlankKey::Multi(blanks) => {
            if blanks.is_empty() {
                return Err(invalid("no_blanks", "Need at least 1 blank".to_string()));
            }
            if blanks.len() > MAX_BLANKS_FILL {
                return Err(invalid(
                    "too_many_blanks",
                    format!("At most {} blanks are allowed", MAX_BLANKS_FILL),
                ));
            }
            for (blank_id, answers) in blanks {
                if slot_number(blank_id, "Q").is_none() {
                    return Err(invalid(
                        "bad_blank_id",
                        format!("Blank id '{}' must look like Q1, Q2, ...", blank_id),
                    ));
                }
                validate_acceptable_answers(blank_id, answers)?;
            }
            Ok(())
        }
    }
}

fn validate_acceptable_answers(blank_id: &str, answers: &[String]) -> Result<(), ValidationError> {
    if answers.is_empty() {
        return Err(invalid(
            "no_answers",
            format!("{} needs at least 1 acceptable answer", blank_id),
        ));
    }
    if answers.iter().any(|answer| answer.trim().is_empty()) {
        return Err(invalid(
            "blank_answer",
            format!("{} has an empty acceptable answer", blank_id),
        ));
    }
    Ok(())
}

pub(crate) fn validate_dropdowns(
    dropdowns: &IndexMap<String, DropdownSlot>,
) -> Result<(), ValidationError> {
    if dropdowns.len() < MIN_DROPDOWNS || dropdowns.len() > MAX_DROPDOWNS {
        return Err(invalid(
            "dropdown_count",
            format!(
                "Need between {} and {} dropdowns",
                MIN_DROPDOWNS, MAX_DROPDOWNS
            ),
        ));
    }

    for (dropdown_id, slot) in dropdowns {
        if slot_number(dropdown_id, "DD").is_none() {
            return Err(invalid(
                "bad_dropdown_id",
                format!("Dropdown id '{}' must look like DD1, DD2, ...", dropdown_id),
            ));
        }
        let count = slot.options.len();
        if !(MIN_OPTIONS_PER_DROPDOWN..=MAX_OPTIONS_PER_DROPDOWN).contains(&count) {
            return Err(invalid(
                "dropdown_options",
                format!(
                    "{} needs {}-{} options",
                    dropdown_id, MIN_OPTIONS_PER_DROPDOWN, MAX_OPTIONS_PER_DROPDOWN
                ),
            ));
        }
        if slot.options.iter().any(|option| option.trim().is_empty()) {
            return Err(invalid(
                "blank_entry",
                format!("{} has an empty option", dropdown_id),
            ));
        }
        if slot.correct >= count {
            return Err(invalid(
                "correct_out_of_range",
                format!("{} has an invalid correct answer", dropdown_id),
            ));
        }
    }

    Ok(())
}

pub(crate) fn validate_matching(question: &Matching) -> Result<(), ValidationError> {
    for (position, pair) in question.pairs.iter().enumerate() {
        if pair.id.trim().is_empty() {
            return Err(invalid(
                "pair_id",
                format!("Pair {} missing ID", position + 1),
            ));
        }
        if pair.left.trim().is_empty() {
            return Err(invalid(
                "pair_left",
                format!("Pair {} left side is empty", position + 1),
            ));
        }
        if pair.right.trim().is_empty() {
            return Err(invalid(
                "pair_right",
                format!("Pair {} right side is empty", position + 1),
            ));
        }
    }

    let known: HashSet<&str> = question.pairs.iter().map(|pair| pair.id.as_str()).collect();
    if let Some(stray) = question.correct.keys().find(|id| !known.contains(id.as_str())) {
        return Err(invalid(
            "unknown_pair",
            format!("Answer key references unknown pair '{}'", stray),
        ));
    }

    Ok(())
}

pub(crate) fn validate_reorder_items(items: &[ReorderItem]) -> Result<(), ValidationError> {
    let mut orders = HashSet::new();
    for (position, item) in items.iter().enumerate() {
        if item.text.trim().is_empty() {
            return Err(invalid(
                "blank_entry",
                format!("Item {} text is empty", position + 1),
            ));
        }
        if !orders.insert(item.order) {
            return Err(invalid(
                "duplicate_order",
                format!("Order {} is used twice", item.order),
            ));
        }
    }
    Ok(())
}

pub(crate) fn validate_sub_question_index(question: &SubQuestion) -> Result<(), ValidationError> {
    if question.correct >= question.options.len() {
        return Err(invalid(
            "correct_out_of_range",
            "Sub-question has invalid correct answer".to_string(),
        ));
    }
    Ok(())
}
