// src/engine/grade.rs

use std::collections::BTreeMap;

use indexmap::IndexMap;

use crate::models::answer::{Answer, provided};
use crate::models::question::{BlankKey, Question, QuestionKind};

/// Grades an answer against the question's key.
///
/// * Choice and true/false: exact index.
/// * Multi-select: same set of indices, any order.
/// * Fill-in-blank: trimmed, case-insensitive match against an acceptable
///   answer, for every blank.
/// * Dropdown, matching, reading comprehension: every slot must match.
/// * Reordering: the exact ascending sequence of `order` values.
pub fn check(question: &Question, answer: Option<&Answer>) -> bool {
    let Some(answer) = provided(answer) else {
        return false;
    };

    let correct = match (&question.kind, answer) {
        (QuestionKind::MultipleChoice(choice), Answer::Choice(selected)) => {
            *selected == choice.correct
        }
        (QuestionKind::TrueFalse(tf), Answer::Choice(selected)) => *selected == tf.correct,
        (QuestionKind::MultipleChoiceMultiple(choice), Answer::Choices(selected)) => {
            let mut selected = selected.clone();
            let mut expected = choice.correct.clone();
            selected.sort_unstable();
            expected.sort_unstable();
            selected == expected
        }
        (QuestionKind::FillInBlank(fill), Answer::Text(text)) => match &fill.correct {
            BlankKey::Single(acceptable) => matches_any(text, acceptable),
            BlankKey::Multi(_) => false,
        },
        (QuestionKind::FillInBlank(fill), Answer::Blanks(blanks)) => match &fill.correct {
            BlankKey::Multi(key) => key.iter().all(|(blank_id, acceptable)| {
                let typed = blanks.get(blank_id).map_or("", String::as_str);
                matches_any(typed, acceptable)
            }),
            BlankKey::Single(_) => false,
        },
        (QuestionKind::Dropdown(dropdown), Answer::Dropdowns(selected)) => {
            dropdown.dropdowns.iter().all(|(id, slot)| {
                selected.get(id).copied().flatten() == Some(slot.correct)
            })
        }
        (QuestionKind::Matching(matching), Answer::Matches(selected)) => matching
            .correct
            .iter()
            .all(|(pair_id, expected)| selected.get(pair_id) == Some(expected)),
        (QuestionKind::Reordering(reordering), Answer::Order(arranged)) => {
            *arranged == reordering.correct_order()
        }
        (QuestionKind::ReadingComprehension(reading), Answer::Readings(selected)) => reading
            .questions
            .iter()
            .enumerate()
            .all(|(index, sub)| selected.get(&index).copied().flatten() == Some(sub.correct)),
        _ => false,
    };

    tracing::debug!(
        "Graded question {} ({}): {}",
        question.id,
        question.question_type().key(),
        correct
    );
    correct
}

/// Builds the answer a perfect submission would carry.
pub fn expected_answer(question: &Question) -> Answer {
    match &question.kind {
        QuestionKind::MultipleChoice(choice) => Answer::Choice(choice.correct),
        QuestionKind::TrueFalse(tf) => Answer::Choice(tf.correct),
        QuestionKind::MultipleChoiceMultiple(choice) => {
            let mut correct = choice.correct.clone();
            correct.sort_unstable();
            Answer::Choices(correct)
        }
        QuestionKind::FillInBlank(fill) => match &fill.correct {
            BlankKey::Single(acceptable) => {
                Answer::Text(acceptable.first().cloned().unwrap_or_default())
            }
            BlankKey::Multi(key) => Answer::Blanks(
                key.iter()
                    .map(|(id, acceptable)| {
                        (id.clone(), acceptable.first().cloned().unwrap_or_default())
                    })
                    .collect(),
            ),
        },
        QuestionKind::Dropdown(dropdown) => Answer::Dropdowns(
            dropdown
                .dropdowns
                .iter()
                .map(|(id, slot)| (id.clone(), Some(slot.correct)))
                .collect::<IndexMap<_, _>>(),
        ),
        QuestionKind::Matching(matching) => Answer::Matches(matching.correct.clone()),
        QuestionKind::Reordering(reordering) => Answer::Order(reordering.correct_order()),
        QuestionKind::ReadingComprehension(reading) => Answer::Readings(
            reading
                .questions
                .iter()
                .enumerate()
                .map(|(index, sub)| (index, Some(sub.correct)))
                .collect::<BTreeMap<_, _>>(),
        ),
    }
}

fn matches_any(typed: &str, acceptable: &[String]) -> bool {
    let typed = typed.trim().to_lowercase();
    acceptable
        .iter()
        .any(|candidate| candidate.trim().to_lowercase() == typed)
}
