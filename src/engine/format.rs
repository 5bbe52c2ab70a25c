// src/engine/format.rs

use std::collections::HashMap;

use crate::engine::slots::sorted_slot_ids;
use crate::models::answer::{Answer, provided};
use crate::models::question::{BlankKey, Question, QuestionKind, Reordering};

pub const NO_ANSWER: &str = "No answer provided";
pub const NOT_AVAILABLE: &str = "N/A";

const EMPTY_BLANK: &str = "(empty)";
const NOT_SELECTED: &str = "(not selected)";
const ORDER_SEPARATOR: &str = " → ";

/// Renders the user's raw answer for the results view.
pub fn format_user_answer(question: &Question, answer: Option<&Answer>) -> String {
    let Some(answer) = provided(answer) else {
        return NO_ANSWER.to_string();
    };

    match (&question.kind, answer) {
        (QuestionKind::MultipleChoice(choice), Answer::Choice(index)) => {
            option_text(&choice.options, *index)
        }
        (QuestionKind::TrueFalse(_), Answer::Choice(index)) => true_false_text(*index),
        (QuestionKind::MultipleChoiceMultiple(choice), Answer::Choices(selected)) => {
            joined_options(&choice.options, selected)
        }
        (QuestionKind::FillInBlank(fill), Answer::Text(text)) => match &fill.correct {
            BlankKey::Single(_) => text.clone(),
            BlankKey::Multi(_) => NOT_AVAILABLE.to_string(),
        },
        (QuestionKind::FillInBlank(fill), Answer::Blanks(blanks)) => match &fill.correct {
            BlankKey::Multi(key) => sorted_slot_ids(key.keys())
                .into_iter()
                .map(|id| {
                    let typed = blanks
                        .get(id)
                        .map(String::as_str)
                        .filter(|text| !text.is_empty())
                        .unwrap_or(EMPTY_BLANK);
                    format!("{}: {}", id, typed)
                })
                .collect::<Vec<_>>()
                .join(", "),
            BlankKey::Single(_) => NOT_AVAILABLE.to_string(),
        },
        (QuestionKind::Dropdown(dropdown), Answer::Dropdowns(selected)) => {
            sorted_slot_ids(dropdown.dropdowns.keys())
                .into_iter()
                .map(|id| {
                    let text = match selected.get(id).copied().flatten() {
                        Some(index) => option_text(&dropdown.dropdowns[id].options, index),
                        None => NOT_SELECTED.to_string(),
                    };
                    format!("{}: {}", id, text)
                })
                .collect::<Vec<_>>()
                .join(", ")
        }
        (QuestionKind::Matching(_), Answer::Matches(selected)) => selected
            .values()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", "),
        (QuestionKind::Reordering(reordering), Answer::Order(arranged)) => {
            ordered_texts(reordering, arranged)
        }
        (QuestionKind::ReadingComprehension(reading), Answer::Readings(selected)) => selected
            .iter()
            .filter_map(|(index, choice)| {
                let choice = (*choice)?;
                let text = reading
                    .questions
                    .get(*index)
                    .map_or_else(|| NOT_AVAILABLE.to_string(), |sub| {
                        option_text(&sub.options, choice)
                    });
                Some(format!("Q{}: {}", index + 1, text))
            })
            .collect::<Vec<_>>()
            .join(", "),
        _ => NOT_AVAILABLE.to_string(),
    }
}

/// Renders the question's answer key for the results view.
pub fn format_correct_answer(question: &Question) -> String {
    match &question.kind {
        QuestionKind::MultipleChoice(choice) => option_text(&choice.options, choice.correct),
        QuestionKind::TrueFalse(tf) => true_false_text(tf.correct),
        QuestionKind::MultipleChoiceMultiple(choice) => {
            joined_options(&choice.options, &choice.correct)
        }
        QuestionKind::FillInBlank(fill) => match &fill.correct {
            BlankKey::Single(acceptable) => acceptable.join(", "),
            BlankKey::Multi(key) => sorted_slot_ids(key.keys())
                .into_iter()
                .map(|id| format!("{}: {}", id, key[id].join(" / ")))
                .collect::<Vec<_>>()
                .join(", "),
        },
        QuestionKind::Dropdown(dropdown) => sorted_slot_ids(dropdown.dropdowns.keys())
            .into_iter()
            .map(|id| {
                let slot = &dropdown.dropdowns[id];
                format!("{}: {}", id, option_text(&slot.options, slot.correct))
            })
            .collect::<Vec<_>>()
            .join(", "),
        QuestionKind::Matching(matching) => matching
            .correct
            .values()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", "),
        QuestionKind::Reordering(reordering) => {
            ordered_texts(reordering, &reordering.correct_order())
        }
        QuestionKind::ReadingComprehension(reading) => reading
            .questions
            .iter()
            .enumerate()
            .map(|(index, sub)| {
                format!(
                    "Q{}: {}",
                    index + 1,
                    option_text(&sub.options, sub.correct)
                )
            })
            .collect::<Vec<_>>()
            .join(", "),
    }
}

fn option_text(options: &[String], index: usize) -> String {
    options
        .get(index)
        .cloned()
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

fn true_false_text(index: usize) -> String {
    match index {
        0 => "True".to_string(),
        1 => "False".to_string(),
        _ => NOT_AVAILABLE.to_string(),
    }
}

fn joined_options(options: &[String], indices: &[usize]) -> String {
    let mut indices = indices.to_vec();
    indices.sort_unstable();
    indices
        .into_iter()
        .map(|index| option_text(options, index))
        .collect::<Vec<_>>()
        .join(", ")
}

fn ordered_texts(reordering: &Reordering, orders: &[i64]) -> String {
    let text_by_order: HashMap<i64, &str> = reordering
        .items
        .iter()
        .map(|item| (item.order, item.text.as_str()))
        .collect();

    orders
        .iter()
        .map(|order| text_by_order.get(order).copied().unwrap_or(NOT_AVAILABLE))
        .collect::<Vec<_>>()
        .join(ORDER_SEPARATOR)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::question::{
        Dropdown, DropdownSlot, FillInBlank, MultipleChoice, MultipleChoiceMultiple, ReorderItem,
        TrueFalse,
    };
    use indexmap::IndexMap;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn blank_answer_uses_sentinel() {
        let question = Question::new(1, "T/F", QuestionKind::TrueFalse(TrueFalse { correct: 0 }));
        assert_eq!(format_user_answer(&question, None), NO_ANSWER);
        assert_eq!(format_user_answer(&question, Some(&Answer::Text(String::new()))), NO_ANSWER);
        assert_eq!(format_user_answer(&question, Some(&Answer::Choice(1))), "False");
        assert_eq!(format_correct_answer(&question), "True");
    }

    #[test]
    fn out_of_range_index_is_not_available() {
        let question = Question::new(
            2,
            "Pick",
            QuestionKind::MultipleChoice(MultipleChoice {
                options: strings(&["a", "b"]),
                correct: 9,
            }),
        );
        assert_eq!(format_user_answer(&question, Some(&Answer::Choice(1))), "b");
        assert_eq!(format_correct_answer(&question), NOT_AVAILABLE);
    }

    #[test]
    fn multi_select_lists_in_option_order() {
        let question = Question::new(
            3,
            "Pick some",
            QuestionKind::MultipleChoiceMultiple(MultipleChoiceMultiple {
                options: strings(&["red", "green", "blue"]),
                correct: vec![2, 0],
            }),
        );
        assert_eq!(format_correct_answer(&question), "red, blue");
        assert_eq!(
            format_user_answer(&question, Some(&Answer::Choices(vec![1, 0]))),
            "red, green"
        );
    }

    #[test]
    fn blanks_follow_numeric_order() {
        let mut key = IndexMap::new();
        key.insert("Q10".to_string(), strings(&["ten"]));
        key.insert("Q2".to_string(), strings(&["two", "2"]));
        let question = Question::new(
            4,
            "_Q2_ _Q10_",
            QuestionKind::FillInBlank(FillInBlank {
                correct: BlankKey::Multi(key),
            }),
        );

        let mut blanks = IndexMap::new();
        blanks.insert("Q10".to_string(), "TEN".to_string());
        blanks.insert("Q2".to_string(), String::new());

        assert_eq!(
            format_user_answer(&question, Some(&Answer::Blanks(blanks))),
            "Q2: (empty), Q10: TEN"
        );
        assert_eq!(format_correct_answer(&question), "Q2: two / 2, Q10: ten");
    }

    #[test]
    fn dropdowns_show_unselected_slots() {
        let mut dropdowns = IndexMap::new();
        dropdowns.insert(
            "DD2".to_string(),
            DropdownSlot {
                options: strings(&["x", "y"]),
                correct: 1,
            },
        );
        dropdowns.insert(
            "DD1".to_string(),
            DropdownSlot {
                options: strings(&["a", "b"]),
                correct: 0,
            },
        );
        let question = Question::new(
            5,
            "[DD1] [DD2]",
            QuestionKind::Dropdown(Dropdown { dropdowns }),
        );

        let mut selected = IndexMap::new();
        selected.insert("DD1".to_string(), Some(1));
        assert_eq!(
            format_user_answer(&question, Some(&Answer::Dropdowns(selected))),
            "DD1: b, DD2: (not selected)"
        );
        assert_eq!(format_correct_answer(&question), "DD1: a, DD2: y");
    }

    #[test]
    fn reordering_maps_orders_to_text() {
        let question = Question::new(
            6,
            "Order",
            QuestionKind::Reordering(Reordering {
                items: vec![
                    ReorderItem {
                        text: "boil".into(),
                        order: 2,
                    },
                    ReorderItem {
                        text: "fill".into(),
                        order: 1,
                    },
                    ReorderItem {
                        text: "pour".into(),
                        order: 3,
                    },
                ],
            }),
        );
        assert_eq!(format_correct_answer(&question), "fill → boil → pour");
        assert_eq!(
            format_user_answer(&question, Some(&Answer::Order(vec![3, 1, 2]))),
            "pour → fill → boil"
        );
    }

    #[test]
    fn mismatched_shape_is_not_available() {
        let question = Question::new(7, "T/F", QuestionKind::TrueFalse(TrueFalse { correct: 0 }));
        assert_eq!(
            format_user_answer(&question, Some(&Answer::Order(vec![1]))),
            NOT_AVAILABLE
        );
    }
}
