// src/engine/mod.rs

//! Answer validation, grading and display formatting.
//!
//! Every function here is pure and dispatches on [`QuestionKind`]. An answer
//! whose shape does not fit the question never errors: grading says `false`
//! and formatting says "N/A".

pub mod format;
pub mod grade;
pub mod slots;

use thiserror::Error;

use crate::models::answer::{Answer, provided};
use crate::models::question::{Question, QuestionKind};

pub use format::{NO_ANSWER, NOT_AVAILABLE, format_correct_answer, format_user_answer};
pub use grade::{check, expected_answer};

/// Why a submission was refused before grading. The message is user-facing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AnswerRejection {
    #[error("Please provide an answer.")]
    Missing,

    #[error("Please select at least one option.")]
    NoSelection,

    #[error("Please make a selection for every dropdown.")]
    IncompleteDropdowns,

    #[error("Please match every item.")]
    IncompleteMatches,

    #[error("Please answer every question about the passage.")]
    IncompleteReading,
}

/// Checks that an answer is complete enough to be graded.
///
/// Beyond the presence check, multi-select needs at least one choice and the
/// slot-based types need every slot filled. Other types only need presence.
pub fn validate(question: &Question, answer: Option<&Answer>) -> Result<(), AnswerRejection> {
    let Some(answer) = provided(answer) else {
        return Err(AnswerRejection::Missing);
    };

    match (&question.kind, answer) {
        (QuestionKind::MultipleChoiceMultiple(_), Answer::Choices(selected)) => {
            if selected.is_empty() {
                return Err(AnswerRejection::NoSelection);
            }
        }
        (QuestionKind::MultipleChoiceMultiple(_), _) => {
            return Err(AnswerRejection::NoSelection);
        }
        (QuestionKind::Dropdown(dropdown), Answer::Dropdowns(selected)) => {
            let complete = dropdown
                .dropdowns
                .keys()
                .all(|id| matches!(selected.get(id), Some(Some(_))));
            if !complete {
                return Err(AnswerRejection::IncompleteDropdowns);
            }
        }
        (QuestionKind::Dropdown(_), _) => {
            return Err(AnswerRejection::IncompleteDropdowns);
        }
        (QuestionKind::ReadingComprehension(reading), Answer::Readings(selected)) => {
            let complete = (0..reading.questions.len())
                .all(|index| matches!(selected.get(&index), Some(Some(_))));
            if !complete {
                return Err(AnswerRejection::IncompleteReading);
            }
        }
        (QuestionKind::ReadingComprehension(_), _) => {
            return Err(AnswerRejection::IncompleteReading);
        }
        (QuestionKind::Matching(matching), Answer::Matches(selected)) => {
            let complete = matching.pairs.iter().all(|pair| {
                selected
                    .get(&pair.id)
                    .is_some_and(|label| !label.is_empty())
            });
            if !complete {
                return Err(AnswerRejection::IncompleteMatches);
            }
        }
        (QuestionKind::Matching(_), _) => {
            return Err(AnswerRejection::IncompleteMatches);
        }
        (
            QuestionKind::MultipleChoice(_)
            | QuestionKind::TrueFalse(_)
            | QuestionKind::FillInBlank(_)
            | QuestionKind::Reordering(_),
            _,
        ) => {}
    }

    Ok(())
}
