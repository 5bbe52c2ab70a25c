// src/session/select.rs

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::models::bank::QuestionBank;
use crate::models::question::{Question, QuestionType};

/// Which questions a quiz may draw, and how many.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizFilter {
    /// Allowed lessons; `None` inside the list stands for "Others".
    /// `None` for the whole field allows every lesson.
    pub lessons: Option<Vec<Option<String>>>,
    /// Allowed question types; `None` allows every type.
    pub types: Option<Vec<QuestionType>>,
    /// Questions to draw. Zero draws everything that matches.
    pub count: usize,
}

impl QuizFilter {
    pub fn with_count(count: usize) -> Self {
        Self {
            count,
            ..Self::default()
        }
    }

    pub fn allows(&self, question: &Question) -> bool {
        let lesson_ok = self
            .lessons
            .as_ref()
            .is_none_or(|lessons| lessons.contains(&question.lesson_id));
        let type_ok = self
            .types
            .as_ref()
            .is_none_or(|types| types.contains(&question.question_type()));
        lesson_ok && type_ok
    }
}

/// Questions from `bank` that pass `filter`, in bank order.
pub fn matching_questions<'a>(bank: &'a QuestionBank, filter: &QuizFilter) -> Vec<&'a Question> {
    bank.questions()
        .iter()
        .filter(|question| filter.allows(question))
        .collect()
}

/// Shuffles the matching questions and keeps the first `filter.count`.
/// Asking for more than exist yields all of them.
pub fn select_questions<R: Rng + ?Sized>(
    bank: &QuestionBank,
    filter: &QuizFilter,
    rng: &mut R,
) -> Vec<Question> {
    let mut pool: Vec<Question> = matching_questions(bank, filter)
        .into_iter()
        .cloned()
        .collect();
    pool.shuffle(rng);

    if filter.count > 0 && filter.count < pool.len() {
        pool.truncate(filter.count);
    }

    tracing::debug!(
        "Selected {} questions from subject '{}'",
        pool.len(),
        bank.subject()
    );
    pool
}
