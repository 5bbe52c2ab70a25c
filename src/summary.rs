// src/summary.rs

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::engine::{format_correct_answer, format_user_answer};
use crate::models::question::QuestionType;
use crate::session::{QuizSession, Score};

const READING_PLACEHOLDER: &str = "Reading Comprehension";

/// Feedback block for one question the user got wrong.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MissedQuestion {
    /// 1-based position in the quiz.
    pub position: usize,
    pub question_id: i64,
    pub question_type: QuestionType,
    pub prompt: String,
    pub lesson: Option<String>,
    pub user_answer: String,
    pub correct_answer: String,
}

/// Results view of a finished (or abandoned) quiz.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultsSummary {
    pub subject: Option<String>,
    pub score: Score,
    pub missed: Vec<MissedQuestion>,
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl ResultsSummary {
    pub fn from_session(session: &QuizSession) -> Self {
        let missed = session
            .results()
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| slot.as_ref().map(|result| (index, result)))
            .filter(|(_, result)| !result.is_correct)
            .map(|(index, result)| {
                let question = &result.question;
                MissedQuestion {
                    position: index + 1,
                    question_id: question.id,
                    question_type: question.question_type(),
                    prompt: question
                        .prompt()
                        .unwrap_or(READING_PLACEHOLDER)
                        .to_string(),
                    lesson: session
                        .lesson_by_id(question.lesson_id.as_deref())
                        .map(|lesson| lesson.name.clone()),
                    user_answer: format_user_answer(question, result.answer.as_ref()),
                    correct_answer: format_correct_answer(question),
                }
            })
            .collect();

        Self {
            subject: session.subject().map(str::to_string),
            score: session.calculate_score(),
            missed,
            started_at: session.started_at(),
            finished_at: session.finished_at(),
        }
    }

    pub fn passed(&self, threshold: u32) -> bool {
        self.score.total > 0 && self.score.percentage >= threshold
    }

    pub fn is_perfect(&self) -> bool {
        self.score.total > 0 && self.score.correct == self.score.total
    }
}

impl fmt::Display for ResultsSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(subject) = &self.subject {
            writeln!(f, "Subject: {}", subject)?;
        }
        writeln!(
            f,
            "Score: {}/{} ({}%)",
            self.score.correct, self.score.total, self.score.percentage
        )?;

        for missed in &self.missed {
            writeln!(f)?;
            writeln!(f, "{}. {}", missed.position, missed.prompt)?;
            if let Some(lesson) = &missed.lesson {
                writeln!(f, "   Lesson: {}", lesson)?;
            }
            writeln!(f, "   Your answer: {}", missed.user_answer)?;
            writeln!(f, "   Correct answer: {}", missed.correct_answer)?;
        }
        Ok(())
    }
}
