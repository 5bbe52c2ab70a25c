// src/session/mod.rs

pub mod select;

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::engine;
use crate::error::QuizError;
use crate::models::answer::{Answer, QuestionResult};
use crate::models::bank::QuestionBank;
use crate::models::lesson::Lesson;
use crate::models::question::Question;

pub use select::{QuizFilter, matching_questions, select_questions};

/// Lifecycle of a [`QuizSession`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SessionPhase {
    Idle,
    SubjectLoaded,
    InProgress,
    Complete,
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SessionPhase::Idle => "idle",
            SessionPhase::SubjectLoaded => "subject loaded",
            SessionPhase::InProgress => "in progress",
            SessionPhase::Complete => "complete",
        };
        f.write_str(name)
    }
}

/// 1-based position within the running quiz.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Progress {
    pub current: usize,
    pub total: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Score {
    pub correct: usize,
    pub total: usize,
    /// Rounded to the nearest whole percent; 0 for an empty quiz.
    pub percentage: u32,
}

impl Score {
    pub fn new(correct: usize, total: usize) -> Self {
        if total == 0 {
            return Self {
                correct: 0,
                total: 0,
                percentage: 0,
            };
        }
        let percentage = (correct as f64 / total as f64 * 100.0).round() as u32;
        Self {
            correct,
            total,
            percentage,
        }
    }
}

/// State of one user working through one quiz.
///
/// Owned by the caller; nothing here is global. Answer and result slots run
/// parallel to the selected questions and are overwritten on re-submission.
#[derive(Debug, Clone)]
pub struct QuizSession {
    phase: SessionPhase,
    bank: Option<QuestionBank>,
    questions: Vec<Question>,
    answers: Vec<Option<Answer>>,
    results: Vec<Option<QuestionResult>>,
    current: usize,
    started_at: Option<DateTime<Utc>>,
    finished_at: Option<DateTime<Utc>>,
}

impl Default for QuizSession {
    fn default() -> Self {
        Self::new()
    }
}

impl QuizSession {
    pub fn new() -> Self {
        Self {
            phase: SessionPhase::Idle,
            bank: None,
            questions: Vec::new(),
            answers: Vec::new(),
            results: Vec::new(),
            current: 0,
            started_at: None,
            finished_at: None,
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn bank(&self) -> Option<&QuestionBank> {
        self.bank.as_ref()
    }

    pub fn subject(&self) -> Option<&str> {
        self.bank.as_ref().map(QuestionBank::subject)
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    pub fn finished_at(&self) -> Option<DateTime<Utc>> {
        self.finished_at
    }

    /// Stores a subject's bank. Any quiz in flight is discarded.
    pub fn load_subject(&mut self, bank: QuestionBank) {
        tracing::info!(
            "Loaded subject '{}' ({} questions)",
            bank.subject(),
            bank.questions().len()
        );
        self.clear_quiz();
        self.bank = Some(bank);
        self.phase = SessionPhase::SubjectLoaded;
    }

    /// Starts a quiz over `questions`, with every answer and result unset.
    pub fn start_quiz(&mut self, questions: Vec<Question>) -> Result<(), QuizError> {
        if self.phase == SessionPhase::Idle {
            return Err(QuizError::InvalidState {
                expected: "a loaded subject",
                found: self.phase,
            });
        }

        tracing::info!("Starting quiz with {} questions", questions.len());
        self.answers = vec![None; questions.len()];
        self.results = vec![None; questions.len()];
        self.questions = questions;
        self.current = 0;
        self.started_at = Some(Utc::now());
        self.finished_at = None;
        self.phase = SessionPhase::InProgress;
        Ok(())
    }

    /// Runs the same questions again from the start.
    pub fn retake(&mut self) -> Result<(), QuizError> {
        if self.phase != SessionPhase::Complete && self.phase != SessionPhase::InProgress {
            return Err(QuizError::InvalidState {
                expected: "a started quiz",
                found: self.phase,
            });
        }
        let questions = std::mem::take(&mut self.questions);
        self.start_quiz(questions)
    }

    /// Back to `Idle`, forgetting the subject as well.
    pub fn reset(&mut self) {
        self.clear_quiz();
        self.bank = None;
        self.phase = SessionPhase::Idle;
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_question(&self) -> Result<&Question, QuizError> {
        self.ensure_in_progress()?;
        self.questions
            .get(self.current)
            .ok_or(QuizError::InvalidState {
                expected: "a quiz with questions",
                found: self.phase,
            })
    }

    pub fn current_answer(&self) -> Result<Option<&Answer>, QuizError> {
        self.current_question()?;
        Ok(self.answers[self.current].as_ref())
    }

    pub fn save_answer(&mut self, answer: Answer) -> Result<(), QuizError> {
        self.current_question()?;
        self.answers[self.current] = Some(answer);
        Ok(())
    }

    pub fn save_result(
        &mut self,
        question: Question,
        answer: Option<Answer>,
        is_correct: bool,
    ) -> Result<(), QuizError> {
        self.current_question()?;
        self.results[self.current] = Some(QuestionResult {
            question,
            answer,
            is_correct,
        });
        Ok(())
    }

    /// Validates, stores and grades `answer` for the current question.
    ///
    /// A rejected answer leaves the session untouched.
    pub fn submit(&mut self, answer: Option<Answer>) -> Result<QuestionResult, QuizError> {
        let question = self.current_question()?.clone();
        engine::validate(&question, answer.as_ref())?;

        let is_correct = engine::check(&question, answer.as_ref());
        if let Some(answer) = answer.clone() {
            self.save_answer(answer)?;
        }
        self.save_result(question.clone(), answer.clone(), is_correct)?;

        Ok(QuestionResult {
            question,
            answer,
            is_correct,
        })
    }

    /// Moves to the next question. Returns false on the last one.
    pub fn next_question(&mut self) -> bool {
        if self.phase != SessionPhase::InProgress || self.is_last_question() {
            return false;
        }
        self.current += 1;
        true
    }

    pub fn is_last_question(&self) -> bool {
        self.current + 1 >= self.questions.len()
    }

    pub fn progress(&self) -> Progress {
        Progress {
            current: (self.current + 1).min(self.questions.len()),
            total: self.questions.len(),
        }
    }

    /// Closes the running quiz so it can be summarised.
    pub fn finish(&mut self) -> Result<(), QuizError> {
        self.ensure_in_progress()?;
        self.finished_at = Some(Utc::now());
        self.phase = SessionPhase::Complete;

        let score = self.calculate_score();
        tracing::info!(
            "Quiz finished: {}/{} correct ({}%)",
            score.correct,
            score.total,
            score.percentage
        );
        Ok(())
    }

    pub fn results(&self) -> &[Option<QuestionResult>] {
        &self.results
    }

    pub fn calculate_score(&self) -> Score {
        let correct = self
            .results
            .iter()
            .flatten()
            .filter(|result| result.is_correct)
            .count();
        Score::new(correct, self.questions.len())
    }

    /// Results graded incorrect, in quiz order. Unanswered slots are skipped.
    pub fn incorrect_questions(&self) -> Vec<&QuestionResult> {
        self.results
            .iter()
            .flatten()
            .filter(|result| !result.is_correct)
            .collect()
    }

    pub fn lesson_by_id(&self, lesson_id: Option<&str>) -> Option<&Lesson> {
        let lesson_id = lesson_id?;
        self.bank.as_ref()?.lesson_by_id(lesson_id)
    }

    fn ensure_in_progress(&self) -> Result<(), QuizError> {
        if self.phase != SessionPhase::InProgress {
            return Err(QuizError::InvalidState {
                expected: "a quiz in progress",
                found: self.phase,
            });
        }
        Ok(())
    }

    fn clear_quiz(&mut self) {
        self.questions.clear();
        self.answers.clear();
        self.results.clear();
        self.current = 0;
        self.started_at = None;
        self.finished_at = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn score_rounds_to_nearest_percent() {
        assert_eq!(Score::new(2, 3).percentage, 67);
        assert_eq!(Score::new(1, 3).percentage, 33);
        assert_eq!(Score::new(1, 2).percentage, 50);
        assert_eq!(Score::new(3, 3).percentage, 100);
    }

    #[test]
    fn empty_quiz_scores_zero() {
        assert_eq!(
            Score::new(0, 0),
            Score {
                correct: 0,
                total: 0,
                percentage: 0
            }
        );
    }

    #[test]
    fn idle_session_cannot_start() {
        let mut session = QuizSession::new();
        let err = session.start_quiz(Vec::new()).unwrap_err();
        assert!(matches!(
            err,
            QuizError::InvalidState {
                found: SessionPhase::Idle,
                ..
            }
        ));
    }
}
