// src/lib.rs

pub mod authoring;
pub mod config;
pub mod engine;
pub mod error;
pub mod models;
pub mod render;
pub mod session;
pub mod source;
pub mod summary;
pub mod telemetry;
pub mod utils;

// Re-export specific items for convenience
pub use config::Config;
pub use error::QuizError;
pub use models::{
    Answer, Lesson, Question, QuestionBank, QuestionKind, QuestionResult, QuestionType,
};
pub use session::{QuizFilter, QuizSession, Score, SessionPhase};
pub use source::{DirSource, HttpSource, SubjectSource, discover_subjects, load_subject};
pub use summary::ResultsSummary;
