// src/error.rs

use thiserror::Error;

use crate::engine::AnswerRejection;
use crate::session::SessionPhase;

/// Crate-wide error enum.
/// Centralizes every failure a caller can observe while loading subjects,
/// authoring banks or driving a quiz session.
#[derive(Debug, Error)]
pub enum QuizError {
    /// The subject document is not the expected `{lessons, questions}` shape.
    #[error("malformed subject data: {0}")]
    MalformedBank(String),

    #[error("subject '{0}' not found")]
    SubjectNotFound(String),

    #[error("subject '{0}' already exists")]
    SubjectExists(String),

    /// A session operation was called in the wrong lifecycle phase.
    #[error("session is {found}, expected {expected}")]
    InvalidState {
        expected: &'static str,
        found: SessionPhase,
    },

    /// The submitted answer did not pass local validation.
    #[error(transparent)]
    Rejected(#[from] AnswerRejection),

    /// Authoring data failed validation (question, lesson or subject name).
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("request to {url} failed with status {status}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("logging setup failed: {0}")]
    Telemetry(String),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Url(#[from] url::ParseError),
}

impl From<validator::ValidationErrors> for QuizError {
    fn from(errors: validator::ValidationErrors) -> Self {
        QuizError::Validation(errors.to_string())
    }
}
