// src/source/mod.rs

//! Where subject files come from.

pub mod dir;
pub mod http;

use async_trait::async_trait;

use crate::config::{QUESTIONS_FILE_PREFIX, QUESTIONS_FILE_SUFFIX};
use crate::error::QuizError;
use crate::models::bank::{QuestionBank, SubjectDocument};

pub use dir::DirSource;
pub use http::HttpSource;

/// A place holding `questions-{subject}.json` files.
#[async_trait]
pub trait SubjectSource: Send + Sync {
    /// Raw JSON of a subject file. A missing file is `QuizError::SubjectNotFound`.
    async fn fetch_subject(&self, subject: &str) -> Result<String, QuizError>;

    async fn has_subject(&self, subject: &str) -> Result<bool, QuizError>;

    /// Human-readable location, for logs.
    fn describe(&self) -> String;
}

/// `questions-{subject}.json`
pub fn subject_file_name(subject: &str) -> String {
    format!("{}{}{}", QUESTIONS_FILE_PREFIX, subject, QUESTIONS_FILE_SUFFIX)
}

/// Subject key of a file name following the naming convention.
pub fn subject_from_file_name(file_name: &str) -> Option<&str> {
    file_name
        .strip_prefix(QUESTIONS_FILE_PREFIX)?
        .strip_suffix(QUESTIONS_FILE_SUFFIX)
        .filter(|subject| !subject.is_empty())
}

/// Probes each candidate in turn and keeps the ones that exist.
/// A failing probe is logged and treated as absent.
pub async fn discover_subjects(source: &dyn SubjectSource, candidates: &[String]) -> Vec<String> {
    let mut found = Vec::new();
    for subject in candidates {
        match source.has_subject(subject).await {
            Ok(true) => found.push(subject.clone()),
            Ok(false) => {}
            Err(e) => {
                tracing::warn!(
                    "Probe for subject '{}' at {} failed: {}",
                    subject,
                    source.describe(),
                    e
                );
            }
        }
    }

    tracing::info!(
        "Discovered {} subject(s) at {}: {:?}",
        found.len(),
        source.describe(),
        found
    );
    found
}

/// Fetches and parses a subject, returning only its enabled content.
pub async fn load_subject(
    source: &dyn SubjectSource,
    subject: &str,
) -> Result<QuestionBank, QuizError> {
    let raw = source.fetch_subject(subject).await.map_err(|e| {
        tracing::error!("Failed to fetch subject '{}': {}", subject, e);
        e
    })?;
    let document = SubjectDocument::from_json(&raw)?;
    Ok(QuestionBank::from_document(subject, document))
}
