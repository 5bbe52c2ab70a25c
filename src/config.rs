// src/config.rs

use std::env;
use std::path::PathBuf;

use dotenvy::dotenv;
use url::Url;

use crate::error::QuizError;
use crate::session::QuizFilter;
use crate::source::{DirSource, HttpSource, SubjectSource};

/// Number of questions a quiz draws when the caller does not choose.
pub const DEFAULT_QUESTION_COUNT: usize = 5;
/// Minimum percentage for a summary to count as passed.
pub const PASSING_SCORE_PERCENTAGE: u32 = 60;
pub const DEFAULT_IMAGE_SCALE: u32 = 50;

pub const QUESTIONS_FILE_PREFIX: &str = "questions-";
pub const QUESTIONS_FILE_SUFFIX: &str = ".json";
pub const IMAGES_FOLDER: &str = "images";

// Authoring limits
pub const MIN_OPTIONS_MC: u64 = 2;
pub const MIN_CORRECT_ANSWERS_MCM: u64 = 1;
pub const MIN_PAIRS_MATCHING: u64 = 2;
pub const MIN_ITEMS_REORDERING: u64 = 2;
pub const MIN_SUBQUESTIONS_READING: u64 = 1;
pub const MAX_BLANKS_FILL: usize = 10;
pub const MIN_DROPDOWNS: usize = 1;
pub const MAX_DROPDOWNS: usize = 5;
pub const MIN_OPTIONS_PER_DROPDOWN: usize = 3;
pub const MAX_OPTIONS_PER_DROPDOWN: usize = 4;

pub const LESSON_ID_PREFIX: &str = "L";
pub const LESSON_ID_PADDING: usize = 3;

/// Label used for questions without a lesson.
pub const OTHERS_CATEGORY: &str = "Others";

const DEFAULT_SUBJECTS: &[&str] = &["english", "math", "science", "history", "geography"];

#[derive(Debug, Clone)]
pub struct Config {
    /// Folder holding `questions-{subject}.json` files.
    pub bank_dir: PathBuf,
    /// When set, subjects are fetched over HTTP from this folder URL instead.
    pub bank_url: Option<Url>,
    /// Root of the per-subject image folders.
    pub images_dir: PathBuf,
    /// Candidate subject keys probed during discovery.
    pub subjects: Vec<String>,
    pub question_count: usize,
    pub passing_percentage: u32,
    pub rust_log: String,
    pub log_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bank_dir: PathBuf::from("questions"),
            bank_url: None,
            images_dir: PathBuf::from(IMAGES_FOLDER),
            subjects: DEFAULT_SUBJECTS.iter().map(|s| s.to_string()).collect(),
            question_count: DEFAULT_QUESTION_COUNT,
            passing_percentage: PASSING_SCORE_PERCENTAGE,
            rust_log: "info".to_string(),
            log_dir: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, QuizError> {
        dotenv().ok();

        let defaults = Self::default();

        let bank_dir = env::var("QUIZ_BANK_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.bank_dir);

        let bank_url = match env::var("QUIZ_BANK_URL") {
            Ok(raw) if !raw.trim().is_empty() => Some(Url::parse(raw.trim())?),
            _ => None,
        };

        let images_dir = env::var("QUIZ_IMAGES_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.images_dir);

        let subjects = match env::var("QUIZ_SUBJECTS") {
            Ok(raw) => parse_subject_list(&raw),
            Err(_) => defaults.subjects,
        };

        let question_count = parse_number("QUIZ_QUESTION_COUNT", defaults.question_count)?;
        let passing_percentage =
            parse_number("QUIZ_PASSING_PERCENTAGE", defaults.passing_percentage)?;
        if passing_percentage > 100 {
            return Err(QuizError::Config(format!(
                "QUIZ_PASSING_PERCENTAGE must be at most 100, got {}",
                passing_percentage
            )));
        }

        let rust_log = env::var("RUST_LOG").unwrap_or(defaults.rust_log);
        let log_dir = env::var("QUIZ_LOG_DIR").ok().map(PathBuf::from);

        Ok(Self {
            bank_dir,
            bank_url,
            images_dir,
            subjects,
            question_count,
            passing_percentage,
            rust_log,
            log_dir,
        })
    }

    /// Builds the subject source this configuration points at.
    /// The HTTP location wins when both are configured.
    pub fn bank_source(&self) -> Box<dyn SubjectSource> {
        match &self.bank_url {
            Some(url) => Box::new(HttpSource::new(url.clone())),
            None => Box::new(DirSource::with_images(
                self.bank_dir.clone(),
                self.images_dir.clone(),
            )),
        }
    }

    /// Filter drawing `question_count` questions from every lesson and type.
    pub fn quiz_filter(&self) -> QuizFilter {
        QuizFilter::with_count(self.question_count)
    }
}

fn parse_subject_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

fn parse_number<T: std::str::FromStr>(key: &str, default: T) -> Result<T, QuizError> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| QuizError::Config(format!("{} must be a number, got '{}'", key, raw))),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subject_list_is_trimmed_and_lowercased() {
        let subjects = parse_subject_list(" Math, science ,,History ");
        assert_eq!(subjects, vec!["math", "science", "history"]);
    }

    #[test]
    fn default_points_at_local_folder() {
        let config = Config::default();
        assert_eq!(config.bank_dir, PathBuf::from("questions"));
        assert!(config.bank_url.is_none());
        assert_eq!(config.question_count, DEFAULT_QUESTION_COUNT);
        assert_eq!(config.passing_percentage, 60);
        assert_eq!(config.images_dir, PathBuf::from("images"));
    }

    #[test]
    fn bank_source_prefers_url() {
        let mut config = Config::default();
        assert_eq!(config.bank_source().describe(), "questions");

        config.bank_url = Some(Url::parse("http://localhost:8000/questions/").unwrap());
        assert_eq!(
            config.bank_source().describe(),
            "http://localhost:8000/questions/"
        );
    }

    #[test]
    fn quiz_filter_uses_question_count() {
        let config = Config {
            question_count: 12,
            ..Config::default()
        };
        let filter = config.quiz_filter();
        assert_eq!(filter.count, 12);
        assert!(filter.lessons.is_none() && filter.types.is_none());
        assert_eq!(Config::default().quiz_filter().count, DEFAULT_QUESTION_COUNT);
    }
}
