// src/models/bank.rs

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::{LESSON_ID_PADDING, LESSON_ID_PREFIX, OTHERS_CATEGORY};
use crate::error::QuizError;
use crate::models::lesson::Lesson;
use crate::models::question::{Question, QuestionType};

/// Wire shape of a subject file before questions are parsed one by one.
#[derive(Debug, Deserialize)]
struct RawDocument {
    #[serde(default)]
    lessons: Vec<Lesson>,
    questions: Option<Vec<Value>>,
}

/// A questions-array entry that did not parse as any known question type.
///
/// It is carried through untouched so that saving the document writes it
/// back where it was.
#[derive(Debug, Clone, PartialEq)]
pub struct UnparsedQuestion {
    /// Index in the `questions` array of the file it was read from.
    pub position: usize,
    pub raw: Value,
}

impl UnparsedQuestion {
    pub fn id(&self) -> Option<i64> {
        self.raw.get("id").and_then(Value::as_i64)
    }
}

/// Wire shape written back to disk.
#[derive(Serialize)]
struct StoredDocument<'a> {
    lessons: &'a [Lesson],
    questions: Vec<Value>,
}

/// A subject file exactly as stored, disabled entries included.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubjectDocument {
    pub lessons: Vec<Lesson>,
    pub questions: Vec<Question>,
    /// Entries kept aside at parse time, in file order.
    pub unparsed: Vec<UnparsedQuestion>,
}

impl SubjectDocument {
    /// Parses a subject file.
    ///
    /// The root must be an object with a `questions` array; `lessons` may be
    /// missing. An entry whose shape does not fit a known `type` is logged
    /// and kept aside in `unparsed` instead of failing the whole subject.
    pub fn from_json(raw: &str) -> Result<Self, QuizError> {
        let document: RawDocument =
            serde_json::from_str(raw).map_err(|e| QuizError::MalformedBank(e.to_string()))?;

        let Some(raw_questions) = document.questions else {
            return Err(QuizError::MalformedBank(
                "missing 'questions' array".to_string(),
            ));
        };

        let mut questions = Vec::with_capacity(raw_questions.len());
        let mut unparsed = Vec::new();
        for (position, value) in raw_questions.into_iter().enumerate() {
            match serde_json::from_value::<Question>(value.clone()) {
                Ok(question) => questions.push(question),
                Err(e) => {
                    let entry = UnparsedQuestion {
                        position,
                        raw: value,
                    };
                    tracing::warn!(
                        "Question #{} (id {:?}) not usable: {}",
                        position + 1,
                        entry.id(),
                        e
                    );
                    unparsed.push(entry);
                }
            }
        }

        Ok(Self {
            lessons: document.lessons,
            questions,
            unparsed,
        })
    }

    /// Serializes the document, putting unparsed entries back at their
    /// original positions.
    pub fn to_json_pretty(&self) -> Result<String, QuizError> {
        let mut questions = self
            .questions
            .iter()
            .map(serde_json::to_value)
            .collect::<Result<Vec<_>, _>>()?;

        let mut unparsed: Vec<&UnparsedQuestion> = self.unparsed.iter().collect();
        unparsed.sort_by_key(|entry| entry.position);
        for entry in unparsed {
            let at = entry.position.min(questions.len());
            questions.insert(at, entry.raw.clone());
        }

        let stored = StoredDocument {
            lessons: &self.lessons,
            questions,
        };
        Ok(serde_json::to_string_pretty(&stored)?)
    }

    pub fn lesson_by_id(&self, lesson_id: &str) -> Option<&Lesson> {
        self.lessons.iter().find(|lesson| lesson.id == lesson_id)
    }

    pub fn question_by_id(&self, question_id: i64) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == question_id)
    }

    /// Questions assigned to `lesson_id`; `None` selects the unassigned ones.
    pub fn questions_by_lesson(&self, lesson_id: Option<&str>) -> Vec<&Question> {
        self.questions
            .iter()
            .filter(|q| q.lesson_id.as_deref() == lesson_id)
            .collect()
    }

    /// One past the highest id in the file, unparsed entries included.
    pub fn next_question_id(&self) -> i64 {
        self.questions
            .iter()
            .map(|q| q.id)
            .chain(self.unparsed.iter().filter_map(UnparsedQuestion::id))
            .max()
            .map_or(1, |max| max + 1)
    }

    /// Next `L001`-style id. Ids that do not follow the pattern are ignored.
    pub fn next_lesson_id(&self) -> String {
        let next = self
            .lessons
            .iter()
            .filter_map(|lesson| lesson.id.strip_prefix(LESSON_ID_PREFIX))
            .filter_map(|digits| digits.parse::<u32>().ok())
            .max()
            .map_or(1, |max| max + 1);

        format!(
            "{}{:0width$}",
            LESSON_ID_PREFIX,
            next,
            width = LESSON_ID_PADDING
        )
    }

    pub fn add_lesson(&mut self, lesson: Lesson) {
        self.lessons.push(lesson);
    }

    /// Removes a lesson and moves its questions to "Others".
    pub fn remove_lesson(&mut self, lesson_id: &str) {
        self.lessons.retain(|lesson| lesson.id != lesson_id);
        for question in &mut self.questions {
            if question.lesson_id.as_deref() == Some(lesson_id) {
                question.lesson_id = None;
            }
        }
    }

    pub fn add_question(&mut self, question: Question) {
        self.questions.push(question);
    }

    pub fn remove_question(&mut self, question_id: i64) {
        self.questions.retain(|q| q.id != question_id);
        self.unparsed.retain(|entry| entry.id() != Some(question_id));
    }

    /// Replaces the question with `question_id`. Returns false when absent.
    pub fn update_question(&mut self, question_id: i64, updated: Question) -> bool {
        match self.questions.iter_mut().find(|q| q.id == question_id) {
            Some(slot) => {
                *slot = updated;
                true
            }
            None => false,
        }
    }

    pub fn statistics(&self) -> BankStatistics {
        let enabled_questions = self.questions.iter().filter(|q| q.enabled).count();
        let enabled_lessons = self.lessons.iter().filter(|l| l.enabled).count();

        let mut questions_by_type = BTreeMap::new();
        for question in self.questions.iter().filter(|q| q.enabled) {
            *questions_by_type.entry(question.question_type()).or_insert(0) += 1;
        }

        let mut questions_by_lesson = BTreeMap::new();
        for lesson in self.lessons.iter().filter(|l| l.enabled) {
            let count = self
                .questions_by_lesson(Some(&lesson.id))
                .into_iter()
                .filter(|q| q.enabled)
                .count();
            if count > 0 {
                questions_by_lesson.insert(lesson.name.clone(), count);
            }
        }

        let unassigned_questions = self
            .questions_by_lesson(None)
            .into_iter()
            .filter(|q| q.enabled)
            .count();

        let questions_with_images = self
            .questions
            .iter()
            .filter(|q| q.enabled && q.question_image.is_some())
            .count();

        BankStatistics {
            total_questions: self.questions.len(),
            unparsed_questions: self.unparsed.len(),
            total_lessons: self.lessons.len(),
            enabled_questions,
            disabled_questions: self.questions.len() - enabled_questions,
            enabled_lessons,
            disabled_lessons: self.lessons.len() - enabled_lessons,
            questions_by_type,
            questions_by_lesson,
            unassigned_questions,
            questions_with_images,
        }
    }
}

/// Counts reported for a subject document. Per-type, per-lesson, unassigned
/// and image counts only consider enabled entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BankStatistics {
    pub total_questions: usize,
    /// Entries of an unknown or broken shape; not part of any other count.
    pub unparsed_questions: usize,
    pub total_lessons: usize,
    pub enabled_questions: usize,
    pub disabled_questions: usize,
    pub enabled_lessons: usize,
    pub disabled_lessons: usize,
    pub questions_by_type: BTreeMap<QuestionType, usize>,
    pub questions_by_lesson: BTreeMap<String, usize>,
    pub unassigned_questions: usize,
    pub questions_with_images: usize,
}

/// The runtime view of a subject: what a quiz is allowed to draw from.
#[derive(Debug, Clone, PartialEq)]
pub struct QuestionBank {
    subject: String,
    lessons: Vec<Lesson>,
    questions: Vec<Question>,
}

impl QuestionBank {
    /// Wraps already-filtered collections as-is.
    pub fn new(subject: impl Into<String>, lessons: Vec<Lesson>, questions: Vec<Question>) -> Self {
        Self {
            subject: subject.into(),
            lessons,
            questions,
        }
    }

    /// Drops unparsed entries, disabled lessons, disabled questions and
    /// questions that belonged to a dropped lesson. Unassigned questions
    /// always survive.
    pub fn from_document(subject: impl Into<String>, document: SubjectDocument) -> Self {
        let subject = subject.into();
        let SubjectDocument {
            lessons,
            questions,
            unparsed,
        } = document;
        if !unparsed.is_empty() {
            tracing::warn!(
                "Subject '{}': {} question(s) left out of quizzes",
                subject,
                unparsed.len()
            );
        }

        let (lessons, disabled): (Vec<Lesson>, Vec<Lesson>) =
            lessons.into_iter().partition(|lesson| lesson.enabled);
        let excluded: HashSet<String> = disabled.into_iter().map(|lesson| lesson.id).collect();

        let total = questions.len();
        let questions: Vec<Question> = questions
            .into_iter()
            .filter(|q| q.enabled)
            .filter(|q| match &q.lesson_id {
                Some(lesson_id) => !excluded.contains(lesson_id),
                None => true,
            })
            .collect();

        tracing::info!(
            "Subject '{}': {} lessons, {} of {} questions enabled",
            subject,
            lessons.len(),
            questions.len(),
            total
        );

        Self {
            subject,
            lessons,
            questions,
        }
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn lessons(&self) -> &[Lesson] {
        &self.lessons
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn lesson_by_id(&self, lesson_id: &str) -> Option<&Lesson> {
        self.lessons.iter().find(|lesson| lesson.id == lesson_id)
    }

    /// Question count per lesson, for a lesson picker. Lessons without
    /// questions are listed with zero; unassigned questions come last under
    /// the "Others" label.
    pub fn lesson_question_counts(&self) -> Vec<LessonCount> {
        let mut counts: Vec<LessonCount> = self
            .lessons
            .iter()
            .map(|lesson| LessonCount {
                lesson_id: Some(lesson.id.clone()),
                name: lesson.name.clone(),
                count: self
                    .questions
                    .iter()
                    .filter(|q| q.lesson_id.as_deref() == Some(lesson.id.as_str()))
                    .count(),
            })
            .collect();

        let unassigned = self
            .questions
            .iter()
            .filter(|q| q.lesson_id.is_none())
            .count();
        if unassigned > 0 {
            counts.push(LessonCount {
                lesson_id: None,
                name: OTHERS_CATEGORY.to_string(),
                count: unassigned,
            });
        }
        counts
    }
}

/// One row of [`QuestionBank::lesson_question_counts`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LessonCount {
    /// `None` is the "Others" pseudo-lesson, matching `QuizFilter::lessons`.
    pub lesson_id: Option<String>,
    pub name: String,
    pub count: usize,
}
