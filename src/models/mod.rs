// src/models/mod.rs

pub mod answer;
pub mod bank;
pub mod lesson;
pub mod question;

pub use answer::{Answer, QuestionResult};
pub use bank::{BankStatistics, LessonCount, QuestionBank, SubjectDocument, UnparsedQuestion};
pub use lesson::Lesson;
pub use question::{
    BlankKey, Dropdown, DropdownSlot, FillInBlank, Matching, MatchingPair, MultipleChoice,
    MultipleChoiceMultiple, Question, QuestionKind, QuestionType, ReadingComprehension,
    ReorderItem, Reordering, SubQuestion, TrueFalse,
};
