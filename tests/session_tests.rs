// tests/session_tests.rs

use indexmap::IndexMap;
use rand::SeedableRng;
use rand::rngs::StdRng;

use quiz_runner::engine::expected_answer;
use quiz_runner::models::SubjectDocument;
use quiz_runner::session::select_questions;
use quiz_runner::{
    Answer, Config, Question, QuestionBank, QuestionType, QuizError, QuizFilter, QuizSession,
    ResultsSummary, SessionPhase,
};

const SCIENCE: &str = include_str!("fixtures/questions-science.json");
const BROKEN_KEYS: &str = include_str!("fixtures/questions-broken-keys.json");

fn bank() -> QuestionBank {
    QuestionBank::from_document("science", SubjectDocument::from_json(SCIENCE).unwrap())
}

fn questions(ids: &[i64]) -> Vec<Question> {
    let bank = bank();
    ids.iter()
        .map(|id| bank.questions().iter().find(|q| q.id == *id).cloned().unwrap())
        .collect()
}

fn started_session(ids: &[i64]) -> QuizSession {
    let mut session = QuizSession::new();
    session.load_subject(bank());
    session.start_quiz(questions(ids)).unwrap();
    session
}

#[test]
fn accessors_fail_outside_a_running_quiz() {
    let mut session = QuizSession::new();
    assert_eq!(session.phase(), SessionPhase::Idle);
    assert!(matches!(
        session.current_question(),
        Err(QuizError::InvalidState { .. })
    ));

    session.load_subject(bank());
    assert_eq!(session.phase(), SessionPhase::SubjectLoaded);
    assert!(session.current_answer().is_err());
    assert!(session.save_answer(Answer::Choice(0)).is_err());
    assert!(!session.next_question());
}

#[test]
fn full_quiz_flow_scores_and_summarises() {
    // multiple choice, true/false, reordering
    let mut session = started_session(&[1, 3, 8]);
    assert_eq!(session.progress().current, 1);
    assert_eq!(session.progress().total, 3);

    let first = session.submit(Some(Answer::Choice(2))).unwrap();
    assert!(first.is_correct);
    assert!(session.next_question());

    let second = session.submit(Some(Answer::Choice(0))).unwrap();
    assert!(!second.is_correct);
    assert!(session.next_question());
    assert!(session.is_last_question());

    let third = session.submit(Some(Answer::Order(vec![1, 2, 3]))).unwrap();
    assert!(third.is_correct);
    assert!(!session.next_question());
    assert_eq!(session.progress().current, 3);

    session.finish().unwrap();
    assert_eq!(session.phase(), SessionPhase::Complete);

    let score = session.calculate_score();
    assert_eq!((score.correct, score.total, score.percentage), (2, 3, 67));

    let summary = ResultsSummary::from_session(&session);
    assert_eq!(summary.subject.as_deref(), Some("science"));
    assert_eq!(summary.missed.len(), 1);

    let missed = &summary.missed[0];
    assert_eq!(missed.position, 2);
    assert_eq!(missed.question_type, QuestionType::TrueFalse);
    assert_eq!(missed.prompt, "Sound travels faster than light.");
    assert_eq!(missed.lesson.as_deref(), Some("Energy"));
    assert_eq!(missed.user_answer, "True");
    assert_eq!(missed.correct_answer, "False");
    assert!(summary.passed(60));
    assert!(!summary.is_perfect());

    let report = summary.to_string();
    assert!(report.contains("Score: 2/3 (67%)"));
    assert!(report.contains("Your answer: True"));
}

#[test]
fn rejected_submission_changes_nothing() {
    let mut session = started_session(&[2]);

    let err = session.submit(Some(Answer::Choices(vec![]))).unwrap_err();
    assert!(matches!(err, QuizError::Rejected(_)));
    assert_eq!(err.to_string(), "Please select at least one option.");

    assert_eq!(session.current_answer().unwrap(), None);
    assert!(session.results()[0].is_none());
}

#[test]
fn resubmitting_overwrites_the_slot() {
    let mut session = started_session(&[1]);

    session.submit(Some(Answer::Choice(0))).unwrap();
    assert_eq!(session.incorrect_questions().len(), 1);

    session.submit(Some(Answer::Choice(2))).unwrap();
    assert_eq!(session.current_answer().unwrap(), Some(&Answer::Choice(2)));
    assert!(session.incorrect_questions().is_empty());
    assert_eq!(session.calculate_score().correct, 1);
}

#[test]
fn incorrect_questions_keep_quiz_order_and_skip_unanswered() {
    let mut session = started_session(&[1, 3, 4, 6]);

    session.submit(Some(Answer::Choice(0))).unwrap();
    session.next_question();
    session.next_question();
    session.submit(Some(Answer::Text("212".into()))).unwrap();
    session.next_question();
    let q = session.current_question().unwrap().clone();
    session.submit(Some(expected_answer(&q))).unwrap();

    let ids: Vec<i64> = session
        .incorrect_questions()
        .iter()
        .map(|result| result.question.id)
        .collect();
    assert_eq!(ids, vec![1, 4]);

    let score = session.calculate_score();
    assert_eq!((score.correct, score.total, score.percentage), (1, 4, 25));
}

#[test]
fn reading_comprehension_summary_uses_placeholder_prompt() {
    let mut session = started_session(&[9]);
    let mut selected = std::collections::BTreeMap::new();
    selected.insert(0, Some(1));
    selected.insert(1, Some(1));
    session.submit(Some(Answer::Readings(selected))).unwrap();
    session.finish().unwrap();

    let summary = ResultsSummary::from_session(&session);
    assert_eq!(summary.missed[0].prompt, "Reading Comprehension");
    assert_eq!(summary.missed[0].user_answer, "Q1: Sound, Q2: Photosynthesis");
}

#[test]
fn empty_quiz_scores_zero_percent() {
    let mut session = started_session(&[]);
    assert!(session.current_question().is_err());
    assert!(session.is_last_question());

    let score = session.calculate_score();
    assert_eq!((score.correct, score.total, score.percentage), (0, 0, 0));

    session.finish().unwrap();
    let summary = ResultsSummary::from_session(&session);
    assert!(!summary.passed(0));
}

#[test]
fn retake_clears_answers_and_reset_forgets_subject() {
    let mut session = started_session(&[1, 3]);
    session.submit(Some(Answer::Choice(2))).unwrap();
    session.next_question();
    session.finish().unwrap();

    session.retake().unwrap();
    assert_eq!(session.phase(), SessionPhase::InProgress);
    assert_eq!(session.current_index(), 0);
    assert_eq!(session.questions().len(), 2);
    assert!(session.results().iter().all(Option::is_none));

    session.reset();
    assert_eq!(session.phase(), SessionPhase::Idle);
    assert!(session.subject().is_none());
    assert!(session.questions().is_empty());
}

#[test]
fn lesson_lookup_short_circuits_on_none() {
    let mut session = QuizSession::new();
    session.load_subject(bank());

    assert_eq!(
        session.lesson_by_id(Some("L001")).map(|l| l.name.as_str()),
        Some("Matter")
    );
    assert!(session.lesson_by_id(None).is_none());
    assert!(session.lesson_by_id(Some("L003")).is_none());
}

#[test]
fn selection_feeds_a_quiz() {
    let bank = bank();
    let filter = QuizFilter {
        lessons: Some(vec![Some("L002".to_string())]),
        types: None,
        count: 2,
    };
    let mut rng = StdRng::seed_from_u64(42);
    let picked = select_questions(&bank, &filter, &mut rng);

    assert_eq!(picked.len(), 2);
    assert!(picked.iter().all(|q| q.lesson_id.as_deref() == Some("L002")));

    let mut session = QuizSession::new();
    session.load_subject(bank);
    session.start_quiz(picked).unwrap();
    assert_eq!(session.progress().total, 2);
}

#[test]
fn broken_answer_keys_grade_false_without_errors() {
    let document = SubjectDocument::from_json(BROKEN_KEYS).unwrap();
    let bank = QuestionBank::from_document("broken-keys", document);
    assert_eq!(bank.questions().len(), 4);

    let mut session = QuizSession::new();
    session.load_subject(bank.clone());
    session.start_quiz(bank.questions().to_vec()).unwrap();

    let mut dropdowns = IndexMap::new();
    dropdowns.insert("DD1".to_string(), Some(0));
    let mut matches = IndexMap::new();
    matches.insert("m1".to_string(), "Energy".to_string());
    matches.insert("m2".to_string(), "Force".to_string());
    let answers = vec![
        Answer::Dropdowns(dropdowns),
        Answer::Matches(matches),
        Answer::Choice(0),
        Answer::Choice(0),
    ];

    for (position, answer) in answers.into_iter().enumerate() {
        let result = session.submit(Some(answer)).unwrap();
        assert!(!result.is_correct, "question {} graded correct", position + 1);
        session.next_question();
    }
    session.finish().unwrap();

    let summary = ResultsSummary::from_session(&session);
    assert_eq!(summary.score.correct, 0);
    assert_eq!(summary.score.percentage, 0);
    assert!(!summary.passed(Config::default().passing_percentage));

    let shown: Vec<(&str, &str)> = summary
        .missed
        .iter()
        .map(|missed| (missed.user_answer.as_str(), missed.correct_answer.as_str()))
        .collect();
    assert_eq!(
        shown,
        vec![
            ("DD1: solid", "DD1: N/A"),
            ("Energy, Force", "Energy, Force"),
            ("Neon", "N/A"),
            ("True", "N/A"),
        ]
    );
    assert_eq!(summary.missed[0].lesson.as_deref(), Some("Mixed"));
    assert_eq!(summary.missed[3].lesson, None);
    assert!(summary.to_string().contains("Correct answer: N/A"));
}

#[test]
fn configured_count_drives_selection() {
    let config = Config {
        question_count: 3,
        ..Config::default()
    };
    let mut rng = StdRng::seed_from_u64(9);
    let picked = select_questions(&bank(), &config.quiz_filter(), &mut rng);
    assert_eq!(picked.len(), 3);
}
