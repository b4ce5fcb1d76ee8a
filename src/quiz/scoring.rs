// src/quiz/scoring.rs

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::models::{question::Question, student::TestResult};

/// Counts answers whose selected index equals the question's correct index.
///
/// Answers are option indices as strings ("0".."3"). Missing, unparsable or
/// out-of-range answers count as wrong, and answers for questions that were
/// not presented are ignored.
pub fn count_correct(questions: &[Question], answers: &HashMap<i64, String>) -> u32 {
    questions
        .iter()
        .filter(|q| {
            answers
                .get(&q.id)
                .and_then(|ans| ans.trim().parse::<usize>().ok())
                .is_some_and(|selected| selected == q.correct_option_index)
        })
        .count() as u32
}

/// Scores a session. `total` is the number of questions presented, not the
/// bank size. Returns `None` for an empty quiz.
pub fn score_answers(
    questions: &[Question],
    answers: &HashMap<i64, String>,
    completed_at: DateTime<Utc>,
) -> Option<TestResult> {
    if questions.is_empty() {
        return None;
    }

    let score = count_correct(questions, answers);
    Some(TestResult::from_score(
        score,
        questions.len() as u32,
        completed_at,
    ))
}
