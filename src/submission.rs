// src/submission.rs

use std::collections::HashMap;

use chrono::Utc;

use crate::{
    error::AppError,
    models::{
        question::Question,
        student::{PersonalInfo, StudentRecord},
    },
    quiz::{Presentation, score_answers},
    store::RecordStore,
};

/// Turns a finished quiz session into a stored record.
///
/// The questions are rebuilt from `layout`, so the score is computed against
/// what this student was actually shown, and `totalQuestions` is the size of
/// that session rather than of the bank.
pub async fn submit_quiz(
    store: &RecordStore,
    bank: &[Question],
    layout: &Presentation,
    personal_info: PersonalInfo,
    answers: &HashMap<i64, String>,
) -> Result<StudentRecord, AppError> {
    let questions = layout.apply(bank).ok_or_else(|| {
        AppError::BadRequest("Quiz layout does not match the question bank".to_string())
    })?;

    let test_result = score_answers(&questions, answers, Utc::now())
        .ok_or_else(|| AppError::BadRequest("Quiz has no questions".to_string()))?;

    tracing::debug!(
        score = test_result.score,
        total = test_result.total_questions,
        "Quiz scored"
    );

    Ok(store.append(personal_info, test_result).await?)
}
