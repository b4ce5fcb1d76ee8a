// src/handlers/quiz.rs

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};

use crate::{
    config::QUIZ_GRACE_SECONDS,
    error::AppError,
    models::question::{PublicQuestion, QuizPaper, SubmitQuizRequest},
    quiz::shuffle_questions,
    state::AppState,
    submission,
    utils::jwt::{sign_quiz_token, verify_quiz_token},
};

/// Generates a quiz paper for one session.
///
/// Question order and option order are shuffled independently per request.
/// Correct answers are not sent; the layout travels in a signed token that
/// must come back with the answers.
pub async fn generate_paper(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let (questions, layout) = shuffle_questions(&state.bank, &mut rand::thread_rng());

    let quiz_token = sign_quiz_token(
        &layout,
        &state.config.jwt_secret,
        state.config.quiz_time_limit + QUIZ_GRACE_SECONDS,
    )?;

    Ok(Json(QuizPaper {
        questions: questions.into_iter().map(PublicQuestion::from).collect(),
        quiz_token,
        expires_in: state.config.quiz_time_limit,
    }))
}

/// Submits the registration form together with the quiz answers.
///
/// * Verifies the quiz token and rebuilds the session layout.
/// * Scores the answers against that layout.
/// * Appends the resulting record to the store.
pub async fn submit_paper(
    State(state): State<AppState>,
    Json(req): Json<SubmitQuizRequest>,
) -> Result<impl IntoResponse, AppError> {
    let claims = verify_quiz_token(&req.quiz_token, &state.config.jwt_secret)?;

    let record = submission::submit_quiz(
        &state.store,
        &state.bank,
        &claims.layout,
        req.personal_info,
        &req.answers,
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "success": true,
            "studentId": record.id,
            "score": record.test_result.score,
            "percentage": record.test_result.percentage,
            "totalQuestions": record.test_result.total_questions,
        })),
    ))
}
