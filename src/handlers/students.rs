// src/handlers/students.rs

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde_json::json;

use crate::{error::AppError, models::student::SubmitStudentRequest, store::RecordStore};

/// Stores an already scored registration.
///
/// `id` and `submittedAt` are assigned here; anything the client sends for
/// them is ignored. Returns 201 with the new student id.
pub async fn submit(
    State(store): State<RecordStore>,
    Json(payload): Json<SubmitStudentRequest>,
) -> Result<impl IntoResponse, AppError> {
    let record = store
        .append(payload.personal_info, payload.test_result)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "studentId": record.id,
        })),
    ))
}

/// Public liveness check. Record counts are only exposed to admins through
/// `/api/admin/students/stats`.
pub async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}
