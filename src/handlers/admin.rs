// src/handlers/admin.rs

use axum::{
    Json,
    extract::{Path, Query, State},
    http::header,
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use validator::Validate;

use crate::{
    error::AppError,
    models::student::{DeleteStudentRequest, StudentQuery, StudentRecord, StudentStats},
    state::AppState,
    store::RecordStore,
    utils::jwt::sign_jwt,
};

/// DTO for dashboard login.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, max = 50))]
    pub username: String,
    #[validate(length(min = 1, max = 128))]
    pub password: String,
}

/// Exchanges the configured admin credentials for a bearer token.
///
/// When no credentials are configured every attempt is rejected.
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let invalid = || AppError::AuthError("Invalid username or password".to_string());

    let Some(admin) = state.admin.as_deref() else {
        tracing::warn!("Admin login attempted but no credentials are configured");
        return Err(invalid());
    };

    if !admin.check(&payload.username, &payload.password)? {
        tracing::warn!("Failed admin login for '{}'", payload.username);
        return Err(invalid());
    }

    let token = sign_jwt(
        &admin.username,
        "admin",
        &state.config.jwt_secret,
        state.config.jwt_expiration,
    )?;

    Ok(Json(json!({
        "token": token,
        "expiresIn": state.config.jwt_expiration,
    })))
}

/// Lists stored students, optionally filtered by search term and course.
/// Admin only.
pub async fn list_students(
    State(store): State<RecordStore>,
    Query(params): Query<StudentQuery>,
) -> Result<impl IntoResponse, AppError> {
    let students: Vec<StudentRecord> = store
        .list()
        .await
        .into_iter()
        .filter(|s| params.matches(s))
        .collect();

    Ok(Json(students))
}

/// Returns one student by id.
/// Admin only.
pub async fn get_student(
    State(store): State<RecordStore>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let student = store
        .find(&id)
        .await
        .ok_or(AppError::NotFound("not found".to_string()))?;

    Ok(Json(student))
}

/// Dashboard counters: total, average percentage, excellent results and
/// distribution over desired courses.
/// Admin only.
pub async fn student_stats(
    State(store): State<RecordStore>,
) -> Result<impl IntoResponse, AppError> {
    let students = store.list().await;
    Ok(Json(StudentStats::from_records(&students)))
}

/// Deletes a student by path id.
/// Admin only.
pub async fn delete_student(
    State(store): State<RecordStore>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    store.delete_by_id(&id).await?;
    Ok(Json(json!({ "success": true })))
}

/// Deletes a student named in the body as `{studentId}`.
/// Admin only.
pub async fn delete_student_by_body(
    State(store): State<RecordStore>,
    Json(payload): Json<DeleteStudentRequest>,
) -> Result<impl IntoResponse, AppError> {
    store.delete_by_id(&payload.student_id).await?;
    Ok(Json(json!({ "success": true })))
}

/// Removes every stored student.
/// Admin only.
pub async fn clear_students(
    State(store): State<RecordStore>,
) -> Result<impl IntoResponse, AppError> {
    store.clear().await?;
    Ok(Json(json!({ "success": true })))
}

#[derive(Debug, Deserialize)]
pub struct ExportParams {
    /// `json` (default) or `csv`.
    pub format: Option<String>,
}

/// Flat CSV row of a student record.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ExportRow<'a> {
    id: &'a str,
    last_name: &'a str,
    first_name: &'a str,
    father_name: &'a str,
    age: &'a str,
    phone: &'a str,
    current_course: &'a str,
    direction: &'a str,
    programming_level: &'a str,
    language_level: &'a str,
    desired_course: &'a str,
    has_notebook: &'a str,
    percentage: u32,
    score: u32,
    total_questions: u32,
    completed_at: String,
    submitted_at: String,
}

impl<'a> From<&'a StudentRecord> for ExportRow<'a> {
    fn from(s: &'a StudentRecord) -> Self {
        let info = &s.personal_info;
        Self {
            id: &s.id,
            last_name: &info.last_name,
            first_name: &info.first_name,
            father_name: &info.father_name,
            age: &info.age,
            phone: &info.phone,
            current_course: &info.current_course,
            direction: &info.direction,
            programming_level: &info.programming_level,
            language_level: &info.language_level,
            desired_course: &info.desired_course,
            has_notebook: &info.has_notebook,
            percentage: s.test_result.percentage,
            score: s.test_result.score,
            total_questions: s.test_result.total_questions,
            completed_at: s.test_result.completed_at.to_rfc3339(),
            submitted_at: s.submitted_at.to_rfc3339(),
        }
    }
}

fn students_csv(students: &[StudentRecord]) -> Result<Vec<u8>, AppError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for student in students {
        writer
            .serialize(ExportRow::from(student))
            .map_err(|e| AppError::InternalServerError(e.to_string()))?;
    }
    writer
        .into_inner()
        .map_err(|e| AppError::InternalServerError(e.to_string()))
}

/// Downloads every stored student as `students_YYYY-MM-DD.json` or `.csv`.
/// Admin only.
pub async fn export_students(
    State(store): State<RecordStore>,
    Query(params): Query<ExportParams>,
) -> Result<impl IntoResponse, AppError> {
    let students = store.list().await;
    let format = params.format.as_deref().unwrap_or("json");

    let (content_type, body) = match format {
        "json" => (
            "application/json",
            serde_json::to_vec_pretty(&students)
                .map_err(|e| AppError::InternalServerError(e.to_string()))?,
        ),
        "csv" => ("text/csv; charset=utf-8", students_csv(&students)?),
        other => {
            return Err(AppError::BadRequest(format!(
                "Unsupported export format '{}'",
                other
            )));
        }
    };

    let filename = format!(
        "students_{}.{}",
        chrono::Utc::now().format("%Y-%m-%d"),
        format
    );
    tracing::info!(count = students.len(), "Exporting students as {}", filename);

    Ok((
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        body,
    ))
}
