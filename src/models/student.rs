// src/models/student.rs

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::{
    config::EXCELLENT_PERCENTAGE,
    utils::html::{MAX_FIELD_LEN, display_len, sanitize_text},
};

/// Values accepted for `currentCourse` (year of study).
pub const CURRENT_COURSES: &[&str] = &["1", "2", "3", "4"];

/// Study directions offered on the registration form.
pub const DIRECTIONS: &[&str] = &[
    "axborot-xavfsizligi",
    "suniy-intellekt",
    "axborot-tizimlari-texnologiyalari",
    "dasturiy-injiniring",
    "amaliy-matematika",
    "other",
];

/// Self-assessed skill levels for programming and English.
pub const SKILL_LEVELS: &[&str] = &["beginner", "basic", "intermediate", "advanced"];

/// Courses a student can apply for.
pub const DESIRED_COURSES: &[&str] = &["cpp", "frontend", "backend"];

pub const NOTEBOOK_ANSWERS: &[&str] = &["yes", "no"];

static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+998\d{9}$").expect("phone pattern is valid"));

/// Personal information collected on the first step of the form.
///
/// Every field is free text from the browser. Call [`PersonalInfo::sanitized`]
/// before validating or storing it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PersonalInfo {
    #[validate(custom(function = validate_name))]
    pub last_name: String,

    #[validate(custom(function = validate_name))]
    pub first_name: String,

    #[validate(custom(function = validate_name))]
    pub father_name: String,

    #[validate(custom(function = validate_age))]
    pub age: String,

    #[validate(custom(function = validate_phone))]
    pub phone: String,

    #[validate(custom(function = validate_current_course))]
    pub current_course: String,

    #[validate(custom(function = validate_direction))]
    pub direction: String,

    #[validate(custom(function = validate_skill_level))]
    pub programming_level: String,

    #[validate(custom(function = validate_skill_level))]
    pub language_level: String,

    #[validate(custom(function = validate_desired_course))]
    pub desired_course: String,

    #[validate(custom(function = validate_notebook))]
    pub has_notebook: String,
}

impl PersonalInfo {
    /// Returns a copy with every field stripped of markup, escaped and trimmed.
    pub fn sanitized(&self) -> Self {
        Self {
            last_name: sanitize_text(&self.last_name),
            first_name: sanitize_text(&self.first_name),
            father_name: sanitize_text(&self.father_name),
            age: sanitize_text(&self.age),
            phone: sanitize_text(&self.phone),
            current_course: sanitize_text(&self.current_course),
            direction: sanitize_text(&self.direction),
            programming_level: sanitize_text(&self.programming_level),
            language_level: sanitize_text(&self.language_level),
            desired_course: sanitize_text(&self.desired_course),
            has_notebook: sanitize_text(&self.has_notebook),
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

fn one_of(value: &str, allowed: &[&str], code: &'static str) -> Result<(), ValidationError> {
    if allowed.contains(&value) {
        Ok(())
    } else {
        Err(ValidationError::new(code))
    }
}

/// Names are checked after sanitizing, so escaped characters are measured
/// as the single character the applicant typed.
fn validate_name(name: &str) -> Result<(), ValidationError> {
    let len = display_len(name);
    if len == 0 {
        let err = ValidationError::new("required");
        return Err(err.with_message(Cow::Borrowed("This field is required.")));
    }
    if len > MAX_FIELD_LEN {
        let message = format!("Must be at most {} characters.", MAX_FIELD_LEN);
        return Err(ValidationError::new("too_long").with_message(Cow::Owned(message)));
    }
    Ok(())
}

fn validate_age(age: &str) -> Result<(), ValidationError> {
    match age.parse::<u32>() {
        Ok(years) if (14..=100).contains(&years) => Ok(()),
        _ => Err(ValidationError::new("age_out_of_range")),
    }
}

fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    let digits: String = phone
        .chars()
        .filter(|c| !matches!(c, ' ' | '(' | ')' | '-'))
        .collect();

    if PHONE_RE.is_match(&digits) {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_phone"))
    }
}

fn validate_current_course(value: &str) -> Result<(), ValidationError> {
    one_of(value, CURRENT_COURSES, "unknown_current_course")
}

fn validate_direction(value: &str) -> Result<(), ValidationError> {
    one_of(value, DIRECTIONS, "unknown_direction")
}

fn validate_skill_level(value: &str) -> Result<(), ValidationError> {
    one_of(value, SKILL_LEVELS, "unknown_skill_level")
}

fn validate_desired_course(value: &str) -> Result<(), ValidationError> {
    one_of(value, DESIRED_COURSES, "unknown_course")
}

fn validate_notebook(value: &str) -> Result<(), ValidationError> {
    one_of(value, NOTEBOOK_ANSWERS, "invalid_notebook_answer")
}

/// Outcome of the quiz step.
///
/// Invariants: `totalQuestions > 0`, `score <= totalQuestions`,
/// `percentage == round(100 * score / totalQuestions)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = validate_test_result))]
pub struct TestResult {
    #[validate(range(max = 100))]
    pub percentage: u32,

    pub score: u32,

    #[validate(range(min = 1))]
    pub total_questions: u32,

    pub completed_at: DateTime<Utc>,
}

impl TestResult {
    pub fn from_score(score: u32, total_questions: u32, completed_at: DateTime<Utc>) -> Self {
        Self {
            percentage: percentage(score, total_questions),
            score,
            total_questions,
            completed_at,
        }
    }
}

/// `round(100 * score / total)` with halves rounded up, in integer arithmetic.
pub fn percentage(score: u32, total: u32) -> u32 {
    if total == 0 {
        return 0;
    }
    let (score, total) = (u64::from(score), u64::from(total));
    ((200 * score + total) / (2 * total)) as u32
}

fn validate_test_result(result: &TestResult) -> Result<(), ValidationError> {
    if result.total_questions == 0 {
        return Err(ValidationError::new("no_questions"));
    }
    if result.score > result.total_questions {
        return Err(ValidationError::new("score_exceeds_total"));
    }
    if result.percentage != percentage(result.score, result.total_questions) {
        return Err(ValidationError::new("percentage_mismatch"));
    }
    Ok(())
}

/// One stored submission. Never updated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentRecord {
    pub id: String,
    pub personal_info: PersonalInfo,
    pub test_result: TestResult,
    /// Assigned by the server when the record is appended.
    pub submitted_at: DateTime<Utc>,
}

/// DTO for submitting an already scored registration. Checked by
/// [`crate::store::RecordStore::append`] after sanitizing.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitStudentRequest {
    pub personal_info: PersonalInfo,
    pub test_result: TestResult,
}

/// DTO for deleting a student by request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteStudentRequest {
    pub student_id: String,
}

/// Dashboard filters for the student list.
#[derive(Debug, Default, Deserialize)]
pub struct StudentQuery {
    /// Case-insensitive match on "first last" name, or substring of the phone.
    pub search: Option<String>,
    /// Exact match on `desiredCourse`.
    pub course: Option<String>,
}

impl StudentQuery {
    pub fn matches(&self, student: &StudentRecord) -> bool {
        let info = &student.personal_info;

        if let Some(term) = self.search.as_deref().filter(|t| !t.is_empty()) {
            let name_hit = info
                .full_name()
                .to_lowercase()
                .contains(&term.to_lowercase());
            if !name_hit && !info.phone.contains(term) {
                return false;
            }
        }

        match self.course.as_deref().filter(|c| !c.is_empty()) {
            Some(course) => info.desired_course == course,
            None => true,
        }
    }
}

/// Aggregates shown on the admin dashboard.
#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StudentStats {
    pub total: usize,
    pub average_percentage: u32,
    pub excellent_count: usize,
    pub by_course: BTreeMap<String, usize>,
}

impl StudentStats {
    pub fn from_records(students: &[StudentRecord]) -> Self {
        let total = students.len();

        let sum: u64 = students
            .iter()
            .map(|s| u64::from(s.test_result.percentage))
            .sum();
        let average_percentage = if total == 0 {
            0
        } else {
            ((2 * sum + total as u64) / (2 * total as u64)) as u32
        };

        let excellent_count = students
            .iter()
            .filter(|s| s.test_result.percentage >= EXCELLENT_PERCENTAGE)
            .count();

        let mut by_course = BTreeMap::new();
        for student in students {
            *by_course
                .entry(student.personal_info.desired_course.clone())
                .or_insert(0) += 1;
        }

        Self {
            total,
            average_percentage,
            excellent_count,
            by_course,
        }
    }
}
