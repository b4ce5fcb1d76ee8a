// src/models/question.rs

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::student::PersonalInfo;

/// A multiple-choice quiz question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: i64,

    /// The text content of the question.
    pub question_text: String,

    /// Answer options in presentation order.
    pub options: Vec<String>,

    /// Index into `options` of the correct answer.
    pub correct_option_index: usize,
}

impl Question {
    pub fn correct_option(&self) -> Option<&str> {
        self.options
            .get(self.correct_option_index)
            .map(String::as_str)
    }
}

/// DTO for sending a question to the client (excludes the correct index).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicQuestion {
    pub id: i64,
    pub question_text: String,
    pub options: Vec<String>,
}

impl From<Question> for PublicQuestion {
    fn from(q: Question) -> Self {
        Self {
            id: q.id,
            question_text: q.question_text,
            options: q.options,
        }
    }
}

/// DTO for returning a generated quiz.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizPaper {
    pub questions: Vec<PublicQuestion>,
    /// Signed token describing the exact layout that was handed out.
    pub quiz_token: String,
    /// Time limit in seconds.
    pub expires_in: u64,
}

/// DTO for submitting a finished quiz together with the registration form.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitQuizRequest {
    /// The token received from `GET /api/quiz`.
    pub quiz_token: String,

    pub personal_info: PersonalInfo,

    /// User's answers map.
    /// Key: Question ID
    /// Value: index of the selected option as shown, e.g. "2"
    #[serde(default)]
    pub answers: HashMap<i64, String>,
}
