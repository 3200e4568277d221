// src/models/exam.rs

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::config::MAX_TOKEN_CHARS;
use crate::models::question::{NormalizedQuestion, PublicQuestion};

/// The complete content of one mock. The share token is this struct, encoded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamPayload {
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub duration_seconds: u32,
    pub max_questions: u32,
    pub chapters: Vec<String>,
    pub questions: Vec<NormalizedQuestion>,
}

impl ExamPayload {
    pub fn new(
        created_at: DateTime<Utc>,
        duration_seconds: u32,
        max_questions: u32,
        chapters: Vec<String>,
        questions: Vec<NormalizedQuestion>,
    ) -> Self {
        ExamPayload {
            created_at,
            expires_at: created_at + Duration::seconds(i64::from(duration_seconds)),
            duration_seconds,
            max_questions,
            chapters,
            questions,
        }
    }

    pub fn duration_ms(&self) -> i64 {
        i64::from(self.duration_seconds) * 1000
    }
}

/// Query parameters for assembling a mock.
#[derive(Debug, Default, Deserialize)]
pub struct MockParams {
    /// Comma-separated chapter names.
    #[serde(default, alias = "chapter")]
    pub chapters: Option<String>,
    /// Raw so that blank or out-of-range values fall back to the bounds.
    pub max: Option<String>,
    pub duration: Option<String>,
}

/// Query parameters carrying a share token.
#[derive(Debug, Deserialize)]
pub struct TokenParams {
    #[serde(alias = "token")]
    pub t: Option<String>,
}

/// One chapter whose records could not be loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChapterFailure {
    pub chapter: String,
    pub subject: String,
    pub error: String,
}

/// Non-fatal problems met while assembling a mock.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssemblyDiagnostics {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub unmatched_chapters: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fetch_failures: Vec<ChapterFailure>,
    /// First few parse errors; `parse_error_count` holds the full total.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub parse_errors: Vec<String>,
    pub parse_error_count: usize,
}

impl AssemblyDiagnostics {
    pub fn is_empty(&self) -> bool {
        self.unmatched_chapters.is_empty()
            && self.fetch_failures.is_empty()
            && self.parse_error_count == 0
    }
}

/// Response DTO for a freshly assembled mock.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MockCreated {
    pub share_url: String,
    pub token_size: usize,
    pub question_count: usize,
    pub chapters: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnostics: Option<AssemblyDiagnostics>,
}

/// DTO for previewing a decoded mock without its answer key.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicExam {
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub duration_seconds: u32,
    pub max_questions: u32,
    pub chapters: Vec<String>,
    pub questions: Vec<PublicQuestion>,
}

impl From<&ExamPayload> for PublicExam {
    fn from(exam: &ExamPayload) -> Self {
        PublicExam {
            created_at: exam.created_at,
            expires_at: exam.expires_at,
            duration_seconds: exam.duration_seconds,
            max_questions: exam.max_questions,
            chapters: exam.chapters.clone(),
            questions: exam.questions.iter().map(PublicQuestion::from).collect(),
        }
    }
}

/// DTO for scoring a finished attempt.
#[derive(Debug, Deserialize, Validate)]
pub struct ScoreRequest {
    #[validate(length(min = 1, max = MAX_TOKEN_CHARS))]
    pub token: String,

    /// Key: question id. Value: the answer as typed or selected.
    #[serde(default)]
    pub answers: HashMap<String, String>,
}
