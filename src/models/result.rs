// src/models/result.rs

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Correct,
    Wrong,
    Unattempted,
}

/// Scored row for one question.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionResult {
    pub id: String,
    pub chapter: String,
    pub verdict: Verdict,
    pub marks: i64,
    pub user_answer: Option<String>,
    pub correct_answer: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChapterSummary {
    pub chapter: String,
    pub total: usize,
    pub correct: usize,
    pub wrong: usize,
    pub unattempted: usize,
    pub net_marks: i64,
}

/// Scored view of an attempt. Always derived, never stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultBreakdown {
    pub rows: Vec<QuestionResult>,
    pub by_chapter: Vec<ChapterSummary>,
    pub total_questions: usize,
    pub attempted: usize,
    pub correct: usize,
    pub wrong: usize,
    pub unattempted: usize,
    pub net_marks: i64,
    pub max_marks: i64,
    pub accuracy_percent: f64,
    pub score_percent: f64,
}
