// src/models/question.rs

use serde::{Deserialize, Serialize};

/// One line of a topic's record file.
#[derive(Debug, Clone, Deserialize)]
pub struct RawRecord {
    /// Name of the paper/file this record came from. Part of the question id.
    #[serde(default, alias = "recordFile")]
    pub file: Option<String>,

    #[serde(default)]
    pub questions: Vec<RawQuestion>,

    /// Answer key parallel to `questions`. Entries may be strings, numbers or null.
    #[serde(default, alias = "answerKey", alias = "answer_key")]
    pub answers: Option<Vec<serde_json::Value>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawQuestion {
    /// Exam/paper heading markup (e.g. "JEE Main 2023, Shift 1").
    #[serde(default, alias = "examHtml")]
    pub exam: Option<String>,

    /// Question stem markup.
    #[serde(default, alias = "promptHtml", alias = "prompt")]
    pub question: Option<String>,

    /// Options markup, usually an `<ol>`/`<ul>` list.
    #[serde(default, alias = "optionsHtml")]
    pub options: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionType {
    /// Multiple choice, answered with an option key.
    Mcq,
    /// Numeric/free value answer.
    Value,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionOption {
    pub key: String,
    pub html: String,
}

/// A question as it travels inside a mock token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedQuestion {
    /// `subject::chapter::recordFile::index`, unique within one mock.
    pub id: String,
    pub subject: String,
    pub chapter: String,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    pub exam_html: String,
    pub prompt_html: String,
    #[serde(default)]
    pub options: Vec<QuestionOption>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correct_answer: Option<String>,
    /// Where the question was loaded from, for attribution.
    pub source: String,
}

/// DTO for previewing a question (excludes the answer key).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicQuestion {
    pub id: String,
    pub subject: String,
    pub chapter: String,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    pub exam_html: String,
    pub prompt_html: String,
    pub options: Vec<QuestionOption>,
}

impl From<&NormalizedQuestion> for PublicQuestion {
    fn from(q: &NormalizedQuestion) -> Self {
        PublicQuestion {
            id: q.id.clone(),
            subject: q.subject.clone(),
            chapter: q.chapter.clone(),
            question_type: q.question_type,
            exam_html: q.exam_html.clone(),
            prompt_html: q.prompt_html.clone(),
            options: q.options.clone(),
        }
    }
}
