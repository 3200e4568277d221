// src/error.rs

use std::fmt;

use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use indexmap::IndexMap;
use serde_json::json;

use crate::models::exam::AssemblyDiagnostics;

/// Global Application Error Enum.
/// Centralizes error handling and mapping to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    // 500 Internal Server Error
    InternalServerError(String),

    // 400 Bad Request
    BadRequest(String),

    // 502 Bad Gateway (corpus index unreachable or malformed)
    Upstream(String),

    /// None of the requested chapters exists in the corpus index.
    ChapterNotFound {
        requested: Vec<String>,
        available: IndexMap<String, Vec<String>>,
    },

    /// Chapters resolved, but no question survived fetching and parsing.
    EmptyPool {
        requested: Vec<String>,
        resolved_subjects: Vec<String>,
        diagnostics: AssemblyDiagnostics,
    },
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::InternalServerError(msg) => write!(f, "internal error: {}", msg),
            AppError::BadRequest(msg) => write!(f, "bad request: {}", msg),
            AppError::Upstream(msg) => write!(f, "upstream corpus error: {}", msg),
            AppError::ChapterNotFound { requested, .. } => {
                write!(f, "no chapter matched: {}", requested.join(", "))
            }
            AppError::EmptyPool { requested, .. } => {
                write!(f, "no questions available for: {}", requested.join(", "))
            }
        }
    }
}

impl std::error::Error for AppError {}

/// Implements `IntoResponse` for `AppError`.
/// Every body carries an `error` message; assembly failures add the request context.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::InternalServerError(msg) => {
                tracing::error!("Internal Server Error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "Internal Server Error" }),
                )
            }
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, json!({ "error": msg })),
            AppError::Upstream(msg) => {
                tracing::error!("Corpus unavailable: {}", msg);
                (
                    StatusCode::BAD_GATEWAY,
                    json!({ "error": "Question corpus is unavailable", "detail": msg }),
                )
            }
            AppError::ChapterNotFound {
                requested,
                available,
            } => (
                StatusCode::NOT_FOUND,
                json!({
                    "error": "None of the requested chapters exist in the corpus",
                    "requestedChapters": requested,
                    "availableChapters": available,
                }),
            ),
            AppError::EmptyPool {
                requested,
                resolved_subjects,
                diagnostics,
            } => (
                StatusCode::NOT_FOUND,
                json!({
                    "error": "No questions could be loaded for the requested chapters",
                    "requestedChapters": requested,
                    "resolvedSubjects": resolved_subjects,
                    "diagnostics": diagnostics,
                }),
            ),
        };

        (status, Json(body)).into_response()
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<TokenError> for AppError {
    fn from(err: TokenError) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

/// Failure to turn a share token back into an exam.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// No token was supplied at all.
    Missing,
    /// The token is not valid base64, or the body does not inflate.
    Decode(String),
    /// The body inflated but is not a usable exam.
    PayloadInvalid(String),
}

impl fmt::Display for TokenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenError::Missing => write!(f, "No mock token was provided"),
            TokenError::Decode(msg) => write!(f, "Mock token is corrupted: {}", msg),
            TokenError::PayloadInvalid(msg) => write!(f, "Mock token is invalid: {}", msg),
        }
    }
}

impl std::error::Error for TokenError {}

/// Failure to load one piece of the corpus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// Transport-level failure (DNS, connect, timeout, body read).
    Http(String),
    /// The corpus answered with a non-success status.
    Status { url: String, status: u16 },
    Io(String),
    /// The index document could not be parsed.
    Parse(String),
    /// A record file had lines, but none of them parsed.
    NoRecords { failed_lines: usize },
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::Http(msg) => write!(f, "request failed: {}", msg),
            FetchError::Status { url, status } => write!(f, "{} returned HTTP {}", url, status),
            FetchError::Io(msg) => write!(f, "read failed: {}", msg),
            FetchError::Parse(msg) => write!(f, "malformed document: {}", msg),
            FetchError::NoRecords { failed_lines } => {
                write!(f, "none of {} record lines parsed", failed_lines)
            }
        }
    }
}

impl std::error::Error for FetchError {}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        FetchError::Http(err.to_string())
    }
}

impl From<std::io::Error> for FetchError {
    fn from(err: std::io::Error) -> Self {
        FetchError::Io(err.to_string())
    }
}
