// src/handlers/mock.rs

use std::sync::Arc;

use axum::{
    Json,
    extract::{
        Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    response::IntoResponse,
};
use chrono::Utc;
use rand::SeedableRng;
use rand::rngs::StdRng;
use validator::Validate;

use crate::{
    config::Config,
    corpus::{
        CorpusSource,
        assembly::{MockRequest, assemble_mock, share_url},
    },
    error::AppError,
    models::exam::{MockCreated, MockParams, PublicExam, ScoreRequest, TokenParams},
    scoring::{AnswerMap, score},
    utils::token::decode_exam,
};

/// Assembles a new mock from the requested chapters.
///
/// * Resolves chapter names against the corpus index.
/// * Loads every chapter concurrently; failed chapters are reported, not fatal.
/// * Samples up to `max` questions and returns a share link carrying the whole exam.
pub async fn create_mock(
    State(config): State<Config>,
    State(corpus): State<Arc<dyn CorpusSource>>,
    params: Result<Query<MockParams>, QueryRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Query(params) = params?;
    let request = MockRequest::from_params(&params)?;

    let mut rng = match config.sampler_seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let mock = assemble_mock(corpus.as_ref(), &request, Utc::now(), &mut rng).await?;
    let share_url = share_url(&config.public_base_url, &mock.token)?;

    Ok(Json(MockCreated {
        share_url,
        token_size: mock.token.len(),
        question_count: mock.exam.questions.len(),
        chapters: mock.exam.chapters,
        diagnostics: (!mock.diagnostics.is_empty()).then_some(mock.diagnostics),
    }))
}

/// Decodes a share token for preview. The answer key is not included.
pub async fn decode_mock(
    params: Result<Query<TokenParams>, QueryRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Query(params) = params?;
    let exam = decode_exam(params.t.as_deref())?;
    Ok(Json(PublicExam::from(&exam)))
}

/// Scores a finished attempt against the key inside the token.
pub async fn score_mock(
    req: Result<Json<ScoreRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(req) = req?;
    if let Err(validation_errors) = req.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let exam = decode_exam(Some(&req.token))?;
    let answers: AnswerMap = req.answers;

    Ok(Json(score(&exam, &answers)))
}
