// src/handlers/corpus.rs

use std::sync::Arc;

use axum::{Json, extract::State, response::IntoResponse};

use crate::{corpus::CorpusSource, error::AppError};

/// Lists every chapter in the corpus, grouped by subject.
pub async fn list_chapters(
    State(corpus): State<Arc<dyn CorpusSource>>,
) -> Result<impl IntoResponse, AppError> {
    let index = corpus
        .fetch_index()
        .await
        .map_err(|e| AppError::Upstream(e.to_string()))?;

    Ok(Json(index.chapter_listing()))
}
