// src/corpus/assembly.rs

//! Resolve → fetch → normalize → sample → encode.

use chrono::{DateTime, Utc};
use futures::future::join_all;
use rand::Rng;
use url::Url;

use super::{
    CorpusSource,
    normalizer::{RecordContext, normalize_record, parse_record_file},
    resolver::{ResolvedChapter, parse_chapter_list, resolve},
    sampler::{clamp_duration, clamp_max_questions, dedup_pool, parse_bound, sample_questions},
};
use crate::{
    config::MAX_PARSE_DIAGNOSTICS,
    error::{AppError, FetchError},
    models::{
        exam::{AssemblyDiagnostics, ChapterFailure, ExamPayload, MockParams},
        question::NormalizedQuestion,
    },
    utils::token::encode_exam,
};

/// A validated assembly request with bounds already applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockRequest {
    pub chapters: Vec<String>,
    pub max_questions: u32,
    pub duration_seconds: u32,
}

impl MockRequest {
    pub fn from_params(params: &MockParams) -> Result<Self, AppError> {
        let chapters = params
            .chapters
            .as_deref()
            .map(parse_chapter_list)
            .unwrap_or_default();

        if chapters.is_empty() {
            return Err(AppError::BadRequest(
                "At least one chapter is required (?chapters=A,B)".to_string(),
            ));
        }

        Ok(MockRequest {
            chapters,
            max_questions: clamp_max_questions(parse_bound(params.max.as_deref())),
            duration_seconds: clamp_duration(parse_bound(params.duration.as_deref())),
        })
    }
}

/// An encoded mock plus what went wrong along the way.
#[derive(Debug)]
pub struct AssembledMock {
    pub exam: ExamPayload,
    pub token: String,
    pub diagnostics: AssemblyDiagnostics,
}

/// Questions loaded from one chapter.
#[derive(Debug, Default)]
struct ChapterLoad {
    questions: Vec<NormalizedQuestion>,
    parse_errors: Vec<String>,
    parse_error_count: usize,
}

async fn load_chapter(
    source: &dyn CorpusSource,
    chapter: &ResolvedChapter,
) -> Result<ChapterLoad, FetchError> {
    let body = source.fetch_records(&chapter.subject, &chapter.topic).await?;
    let parsed = parse_record_file(&body)?;

    let location = source.record_location(&chapter.subject, &chapter.topic);
    let ctx = RecordContext {
        subject: &chapter.subject,
        chapter: &chapter.requested,
        location: &location,
    };

    let questions = parsed
        .records
        .iter()
        .flat_map(|(line, record)| normalize_record(record, *line, &ctx))
        .collect();

    Ok(ChapterLoad {
        questions,
        parse_errors: parsed
            .errors
            .into_iter()
            .map(|e| format!("{}: {}", chapter.requested, e))
            .collect(),
        parse_error_count: parsed.error_count,
    })
}

/// Loads every chapter concurrently and merges the results in chapter order.
///
/// A chapter that fails to load contributes nothing and is recorded in the
/// returned diagnostics.
pub async fn gather_pool(
    source: &dyn CorpusSource,
    chapters: &[ResolvedChapter],
) -> (Vec<NormalizedQuestion>, AssemblyDiagnostics) {
    let loads = join_all(chapters.iter().map(|chapter| load_chapter(source, chapter))).await;

    let mut pool = Vec::new();
    let mut diagnostics = AssemblyDiagnostics::default();

    for (chapter, load) in chapters.iter().zip(loads) {
        match load {
            Ok(load) => {
                tracing::debug!(
                    "Chapter '{}' contributed {} questions",
                    chapter.requested,
                    load.questions.len()
                );
                pool.extend(load.questions);
                let room = MAX_PARSE_DIAGNOSTICS.saturating_sub(diagnostics.parse_errors.len());
                diagnostics
                    .parse_errors
                    .extend(load.parse_errors.into_iter().take(room));
                diagnostics.parse_error_count += load.parse_error_count;
            }
            Err(e) => {
                tracing::warn!(
                    "Failed to load chapter '{}' ({}): {}",
                    chapter.requested,
                    chapter.subject,
                    e
                );
                diagnostics.fetch_failures.push(ChapterFailure {
                    chapter: chapter.requested.clone(),
                    subject: chapter.subject.clone(),
                    error: e.to_string(),
                });
            }
        }
    }

    dedup_pool(&mut pool);
    (pool, diagnostics)
}

/// Builds and encodes one mock.
pub async fn assemble_mock<R: Rng + ?Sized>(
    source: &dyn CorpusSource,
    request: &MockRequest,
    now: DateTime<Utc>,
    rng: &mut R,
) -> Result<AssembledMock, AppError> {
    let index = source
        .fetch_index()
        .await
        .map_err(|e| AppError::Upstream(e.to_string()))?;

    let resolution = resolve(&request.chapters, &index);
    if resolution.resolved.is_empty() {
        return Err(AppError::ChapterNotFound {
            requested: request.chapters.clone(),
            available: index.chapter_listing(),
        });
    }

    let (pool, mut diagnostics) = gather_pool(source, &resolution.resolved).await;
    diagnostics.unmatched_chapters = resolution.unmatched.clone();

    if pool.is_empty() {
        return Err(AppError::EmptyPool {
            requested: request.chapters.clone(),
            resolved_subjects: resolution.subjects(),
            diagnostics,
        });
    }

    let pool_size = pool.len();
    let questions = sample_questions(pool, request.max_questions as usize, rng);

    let exam = ExamPayload::new(
        now,
        request.duration_seconds,
        request.max_questions,
        resolution.resolved.iter().map(|c| c.requested.clone()).collect(),
        questions,
    );

    let token = encode_exam(&exam)
        .map_err(|e| AppError::InternalServerError(format!("failed to encode mock: {}", e)))?;

    tracing::info!(
        "Assembled mock: {} of {} pooled questions from {} chapter(s), token {} bytes",
        exam.questions.len(),
        pool_size,
        exam.chapters.len(),
        token.len()
    );

    Ok(AssembledMock {
        exam,
        token,
        diagnostics,
    })
}

/// `<base>/mock?t=<token>`.
pub fn share_url(public_base_url: &str, token: &str) -> Result<String, AppError> {
    let mut url = Url::parse(public_base_url).map_err(|e| {
        AppError::InternalServerError(format!("invalid PUBLIC_BASE_URL '{}': {}", public_base_url, e))
    })?;

    url.path_segments_mut()
        .map_err(|_| AppError::InternalServerError("PUBLIC_BASE_URL cannot be a base".to_string()))?
        .pop_if_empty()
        .push("mock");
    url.query_pairs_mut().clear().append_pair("t", token);

    Ok(url.to_string())
}
