// src/corpus/sampler.rs

use std::collections::HashSet;

use rand::Rng;
use rand::seq::SliceRandom;

use crate::{
    config::{
        DEFAULT_DURATION_SECS, MAX_DURATION_SECS, MAX_QUESTIONS_LIMIT, MIN_DURATION_SECS,
        MIN_QUESTIONS_LIMIT,
    },
    models::question::NormalizedQuestion,
};

/// Reads a numeric query value leniently.
///
/// Blank or non-numeric input counts as absent. Integers too large for `i64`
/// saturate so they still land on the nearest bound.
pub fn parse_bound(raw: Option<&str>) -> Option<i64> {
    let raw = raw?.trim();
    if let Ok(n) = raw.parse::<i64>() {
        return Some(n);
    }
    let (negative, digits) = match raw.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, raw.strip_prefix('+').unwrap_or(raw)),
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(if negative { i64::MIN } else { i64::MAX })
}

/// Requested question count, clamped to `[1, 10]`; defaults to the maximum.
pub fn clamp_max_questions(requested: Option<i64>) -> u32 {
    let n = requested.unwrap_or(i64::from(MAX_QUESTIONS_LIMIT));
    n.clamp(i64::from(MIN_QUESTIONS_LIMIT), i64::from(MAX_QUESTIONS_LIMIT)) as u32
}

/// Requested duration in seconds, clamped to `[60, 3600]`; defaults to 20 minutes.
pub fn clamp_duration(requested: Option<i64>) -> u32 {
    let n = requested.unwrap_or(i64::from(DEFAULT_DURATION_SECS));
    n.clamp(i64::from(MIN_DURATION_SECS), i64::from(MAX_DURATION_SECS)) as u32
}

/// Drops questions whose id was already seen, keeping the first occurrence.
pub fn dedup_pool(pool: &mut Vec<NormalizedQuestion>) {
    let mut seen = HashSet::new();
    pool.retain(|q| seen.insert(q.id.clone()));
}

/// Uniform sample of `min(count, pool.len())` questions without replacement.
///
/// Shuffles the whole pool (Fisher–Yates) and keeps the head.
pub fn sample_questions<R: Rng + ?Sized>(
    mut pool: Vec<NormalizedQuestion>,
    count: usize,
    rng: &mut R,
) -> Vec<NormalizedQuestion> {
    pool.shuffle(rng);
    pool.truncate(count);
    pool
}
