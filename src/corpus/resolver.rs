// src/corpus/resolver.rs

//! Maps human-typed chapter names onto the corpus index.

use std::collections::{HashMap, HashSet};

use crate::models::index::CorpusIndex;

/// A requested chapter that exists in the index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedChapter {
    /// The name exactly as the user supplied it.
    pub requested: String,
    pub subject: String,
    /// The topic name as spelled in the index; used to locate the record file.
    pub topic: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    /// In request order, one entry per distinct normalized name.
    pub resolved: Vec<ResolvedChapter>,
    pub unmatched: Vec<String>,
}

impl Resolution {
    /// Subjects touched by the resolved chapters, first-seen order, no repeats.
    pub fn subjects(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.resolved
            .iter()
            .filter(|c| seen.insert(c.subject.as_str()))
            .map(|c| c.subject.clone())
            .collect()
    }
}

/// Canonical form used for matching: lower-case, `-`/`_` as spaces, whitespace collapsed.
pub fn normalize_topic(name: &str) -> String {
    name.to_lowercase()
        .replace(['-', '_'], " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Splits a comma-separated chapter list. Literal `%2C` is accepted as a comma.
pub fn parse_chapter_list(raw: &str) -> Vec<String> {
    raw.replace("%2C", ",")
        .replace("%2c", ",")
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Resolves requested chapter names against the index.
///
/// Unknown names land in `unmatched`; names that normalize to one already
/// resolved are dropped. When two topics normalize to the same key, the first
/// subject scanned wins.
pub fn resolve(requested: &[String], index: &CorpusIndex) -> Resolution {
    let mut lookup: HashMap<String, (String, String)> = HashMap::new();
    for (subject, entry) in &index.subjects {
        for topic in entry.topic_names() {
            lookup
                .entry(normalize_topic(&topic))
                .or_insert_with(|| (subject.clone(), topic));
        }
    }

    let mut resolution = Resolution::default();
    let mut taken = HashSet::new();

    for name in requested {
        let key = normalize_topic(name);
        match lookup.get(&key) {
            Some((subject, topic)) => {
                if taken.insert(key) {
                    resolution.resolved.push(ResolvedChapter {
                        requested: name.clone(),
                        subject: subject.clone(),
                        topic: topic.clone(),
                    });
                }
            }
            None => resolution.unmatched.push(name.clone()),
        }
    }

    resolution
}
