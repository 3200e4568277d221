// src/corpus/mod.rs

//! Question corpus access and mock assembly.
//!
//! The corpus is an index document plus one JSONL record file per topic, laid out as
//! `index.json` and `<subject>/<topic>.jsonl` under a base location.

pub mod assembly;
pub mod fs;
pub mod http;
pub mod normalizer;
pub mod resolver;
pub mod sampler;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::{config::Config, error::FetchError, models::index::CorpusIndex};

pub const INDEX_FILE: &str = "index.json";
pub const RECORD_EXTENSION: &str = "jsonl";

/// Read access to a question corpus.
#[async_trait]
pub trait CorpusSource: Send + Sync {
    /// Loads and parses the index document.
    async fn fetch_index(&self) -> Result<CorpusIndex, FetchError>;

    /// Loads the raw JSONL text of one topic's record file.
    async fn fetch_records(&self, subject: &str, topic: &str) -> Result<String, FetchError>;

    /// Human-readable location of a topic's record file.
    fn record_location(&self, subject: &str, topic: &str) -> String;
}

/// Picks the corpus backend from `CORPUS_URL`: http(s) URLs go over the network,
/// anything else is treated as a local directory.
pub fn from_config(config: &Config) -> Result<Arc<dyn CorpusSource>, FetchError> {
    let location = config.corpus_url.trim();
    if location.starts_with("http://") || location.starts_with("https://") {
        let source = http::HttpCorpus::new(location, Duration::from_secs(config.fetch_timeout_secs))?;
        Ok(Arc::new(source))
    } else {
        Ok(Arc::new(fs::FsCorpus::new(location)))
    }
}

pub(crate) fn record_file_name(topic: &str) -> String {
    format!("{}.{}", topic, RECORD_EXTENSION)
}
