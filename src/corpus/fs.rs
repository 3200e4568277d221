// src/corpus/fs.rs

use std::path::PathBuf;

use async_trait::async_trait;

use super::{CorpusSource, INDEX_FILE, record_file_name};
use crate::{error::FetchError, models::index::CorpusIndex};

/// Corpus laid out on a local directory.
#[derive(Debug, Clone)]
pub struct FsCorpus {
    root: PathBuf,
}

impl FsCorpus {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn record_path(&self, subject: &str, topic: &str) -> PathBuf {
        self.root.join(subject).join(record_file_name(topic))
    }
}

#[async_trait]
impl CorpusSource for FsCorpus {
    async fn fetch_index(&self) -> Result<CorpusIndex, FetchError> {
        let body = tokio::fs::read_to_string(self.root.join(INDEX_FILE)).await?;
        serde_json::from_str(&body).map_err(|e| FetchError::Parse(e.to_string()))
    }

    async fn fetch_records(&self, subject: &str, topic: &str) -> Result<String, FetchError> {
        Ok(tokio::fs::read_to_string(self.record_path(subject, topic)).await?)
    }

    fn record_location(&self, subject: &str, topic: &str) -> String {
        self.record_path(subject, topic).display().to_string()
    }
}
