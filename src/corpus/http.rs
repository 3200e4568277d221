// src/corpus/http.rs

use std::time::Duration;

use async_trait::async_trait;
use url::Url;

use super::{CorpusSource, INDEX_FILE, record_file_name};
use crate::{error::FetchError, models::index::CorpusIndex};

/// Corpus served over HTTP(S), e.g. from a static file host.
#[derive(Debug, Clone)]
pub struct HttpCorpus {
    client: reqwest::Client,
    base: Url,
}

impl HttpCorpus {
    pub fn new(base: &str, timeout: Duration) -> Result<Self, FetchError> {
        let base = Url::parse(base)
            .map_err(|e| FetchError::Http(format!("invalid corpus URL '{}': {}", base, e)))?;
        if base.cannot_be_a_base() {
            return Err(FetchError::Http(format!("corpus URL '{}' cannot be a base", base)));
        }

        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self { client, base })
    }

    fn url_for(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn get_text(&self, url: Url) -> Result<String, FetchError> {
        tracing::debug!("Fetching {}", url);
        let response = self.client.get(url.clone()).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(response.text().await?)
    }
}

#[async_trait]
impl CorpusSource for HttpCorpus {
    async fn fetch_index(&self) -> Result<CorpusIndex, FetchError> {
        let body = self.get_text(self.url_for(&[INDEX_FILE])).await?;
        serde_json::from_str(&body).map_err(|e| FetchError::Parse(e.to_string()))
    }

    async fn fetch_records(&self, subject: &str, topic: &str) -> Result<String, FetchError> {
        let file = record_file_name(topic);
        self.get_text(self.url_for(&[subject, &file])).await
    }

    fn record_location(&self, subject: &str, topic: &str) -> String {
        self.url_for(&[subject, &record_file_name(topic)]).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_urls_are_percent_encoded() {
        let corpus =
            HttpCorpus::new("https://cdn.example.org/corpus/", Duration::from_secs(1)).unwrap();
        assert_eq!(
            corpus.record_location("physics", "Motion in a Plane"),
            "https://cdn.example.org/corpus/physics/Motion%20in%20a%20Plane.jsonl"
        );
    }

    #[test]
    fn base_without_trailing_slash_keeps_its_path() {
        let corpus = HttpCorpus::new("https://cdn.example.org/corpus", Duration::from_secs(1)).unwrap();
        assert_eq!(
            corpus.url_for(&[INDEX_FILE]).as_str(),
            "https://cdn.example.org/corpus/index.json"
        );
    }

    #[test]
    fn rejects_garbage_base() {
        assert!(matches!(
            HttpCorpus::new("not a url", Duration::from_secs(1)),
            Err(FetchError::Http(_))
        ));
    }
}
