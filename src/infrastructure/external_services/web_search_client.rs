use std::env;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Error as ReqwestError};
use serde::Deserialize;

use crate::application::ports::search_provider::{
    SearchHit, SearchProviderError, WebSearchProvider,
};

#[derive(Debug, Clone)]
pub struct SearchClientConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub timeout_secs: u64,
}

impl Default for SearchClientConfig {
    fn default() -> Self {
        Self {
            base_url: env::var("SEARCH_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:8888".to_string()),
            api_key: env::var("SEARCH_API_KEY").ok(),
            timeout_secs: 10,
        }
    }
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<SearchResult>,
}

#[derive(Deserialize)]
struct SearchResult {
    #[serde(default)]
    content: String,
    #[serde(default)]
    url: String,
}

/// SearXNG-style JSON search endpoint: `GET /search?q=...&format=json`.
pub struct HttpWebSearchClient {
    client: Client,
    config: SearchClientConfig,
}

impl HttpWebSearchClient {
    pub fn new(config: SearchClientConfig) -> Result<Self, ReqwestError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { client, config })
    }

    pub fn from_env() -> Result<Self, ReqwestError> {
        Self::new(SearchClientConfig::default())
    }
}

#[async_trait]
impl WebSearchProvider for HttpWebSearchClient {
    async fn search(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<SearchHit>, SearchProviderError> {
        let url = format!("{}/search", self.config.base_url);
        let mut request = self
            .client
            .get(&url)
            .query(&[("q", query), ("format", "json")]);
        if let Some(ref key) = self.config.api_key {
            request = request.header("Authorization", format!("Bearer {}", key));
        }

        let response = request.send().await.map_err(|e| {
            SearchProviderError::ProviderUnavailable(e.without_url().to_string())
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(SearchProviderError::ProviderUnavailable(status.to_string()));
        }

        let parsed: SearchResponse = response.json().await.map_err(|e| {
            SearchProviderError::ProviderUnavailable(format!("malformed response: {}", e))
        })?;

        Ok(parsed
            .results
            .into_iter()
            .filter(|r| !r.content.trim().is_empty())
            .take(limit)
            .map(|r| SearchHit {
                content: r.content,
                url: r.url,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_parsing_tolerates_missing_fields() {
        let parsed: SearchResponse =
            serde_json::from_str(r#"{"results": [{"url": "https://a"}, {"content": "hit"}]}"#)
                .unwrap();
        assert_eq!(parsed.results.len(), 2);
        assert_eq!(parsed.results[0].content, "");
        assert_eq!(parsed.results[1].content, "hit");
    }

    #[test]
    fn test_empty_body_parses_to_no_results() {
        let parsed: SearchResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.results.is_empty());
    }
}
