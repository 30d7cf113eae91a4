use std::env;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Error as ReqwestError};
use serde::Deserialize;

use crate::application::ports::document_text_provider::{
    DocumentTextError, DocumentTextProvider,
};

#[derive(Debug, Clone)]
pub struct DocumentFetcherConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for DocumentFetcherConfig {
    fn default() -> Self {
        Self {
            base_url: env::var("EXTRACTION_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:9090".to_string()),
            timeout_secs: 60,
        }
    }
}

#[derive(Deserialize)]
struct ExtractionResponse {
    #[serde(default)]
    text: String,
}

/// Client for the PDF-extraction service: hand it a paper URL, get UTF-8 text
/// back.
pub struct HttpDocumentFetcher {
    client: Client,
    config: DocumentFetcherConfig,
}

impl HttpDocumentFetcher {
    pub fn new(config: DocumentFetcherConfig) -> Result<Self, ReqwestError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { client, config })
    }

    pub fn from_env() -> Result<Self, ReqwestError> {
        Self::new(DocumentFetcherConfig::default())
    }
}

#[async_trait]
impl DocumentTextProvider for HttpDocumentFetcher {
    async fn fetch_text(&self, source_url: &str) -> Result<String, DocumentTextError> {
        let url = format!("{}/extract", self.config.base_url);
        let body = serde_json::json!({ "source_url": source_url });

        let response = self.client.post(&url).json(&body).send().await.map_err(|e| {
            DocumentTextError::ProviderUnavailable(e.without_url().to_string())
        })?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(DocumentTextError::ProviderUnavailable(format!(
                "{}: {}",
                status, text
            )));
        }

        let parsed: ExtractionResponse = response.json().await.map_err(|e| {
            DocumentTextError::ProviderUnavailable(format!("malformed response: {}", e))
        })?;

        if parsed.text.trim().is_empty() {
            return Err(DocumentTextError::EmptyDocument(source_url.to_string()));
        }
        Ok(parsed.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extraction_response_defaults_to_empty_text() {
        let parsed: ExtractionResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.text.is_empty());
    }
}
