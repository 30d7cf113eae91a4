use std::env;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Error as ReqwestError};
use serde::{Deserialize, Serialize};

use crate::application::ports::embedding_provider::{EmbeddingProvider, EmbeddingProviderError};

#[derive(Debug, Clone)]
pub struct EmbeddingsClientConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub model: String,
    pub dimension: usize,
    pub max_input_chars: usize,
    pub timeout_secs: u64,
}

impl Default for EmbeddingsClientConfig {
    fn default() -> Self {
        Self {
            base_url: env::var("EMBEDDINGS_BASE_URL")
                .unwrap_or_else(|_| "https://api.openai.com/v1".to_string()),
            api_key: env::var("EMBEDDINGS_API_KEY").ok(),
            model: env::var("EMBEDDINGS_MODEL")
                .unwrap_or_else(|_| "text-embedding-3-small".to_string()),
            dimension: 1536,
            max_input_chars: 8_000,
            timeout_secs: 30,
        }
    }
}

#[derive(Serialize)]
struct EmbeddingsRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Deserialize)]
struct EmbeddingsResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

/// OpenAI-style `/embeddings` adapter. One request per call, a hard timeout,
/// and no retry loop: callers that want retries wrap this.
pub struct HttpEmbeddingsClient {
    client: Client,
    config: EmbeddingsClientConfig,
}

impl HttpEmbeddingsClient {
    pub fn new(config: EmbeddingsClientConfig) -> Result<Self, ReqwestError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { client, config })
    }

    pub fn from_env() -> Result<Self, ReqwestError> {
        Self::new(EmbeddingsClientConfig::default())
    }

    async fn request(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingProviderError> {
        for text in texts {
            let chars = text.chars().count();
            if chars > self.config.max_input_chars {
                return Err(EmbeddingProviderError::InvalidInput(format!(
                    "input of {} chars exceeds the {}-char limit",
                    chars, self.config.max_input_chars
                )));
            }
        }

        let url = format!("{}/embeddings", self.config.base_url);
        let body = EmbeddingsRequest {
            model: &self.config.model,
            input: texts,
        };

        let mut request = self.client.post(&url).json(&body);
        if let Some(ref key) = self.config.api_key {
            request = request.header("Authorization", format!("Bearer {}", key));
        }

        let response = request.send().await.map_err(|e| {
            EmbeddingProviderError::ProviderUnavailable(e.without_url().to_string())
        })?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(EmbeddingProviderError::ProviderUnavailable(format!(
                "{}: {}",
                status, text
            )));
        }

        let parsed: EmbeddingsResponse = response.json().await.map_err(|e| {
            EmbeddingProviderError::ProviderUnavailable(format!("malformed response: {}", e))
        })?;

        if parsed.data.len() != texts.len() {
            return Err(EmbeddingProviderError::ProviderUnavailable(format!(
                "expected {} embeddings, got {}",
                texts.len(),
                parsed.data.len()
            )));
        }

        Ok(parsed.data.into_iter().map(|d| d.embedding).collect())
    }
}

#[async_trait]
impl EmbeddingProvider for HttpEmbeddingsClient {
    async fn embed_batch(
        &self,
        texts: &[String],
    ) -> Result<Vec<Vec<f32>>, EmbeddingProviderError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        self.request(texts).await
    }

    async fn embed_query(&self, text: &str) -> Result<Vec<f32>, EmbeddingProviderError> {
        let input = [text.to_string()];
        let mut vectors = self.request(&input).await?;
        vectors.pop().ok_or_else(|| {
            EmbeddingProviderError::ProviderUnavailable("no embedding returned".to_string())
        })
    }

    fn embedding_dimension(&self) -> usize {
        self.config.dimension
    }

    fn max_input_length(&self) -> usize {
        self.config.max_input_chars
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_over_length_input_is_rejected_before_sending() {
        let client = HttpEmbeddingsClient::new(EmbeddingsClientConfig {
            max_input_chars: 10,
            ..EmbeddingsClientConfig::default()
        })
        .unwrap();

        let result = client
            .embed_batch(&["this is well over ten characters".to_string()])
            .await;
        assert!(matches!(result, Err(EmbeddingProviderError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_empty_batch_is_a_no_op() {
        let client = HttpEmbeddingsClient::from_env().unwrap();
        assert!(client.embed_batch(&[]).await.unwrap().is_empty());
    }
}
