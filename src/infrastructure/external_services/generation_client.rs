use std::env;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Error as ReqwestError};

use crate::application::ports::generation_provider::{
    GenerationProvider, GenerationProviderError,
};

#[derive(Debug, Clone)]
pub struct GenerationClientConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout_secs: u64,
}

impl Default for GenerationClientConfig {
    fn default() -> Self {
        Self {
            base_url: env::var("GENERATION_BASE_URL")
                .unwrap_or_else(|_| "https://api.openai.com/v1".to_string()),
            api_key: env::var("GENERATION_API_KEY").ok(),
            model: env::var("GENERATION_MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_string()),
            temperature: 0.3,
            max_tokens: 2048,
            timeout_secs: 120,
        }
    }
}

/// OpenAI-compatible chat-completions adapter. No retries; a timed-out call
/// is indistinguishable from an unavailable provider.
pub struct ChatGenerationClient {
    client: Client,
    config: GenerationClientConfig,
}

impl ChatGenerationClient {
    pub fn new(config: GenerationClientConfig) -> Result<Self, ReqwestError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { client, config })
    }

    pub fn from_env() -> Result<Self, ReqwestError> {
        Self::new(GenerationClientConfig::default())
    }
}

#[async_trait]
impl GenerationProvider for ChatGenerationClient {
    async fn complete(
        &self,
        system: &str,
        user: &str,
    ) -> Result<String, GenerationProviderError> {
        if user.trim().is_empty() {
            return Err(GenerationProviderError::InvalidInput(
                "empty prompt".to_string(),
            ));
        }

        let url = format!("{}/chat/completions", self.config.base_url);
        let body = serde_json::json!({
            "model": self.config.model,
            "messages": [
                { "role": "system", "content": system },
                { "role": "user", "content": user },
            ],
            "temperature": self.config.temperature,
            "max_tokens": self.config.max_tokens,
        });

        let mut request = self.client.post(&url).json(&body);
        if let Some(ref key) = self.config.api_key {
            request = request.header("Authorization", format!("Bearer {}", key));
        }

        let response = request.send().await.map_err(|e| {
            GenerationProviderError::ProviderUnavailable(e.without_url().to_string())
        })?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(GenerationProviderError::ProviderUnavailable(format!(
                "{}: {}",
                status, text
            )));
        }

        let json: serde_json::Value = response.json().await.map_err(|e| {
            GenerationProviderError::ProviderUnavailable(format!("malformed response: {}", e))
        })?;

        json.get("choices")
            .and_then(|c| c.get(0))
            .and_then(|c| c.get("message"))
            .and_then(|m| m.get("content"))
            .and_then(|c| c.as_str())
            .map(|s| s.to_string())
            .ok_or_else(|| {
                GenerationProviderError::ProviderUnavailable("empty completion".to_string())
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_empty_prompt_is_invalid_input() {
        let client = ChatGenerationClient::from_env().unwrap();
        let result = client.complete("system", "   ").await;
        assert!(matches!(result, Err(GenerationProviderError::InvalidInput(_))));
    }
}
