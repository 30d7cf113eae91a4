use async_trait::async_trait;

#[derive(Debug)]
pub enum GenerationProviderError {
    /// Unreachable, rate-limited, timed out, or an empty/garbled reply.
    ProviderUnavailable(String),
    InvalidInput(String),
}

impl std::fmt::Display for GenerationProviderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GenerationProviderError::ProviderUnavailable(msg) => {
                write!(f, "Generation provider unavailable: {}", msg)
            }
            GenerationProviderError::InvalidInput(msg) => {
                write!(f, "Invalid generation input: {}", msg)
            }
        }
    }
}

impl std::error::Error for GenerationProviderError {}

/// A text-generation service. Output is best-effort prose; every structural
/// guarantee is enforced downstream by the orchestrator's parsing layer.
#[async_trait]
pub trait GenerationProvider: Send + Sync {
    async fn complete(&self, system: &str, user: &str)
        -> Result<String, GenerationProviderError>;
}
