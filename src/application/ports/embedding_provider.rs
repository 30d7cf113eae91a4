use async_trait::async_trait;

#[derive(Debug)]
pub enum EmbeddingProviderError {
    /// The service is unreachable, rate-limited, timed out or replied with
    /// something that is not an embedding response.
    ProviderUnavailable(String),
    /// The input violates provider limits; callers truncate upstream.
    InvalidInput(String),
}

impl std::fmt::Display for EmbeddingProviderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EmbeddingProviderError::ProviderUnavailable(msg) => {
                write!(f, "Embedding provider unavailable: {}", msg)
            }
            EmbeddingProviderError::InvalidInput(msg) => {
                write!(f, "Invalid embedding input: {}", msg)
            }
        }
    }
}

impl std::error::Error for EmbeddingProviderError {}

/// Maps text to fixed-dimension vectors. No retries live here; retry policy,
/// if any, belongs to the caller.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    async fn embed_batch(&self, texts: &[String])
        -> Result<Vec<Vec<f32>>, EmbeddingProviderError>;

    async fn embed_query(&self, text: &str) -> Result<Vec<f32>, EmbeddingProviderError>;

    /// Dimension of every vector this provider returns.
    fn embedding_dimension(&self) -> usize;

    /// Upper bound on a single input, in characters.
    fn max_input_length(&self) -> usize;
}
