use async_trait::async_trait;

#[derive(Debug)]
pub enum SearchProviderError {
    ProviderUnavailable(String),
}

impl std::fmt::Display for SearchProviderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchProviderError::ProviderUnavailable(msg) => {
                write!(f, "Search provider unavailable: {}", msg)
            }
        }
    }
}

impl std::error::Error for SearchProviderError {}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
    pub content: String,
    pub url: String,
}

/// External web search used to enrich generation context with material the
/// paper itself does not contain.
#[async_trait]
pub trait WebSearchProvider: Send + Sync {
    async fn search(&self, query: &str, limit: usize)
        -> Result<Vec<SearchHit>, SearchProviderError>;
}
