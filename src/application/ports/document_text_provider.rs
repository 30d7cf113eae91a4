use async_trait::async_trait;

#[derive(Debug)]
pub enum DocumentTextError {
    ProviderUnavailable(String),
    /// Extraction succeeded but produced no usable text.
    EmptyDocument(String),
}

impl std::fmt::Display for DocumentTextError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DocumentTextError::ProviderUnavailable(msg) => {
                write!(f, "Document text provider unavailable: {}", msg)
            }
            DocumentTextError::EmptyDocument(url) => {
                write!(f, "No text extracted from {}", url)
            }
        }
    }
}

impl std::error::Error for DocumentTextError {}

/// The PDF-extraction collaborator: UTF-8 text for a source URL.
#[async_trait]
pub trait DocumentTextProvider: Send + Sync {
    async fn fetch_text(&self, source_url: &str) -> Result<String, DocumentTextError>;
}
