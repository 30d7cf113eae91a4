pub mod document_fetcher;
pub mod embeddings_client;
pub mod generation_client;
pub mod web_search_client;

pub use document_fetcher::HttpDocumentFetcher;
pub use embeddings_client::HttpEmbeddingsClient;
pub use generation_client::ChatGenerationClient;
pub use web_search_client::HttpWebSearchClient;
