pub mod document_text_provider;
pub mod embedding_provider;
pub mod generation_provider;
pub mod search_provider;

pub use document_text_provider::DocumentTextProvider;
pub use embedding_provider::EmbeddingProvider;
pub use generation_provider::GenerationProvider;
pub use search_provider::WebSearchProvider;
