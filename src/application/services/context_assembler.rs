use std::sync::Arc;

use futures::future::join_all;
use uuid::Uuid;

use crate::application::ports::embedding_provider::EmbeddingProvider;
use crate::application::ports::generation_provider::GenerationProvider;
use crate::application::ports::search_provider::WebSearchProvider;
use crate::application::services::prompts::{
    SYSTEM_TERM_EXTRACTOR, key_terms_prompt, parse_key_terms,
};
use crate::domain::entities::ExternalContextItem;
use crate::domain::entities::context_block::{
    ContextBlock, EXTERNAL_SECTION, PRIMARY_SECTION, RAG_SECTION,
};
use crate::infrastructure::index::VectorIndexStore;

#[derive(Debug)]
pub enum AssemblerError {
    /// The primary section is the only one whose absence is fatal.
    NoDocumentText,
}

impl std::fmt::Display for AssemblerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AssemblerError::NoDocumentText => write!(f, "No document text to assemble context from"),
        }
    }
}

impl std::error::Error for AssemblerError {}

#[derive(Debug, Clone)]
pub struct AssemblyOptions {
    pub include_rag: bool,
    pub include_external: bool,
    pub top_k: usize,
}

impl Default for AssemblyOptions {
    fn default() -> Self {
        Self {
            include_rag: true,
            include_external: false,
            top_k: 4,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ContextAssemblerConfig {
    /// Character cap on the primary excerpt; full papers rarely fit a
    /// generation context window.
    pub primary_cap: usize,
    /// Character cap on the excerpt handed to key-term extraction.
    pub key_term_excerpt_cap: usize,
    pub max_key_terms: usize,
    pub hits_per_term: usize,
}

impl Default for ContextAssemblerConfig {
    fn default() -> Self {
        Self {
            primary_cap: 8_000,
            key_term_excerpt_cap: 2_000,
            max_key_terms: 4,
            hits_per_term: 2,
        }
    }
}

/// Builds the prompt context for one generation request: retrieved passages,
/// optional external web snippets, and a bounded excerpt of the paper itself.
/// Every section except the primary excerpt degrades to absence on failure.
pub struct ContextAssembler {
    index_store: Arc<VectorIndexStore>,
    embedding_provider: Arc<dyn EmbeddingProvider>,
    generation_provider: Arc<dyn GenerationProvider>,
    search_provider: Arc<dyn WebSearchProvider>,
    config: ContextAssemblerConfig,
}

impl ContextAssembler {
    pub fn new(
        index_store: Arc<VectorIndexStore>,
        embedding_provider: Arc<dyn EmbeddingProvider>,
        generation_provider: Arc<dyn GenerationProvider>,
        search_provider: Arc<dyn WebSearchProvider>,
        config: ContextAssemblerConfig,
    ) -> Self {
        Self {
            index_store,
            embedding_provider,
            generation_provider,
            search_provider,
            config,
        }
    }

    pub async fn assemble(
        &self,
        project_id: Uuid,
        raw_text: &str,
        rag_query: &str,
        options: &AssemblyOptions,
    ) -> Result<ContextBlock, AssemblerError> {
        if raw_text.trim().is_empty() {
            return Err(AssemblerError::NoDocumentText);
        }

        let mut block = ContextBlock::new();

        if options.include_rag {
            if let Some(section) = self.rag_section(project_id, rag_query, options.top_k).await {
                block.push_section(RAG_SECTION, section);
            }
        }

        if options.include_external {
            if let Some(section) = self.external_section(raw_text).await {
                block.push_section(EXTERNAL_SECTION, section);
            }
        }

        block.push_section(PRIMARY_SECTION, char_prefix(raw_text, self.config.primary_cap));
        Ok(block)
    }

    async fn rag_section(&self, project_id: Uuid, query: &str, top_k: usize) -> Option<String> {
        let index = match self.index_store.load(project_id) {
            Ok(index) => index,
            Err(error) => {
                tracing::warn!(%project_id, %error, "no retrieval index; omitting retrieved passages");
                return None;
            }
        };

        let query_vector = match self.embedding_provider.embed_query(query).await {
            Ok(vector) => vector,
            Err(error) => {
                tracing::warn!(%project_id, %error, "query embedding failed; omitting retrieved passages");
                return None;
            }
        };

        let hits = index.query(&query_vector, top_k);
        if hits.is_empty() {
            return None;
        }

        Some(
            hits.iter()
                .map(|hit| hit.text.as_str())
                .collect::<Vec<_>>()
                .join("\n\n---\n\n"),
        )
    }

    async fn external_section(&self, raw_text: &str) -> Option<String> {
        let excerpt = char_prefix(raw_text, self.config.key_term_excerpt_cap);
        let prompt = key_terms_prompt(&excerpt, self.config.max_key_terms);

        let reply = match self
            .generation_provider
            .complete(SYSTEM_TERM_EXTRACTOR, &prompt)
            .await
        {
            Ok(reply) => reply,
            Err(error) => {
                tracing::warn!(%error, "key-term extraction failed; omitting external context");
                return None;
            }
        };

        let terms = parse_key_terms(&reply, self.config.max_key_terms);
        if terms.is_empty() {
            return None;
        }

        // One lookup per term, in flight together.
        let lookups = join_all(terms.iter().map(|term| self.lookup_term(term))).await;
        let items: Vec<ExternalContextItem> = lookups.into_iter().flatten().collect();
        if items.is_empty() {
            return None;
        }

        Some(
            items
                .iter()
                .map(|item| format!("[{}] {} (source: {})", item.term, item.snippet, item.source_url))
                .collect::<Vec<_>>()
                .join("\n"),
        )
    }

    async fn lookup_term(&self, term: &str) -> Vec<ExternalContextItem> {
        match self
            .search_provider
            .search(term, self.config.hits_per_term)
            .await
        {
            Ok(hits) => hits
                .into_iter()
                .take(self.config.hits_per_term)
                .map(|hit| ExternalContextItem {
                    term: term.to_string(),
                    snippet: hit.content,
                    source_url: hit.url,
                })
                .collect(),
            Err(error) => {
                tracing::warn!(term, %error, "web search failed; skipping term");
                Vec::new()
            }
        }
    }
}

pub fn char_prefix(text: &str, cap: usize) -> String {
    text.chars().take(cap).collect()
}
