use std::env;
use std::path::PathBuf;

use crate::application::services::context_assembler::ContextAssemblerConfig;
use crate::infrastructure::external_services::document_fetcher::DocumentFetcherConfig;
use crate::infrastructure::external_services::embeddings_client::EmbeddingsClientConfig;
use crate::infrastructure::external_services::generation_client::GenerationClientConfig;
use crate::infrastructure::external_services::web_search_client::SearchClientConfig;

#[derive(Debug, Clone)]
pub struct ChunkingConfig {
    pub target_size: usize,
    pub overlap: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            target_size: 1_000,
            overlap: 100,
        }
    }
}

/// Process configuration, collected from the environment once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub index_root: PathBuf,
    pub index_cache_capacity: usize,
    pub embed_batch_size: usize,
    pub chunking: ChunkingConfig,
    pub context: ContextAssemblerConfig,
    pub embeddings: EmbeddingsClientConfig,
    pub generation: GenerationClientConfig,
    pub search: SearchClientConfig,
    pub extraction: DocumentFetcherConfig,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            port: env_parse("PORT", 3000),
            index_root: PathBuf::from(
                env::var("INDEX_ROOT").unwrap_or_else(|_| "./indices".to_string()),
            ),
            index_cache_capacity: env_parse("INDEX_CACHE_CAPACITY", 16),
            embed_batch_size: env_parse("EMBED_BATCH_SIZE", 16),
            chunking: ChunkingConfig {
                target_size: env_parse("CHUNK_TARGET_SIZE", 1_000),
                overlap: env_parse("CHUNK_OVERLAP", 100),
            },
            context: ContextAssemblerConfig {
                primary_cap: env_parse("CONTEXT_PRIMARY_CAP", 8_000),
                ..ContextAssemblerConfig::default()
            },
            embeddings: EmbeddingsClientConfig::default(),
            generation: GenerationClientConfig::default(),
            search: SearchClientConfig::default(),
            extraction: DocumentFetcherConfig::default(),
        }
    }
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(default)
}
