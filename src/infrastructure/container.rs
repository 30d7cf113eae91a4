use std::sync::Arc;

use crate::application::ports::{
    DocumentTextProvider, EmbeddingProvider, GenerationProvider, WebSearchProvider,
};
use crate::application::services::chunker::TextChunker;
use crate::application::services::context_assembler::ContextAssembler;
use crate::application::services::generation_orchestrator::GenerationOrchestrator;
use crate::application::services::AnalysisPipeline;
use crate::application::use_cases::{
    GetProjectUseCase, IngestProjectUseCase, RegenerateArtifactUseCase, RegisterProjectUseCase,
};
use crate::config::AppConfig;
use crate::domain::repositories::ProjectRepository;
use crate::infrastructure::external_services::{
    ChatGenerationClient, HttpDocumentFetcher, HttpEmbeddingsClient, HttpWebSearchClient,
};
use crate::infrastructure::index::VectorIndexStore;
use crate::infrastructure::persistence::InMemoryProjectRepository;
use crate::presentation::http::handlers::{ArtifactHandler, ProjectHandler};

/// Wires every adapter, service, use case and handler once at startup.
pub struct AppContainer {
    pub project_repository: Arc<dyn ProjectRepository>,
    pub embedding_provider: Arc<dyn EmbeddingProvider>,
    pub generation_provider: Arc<dyn GenerationProvider>,
    pub search_provider: Arc<dyn WebSearchProvider>,
    pub document_text_provider: Arc<dyn DocumentTextProvider>,

    pub index_store: Arc<VectorIndexStore>,
    pub context_assembler: Arc<ContextAssembler>,
    pub generation_orchestrator: Arc<GenerationOrchestrator>,
    pub analysis_pipeline: Arc<AnalysisPipeline>,

    pub register_project_use_case: Arc<RegisterProjectUseCase>,
    pub get_project_use_case: Arc<GetProjectUseCase>,
    pub ingest_project_use_case: Arc<IngestProjectUseCase>,
    pub regenerate_artifact_use_case: Arc<RegenerateArtifactUseCase>,

    pub project_handler: Arc<ProjectHandler>,
    pub artifact_handler: Arc<ArtifactHandler>,

    pub port: u16,
}

impl AppContainer {
    pub fn new(config: AppConfig) -> Result<Self, Box<dyn std::error::Error>> {
        let project_repository: Arc<dyn ProjectRepository> =
            Arc::new(InMemoryProjectRepository::new());

        let embedding_provider: Arc<dyn EmbeddingProvider> =
            Arc::new(HttpEmbeddingsClient::new(config.embeddings.clone())?);
        let generation_provider: Arc<dyn GenerationProvider> =
            Arc::new(ChatGenerationClient::new(config.generation.clone())?);
        let search_provider: Arc<dyn WebSearchProvider> =
            Arc::new(HttpWebSearchClient::new(config.search.clone())?);
        let document_text_provider: Arc<dyn DocumentTextProvider> =
            Arc::new(HttpDocumentFetcher::new(config.extraction.clone())?);

        let index_store = Arc::new(VectorIndexStore::new(
            config.index_root.clone(),
            config.index_cache_capacity,
        ));

        let context_assembler = Arc::new(ContextAssembler::new(
            index_store.clone(),
            embedding_provider.clone(),
            generation_provider.clone(),
            search_provider.clone(),
            config.context.clone(),
        ));

        let generation_orchestrator =
            Arc::new(GenerationOrchestrator::new(generation_provider.clone()));

        let analysis_pipeline = Arc::new(AnalysisPipeline::new(
            TextChunker::new(config.chunking.target_size, config.chunking.overlap),
            embedding_provider.clone(),
            index_store.clone(),
            context_assembler.clone(),
            generation_orchestrator.clone(),
            config.embed_batch_size,
        ));

        let register_project_use_case =
            Arc::new(RegisterProjectUseCase::new(project_repository.clone()));
        let get_project_use_case = Arc::new(GetProjectUseCase::new(project_repository.clone()));
        let ingest_project_use_case = Arc::new(IngestProjectUseCase::new(
            project_repository.clone(),
            document_text_provider.clone(),
            analysis_pipeline.clone(),
        ));
        let regenerate_artifact_use_case = Arc::new(RegenerateArtifactUseCase::new(
            project_repository.clone(),
            context_assembler.clone(),
            generation_orchestrator.clone(),
        ));

        let project_handler = Arc::new(ProjectHandler::new(
            register_project_use_case.clone(),
            get_project_use_case.clone(),
            ingest_project_use_case.clone(),
        ));
        let artifact_handler = Arc::new(ArtifactHandler::new(
            regenerate_artifact_use_case.clone(),
        ));

        Ok(Self {
            project_repository,
            embedding_provider,
            generation_provider,
            search_provider,
            document_text_provider,
            index_store,
            context_assembler,
            generation_orchestrator,
            analysis_pipeline,
            register_project_use_case,
            get_project_use_case,
            ingest_project_use_case,
            regenerate_artifact_use_case,
            project_handler,
            artifact_handler,
            port: config.port,
        })
    }
}
