use std::sync::Arc;

use uuid::Uuid;

use crate::application::ports::embedding_provider::{EmbeddingProvider, EmbeddingProviderError};
use crate::application::ports::generation_provider::GenerationProviderError;
use crate::application::services::chunker::TextChunker;
use crate::application::services::context_assembler::{AssemblyOptions, ContextAssembler};
use crate::application::services::generation_orchestrator::{
    GeneratedArtifact, GenerationOrchestrator, OutputShape, PromptSpec,
};
use crate::application::services::prompts::{
    code_snippets_instruction, diagram_instruction, insights_instruction,
    references_instruction, summary_instruction,
};
use crate::domain::entities::{
    DiagramKind, DocumentChunk, ProjectArtifacts, SummaryLevel,
};
use crate::infrastructure::index::{VectorIndex, VectorIndexError, VectorIndexStore};

#[derive(Debug)]
pub enum PipelineError {
    NoDocumentText,
    Embedding(EmbeddingProviderError),
    Index(VectorIndexError),
    Generation(GenerationProviderError),
}

impl std::fmt::Display for PipelineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PipelineError::NoDocumentText => write!(f, "Document has no text to process"),
            PipelineError::Embedding(e) => write!(f, "Embedding step failed: {}", e),
            PipelineError::Index(e) => write!(f, "Index step failed: {}", e),
            PipelineError::Generation(e) => write!(f, "Generation step failed: {}", e),
        }
    }
}

impl std::error::Error for PipelineError {}

impl From<EmbeddingProviderError> for PipelineError {
    fn from(error: EmbeddingProviderError) -> Self {
        PipelineError::Embedding(error)
    }
}

impl From<VectorIndexError> for PipelineError {
    fn from(error: VectorIndexError) -> Self {
        PipelineError::Index(error)
    }
}

impl From<GenerationProviderError> for PipelineError {
    fn from(error: GenerationProviderError) -> Self {
        PipelineError::Generation(error)
    }
}

pub struct IngestionOutcome {
    pub chunks_indexed: usize,
    pub artifacts: ProjectArtifacts,
}

/// The end-to-end ingestion flow for one paper: chunk, embed, build and
/// persist the retrieval index, then run the baseline analysis batch.
///
/// Chunking, embedding and index persistence are unrecoverable here — any
/// failure aborts the run and nothing derived is kept. Within the baseline
/// batch only the summary is required; structured artifacts degrade to their
/// empty defaults.
pub struct AnalysisPipeline {
    chunker: TextChunker,
    embedding_provider: Arc<dyn EmbeddingProvider>,
    index_store: Arc<VectorIndexStore>,
    assembler: Arc<ContextAssembler>,
    orchestrator: Arc<GenerationOrchestrator>,
    embed_batch_size: usize,
}

impl AnalysisPipeline {
    pub fn new(
        chunker: TextChunker,
        embedding_provider: Arc<dyn EmbeddingProvider>,
        index_store: Arc<VectorIndexStore>,
        assembler: Arc<ContextAssembler>,
        orchestrator: Arc<GenerationOrchestrator>,
        embed_batch_size: usize,
    ) -> Self {
        Self {
            chunker,
            embedding_provider,
            index_store,
            assembler,
            orchestrator,
            embed_batch_size: embed_batch_size.max(1),
        }
    }

    pub async fn run(
        &self,
        project_id: Uuid,
        raw_text: &str,
    ) -> Result<IngestionOutcome, PipelineError> {
        if raw_text.trim().is_empty() {
            return Err(PipelineError::NoDocumentText);
        }

        let chunks: Vec<DocumentChunk> = self.chunker.chunk(raw_text).collect();
        let embeddings = self.embed_chunks(&chunks).await?;

        let index = VectorIndex::build(&chunks, embeddings)?;
        self.index_store.persist(project_id, &index)?;
        tracing::info!(%project_id, chunks = chunks.len(), "vector index persisted");

        // The index was built in this very run, so retrieval would only echo
        // the excerpt; external enrichment still applies.
        let options = AssemblyOptions {
            include_rag: false,
            include_external: true,
            top_k: 4,
        };
        let context = self
            .assembler
            .assemble(project_id, raw_text, "", &options)
            .await
            .map_err(|_| PipelineError::NoDocumentText)?;

        let specs = baseline_specs();
        let results = self.orchestrator.generate_batch(&specs, &context).await;

        let mut artifacts = ProjectArtifacts::default();
        for (spec, result) in specs.iter().zip(results) {
            match result {
                Ok(artifact) => install_baseline(&mut artifacts, artifact),
                Err(error) => {
                    if matches!(spec.shape, OutputShape::Prose) {
                        return Err(PipelineError::Generation(error));
                    }
                    tracing::warn!(artifact = spec.label, %error, "artifact generation failed; keeping empty default");
                    install_baseline(&mut artifacts, spec.shape.empty_default());
                }
            }
        }

        Ok(IngestionOutcome {
            chunks_indexed: chunks.len(),
            artifacts,
        })
    }

    async fn embed_chunks(
        &self,
        chunks: &[DocumentChunk],
    ) -> Result<Vec<Vec<f32>>, EmbeddingProviderError> {
        // Truncate to the provider limit here; the provider itself rejects
        // over-length input instead of clipping it.
        let max_len = self.embedding_provider.max_input_length();
        let texts: Vec<String> = chunks
            .iter()
            .map(|chunk| {
                if chunk.len_chars() > max_len {
                    chunk.text().chars().take(max_len).collect()
                } else {
                    chunk.text().to_string()
                }
            })
            .collect();

        let mut embeddings = Vec::with_capacity(texts.len());
        for batch in texts.chunks(self.embed_batch_size) {
            embeddings.extend(self.embedding_provider.embed_batch(batch).await?);
        }
        Ok(embeddings)
    }
}

/// Ingestion generates one baseline artifact per kind; reading levels and
/// diagram variants beyond these are produced on demand.
fn baseline_specs() -> Vec<PromptSpec> {
    vec![
        PromptSpec::new(
            "summary",
            summary_instruction(SummaryLevel::Intermediate),
            OutputShape::Prose,
        ),
        PromptSpec::new(
            "diagram",
            diagram_instruction(DiagramKind::Flowchart),
            OutputShape::Diagram(DiagramKind::Flowchart),
        ),
        PromptSpec::new(
            "code_snippets",
            code_snippets_instruction(),
            OutputShape::CodeSnippets,
        ),
        PromptSpec::new("references", references_instruction(), OutputShape::References),
        PromptSpec::new("insights", insights_instruction(), OutputShape::Insights),
    ]
}

fn install_baseline(artifacts: &mut ProjectArtifacts, artifact: GeneratedArtifact) {
    match artifact {
        GeneratedArtifact::Prose(text) => {
            artifacts.summaries.insert(SummaryLevel::Intermediate, text);
        }
        GeneratedArtifact::Diagram(markup) => {
            artifacts.diagrams.insert(DiagramKind::Flowchart, markup);
        }
        GeneratedArtifact::CodeSnippets(snippets) => artifacts.code_snippets = snippets,
        GeneratedArtifact::References(references) => artifacts.references = references,
        GeneratedArtifact::Insights(insights) => artifacts.insights = insights,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    use crate::application::ports::generation_provider::GenerationProvider;
    use crate::application::ports::search_provider::{
        SearchHit, SearchProviderError, WebSearchProvider,
    };
    use crate::application::services::context_assembler::ContextAssemblerConfig;

    struct CountingEmbedder;

    #[async_trait]
    impl EmbeddingProvider for CountingEmbedder {
        async fn embed_batch(
            &self,
            texts: &[String],
        ) -> Result<Vec<Vec<f32>>, EmbeddingProviderError> {
            Ok(texts
                .iter()
                .map(|t| vec![t.chars().count() as f32, 1.0])
                .collect())
        }

        async fn embed_query(&self, text: &str) -> Result<Vec<f32>, EmbeddingProviderError> {
            Ok(vec![text.chars().count() as f32, 1.0])
        }

        fn embedding_dimension(&self) -> usize {
            2
        }

        fn max_input_length(&self) -> usize {
            10_000
        }
    }

    struct FailingEmbedder;

    #[async_trait]
    impl EmbeddingProvider for FailingEmbedder {
        async fn embed_batch(
            &self,
            _texts: &[String],
        ) -> Result<Vec<Vec<f32>>, EmbeddingProviderError> {
            Err(EmbeddingProviderError::ProviderUnavailable("503".to_string()))
        }

        async fn embed_query(&self, _text: &str) -> Result<Vec<f32>, EmbeddingProviderError> {
            Err(EmbeddingProviderError::ProviderUnavailable("503".to_string()))
        }

        fn embedding_dimension(&self) -> usize {
            2
        }

        fn max_input_length(&self) -> usize {
            10_000
        }
    }

    /// Answers each baseline spec with well-formed output, keyed off the
    /// format rules embedded in the prompt.
    struct WellBehavedGenerator;

    #[async_trait]
    impl GenerationProvider for WellBehavedGenerator {
        async fn complete(
            &self,
            _system: &str,
            user: &str,
        ) -> Result<String, GenerationProviderError> {
            if user.contains("search terms") {
                return Ok("retrieval augmentation".to_string());
            }
            if user.contains("\"code\"") {
                return Ok(
                    r#"[{"description": "update rule", "code": "w -= lr * g", "language": "python"}]"#
                        .to_string(),
                );
            }
            if user.contains("\"authors\"") {
                return Ok(r#"[{"title": "Prior Work", "authors": "Doe", "year": 2020}]"#.to_string());
            }
            if user.contains("\"detail\"") {
                return Ok(
                    r#"[{"title": "Strong baseline", "detail": "the method is simple"}]"#.to_string(),
                );
            }
            if user.contains("Mermaid") {
                return Ok("flowchart TD\n    input --> model\n    model --> output".to_string());
            }
            Ok("An intermediate-level summary of the paper.".to_string())
        }
    }

    struct NoSearch;

    #[async_trait]
    impl WebSearchProvider for NoSearch {
        async fn search(
            &self,
            _query: &str,
            _limit: usize,
        ) -> Result<Vec<SearchHit>, SearchProviderError> {
            Ok(vec![])
        }
    }

    fn pipeline_with(
        embedder: Arc<dyn EmbeddingProvider>,
        store: Arc<VectorIndexStore>,
    ) -> AnalysisPipeline {
        let generator: Arc<dyn GenerationProvider> = Arc::new(WellBehavedGenerator);
        let assembler = Arc::new(ContextAssembler::new(
            store.clone(),
            embedder.clone(),
            generator.clone(),
            Arc::new(NoSearch),
            ContextAssemblerConfig::default(),
        ));
        let orchestrator = Arc::new(GenerationOrchestrator::new(generator));
        AnalysisPipeline::new(
            TextChunker::new(200, 40),
            embedder,
            store,
            assembler,
            orchestrator,
            8,
        )
    }

    fn long_text() -> String {
        "The proposed method improves retrieval quality. ".repeat(40)
    }

    #[tokio::test]
    async fn test_successful_run_persists_index_and_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(VectorIndexStore::new(dir.path().to_path_buf(), 4));
        let pipeline = pipeline_with(Arc::new(CountingEmbedder), store.clone());
        let project_id = Uuid::new_v4();

        let outcome = pipeline.run(project_id, &long_text()).await.unwrap();

        assert!(outcome.chunks_indexed > 1);
        assert_eq!(
            outcome.artifacts.summaries.get(&SummaryLevel::Intermediate),
            Some(&"An intermediate-level summary of the paper.".to_string())
        );
        assert!(outcome
            .artifacts
            .diagrams
            .get(&DiagramKind::Flowchart)
            .unwrap()
            .starts_with("flowchart TD"));
        assert_eq!(outcome.artifacts.code_snippets.len(), 1);
        assert_eq!(outcome.artifacts.references.len(), 1);
        assert_eq!(outcome.artifacts.insights.len(), 1);

        let index = store.load(project_id).unwrap();
        assert_eq!(index.len(), outcome.chunks_indexed);
    }

    #[tokio::test]
    async fn test_empty_text_fails_before_any_work() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(VectorIndexStore::new(dir.path().to_path_buf(), 4));
        let pipeline = pipeline_with(Arc::new(CountingEmbedder), store.clone());
        let project_id = Uuid::new_v4();

        let result = pipeline.run(project_id, "  \n  ").await;
        assert!(matches!(result, Err(PipelineError::NoDocumentText)));
        assert!(store.load(project_id).is_err());
    }

    #[tokio::test]
    async fn test_embedding_outage_is_unrecoverable() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(VectorIndexStore::new(dir.path().to_path_buf(), 4));
        let pipeline = pipeline_with(Arc::new(FailingEmbedder), store.clone());
        let project_id = Uuid::new_v4();

        let result = pipeline.run(project_id, &long_text()).await;
        assert!(matches!(result, Err(PipelineError::Embedding(_))));
        // Nothing was persisted for the failed run.
        assert!(store.load(project_id).is_err());
    }
}
