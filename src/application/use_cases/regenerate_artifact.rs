use std::sync::Arc;

use uuid::Uuid;

use crate::application::services::context_assembler::{
    AssemblerError, AssemblyOptions, ContextAssembler,
};
use crate::application::services::generation_orchestrator::{
    GeneratedArtifact, GenerationOrchestrator, OutputShape, PromptSpec,
};
use crate::application::services::prompts::{
    code_snippets_instruction, custom_instruction, diagram_instruction, insights_instruction,
    references_instruction, summary_instruction,
};
use crate::domain::entities::ArtifactSelector;
use crate::domain::repositories::{ProjectRepository, ProjectRepositoryError};

#[derive(Debug)]
pub enum RegenerateArtifactError {
    ProjectNotFound(Uuid),
    /// Regeneration only makes sense once an ingestion run has completed.
    ProjectNotReady(String),
    NoDocumentText,
    Repository(String),
    Generation(String),
}

impl std::fmt::Display for RegenerateArtifactError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegenerateArtifactError::ProjectNotFound(id) => {
                write!(f, "Project not found: {}", id)
            }
            RegenerateArtifactError::ProjectNotReady(status) => {
                write!(f, "Project is not ready for regeneration (status: {})", status)
            }
            RegenerateArtifactError::NoDocumentText => {
                write!(f, "Project has no document text")
            }
            RegenerateArtifactError::Repository(msg) => write!(f, "Repository error: {}", msg),
            RegenerateArtifactError::Generation(msg) => write!(f, "Generation failed: {}", msg),
        }
    }
}

impl std::error::Error for RegenerateArtifactError {}

impl From<ProjectRepositoryError> for RegenerateArtifactError {
    fn from(error: ProjectRepositoryError) -> Self {
        match error {
            ProjectRepositoryError::NotFound(id) => RegenerateArtifactError::ProjectNotFound(id),
            other => RegenerateArtifactError::Repository(other.to_string()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RegenerateArtifactRequest {
    pub project_id: Uuid,
    pub selector: ArtifactSelector,
    /// Free-text steering from the reader, layered over the stock instruction.
    pub instruction: Option<String>,
    /// Retrieval query; the selector's canned query applies when absent.
    pub rag_query: Option<String>,
    pub include_external: bool,
}

/// Refresh exactly one artifact with a fresh retrieval-augmented context.
/// The project's status and its other artifacts are never touched.
pub struct RegenerateArtifactUseCase {
    repository: Arc<dyn ProjectRepository>,
    assembler: Arc<ContextAssembler>,
    orchestrator: Arc<GenerationOrchestrator>,
    top_k: usize,
}

impl RegenerateArtifactUseCase {
    pub fn new(
        repository: Arc<dyn ProjectRepository>,
        assembler: Arc<ContextAssembler>,
        orchestrator: Arc<GenerationOrchestrator>,
    ) -> Self {
        Self {
            repository,
            assembler,
            orchestrator,
            top_k: 5,
        }
    }

    pub async fn execute(
        &self,
        request: RegenerateArtifactRequest,
    ) -> Result<GeneratedArtifact, RegenerateArtifactError> {
        let mut project = self
            .repository
            .find_by_id(request.project_id)
            .await?
            .ok_or(RegenerateArtifactError::ProjectNotFound(request.project_id))?;

        if !project.status().is_complete() {
            return Err(RegenerateArtifactError::ProjectNotReady(
                project.status().to_string(),
            ));
        }

        let rag_query = request
            .rag_query
            .as_deref()
            .filter(|q| !q.trim().is_empty())
            .unwrap_or_else(|| request.selector.default_rag_query());
        let options = AssemblyOptions {
            include_rag: true,
            include_external: request.include_external,
            top_k: self.top_k,
        };

        let context = self
            .assembler
            .assemble(request.project_id, project.raw_text(), rag_query, &options)
            .await
            .map_err(|_: AssemblerError| RegenerateArtifactError::NoDocumentText)?;

        let spec = build_spec(request.selector, request.instruction.as_deref());
        let artifact = self
            .orchestrator
            .generate(&spec, &context)
            .await
            .map_err(|e| RegenerateArtifactError::Generation(e.to_string()))?;

        install(&mut project, request.selector, &artifact);
        self.repository.update(&project).await?;
        tracing::info!(
            project_id = %request.project_id,
            artifact = request.selector.label(),
            "artifact regenerated"
        );

        Ok(artifact)
    }
}

fn build_spec(selector: ArtifactSelector, instruction: Option<&str>) -> PromptSpec {
    let (label, base, shape) = match selector {
        ArtifactSelector::Summary(level) => (
            "summary",
            summary_instruction(level),
            OutputShape::Prose,
        ),
        ArtifactSelector::Diagram(kind) => (
            "diagram",
            diagram_instruction(kind),
            OutputShape::Diagram(kind),
        ),
        ArtifactSelector::CodeSnippets => (
            "code_snippets",
            code_snippets_instruction(),
            OutputShape::CodeSnippets,
        ),
        ArtifactSelector::References => (
            "references",
            references_instruction(),
            OutputShape::References,
        ),
        ArtifactSelector::Insights => (
            "insights",
            insights_instruction(),
            OutputShape::Insights,
        ),
    };

    let instruction = match instruction.map(str::trim).filter(|s| !s.is_empty()) {
        // A free-text ask replaces the stock prose instruction outright but
        // only steers the structured ones, so the output shape survives.
        Some(custom) if shape == OutputShape::Prose => custom_instruction(custom),
        Some(custom) => format!("{}\n\nAdditional guidance from the reader: {}", base, custom),
        None => base,
    };

    PromptSpec::new(label, instruction, shape)
}

fn install(
    project: &mut crate::domain::entities::PaperProject,
    selector: ArtifactSelector,
    artifact: &GeneratedArtifact,
) {
    let artifacts = project.artifacts_mut();
    match (selector, artifact) {
        (ArtifactSelector::Summary(level), GeneratedArtifact::Prose(text)) => {
            artifacts.summaries.insert(level, text.clone());
        }
        (ArtifactSelector::Diagram(kind), GeneratedArtifact::Diagram(markup)) => {
            artifacts.diagrams.insert(kind, markup.clone());
        }
        (ArtifactSelector::CodeSnippets, GeneratedArtifact::CodeSnippets(snippets)) => {
            artifacts.code_snippets = snippets.clone();
        }
        (ArtifactSelector::References, GeneratedArtifact::References(references)) => {
            artifacts.references = references.clone();
        }
        (ArtifactSelector::Insights, GeneratedArtifact::Insights(insights)) => {
            artifacts.insights = insights.clone();
        }
        (selector, artifact) => {
            tracing::warn!(
                artifact = selector.label(),
                "generated artifact shape does not match selector: {:?}",
                artifact
            );
        }
    }
}
