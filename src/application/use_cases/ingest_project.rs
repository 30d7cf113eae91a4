use std::sync::Arc;

use uuid::Uuid;

use crate::application::ports::document_text_provider::DocumentTextProvider;
use crate::application::services::analysis_pipeline::AnalysisPipeline;
use crate::domain::entities::PaperProject;
use crate::domain::repositories::{ProjectRepository, ProjectRepositoryError};

#[derive(Debug)]
pub enum IngestProjectError {
    ProjectNotFound(Uuid),
    /// Another ingestion run owns this project right now.
    AlreadyProcessing(Uuid),
    Repository(String),
    /// The run failed; the detailed cause lives in the status and the logs.
    ProcessingFailed(String),
}

impl std::fmt::Display for IngestProjectError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IngestProjectError::ProjectNotFound(id) => write!(f, "Project not found: {}", id),
            IngestProjectError::AlreadyProcessing(id) => {
                write!(f, "Project {} is already being processed", id)
            }
            IngestProjectError::Repository(msg) => write!(f, "Repository error: {}", msg),
            IngestProjectError::ProcessingFailed(msg) => write!(f, "Processing failed: {}", msg),
        }
    }
}

impl std::error::Error for IngestProjectError {}

impl From<ProjectRepositoryError> for IngestProjectError {
    fn from(error: ProjectRepositoryError) -> Self {
        match error {
            ProjectRepositoryError::NotFound(id) => IngestProjectError::ProjectNotFound(id),
            other => IngestProjectError::Repository(other.to_string()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct IngestProjectResponse {
    pub project_id: Uuid,
    pub chunks_indexed: usize,
    pub duration_ms: u64,
}

/// Drives one project through the ingestion state machine. The status guard
/// serializes writers: a project already in `processing` is rejected, so at
/// most one run owns a project's index at a time.
pub struct IngestProjectUseCase {
    repository: Arc<dyn ProjectRepository>,
    document_text_provider: Arc<dyn DocumentTextProvider>,
    pipeline: Arc<AnalysisPipeline>,
}

impl IngestProjectUseCase {
    pub fn new(
        repository: Arc<dyn ProjectRepository>,
        document_text_provider: Arc<dyn DocumentTextProvider>,
        pipeline: Arc<AnalysisPipeline>,
    ) -> Self {
        Self {
            repository,
            document_text_provider,
            pipeline,
        }
    }

    pub async fn execute(
        &self,
        project_id: Uuid,
    ) -> Result<IngestProjectResponse, IngestProjectError> {
        let started = std::time::Instant::now();

        let mut project = self
            .repository
            .find_by_id(project_id)
            .await?
            .ok_or(IngestProjectError::ProjectNotFound(project_id))?;

        if !project.status().can_start_ingestion() {
            return Err(IngestProjectError::AlreadyProcessing(project_id));
        }

        project
            .start_processing()
            .map_err(IngestProjectError::ProcessingFailed)?;
        self.repository.update(&project).await?;

        // URL-registered papers get their text on first ingestion.
        if !project.has_text() {
            if let Some(url) = project.source_url().map(str::to_string) {
                match self.document_text_provider.fetch_text(&url).await {
                    Ok(text) => {
                        project.set_raw_text(text);
                        self.repository.update(&project).await?;
                    }
                    Err(error) => {
                        tracing::error!(%project_id, %error, "document text fetch failed");
                        return self.fail(project, format!("document fetch: {}", error)).await;
                    }
                }
            }
        }

        match self.pipeline.run(project_id, project.raw_text()).await {
            Ok(outcome) => {
                project
                    .complete_processing(outcome.artifacts)
                    .map_err(IngestProjectError::ProcessingFailed)?;
                self.repository.update(&project).await?;

                let duration_ms = started.elapsed().as_millis() as u64;
                tracing::info!(%project_id, chunks = outcome.chunks_indexed, duration_ms, "ingestion complete");
                Ok(IngestProjectResponse {
                    project_id,
                    chunks_indexed: outcome.chunks_indexed,
                    duration_ms,
                })
            }
            Err(error) => {
                tracing::error!(%project_id, %error, "ingestion failed");
                self.fail(project, error.to_string()).await
            }
        }
    }

    /// Record the failure on the project; derived fields stay untouched.
    async fn fail(
        &self,
        mut project: PaperProject,
        reason: String,
    ) -> Result<IngestProjectResponse, IngestProjectError> {
        if let Err(error) = project.fail_processing(reason.clone()) {
            tracing::error!(project_id = %project.id(), %error, "could not mark project failed");
        }
        if let Err(error) = self.repository.update(&project).await {
            tracing::error!(project_id = %project.id(), %error, "could not persist failed status");
        }
        Err(IngestProjectError::ProcessingFailed(reason))
    }
}
