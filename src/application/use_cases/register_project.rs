use std::sync::Arc;

use crate::domain::entities::PaperProject;
use crate::domain::repositories::{ProjectRepository, ProjectRepositoryError};

#[derive(Debug)]
pub enum RegisterProjectError {
    InvalidRequest(String),
    Repository(String),
}

impl std::fmt::Display for RegisterProjectError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegisterProjectError::InvalidRequest(msg) => write!(f, "Invalid request: {}", msg),
            RegisterProjectError::Repository(msg) => write!(f, "Repository error: {}", msg),
        }
    }
}

impl std::error::Error for RegisterProjectError {}

impl From<ProjectRepositoryError> for RegisterProjectError {
    fn from(error: ProjectRepositoryError) -> Self {
        RegisterProjectError::Repository(error.to_string())
    }
}

#[derive(Debug, Clone)]
pub struct RegisterProjectRequest {
    pub title: String,
    pub raw_text: Option<String>,
    pub source_url: Option<String>,
}

pub struct RegisterProjectUseCase {
    repository: Arc<dyn ProjectRepository>,
}

impl RegisterProjectUseCase {
    pub fn new(repository: Arc<dyn ProjectRepository>) -> Self {
        Self { repository }
    }

    pub async fn execute(
        &self,
        request: RegisterProjectRequest,
    ) -> Result<PaperProject, RegisterProjectError> {
        if request.title.trim().is_empty() {
            return Err(RegisterProjectError::InvalidRequest(
                "title must not be empty".to_string(),
            ));
        }

        let has_text = request
            .raw_text
            .as_deref()
            .map(|t| !t.trim().is_empty())
            .unwrap_or(false);
        let has_url = request
            .source_url
            .as_deref()
            .map(|u| !u.trim().is_empty())
            .unwrap_or(false);
        if !has_text && !has_url {
            return Err(RegisterProjectError::InvalidRequest(
                "either raw_text or source_url is required".to_string(),
            ));
        }

        let project = PaperProject::new(
            request.title.trim().to_string(),
            request.raw_text.unwrap_or_default(),
            request.source_url.filter(|u| !u.trim().is_empty()),
        );
        self.repository.save(&project).await?;
        tracing::info!(project_id = %project.id(), title = project.title(), "project registered");
        Ok(project)
    }
}
