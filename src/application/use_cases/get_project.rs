use std::sync::Arc;

use uuid::Uuid;

use crate::domain::entities::PaperProject;
use crate::domain::repositories::{ProjectRepository, ProjectRepositoryError};

#[derive(Debug)]
pub enum GetProjectError {
    NotFound(Uuid),
    Repository(String),
}

impl std::fmt::Display for GetProjectError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GetProjectError::NotFound(id) => write!(f, "Project not found: {}", id),
            GetProjectError::Repository(msg) => write!(f, "Repository error: {}", msg),
        }
    }
}

impl std::error::Error for GetProjectError {}

impl From<ProjectRepositoryError> for GetProjectError {
    fn from(error: ProjectRepositoryError) -> Self {
        GetProjectError::Repository(error.to_string())
    }
}

pub struct GetProjectUseCase {
    repository: Arc<dyn ProjectRepository>,
}

impl GetProjectUseCase {
    pub fn new(repository: Arc<dyn ProjectRepository>) -> Self {
        Self { repository }
    }

    pub async fn execute(&self, project_id: Uuid) -> Result<PaperProject, GetProjectError> {
        self.repository
            .find_by_id(project_id)
            .await?
            .ok_or(GetProjectError::NotFound(project_id))
    }
}
