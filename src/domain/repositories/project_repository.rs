use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::PaperProject;

#[derive(Debug)]
pub enum ProjectRepositoryError {
    NotFound(Uuid),
    DuplicateId(Uuid),
    StorageError(String),
}

impl std::fmt::Display for ProjectRepositoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProjectRepositoryError::NotFound(id) => write!(f, "Project not found: {}", id),
            ProjectRepositoryError::DuplicateId(id) => write!(f, "Project already exists: {}", id),
            ProjectRepositoryError::StorageError(msg) => write!(f, "Storage error: {}", msg),
        }
    }
}

impl std::error::Error for ProjectRepositoryError {}

/// Persistence boundary for project records. The pipeline only ever reads a
/// record, updates its status and writes derived artifact fields back; the
/// relational schema behind this trait is not its concern.
#[async_trait]
pub trait ProjectRepository: Send + Sync {
    async fn save(&self, project: &PaperProject) -> Result<(), ProjectRepositoryError>;

    async fn find_by_id(&self, id: Uuid)
        -> Result<Option<PaperProject>, ProjectRepositoryError>;

    async fn update(&self, project: &PaperProject) -> Result<(), ProjectRepositoryError>;
}
