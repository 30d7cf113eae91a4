use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::PaperProject;
use crate::domain::repositories::{ProjectRepository, ProjectRepositoryError};

/// Process-local project store. Deployments with a relational database swap
/// in a SQL-backed adapter behind the same trait.
pub struct InMemoryProjectRepository {
    projects: RwLock<HashMap<Uuid, PaperProject>>,
}

impl InMemoryProjectRepository {
    pub fn new() -> Self {
        Self {
            projects: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryProjectRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProjectRepository for InMemoryProjectRepository {
    async fn save(&self, project: &PaperProject) -> Result<(), ProjectRepositoryError> {
        let mut projects = self
            .projects
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if projects.contains_key(&project.id()) {
            return Err(ProjectRepositoryError::DuplicateId(project.id()));
        }
        projects.insert(project.id(), project.clone());
        Ok(())
    }

    async fn find_by_id(
        &self,
        id: Uuid,
    ) -> Result<Option<PaperProject>, ProjectRepositoryError> {
        let projects = self
            .projects
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        Ok(projects.get(&id).cloned())
    }

    async fn update(&self, project: &PaperProject) -> Result<(), ProjectRepositoryError> {
        let mut projects = self
            .projects
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if !projects.contains_key(&project.id()) {
            return Err(ProjectRepositoryError::NotFound(project.id()));
        }
        projects.insert(project.id(), project.clone());
        Ok(())
    }
}
