use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::{PaperProject, ProjectArtifacts};

#[derive(Debug, Deserialize)]
pub struct RegisterProjectDto {
    pub title: String,
    pub raw_text: Option<String>,
    pub source_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ProjectDto {
    pub id: Uuid,
    pub title: String,
    pub source_url: Option<String>,
    pub status: String,
    pub artifacts: ProjectArtifacts,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&PaperProject> for ProjectDto {
    fn from(project: &PaperProject) -> Self {
        Self {
            id: project.id(),
            title: project.title().to_string(),
            source_url: project.source_url().map(str::to_string),
            status: project.status().to_string(),
            artifacts: project.artifacts().clone(),
            created_at: project.created_at().to_rfc3339(),
            updated_at: project.updated_at().to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct IngestResponseDto {
    pub project_id: Uuid,
    pub chunks_indexed: usize,
    pub duration_ms: u64,
}
