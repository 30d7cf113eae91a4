use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::artifact::ProjectArtifacts;
use crate::domain::value_objects::ProjectStatus;

/// A registered paper together with its extracted text, processing status and
/// derived artifacts. The raw text is immutable for the duration of one
/// ingestion run; artifacts are replaced wholesale on ingestion and
/// field-by-field on regeneration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaperProject {
    id: Uuid,
    title: String,
    source_url: Option<String>,
    raw_text: String,
    status: ProjectStatus,
    artifacts: ProjectArtifacts,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl PaperProject {
    pub fn new(title: String, raw_text: String, source_url: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title,
            source_url,
            raw_text,
            status: ProjectStatus::Pending,
            artifacts: ProjectArtifacts::default(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn source_url(&self) -> Option<&str> {
        self.source_url.as_deref()
    }

    pub fn raw_text(&self) -> &str {
        &self.raw_text
    }

    pub fn has_text(&self) -> bool {
        !self.raw_text.trim().is_empty()
    }

    pub fn status(&self) -> &ProjectStatus {
        &self.status
    }

    pub fn artifacts(&self) -> &ProjectArtifacts {
        &self.artifacts
    }

    pub fn artifacts_mut(&mut self) -> &mut ProjectArtifacts {
        self.updated_at = Utc::now();
        &mut self.artifacts
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Store text fetched from the extraction service for a URL-registered paper.
    pub fn set_raw_text(&mut self, text: String) {
        self.raw_text = text;
        self.updated_at = Utc::now();
    }

    pub fn start_processing(&mut self) -> Result<(), String> {
        if !self.status.can_start_ingestion() {
            return Err(format!(
                "project {} is already being processed",
                self.id
            ));
        }
        self.status = ProjectStatus::Processing;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Atomically install the full artifact set produced by one ingestion run.
    pub fn complete_processing(&mut self, artifacts: ProjectArtifacts) -> Result<(), String> {
        if !self.status.is_processing() {
            return Err(format!("project {} is not being processed", self.id));
        }
        self.artifacts = artifacts;
        self.status = ProjectStatus::Complete;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// A failed run leaves every derived field untouched; only the status moves.
    pub fn fail_processing(&mut self, reason: String) -> Result<(), String> {
        if !self.status.is_processing() {
            return Err(format!("project {} is not being processed", self.id));
        }
        self.status = ProjectStatus::Failed(reason);
        self.updated_at = Utc::now();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::artifact::SummaryLevel;

    fn sample_project() -> PaperProject {
        PaperProject::new(
            "Residual Learning for Image Recognition".to_string(),
            "Deeper neural networks are more difficult to train.".to_string(),
            None,
        )
    }

    #[test]
    fn test_new_project_is_pending() {
        let project = sample_project();
        assert_eq!(project.status(), &ProjectStatus::Pending);
        assert!(project.has_text());
        assert!(project.artifacts().is_empty());
    }

    #[test]
    fn test_processing_workflow() {
        let mut project = sample_project();
        assert!(project.start_processing().is_ok());
        assert_eq!(project.status(), &ProjectStatus::Processing);

        let mut artifacts = ProjectArtifacts::default();
        artifacts
            .summaries
            .insert(SummaryLevel::Intermediate, "summary".to_string());
        assert!(project.complete_processing(artifacts).is_ok());
        assert!(project.status().is_complete());
        assert!(!project.artifacts().is_empty());
    }

    #[test]
    fn test_reentrant_processing_rejected() {
        let mut project = sample_project();
        project.start_processing().unwrap();
        assert!(project.start_processing().is_err());
    }

    #[test]
    fn test_failure_keeps_artifacts_untouched() {
        let mut project = sample_project();
        project.start_processing().unwrap();
        let mut artifacts = ProjectArtifacts::default();
        artifacts
            .summaries
            .insert(SummaryLevel::Beginner, "first run".to_string());
        project.complete_processing(artifacts.clone()).unwrap();

        // Re-ingestion that fails must not clobber the previous artifacts.
        project.start_processing().unwrap();
        project.fail_processing("embedding service down".to_string()).unwrap();
        assert!(project.status().is_failed());
        assert_eq!(project.artifacts(), &artifacts);
    }

    #[test]
    fn test_retry_after_failure() {
        let mut project = sample_project();
        project.start_processing().unwrap();
        project.fail_processing("boom".to_string()).unwrap();
        assert!(project.start_processing().is_ok());
    }
}
