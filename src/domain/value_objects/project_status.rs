use serde::{Deserialize, Serialize};

/// Lifecycle of a paper project. The failure reason travels with the status
/// for diagnostics but serializes as plain "failed".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ProjectStatus {
    Pending,
    Processing,
    Complete,
    Failed(String),
}

impl ProjectStatus {
    pub fn is_pending(&self) -> bool {
        matches!(self, ProjectStatus::Pending)
    }

    pub fn is_processing(&self) -> bool {
        matches!(self, ProjectStatus::Processing)
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, ProjectStatus::Complete)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, ProjectStatus::Failed(_))
    }

    /// Ingestion may start from any state except an in-flight run: a failed
    /// project retries, a complete one re-ingests (rebuilding its index).
    pub fn can_start_ingestion(&self) -> bool {
        !self.is_processing()
    }

    pub fn can_transition_to(&self, next: &ProjectStatus) -> bool {
        match (self, next) {
            (ProjectStatus::Pending, ProjectStatus::Processing) => true,
            (ProjectStatus::Processing, ProjectStatus::Complete) => true,
            (ProjectStatus::Processing, ProjectStatus::Failed(_)) => true,
            (ProjectStatus::Failed(_), ProjectStatus::Processing) => true,
            (ProjectStatus::Complete, ProjectStatus::Processing) => true,
            _ => false,
        }
    }

    pub fn failure_reason(&self) -> Option<&str> {
        match self {
            ProjectStatus::Failed(reason) => Some(reason),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectStatus::Pending => "pending",
            ProjectStatus::Processing => "processing",
            ProjectStatus::Complete => "complete",
            ProjectStatus::Failed(_) => "failed",
        }
    }
}

impl Default for ProjectStatus {
    fn default() -> Self {
        ProjectStatus::Pending
    }
}

impl std::fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_predicates() {
        assert!(ProjectStatus::Pending.is_pending());
        assert!(ProjectStatus::Processing.is_processing());
        assert!(ProjectStatus::Complete.is_complete());
        assert!(ProjectStatus::Failed("boom".to_string()).is_failed());
    }

    #[test]
    fn test_valid_transitions() {
        let processing = ProjectStatus::Processing;
        assert!(ProjectStatus::Pending.can_transition_to(&processing));
        assert!(processing.can_transition_to(&ProjectStatus::Complete));
        assert!(processing.can_transition_to(&ProjectStatus::Failed("e".to_string())));
        // Retry after failure and re-ingestion after completion both restart.
        assert!(ProjectStatus::Failed("e".to_string()).can_transition_to(&processing));
        assert!(ProjectStatus::Complete.can_transition_to(&processing));
    }

    #[test]
    fn test_invalid_transitions() {
        assert!(!ProjectStatus::Pending.can_transition_to(&ProjectStatus::Complete));
        assert!(!ProjectStatus::Complete.can_transition_to(&ProjectStatus::Pending));
        assert!(!ProjectStatus::Processing.can_transition_to(&ProjectStatus::Pending));
    }

    #[test]
    fn test_ingestion_guard() {
        assert!(ProjectStatus::Pending.can_start_ingestion());
        assert!(ProjectStatus::Failed("e".to_string()).can_start_ingestion());
        assert!(ProjectStatus::Complete.can_start_ingestion());
        assert!(!ProjectStatus::Processing.can_start_ingestion());
    }

    #[test]
    fn test_failure_reason() {
        let failed = ProjectStatus::Failed("embedding service down".to_string());
        assert_eq!(failed.failure_reason(), Some("embedding service down"));
        assert_eq!(ProjectStatus::Pending.failure_reason(), None);
    }

    #[test]
    fn test_display_hides_reason() {
        let failed = ProjectStatus::Failed("internal detail".to_string());
        assert_eq!(failed.to_string(), "failed");
    }
}
