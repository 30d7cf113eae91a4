pub mod artifact_handler;
pub mod project_handler;

pub use artifact_handler::ArtifactHandler;
pub use project_handler::ProjectHandler;
