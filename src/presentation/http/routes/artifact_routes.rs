use axum::{Router, routing::post};
use std::sync::Arc;

use crate::presentation::http::handlers::ArtifactHandler;

pub fn artifact_routes(artifact_handler: Arc<ArtifactHandler>) -> Router {
    Router::new()
        .route(
            "/projects/{project_id}/artifacts",
            post(ArtifactHandler::regenerate_artifact),
        )
        .with_state(artifact_handler)
}
