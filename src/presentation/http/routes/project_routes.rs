use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;

use crate::presentation::http::handlers::ProjectHandler;

pub fn project_routes(project_handler: Arc<ProjectHandler>) -> Router {
    Router::new()
        .route("/projects", post(ProjectHandler::register_project))
        .route("/projects/{project_id}", get(ProjectHandler::get_project))
        .route(
            "/projects/{project_id}/ingest",
            post(ProjectHandler::ingest_project),
        )
        .with_state(project_handler)
}
