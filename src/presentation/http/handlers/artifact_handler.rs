use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::application::use_cases::RegenerateArtifactUseCase;
use crate::application::use_cases::regenerate_artifact::{
    RegenerateArtifactError, RegenerateArtifactRequest,
};
use crate::presentation::http::dto::{
    ApiResponse, RegenerateRequestDto, RegenerateResponseDto,
};

pub struct ArtifactHandler {
    regenerate_use_case: Arc<RegenerateArtifactUseCase>,
}

impl ArtifactHandler {
    pub fn new(regenerate_use_case: Arc<RegenerateArtifactUseCase>) -> Self {
        Self {
            regenerate_use_case,
        }
    }

    pub async fn regenerate_artifact(
        State(handler): State<Arc<ArtifactHandler>>,
        Path(project_id): Path<Uuid>,
        Json(body): Json<RegenerateRequestDto>,
    ) -> Result<impl IntoResponse, StatusCode> {
        let selector = match body.selector() {
            Ok(selector) => selector,
            Err(msg) => {
                return Ok((
                    StatusCode::BAD_REQUEST,
                    Json(ApiResponse::error("INVALID_ARTIFACT_KIND", msg)),
                ));
            }
        };

        let request = RegenerateArtifactRequest {
            project_id,
            selector,
            instruction: body.instruction,
            rag_query: body.rag_query,
            include_external: body.include_external.unwrap_or(false),
        };

        match handler.regenerate_use_case.execute(request).await {
            Ok(artifact) => Ok((
                StatusCode::OK,
                Json(ApiResponse::success(RegenerateResponseDto::from_artifact(
                    selector, &artifact,
                ))),
            )),
            Err(RegenerateArtifactError::ProjectNotFound(id)) => Ok((
                StatusCode::NOT_FOUND,
                Json(ApiResponse::error(
                    "PROJECT_NOT_FOUND",
                    format!("no project with id {}", id),
                )),
            )),
            Err(RegenerateArtifactError::ProjectNotReady(status)) => Ok((
                StatusCode::CONFLICT,
                Json(ApiResponse::error(
                    "PROJECT_NOT_READY",
                    format!("project status is {}", status),
                )),
            )),
            Err(RegenerateArtifactError::NoDocumentText) => Ok((
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(ApiResponse::error(
                    "NO_DOCUMENT_TEXT",
                    "project has no document text".to_string(),
                )),
            )),
            Err(e) => Ok((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("REGENERATION_FAILED", e.to_string())),
            )),
        }
    }
}
