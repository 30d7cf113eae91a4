use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::application::use_cases::ingest_project::IngestProjectError;
use crate::application::use_cases::register_project::{
    RegisterProjectError, RegisterProjectRequest,
};
use crate::application::use_cases::{
    GetProjectUseCase, IngestProjectUseCase, RegisterProjectUseCase,
};
use crate::application::use_cases::get_project::GetProjectError;
use crate::presentation::http::dto::{
    ApiResponse, IngestResponseDto, ProjectDto, RegisterProjectDto,
};

pub struct ProjectHandler {
    register_use_case: Arc<RegisterProjectUseCase>,
    get_use_case: Arc<GetProjectUseCase>,
    ingest_use_case: Arc<IngestProjectUseCase>,
}

impl ProjectHandler {
    pub fn new(
        register_use_case: Arc<RegisterProjectUseCase>,
        get_use_case: Arc<GetProjectUseCase>,
        ingest_use_case: Arc<IngestProjectUseCase>,
    ) -> Self {
        Self {
            register_use_case,
            get_use_case,
            ingest_use_case,
        }
    }

    pub async fn register_project(
        State(handler): State<Arc<ProjectHandler>>,
        Json(body): Json<RegisterProjectDto>,
    ) -> Result<impl IntoResponse, StatusCode> {
        let request = RegisterProjectRequest {
            title: body.title,
            raw_text: body.raw_text,
            source_url: body.source_url,
        };

        match handler.register_use_case.execute(request).await {
            Ok(project) => Ok((
                StatusCode::CREATED,
                Json(ApiResponse::success(ProjectDto::from(&project))),
            )),
            Err(RegisterProjectError::InvalidRequest(msg)) => Ok((
                StatusCode::BAD_REQUEST,
                Json(ApiResponse::error("INVALID_REQUEST", msg)),
            )),
            Err(e) => Ok((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("REGISTRATION_FAILED", e.to_string())),
            )),
        }
    }

    pub async fn get_project(
        State(handler): State<Arc<ProjectHandler>>,
        Path(project_id): Path<Uuid>,
    ) -> Result<impl IntoResponse, StatusCode> {
        match handler.get_use_case.execute(project_id).await {
            Ok(project) => Ok((
                StatusCode::OK,
                Json(ApiResponse::success(ProjectDto::from(&project))),
            )),
            Err(GetProjectError::NotFound(id)) => Ok((
                StatusCode::NOT_FOUND,
                Json(ApiResponse::error(
                    "PROJECT_NOT_FOUND",
                    format!("no project with id {}", id),
                )),
            )),
            Err(e) => Ok((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("LOOKUP_FAILED", e.to_string())),
            )),
        }
    }

    pub async fn ingest_project(
        State(handler): State<Arc<ProjectHandler>>,
        Path(project_id): Path<Uuid>,
    ) -> Result<impl IntoResponse, StatusCode> {
        match handler.ingest_use_case.execute(project_id).await {
            Ok(response) => Ok((
                StatusCode::OK,
                Json(ApiResponse::success(IngestResponseDto {
                    project_id: response.project_id,
                    chunks_indexed: response.chunks_indexed,
                    duration_ms: response.duration_ms,
                })),
            )),
            Err(IngestProjectError::ProjectNotFound(id)) => Ok((
                StatusCode::NOT_FOUND,
                Json(ApiResponse::error(
                    "PROJECT_NOT_FOUND",
                    format!("no project with id {}", id),
                )),
            )),
            Err(IngestProjectError::AlreadyProcessing(id)) => Ok((
                StatusCode::CONFLICT,
                Json(ApiResponse::error(
                    "ALREADY_PROCESSING",
                    format!("project {} is already being processed", id),
                )),
            )),
            // The detailed cause stays in the logs and the project status.
            Err(IngestProjectError::ProcessingFailed(_)) => Ok((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error(
                    "INGESTION_FAILED",
                    "ingestion failed; see project status".to_string(),
                )),
            )),
            Err(e) => Ok((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("INGESTION_FAILED", e.to_string())),
            )),
        }
    }
}
