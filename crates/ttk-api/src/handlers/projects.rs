//! Authenticated project handlers.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use ttk_models::{Project, ProjectId, TranscriptSource};

use crate::auth::MaybeUser;
use crate::error::ApiResult;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateProjectRequest {
    pub url: String,
}

#[derive(Debug, Serialize)]
pub struct CreateProjectResponse {
    pub id: ProjectId,
}

/// Listing entry; scripts are fetched per project.
#[derive(Debug, Serialize)]
pub struct ProjectSummary {
    pub id: ProjectId,
    pub source_url: String,
    pub video_title: String,
    pub transcript_source: TranscriptSource,
    pub script_count: usize,
    pub created_at: DateTime<Utc>,
}

impl From<&Project> for ProjectSummary {
    fn from(project: &Project) -> Self {
        Self {
            id: project.id.clone(),
            source_url: project.source_url.clone(),
            video_title: project.video_title.clone(),
            transcript_source: project.transcript_source,
            script_count: project.scripts.len(),
            created_at: project.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ListProjectsResponse {
    pub projects: Vec<ProjectSummary>,
}

/// POST /api/projects
pub async fn create_project(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
    Json(request): Json<CreateProjectRequest>,
) -> ApiResult<(StatusCode, Json<CreateProjectResponse>)> {
    let id = state.projects.create_project(user.as_ref(), &request.url).await?;
    Ok((StatusCode::CREATED, Json(CreateProjectResponse { id })))
}

/// GET /api/projects
pub async fn list_projects(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
) -> ApiResult<Json<ListProjectsResponse>> {
    let projects = state.projects.list_projects(user.as_ref()).await?;
    Ok(Json(ListProjectsResponse {
        projects: projects.iter().map(ProjectSummary::from).collect(),
    }))
}

/// GET /api/projects/:id
pub async fn get_project(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
    Path(id): Path<String>,
) -> ApiResult<Json<Project>> {
    let project = state
        .projects
        .get_project(user.as_ref(), &ProjectId::from(id))
        .await?;
    Ok(Json(project))
}
