//! Project administration.

use axum::{Json, extract::State, extract::rejection::JsonRejection};
use serde::Serialize;
use tracing::instrument;

use crate::db::CreationOrder;
use crate::error::Result;
use crate::models::Project;
use crate::routes::projects::ProjectList;
use crate::services::{ProjectDraft, ProjectService};
use crate::state::AppState;

/// Response body for a created project.
#[derive(Debug, Serialize)]
pub struct ProjectCreated {
    pub project: Project,
    pub message: &'static str,
}

/// List every project with its vote count, newest first.
pub async fn index(State(state): State<AppState>) -> Result<Json<ProjectList>> {
    let projects = ProjectService::new(state.store())
        .list(CreationOrder::Descending)
        .await?;
    Ok(Json(ProjectList { projects }))
}

/// Create a project.
#[instrument(skip_all)]
pub async fn create(
    State(state): State<AppState>,
    payload: std::result::Result<Json<ProjectDraft>, JsonRejection>,
) -> Result<Json<ProjectCreated>> {
    let Json(draft) = payload?;

    let project = ProjectService::new(state.store()).create(draft).await?;

    Ok(Json(ProjectCreated {
        project,
        message: "Project created successfully",
    }))
}
