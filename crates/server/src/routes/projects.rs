//! Public project listing.

use axum::{Json, extract::State};
use serde::Serialize;

use crate::db::CreationOrder;
use crate::error::Result;
use crate::models::ProjectWithVotes;
use crate::services::ProjectService;
use crate::state::AppState;

/// Response body for project listings.
#[derive(Debug, Serialize)]
pub struct ProjectList {
    pub projects: Vec<ProjectWithVotes>,
}

/// List every project with its vote count, oldest first.
pub async fn index(State(state): State<AppState>) -> Result<Json<ProjectList>> {
    let projects = ProjectService::new(state.store())
        .list(CreationOrder::Ascending)
        .await?;
    Ok(Json(ProjectList { projects }))
}
