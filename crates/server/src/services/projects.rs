//! Project administration.
//!
//! Projects are created by organizers through the admin API and are never
//! edited or deleted afterwards.

use serde::Deserialize;
use thiserror::Error;
use tracing::instrument;

use hackvote_core::ProjectCategory;

use super::metrics::projects_with_votes;
use crate::db::{CreationOrder, RepositoryError, VoteStore};
use crate::models::{NewProject, Project, ProjectWithVotes};

/// Errors that can occur while creating a project.
#[derive(Debug, Error)]
pub enum ProjectError {
    /// One of title, description, team name or category is missing.
    #[error("Missing required fields")]
    MissingFields,

    /// The category is not one of the known categories.
    #[error("Invalid category")]
    InvalidCategory(String),

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Project fields as submitted by an organizer.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProjectDraft {
    pub title: Option<String>,
    pub description: Option<String>,
    pub team_name: Option<String>,
    pub category: Option<String>,
    pub image_url: Option<String>,
    pub demo_url: Option<String>,
    pub github_url: Option<String>,
}

impl ProjectDraft {
    /// Validate the draft into an insertable project.
    ///
    /// # Errors
    ///
    /// Returns `ProjectError::MissingFields` if a required field is blank.
    /// Returns `ProjectError::InvalidCategory` for an unknown category.
    pub fn validate(self) -> Result<NewProject, ProjectError> {
        let (Some(title), Some(description), Some(team_name), Some(category)) = (
            non_blank(self.title),
            non_blank(self.description),
            non_blank(self.team_name),
            non_blank(self.category),
        ) else {
            return Err(ProjectError::MissingFields);
        };

        let category = category
            .parse::<ProjectCategory>()
            .map_err(|_| ProjectError::InvalidCategory(category))?;

        Ok(NewProject {
            title,
            description,
            team_name,
            category,
            image_url: non_blank(self.image_url),
            demo_url: non_blank(self.demo_url),
            github_url: non_blank(self.github_url),
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

/// Project administration service.
pub struct ProjectService<'a> {
    store: &'a dyn VoteStore,
}

impl<'a> ProjectService<'a> {
    /// Create a project service.
    #[must_use]
    pub const fn new(store: &'a dyn VoteStore) -> Self {
        Self { store }
    }

    /// Validate and store a new project.
    ///
    /// # Errors
    ///
    /// Returns `ProjectError` if validation or the insert fails.
    #[instrument(skip_all)]
    pub async fn create(&self, draft: ProjectDraft) -> Result<Project, ProjectError> {
        let project = self.store.create_project(draft.validate()?).await?;
        tracing::info!(project_id = %project.id, title = %project.title, "Project created");
        Ok(project)
    }

    /// List every project with its vote count.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the store read fails.
    pub async fn list(&self, order: CreationOrder) -> Result<Vec<ProjectWithVotes>, RepositoryError> {
        projects_with_votes(self.store, order).await
    }
}
