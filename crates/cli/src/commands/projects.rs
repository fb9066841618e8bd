//! Project seeding from YAML.
//!
//! # File Format
//!
//! ```yaml
//! projects:
//!   - title: Harbor Lens
//!     description: Camera feed that counts fishing boats in port
//!     team_name: Umi
//!     category: IoT
//!     github_url: https://github.com/umi/harbor-lens
//! ```
//!
//! The whole file is validated before the database is touched.

use std::path::Path;

use serde::Deserialize;
use tracing::{error, info};

use hackvote_server::db::VoteStore;
use hackvote_server::models::NewProject;
use hackvote_server::services::ProjectDraft;

use super::{CommandError, connect};

#[derive(Debug, Deserialize)]
struct SeedFile {
    projects: Vec<ProjectDraft>,
}

/// Parse and validate a seed file.
fn parse_seed(content: &str) -> Result<Vec<NewProject>, CommandError> {
    let file: SeedFile = serde_yaml::from_str(content)?;

    file.projects
        .into_iter()
        .enumerate()
        .map(|(i, draft)| {
            let title = draft.title.clone().unwrap_or_default();
            draft.validate().map_err(|source| CommandError::InvalidProject {
                index: i + 1,
                title,
                source,
            })
        })
        .collect()
}

/// Insert every project from a YAML file.
///
/// # Errors
///
/// Returns an error if the file cannot be read, any project is invalid, or an
/// insert fails. Projects inserted before a failed insert stay in place.
pub async fn seed(path: &Path) -> Result<(), CommandError> {
    info!(path = %path.display(), "Loading projects from file");
    let content = tokio::fs::read_to_string(path).await?;

    let projects = match parse_seed(&content) {
        Ok(projects) => projects,
        Err(e) => {
            error!("Seed file validation failed");
            return Err(e);
        }
    };
    info!(projects = projects.len(), "Seed file validated");

    let store = connect().await?;
    for project in projects {
        let created = store.create_project(project).await?;
        info!(id = %created.id, title = %created.title, "Created project");
    }

    info!("Seeding complete!");
    Ok(())
}
