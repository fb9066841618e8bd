//! Project domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use hackvote_core::{ProjectCategory, ProjectId, ProjectVotes};

/// A hackathon submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Project {
    pub id: ProjectId,
    pub title: String,
    pub description: String,
    pub team_name: String,
    pub category: ProjectCategory,
    pub image_url: Option<String>,
    pub demo_url: Option<String>,
    pub github_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A validated project ready to be inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProject {
    pub title: String,
    pub description: String,
    pub team_name: String,
    pub category: ProjectCategory,
    pub image_url: Option<String>,
    pub demo_url: Option<String>,
    pub github_url: Option<String>,
}

impl NewProject {
    /// Materialize the project with a fresh ID and creation time.
    #[must_use]
    pub fn into_project(self, created_at: DateTime<Utc>) -> Project {
        Project {
            id: ProjectId::generate(),
            title: self.title,
            description: self.description,
            team_name: self.team_name,
            category: self.category,
            image_url: self.image_url,
            demo_url: self.demo_url,
            github_url: self.github_url,
            created_at,
        }
    }
}

/// A project listed together with its vote count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectWithVotes {
    #[serde(flatten)]
    pub project: Project,
    pub vote_count: u64,
}

impl ProjectWithVotes {
    /// The slim shape reported by the metrics snapshot.
    #[must_use]
    pub fn summary(&self) -> ProjectVotes {
        ProjectVotes {
            id: self.project.id,
            title: self.project.title.clone(),
            team_name: self.project.team_name.clone(),
            category: self.project.category,
            vote_count: self.vote_count,
        }
    }
}
