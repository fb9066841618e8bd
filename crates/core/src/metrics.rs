//! Metrics snapshot shapes and vote ranking.
//!
//! The snapshot is assembled by the server's metrics aggregator and
//! serialized as-is to dashboard clients. Ranking is a caller concern and is
//! never baked into the snapshot ordering, which always follows project
//! creation order.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{ProjectCategory, ProjectId};

/// A project together with the number of votes referencing it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectVotes {
    pub id: ProjectId,
    pub title: String,
    pub team_name: String,
    pub category: ProjectCategory,
    pub vote_count: u64,
}

/// Point-in-time aggregation of voting activity.
///
/// The counts are read independently and are not transactionally consistent
/// with each other when writes race the read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSnapshot {
    pub total_votes: u64,
    pub total_emails: u64,
    pub recent_votes: u64,
    /// Projects in ascending creation order.
    pub projects: Vec<ProjectVotes>,
    /// Vote sums for every category that has at least one project.
    pub category_votes: BTreeMap<ProjectCategory, u64>,
}

impl MetricsSnapshot {
    /// Build a snapshot, deriving the category sums from `projects`.
    #[must_use]
    pub fn new(
        total_votes: u64,
        total_emails: u64,
        recent_votes: u64,
        projects: Vec<ProjectVotes>,
    ) -> Self {
        let category_votes = category_totals(&projects);
        Self {
            total_votes,
            total_emails,
            recent_votes,
            projects,
            category_votes,
        }
    }

    /// The snapshot of an empty store.
    #[must_use]
    pub fn empty() -> Self {
        Self::new(0, 0, 0, Vec::new())
    }

    /// The project with the most votes, if any project exists.
    ///
    /// Ties resolve to the earliest-created project.
    #[must_use]
    pub fn leader(&self) -> Option<&ProjectVotes> {
        rank_by_votes(&self.projects).into_iter().next()
    }
}

/// Sum vote counts per category.
#[must_use]
pub fn category_totals(projects: &[ProjectVotes]) -> BTreeMap<ProjectCategory, u64> {
    projects
        .iter()
        .fold(BTreeMap::new(), |mut totals, project| {
            *totals.entry(project.category).or_insert(0) += project.vote_count;
            totals
        })
}

/// Rank projects by descending vote count.
///
/// The sort is stable, so tied projects keep their input order.
#[must_use]
pub fn rank_by_votes(projects: &[ProjectVotes]) -> Vec<&ProjectVotes> {
    let mut ranked: Vec<&ProjectVotes> = projects.iter().collect();
    ranked.sort_by(|a, b| b.vote_count.cmp(&a.vote_count));
    ranked
}
