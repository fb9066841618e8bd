//! Metrics aggregation.
//!
//! Every snapshot re-reads the store; nothing is cached. The individual
//! counts are independent reads issued concurrently, so under racing writes
//! the totals, category sums and the 24h window may each reflect a slightly
//! different instant. That drift is accepted.

use chrono::{DateTime, Duration, Utc};
use tracing::instrument;

use hackvote_core::MetricsSnapshot;

use crate::db::{CreationOrder, RepositoryError, VoteStore};
use crate::models::ProjectWithVotes;

/// Width of the "recent votes" window, measured back from the snapshot time.
pub const RECENT_WINDOW: Duration = Duration::hours(24);

/// Builds [`MetricsSnapshot`]s from a store.
pub struct MetricsAggregator<'a> {
    store: &'a dyn VoteStore,
}

impl<'a> MetricsAggregator<'a> {
    /// Create an aggregator over a store.
    #[must_use]
    pub const fn new(store: &'a dyn VoteStore) -> Self {
        Self { store }
    }

    /// Aggregate voting activity as of `now`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if any of the underlying reads fail.
    #[instrument(skip(self))]
    pub async fn snapshot(&self, now: DateTime<Utc>) -> Result<MetricsSnapshot, RepositoryError> {
        let since = now - RECENT_WINDOW;

        let (total_votes, total_emails, recent_votes, projects) = tokio::try_join!(
            self.store.count_votes(),
            self.store.count_emails(),
            self.store.count_votes_since(since),
            projects_with_votes(self.store, CreationOrder::Ascending),
        )?;

        let projects = projects.iter().map(ProjectWithVotes::summary).collect();
        Ok(MetricsSnapshot::new(
            total_votes,
            total_emails,
            recent_votes,
            projects,
        ))
    }
}

/// List projects with vote counts, preferring one grouped read.
///
/// When the store cannot count in a grouped read, falls back to one count
/// query per project. That degraded mode costs a round trip per project and
/// is only acceptable for small hackathons.
///
/// # Errors
///
/// Returns `RepositoryError` if the listing or any count fails.
pub async fn projects_with_votes(
    store: &dyn VoteStore,
    order: CreationOrder,
) -> Result<Vec<ProjectWithVotes>, RepositoryError> {
    match store.projects_with_votes(order).await {
        Err(RepositoryError::Unsupported(operation)) => {
            tracing::warn!(operation, "Grouped counts unavailable, counting per project");
        }
        result => return result,
    }

    let projects = store.list_projects(order).await?;
    let mut counted = Vec::with_capacity(projects.len());
    for project in projects {
        let vote_count = store.count_votes_for_project(project.id).await?;
        counted.push(ProjectWithVotes {
            project,
            vote_count,
        });
    }
    Ok(counted)
}
