//! Vote acceptance rule.
//!
//! A vote is accepted when its project exists and, under the strict policy,
//! the voter has no earlier constrained vote for that project. The duplicate
//! check is the store's atomic insert-if-absent, never a separate read.

use thiserror::Error;
use tracing::instrument;

use hackvote_core::{ProjectId, VotePolicy, VoterIp};

use crate::db::{RepositoryError, VoteStore};
use crate::models::{NewVote, Vote};

/// Errors that can occur while casting a vote.
#[derive(Debug, Error)]
pub enum VoteError {
    /// The request carried no project ID.
    #[error("Project ID is required")]
    MissingProjectId,

    /// The project ID is malformed or names no stored project.
    #[error("Project not found")]
    ProjectNotFound,

    /// The voter already has a vote for this project.
    #[error("You have already voted for this project")]
    DuplicateVote,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

/// A vote as submitted by a client.
#[derive(Debug, Clone)]
pub struct VoteRequest {
    pub project_id: Option<String>,
    pub user_agent: Option<String>,
    pub voter_ip: VoterIp,
}

/// Vote acceptance service.
pub struct VotingService<'a> {
    store: &'a dyn VoteStore,
    policy: VotePolicy,
}

impl<'a> VotingService<'a> {
    /// Create a voting service for the given store and policy.
    #[must_use]
    pub const fn new(store: &'a dyn VoteStore, policy: VotePolicy) -> Self {
        Self { store, policy }
    }

    /// Validate and record a vote.
    ///
    /// # Errors
    ///
    /// Returns `VoteError::MissingProjectId` if no project ID was given.
    /// Returns `VoteError::ProjectNotFound` if the project does not exist.
    /// Returns `VoteError::DuplicateVote` under the strict policy when the
    /// voter already voted for the project.
    /// Returns `VoteError::Repository` for storage failures.
    #[instrument(skip(self, request), fields(policy = %self.policy, voter_ip = %request.voter_ip))]
    pub async fn cast(&self, request: VoteRequest) -> Result<Vote, VoteError> {
        let raw_id = request
            .project_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .ok_or(VoteError::MissingProjectId)?;

        let project_id: ProjectId = raw_id.parse().map_err(|_| VoteError::ProjectNotFound)?;

        if self.store.find_project(project_id).await?.is_none() {
            return Err(VoteError::ProjectNotFound);
        }

        let vote = NewVote {
            project_id,
            voter_ip: request.voter_ip,
            user_agent: request
                .user_agent
                .map(|ua| ua.trim().to_owned())
                .filter(|ua| !ua.is_empty()),
        };

        let recorded = match self.policy {
            VotePolicy::Strict => self
                .store
                .insert_vote_if_absent(vote)
                .await
                .map_err(map_insert_error)?
                .ok_or(VoteError::DuplicateVote)?,
            VotePolicy::Permissive => self
                .store
                .insert_vote(vote)
                .await
                .map_err(map_insert_error)?,
        };

        tracing::info!(
            vote_id = %recorded.id,
            project_id = %recorded.project_id,
            "Vote recorded"
        );
        Ok(recorded)
    }
}

/// The project can vanish between lookup and insert; the store reports that
/// as a foreign-key miss.
fn map_insert_error(err: RepositoryError) -> VoteError {
    match err {
        RepositoryError::NotFound => VoteError::ProjectNotFound,
        RepositoryError::Conflict(_) => VoteError::DuplicateVote,
        other => VoteError::Repository(other),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use hackvote_core::ProjectCategory;

    use super::*;
    use crate::db::MemoryStore;
    use crate::models::NewProject;

    async fn store_with_project() -> (MemoryStore, ProjectId) {
        let store = MemoryStore::new();
        let project = store
            .create_project(NewProject {
                title: "Oyster Watch".to_owned(),
                description: "Water quality alerts for oyster farms".to_owned(),
                team_name: "Shellfish".to_owned(),
                category: ProjectCategory::Ai,
                image_url: None,
                demo_url: None,
                github_url: None,
            })
            .await
            .unwrap();
        (store, project.id)
    }

    fn request(project_id: Option<String>, ip: &str) -> VoteRequest {
        VoteRequest {
            project_id,
            user_agent: Some("Mozilla/5.0".to_owned()),
            voter_ip: VoterIp::from(ip),
        }
    }

    #[tokio::test]
    async fn test_strict_rejects_second_vote_from_same_ip() {
        let (store, id) = store_with_project().await;
        let service = VotingService::new(&store, VotePolicy::Strict);

        service
            .cast(request(Some(id.to_string()), "10.1.1.1"))
            .await
            .unwrap();
        let err = service
            .cast(request(Some(id.to_string()), "10.1.1.1"))
            .await
            .unwrap_err();

        assert!(matches!(err, VoteError::DuplicateVote));
        assert_eq!(store.count_votes().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_strict_counts_votes_cast_under_permissive() {
        let (store, id) = store_with_project().await;

        VotingService::new(&store, VotePolicy::Permissive)
            .cast(request(Some(id.to_string()), "10.1.1.1"))
            .await
            .unwrap();
        let err = VotingService::new(&store, VotePolicy::Strict)
            .cast(request(Some(id.to_string()), "10.1.1.1"))
            .await
            .unwrap_err();

        assert!(matches!(err, VoteError::DuplicateVote));
        assert_eq!(store.count_votes().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_strict_allows_other_ips() {
        let (store, id) = store_with_project().await;
        let service = VotingService::new(&store, VotePolicy::Strict);

        service
            .cast(request(Some(id.to_string()), "10.1.1.1"))
            .await
            .unwrap();
        service
            .cast(request(Some(id.to_string()), "10.1.1.2"))
            .await
            .unwrap();

        assert_eq!(store.count_votes().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_permissive_records_every_vote() {
        let (store, id) = store_with_project().await;
        let service = VotingService::new(&store, VotePolicy::Permissive);

        for _ in 0..4 {
            service
                .cast(request(Some(id.to_string()), "10.1.1.1"))
                .await
                .unwrap();
        }

        assert_eq!(store.count_votes_for_project(id).await.unwrap(), 4);
    }

    #[tokio::test]
    async fn test_missing_project_id() {
        let (store, _) = store_with_project().await;
        let service = VotingService::new(&store, VotePolicy::Strict);

        for project_id in [None, Some(String::new()), Some("   ".to_owned())] {
            let err = service.cast(request(project_id, "10.1.1.1")).await.unwrap_err();
            assert!(matches!(err, VoteError::MissingProjectId));
        }
    }

    #[tokio::test]
    async fn test_unknown_and_malformed_projects_are_not_found() {
        let (store, _) = store_with_project().await;
        let service = VotingService::new(&store, VotePolicy::Strict);

        for project_id in [ProjectId::generate().to_string(), "project-42".to_owned()] {
            let err = service
                .cast(request(Some(project_id), "10.1.1.1"))
                .await
                .unwrap_err();
            assert!(matches!(err, VoteError::ProjectNotFound));
        }
        assert_eq!(store.count_votes().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_blank_user_agent_is_dropped() {
        let (store, id) = store_with_project().await;
        let service = VotingService::new(&store, VotePolicy::Strict);

        let vote = service
            .cast(VoteRequest {
                project_id: Some(id.to_string()),
                user_agent: Some("  ".to_owned()),
                voter_ip: VoterIp::unknown(),
            })
            .await
            .unwrap();

        assert!(vote.user_agent.is_none());
        assert!(vote.voter_ip.is_unknown());
    }

    #[tokio::test]
    async fn test_uninitialized_store_surfaces_repository_error() {
        let store = MemoryStore::uninitialized();
        let service = VotingService::new(&store, VotePolicy::Strict);

        let err = service
            .cast(request(Some(ProjectId::generate().to_string()), "10.1.1.1"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            VoteError::Repository(RepositoryError::Uninitialized(_))
        ));
    }
}
