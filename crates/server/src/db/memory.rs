//! In-memory implementation of [`VoteStore`].
//!
//! All tables live behind one `RwLock`, so every insert-if-absent runs under
//! the write lock and is atomic with respect to concurrent requests. Used by
//! the HTTP tests and for running the service without a database.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use hackvote_core::{CouponEmailId, ProjectId, VoterIp};

use super::{CreationOrder, RepositoryError, VoteStore};
use crate::models::{
    CouponEmail, NewCouponEmail, NewProject, NewVote, Project, ProjectWithVotes, Vote,
};

#[derive(Debug, Default)]
struct Tables {
    projects: Vec<Project>,
    votes: Vec<Vote>,
    emails: Vec<CouponEmail>,
}

impl Tables {
    fn has_project(&self, id: ProjectId) -> bool {
        self.projects.iter().any(|p| p.id == id)
    }

    fn votes_for(&self, id: ProjectId) -> u64 {
        self.votes.iter().filter(|v| v.project_id == id).count() as u64
    }

    fn sorted_projects(&self, order: CreationOrder) -> Vec<Project> {
        let mut projects = self.projects.clone();
        // Stable sort keeps insertion order for identical timestamps.
        projects.sort_by_key(|p| p.created_at);
        if order == CreationOrder::Descending {
            projects.reverse();
        }
        projects
    }
}

/// Store that keeps every table in process memory.
#[derive(Debug)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
    grouped_counts: bool,
    initialized: bool,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    /// Create an empty, initialized store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(Tables::default()),
            grouped_counts: true,
            initialized: true,
        }
    }

    /// Create a store that rejects grouped counting, forcing the metrics
    /// aggregator onto its per-project fallback.
    #[must_use]
    pub fn without_grouped_counts() -> Self {
        Self {
            grouped_counts: false,
            ..Self::new()
        }
    }

    /// Create a store whose tables do not exist: every operation fails with
    /// [`RepositoryError::Uninitialized`].
    #[must_use]
    pub fn uninitialized() -> Self {
        Self {
            initialized: false,
            ..Self::new()
        }
    }

    /// Append a vote with an explicit creation time, bypassing the
    /// one-vote-per-voter constraint. Intended for fixtures.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::NotFound`] if the project does not exist.
    pub async fn seed_vote(
        &self,
        project_id: ProjectId,
        voter_ip: &str,
        created_at: DateTime<Utc>,
    ) -> Result<Vote, RepositoryError> {
        self.check_initialized()?;
        let mut tables = self.tables.write().await;
        if !tables.has_project(project_id) {
            return Err(RepositoryError::NotFound);
        }

        let vote = NewVote {
            project_id,
            voter_ip: VoterIp::from(voter_ip),
            user_agent: None,
        }
        .into_vote(created_at);
        tables.votes.push(vote.clone());
        Ok(vote)
    }

    fn check_initialized(&self) -> Result<(), RepositoryError> {
        if self.initialized {
            Ok(())
        } else {
            Err(RepositoryError::Uninitialized(
                "in-memory tables were never created".to_owned(),
            ))
        }
    }
}

#[async_trait]
impl VoteStore for MemoryStore {
    async fn ping(&self) -> Result<(), RepositoryError> {
        Ok(())
    }

    async fn create_project(&self, project: NewProject) -> Result<Project, RepositoryError> {
        self.check_initialized()?;
        let project = project.into_project(Utc::now());
        self.tables.write().await.projects.push(project.clone());
        Ok(project)
    }

    async fn find_project(&self, id: ProjectId) -> Result<Option<Project>, RepositoryError> {
        self.check_initialized()?;
        let tables = self.tables.read().await;
        Ok(tables.projects.iter().find(|p| p.id == id).cloned())
    }

    async fn list_projects(&self, order: CreationOrder) -> Result<Vec<Project>, RepositoryError> {
        self.check_initialized()?;
        Ok(self.tables.read().await.sorted_projects(order))
    }

    async fn projects_with_votes(
        &self,
        order: CreationOrder,
    ) -> Result<Vec<ProjectWithVotes>, RepositoryError> {
        self.check_initialized()?;
        if !self.grouped_counts {
            return Err(RepositoryError::Unsupported("grouped vote counts"));
        }

        let tables = self.tables.read().await;
        Ok(tables
            .sorted_projects(order)
            .into_iter()
            .map(|project| {
                let vote_count = tables.votes_for(project.id);
                ProjectWithVotes {
                    project,
                    vote_count,
                }
            })
            .collect())
    }

    async fn insert_vote(&self, vote: NewVote) -> Result<Vote, RepositoryError> {
        self.check_initialized()?;
        let mut tables = self.tables.write().await;
        if !tables.has_project(vote.project_id) {
            return Err(RepositoryError::NotFound);
        }

        let vote = vote.into_vote(Utc::now());
        tables.votes.push(vote.clone());
        Ok(vote)
    }

    async fn insert_vote_if_absent(
        &self,
        vote: NewVote,
    ) -> Result<Option<Vote>, RepositoryError> {
        self.check_initialized()?;
        let mut tables = self.tables.write().await;
        if !tables.has_project(vote.project_id) {
            return Err(RepositoryError::NotFound);
        }

        // Any earlier vote for the pair counts, however it was recorded.
        let duplicate = tables
            .votes
            .iter()
            .any(|v| v.project_id == vote.project_id && v.voter_ip == vote.voter_ip);
        if duplicate {
            return Ok(None);
        }

        let vote = vote.into_vote(Utc::now());
        tables.votes.push(vote.clone());
        Ok(Some(vote))
    }

    async fn count_votes(&self) -> Result<u64, RepositoryError> {
        self.check_initialized()?;
        Ok(self.tables.read().await.votes.len() as u64)
    }

    async fn count_votes_since(&self, since: DateTime<Utc>) -> Result<u64, RepositoryError> {
        self.check_initialized()?;
        let tables = self.tables.read().await;
        Ok(tables
            .votes
            .iter()
            .filter(|vote| vote.created_at >= since)
            .count() as u64)
    }

    async fn count_votes_for_project(&self, id: ProjectId) -> Result<u64, RepositoryError> {
        self.check_initialized()?;
        Ok(self.tables.read().await.votes_for(id))
    }

    async fn insert_email_if_absent(
        &self,
        registration: NewCouponEmail,
    ) -> Result<Option<CouponEmail>, RepositoryError> {
        self.check_initialized()?;
        let mut tables = self.tables.write().await;
        if tables.emails.iter().any(|e| e.email == registration.email) {
            return Ok(None);
        }

        let registration = registration.into_registration(Utc::now());
        tables.emails.push(registration.clone());
        Ok(Some(registration))
    }

    async fn count_emails(&self) -> Result<u64, RepositoryError> {
        self.check_initialized()?;
        Ok(self.tables.read().await.emails.len() as u64)
    }

    async fn list_emails(&self) -> Result<Vec<CouponEmail>, RepositoryError> {
        self.check_initialized()?;
        let mut emails = self.tables.read().await.emails.clone();
        emails.sort_by_key(|e| e.created_at);
        emails.reverse();
        Ok(emails)
    }

    async fn find_email(
        &self,
        id: CouponEmailId,
    ) -> Result<Option<CouponEmail>, RepositoryError> {
        self.check_initialized()?;
        let tables = self.tables.read().await;
        Ok(tables.emails.iter().find(|e| e.id == id).cloned())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Duration;
    use hackvote_core::{Email, ProjectCategory};

    use super::*;

    fn new_project(title: &str) -> NewProject {
        NewProject {
            title: title.to_owned(),
            description: "Tide sensor network".to_owned(),
            team_name: "Umi".to_owned(),
            category: ProjectCategory::Iot,
            image_url: None,
            demo_url: None,
            github_url: None,
        }
    }

    fn vote_from(project_id: ProjectId, ip: &str) -> NewVote {
        NewVote {
            project_id,
            voter_ip: VoterIp::from(ip),
            user_agent: None,
        }
    }

    #[tokio::test]
    async fn test_insert_if_absent_rejects_second_vote() {
        let store = MemoryStore::new();
        let project = store.create_project(new_project("Tide")).await.unwrap();

        let first = store
            .insert_vote_if_absent(vote_from(project.id, "10.0.0.1"))
            .await
            .unwrap();
        let second = store
            .insert_vote_if_absent(vote_from(project.id, "10.0.0.1"))
            .await
            .unwrap();

        assert!(first.is_some());
        assert!(second.is_none());
        assert_eq!(store.count_votes().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_unconstrained_votes_block_constrained_ones() {
        let store = MemoryStore::new();
        let project = store.create_project(new_project("Tide")).await.unwrap();
        let earlier = Utc::now() - Duration::hours(1);

        store
            .insert_vote(vote_from(project.id, "10.0.0.1"))
            .await
            .unwrap();
        store.seed_vote(project.id, "10.0.0.2", earlier).await.unwrap();
        let after_insert = store
            .insert_vote_if_absent(vote_from(project.id, "10.0.0.1"))
            .await
            .unwrap();
        let after_seed = store
            .insert_vote_if_absent(vote_from(project.id, "10.0.0.2"))
            .await
            .unwrap();

        assert!(after_insert.is_none());
        assert!(after_seed.is_none());
        assert_eq!(store.count_votes_for_project(project.id).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_vote_for_missing_project() {
        let store = MemoryStore::new();
        let err = store
            .insert_vote(vote_from(ProjectId::generate(), "10.0.0.1"))
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound));
    }

    #[tokio::test]
    async fn test_count_since_is_inclusive() {
        let store = MemoryStore::new();
        let project = store.create_project(new_project("Tide")).await.unwrap();
        let cutoff = Utc::now() - Duration::hours(24);

        store.seed_vote(project.id, "a", cutoff).await.unwrap();
        store
            .seed_vote(project.id, "b", cutoff - Duration::seconds(1))
            .await
            .unwrap();

        assert_eq!(store.count_votes_since(cutoff).await.unwrap(), 1);
        assert_eq!(store.count_votes().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_email_uniqueness() {
        let store = MemoryStore::new();
        let registration = NewCouponEmail {
            email: Email::parse("fan@example.com").unwrap(),
            name: None,
        };

        assert!(
            store
                .insert_email_if_absent(registration.clone())
                .await
                .unwrap()
                .is_some()
        );
        assert!(
            store
                .insert_email_if_absent(registration)
                .await
                .unwrap()
                .is_none()
        );
        assert_eq!(store.count_emails().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_listing_order() {
        let store = MemoryStore::new();
        store.create_project(new_project("first")).await.unwrap();
        store.create_project(new_project("second")).await.unwrap();

        let ascending = store.list_projects(CreationOrder::Ascending).await.unwrap();
        let descending = store.list_projects(CreationOrder::Descending).await.unwrap();

        let titles = |ps: &[Project]| ps.iter().map(|p| p.title.clone()).collect::<Vec<_>>();
        assert_eq!(titles(&ascending), vec!["first", "second"]);
        assert_eq!(titles(&descending), vec!["second", "first"]);
    }

    #[tokio::test]
    async fn test_uninitialized_store_fails_every_operation() {
        let store = MemoryStore::uninitialized();
        assert!(matches!(
            store.count_votes().await,
            Err(RepositoryError::Uninitialized(_))
        ));
        assert!(matches!(
            store.list_emails().await,
            Err(RepositoryError::Uninitialized(_))
        ));
    }

    #[tokio::test]
    async fn test_grouped_counts_can_be_disabled() {
        let store = MemoryStore::without_grouped_counts();
        assert!(matches!(
            store.projects_with_votes(CreationOrder::Ascending).await,
            Err(RepositoryError::Unsupported(_))
        ));
    }
}
