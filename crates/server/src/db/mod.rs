//! Persistence for projects, votes and coupon registrations.
//!
//! # Tables
//!
//! - `projects` - Hackathon submissions
//! - `votes` - Append-only vote log; strict inserts are refused when any
//!   vote for the pair exists, backed by a partial unique index on
//!   `(project_id, voter_ip) WHERE unique_voter`
//! - `coupon_emails` - Coupon registrations, unique on `email`
//!
//! The store is reached through the [`VoteStore`] trait so handlers never
//! depend on a concrete backend. [`PgStore`] is the production backend and
//! [`MemoryStore`] backs tests and local experiments.
//!
//! # Migrations
//!
//! Migrations are stored in `crates/server/migrations/` and run via:
//! ```bash
//! cargo run -p hackvote-cli -- migrate
//! ```

pub mod memory;
pub mod postgres;

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use hackvote_core::{CouponEmailId, ProjectId};

use crate::models::{
    CouponEmail, NewCouponEmail, NewProject, NewVote, Project, ProjectWithVotes, Vote,
};

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// SQLSTATE raised by Postgres when a referenced table does not exist.
const UNDEFINED_TABLE: &str = "42P01";

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(sqlx::Error),

    /// The backing tables have not been created yet.
    #[error("store not initialized: {0}")]
    Uninitialized(String),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// A referenced entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique email).
    #[error("constraint violation: {0}")]
    Conflict(String),

    /// The backend cannot perform the requested operation.
    #[error("unsupported operation: {0}")]
    Unsupported(&'static str),
}

impl From<sqlx::Error> for RepositoryError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(ref db_err) = err {
            if db_err.code().as_deref() == Some(UNDEFINED_TABLE) {
                return Self::Uninitialized(db_err.message().to_owned());
            }
            if db_err.is_unique_violation() {
                return Self::Conflict(db_err.constraint().unwrap_or("unique").to_owned());
            }
            if db_err.is_foreign_key_violation() {
                return Self::NotFound;
            }
        }
        Self::Database(err)
    }
}

/// Ordering of listings by creation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreationOrder {
    /// Oldest first.
    Ascending,
    /// Newest first.
    Descending,
}

/// Repository capability for the voting service.
///
/// Every operation is a single round trip to the backend; callers get no
/// atomicity across calls.
#[async_trait]
pub trait VoteStore: Send + Sync {
    /// Verify the backend is reachable.
    async fn ping(&self) -> Result<(), RepositoryError>;

    /// Insert a new project.
    async fn create_project(&self, project: NewProject) -> Result<Project, RepositoryError>;

    /// Look up a project by ID.
    async fn find_project(&self, id: ProjectId) -> Result<Option<Project>, RepositoryError>;

    /// List all projects by creation time.
    async fn list_projects(&self, order: CreationOrder) -> Result<Vec<Project>, RepositoryError>;

    /// List all projects with their vote counts in one grouped read.
    ///
    /// Backends that cannot count in a single read return
    /// [`RepositoryError::Unsupported`]; callers then fall back to
    /// [`VoteStore::count_votes_for_project`].
    async fn projects_with_votes(
        &self,
        order: CreationOrder,
    ) -> Result<Vec<ProjectWithVotes>, RepositoryError> {
        let _ = order;
        Err(RepositoryError::Unsupported("grouped vote counts"))
    }

    /// Append a vote unconditionally.
    ///
    /// The vote still counts as an existing vote for later calls to
    /// [`insert_vote_if_absent`](Self::insert_vote_if_absent).
    async fn insert_vote(&self, vote: NewVote) -> Result<Vote, RepositoryError>;

    /// Append a vote unless the voter already has any vote for the project.
    /// Returns `None` when the vote was a duplicate.
    ///
    /// Concurrent calls for the same pair accept at most one vote.
    async fn insert_vote_if_absent(&self, vote: NewVote)
    -> Result<Option<Vote>, RepositoryError>;

    /// Count every stored vote.
    async fn count_votes(&self) -> Result<u64, RepositoryError>;

    /// Count votes created at or after `since`.
    async fn count_votes_since(&self, since: DateTime<Utc>) -> Result<u64, RepositoryError>;

    /// Count votes referencing one project.
    async fn count_votes_for_project(&self, id: ProjectId) -> Result<u64, RepositoryError>;

    /// Insert a coupon registration unless the email is already registered.
    /// Returns `None` for a duplicate; the existing record is left untouched.
    async fn insert_email_if_absent(
        &self,
        registration: NewCouponEmail,
    ) -> Result<Option<CouponEmail>, RepositoryError>;

    /// Count coupon registrations.
    async fn count_emails(&self) -> Result<u64, RepositoryError>;

    /// List coupon registrations, newest first.
    async fn list_emails(&self) -> Result<Vec<CouponEmail>, RepositoryError>;

    /// Look up a coupon registration by ID.
    async fn find_email(&self, id: CouponEmailId)
    -> Result<Option<CouponEmail>, RepositoryError>;
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
