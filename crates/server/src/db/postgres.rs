//! `PostgreSQL` implementation of [`VoteStore`].
//!
//! Queries are checked at runtime and decoded into `FromRow` row types, which
//! are converted into domain models here so corrupt rows surface as
//! [`RepositoryError::DataCorruption`] instead of panics.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use hackvote_core::{CouponEmailId, Email, ProjectCategory, ProjectId, VoteId, VoterIp};

use super::{CreationOrder, RepositoryError, VoteStore};
use crate::models::{
    CouponEmail, NewCouponEmail, NewProject, NewVote, Project, ProjectWithVotes, Vote,
};

const PROJECT_COLUMNS: &str = "p.id, p.title, p.description, p.team_name, p.category, \
     p.image_url, p.demo_url, p.github_url, p.created_at";

#[derive(sqlx::FromRow)]
struct ProjectRow {
    id: Uuid,
    title: String,
    description: String,
    team_name: String,
    category: String,
    image_url: Option<String>,
    demo_url: Option<String>,
    github_url: Option<String>,
    created_at: DateTime<Utc>,
}

impl TryFrom<ProjectRow> for Project {
    type Error = RepositoryError;

    fn try_from(row: ProjectRow) -> Result<Self, Self::Error> {
        let category = row.category.parse::<ProjectCategory>().map_err(|e| {
            RepositoryError::DataCorruption(format!("project {}: {e}", row.id))
        })?;

        Ok(Self {
            id: ProjectId::new(row.id),
            title: row.title,
            description: row.description,
            team_name: row.team_name,
            category,
            image_url: row.image_url,
            demo_url: row.demo_url,
            github_url: row.github_url,
            created_at: row.created_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct ProjectCountRow {
    #[sqlx(flatten)]
    project: ProjectRow,
    vote_count: i64,
}

#[derive(sqlx::FromRow)]
struct VoteRow {
    id: Uuid,
    project_id: Uuid,
    voter_ip: String,
    user_agent: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<VoteRow> for Vote {
    fn from(row: VoteRow) -> Self {
        Self {
            id: VoteId::new(row.id),
            project_id: ProjectId::new(row.project_id),
            voter_ip: VoterIp::from(row.voter_ip.as_str()),
            user_agent: row.user_agent,
            created_at: row.created_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct CouponEmailRow {
    id: Uuid,
    email: String,
    name: Option<String>,
    created_at: DateTime<Utc>,
}

impl TryFrom<CouponEmailRow> for CouponEmail {
    type Error = RepositoryError;

    fn try_from(row: CouponEmailRow) -> Result<Self, Self::Error> {
        let email = Email::parse(&row.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;

        Ok(Self {
            id: CouponEmailId::new(row.id),
            email,
            name: row.name,
            created_at: row.created_at,
        })
    }
}

/// Convert a `COUNT(*)` result into an unsigned count.
fn to_count(value: i64) -> Result<u64, RepositoryError> {
    u64::try_from(value)
        .map_err(|_| RepositoryError::DataCorruption(format!("negative count: {value}")))
}

const fn order_keyword(order: CreationOrder) -> &'static str {
    match order {
        CreationOrder::Ascending => "ASC",
        CreationOrder::Descending => "DESC",
    }
}

/// Postgres-backed store.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Create a store over an existing pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Get a reference to the underlying pool.
    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }

    async fn insert_vote_row(
        &self,
        vote: NewVote,
        unique_voter: bool,
    ) -> Result<Option<Vote>, RepositoryError> {
        // Constrained votes are refused when any vote for the pair exists.
        // Two racing constrained inserts both pass NOT EXISTS; the partial
        // index then lets only one of them through.
        let row = sqlx::query_as::<_, VoteRow>(
            r"
            INSERT INTO votes (id, project_id, voter_ip, user_agent, unique_voter)
            SELECT $1, $2, $3, $4, $5
            WHERE NOT $5
               OR NOT EXISTS (
                   SELECT 1 FROM votes WHERE project_id = $2 AND voter_ip = $3
               )
            ON CONFLICT (project_id, voter_ip) WHERE unique_voter DO NOTHING
            RETURNING id, project_id, voter_ip, user_agent, created_at
            ",
        )
        .bind(VoteId::generate())
        .bind(vote.project_id)
        .bind(vote.voter_ip.as_str())
        .bind(vote.user_agent.as_deref())
        .bind(unique_voter)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Vote::from))
    }
}

#[async_trait]
impl VoteStore for PgStore {
    async fn ping(&self) -> Result<(), RepositoryError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn create_project(&self, project: NewProject) -> Result<Project, RepositoryError> {
        let row = sqlx::query_as::<_, ProjectRow>(
            r"
            INSERT INTO projects AS p
                (id, title, description, team_name, category, image_url, demo_url, github_url)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING p.id, p.title, p.description, p.team_name, p.category,
                      p.image_url, p.demo_url, p.github_url, p.created_at
            ",
        )
        .bind(ProjectId::generate())
        .bind(&project.title)
        .bind(&project.description)
        .bind(&project.team_name)
        .bind(project.category.as_str())
        .bind(project.image_url.as_deref())
        .bind(project.demo_url.as_deref())
        .bind(project.github_url.as_deref())
        .fetch_one(&self.pool)
        .await?;

        Project::try_from(row)
    }

    async fn find_project(&self, id: ProjectId) -> Result<Option<Project>, RepositoryError> {
        let sql = format!("SELECT {PROJECT_COLUMNS} FROM projects p WHERE p.id = $1");
        let row = sqlx::query_as::<_, ProjectRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(Project::try_from).transpose()
    }

    async fn list_projects(&self, order: CreationOrder) -> Result<Vec<Project>, RepositoryError> {
        let sql = format!(
            "SELECT {PROJECT_COLUMNS} FROM projects p ORDER BY p.created_at {dir}, p.id {dir}",
            dir = order_keyword(order)
        );
        let rows = sqlx::query_as::<_, ProjectRow>(&sql)
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(Project::try_from).collect()
    }

    async fn projects_with_votes(
        &self,
        order: CreationOrder,
    ) -> Result<Vec<ProjectWithVotes>, RepositoryError> {
        let sql = format!(
            "SELECT {PROJECT_COLUMNS}, COUNT(v.id) AS vote_count \
             FROM projects p LEFT JOIN votes v ON v.project_id = p.id \
             GROUP BY p.id \
             ORDER BY p.created_at {dir}, p.id {dir}",
            dir = order_keyword(order)
        );
        let rows = sqlx::query_as::<_, ProjectCountRow>(&sql)
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter()
            .map(|row| {
                Ok(ProjectWithVotes {
                    project: Project::try_from(row.project)?,
                    vote_count: to_count(row.vote_count)?,
                })
            })
            .collect()
    }

    async fn insert_vote(&self, vote: NewVote) -> Result<Vote, RepositoryError> {
        // Unconstrained rows skip both guards, so a row always comes back.
        self.insert_vote_row(vote, false)
            .await?
            .ok_or_else(|| RepositoryError::DataCorruption("vote insert returned no row".into()))
    }

    async fn insert_vote_if_absent(
        &self,
        vote: NewVote,
    ) -> Result<Option<Vote>, RepositoryError> {
        self.insert_vote_row(vote, true).await
    }

    async fn count_votes(&self) -> Result<u64, RepositoryError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM votes")
            .fetch_one(&self.pool)
            .await?;
        to_count(count)
    }

    async fn count_votes_since(&self, since: DateTime<Utc>) -> Result<u64, RepositoryError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM votes WHERE created_at >= $1")
            .bind(since)
            .fetch_one(&self.pool)
            .await?;
        to_count(count)
    }

    async fn count_votes_for_project(&self, id: ProjectId) -> Result<u64, RepositoryError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM votes WHERE project_id = $1")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        to_count(count)
    }

    async fn insert_email_if_absent(
        &self,
        registration: NewCouponEmail,
    ) -> Result<Option<CouponEmail>, RepositoryError> {
        let row = sqlx::query_as::<_, CouponEmailRow>(
            r"
            INSERT INTO coupon_emails (id, email, name)
            VALUES ($1, $2, $3)
            ON CONFLICT (email) DO NOTHING
            RETURNING id, email, name, created_at
            ",
        )
        .bind(CouponEmailId::generate())
        .bind(&registration.email)
        .bind(registration.name.as_deref())
        .fetch_optional(&self.pool)
        .await?;

        row.map(CouponEmail::try_from).transpose()
    }

    async fn count_emails(&self) -> Result<u64, RepositoryError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM coupon_emails")
            .fetch_one(&self.pool)
            .await?;
        to_count(count)
    }

    async fn list_emails(&self) -> Result<Vec<CouponEmail>, RepositoryError> {
        let rows = sqlx::query_as::<_, CouponEmailRow>(
            r"
            SELECT id, email, name, created_at
            FROM coupon_emails
            ORDER BY created_at DESC, id DESC
            ",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(CouponEmail::try_from).collect()
    }

    async fn find_email(
        &self,
        id: CouponEmailId,
    ) -> Result<Option<CouponEmail>, RepositoryError> {
        let row = sqlx::query_as::<_, CouponEmailRow>(
            "SELECT id, email, name, created_at FROM coupon_emails WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(CouponEmail::try_from).transpose()
    }
}
