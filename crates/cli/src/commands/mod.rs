//! CLI command implementations.
//!
//! Every command reads `HACKVOTE_DATABASE_URL` (or `DATABASE_URL`) through
//! the server's configuration loader.

pub mod emails;
pub mod migrate;
pub mod projects;
pub mod results;

use thiserror::Error;

use hackvote_server::config::{ConfigError, ServerConfig};
use hackvote_server::db::{self, PgStore, RepositoryError};
use hackvote_server::services::ProjectError;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Configuration could not be loaded.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Database connection error.
    #[error("database connection error: {0}")]
    Database(#[from] sqlx::Error),

    /// Migration failed.
    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Store operation failed.
    #[error("store error: {0}")]
    Repository(#[from] RepositoryError),

    /// File could not be read or written.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Seed file is not valid YAML for a project list.
    #[error("invalid seed file: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A project in the seed file failed validation.
    #[error("project #{index} ({title}): {source}")]
    InvalidProject {
        index: usize,
        title: String,
        source: ProjectError,
    },
}

/// Connect to the database named by the environment.
async fn connect() -> Result<PgStore, CommandError> {
    let config = ServerConfig::from_env()?;
    let pool = db::create_pool(&config.database_url).await?;
    tracing::debug!("Connected to database");
    Ok(PgStore::new(pool))
}
