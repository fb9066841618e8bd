//! Database migration command.
//!
//! # Usage
//!
//! ```bash
//! hackvote-cli migrate
//! ```
//!
//! Migrations live in `crates/server/migrations/` and are embedded at compile
//! time. Already-applied migrations are skipped.

use super::{CommandError, connect};

/// Run all pending migrations.
///
/// # Errors
///
/// Returns an error if the database is unreachable or a migration fails.
pub async fn run() -> Result<(), CommandError> {
    let store = connect().await?;

    tracing::info!("Running migrations...");
    sqlx::migrate!("../server/migrations")
        .run(store.pool())
        .await?;

    tracing::info!("Migrations complete!");
    Ok(())
}
