//! Coupon registration export.
//!
//! # Usage
//!
//! ```bash
//! # Write CSV to stdout
//! hackvote-cli emails export
//!
//! # Write CSV to a file
//! hackvote-cli emails export --output coupons.csv
//! ```

use std::io::Write as _;
use std::path::Path;

use hackvote_server::db::VoteStore;
use hackvote_server::services::coupon;

use super::{CommandError, connect};

/// Export every registration as CSV with a fresh coupon code per row.
///
/// # Errors
///
/// Returns an error if the store read or the write fails.
pub async fn export(output: Option<&Path>) -> Result<(), CommandError> {
    let store = connect().await?;
    let emails = store.list_emails().await?;
    let csv = coupon::export_csv(&emails, &mut rand::rng());

    match output {
        Some(path) => {
            tokio::fs::write(path, format!("{csv}\n")).await?;
            tracing::info!(rows = emails.len(), path = %path.display(), "Exported registrations");
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{csv}")?;
        }
    }

    Ok(())
}
