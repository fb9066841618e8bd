//! Leaderboard printout.

use std::fmt::Write as _;

use chrono::Utc;

use hackvote_core::{MetricsSnapshot, rank_by_votes};
use hackvote_server::services::MetricsAggregator;

use super::{CommandError, connect};

/// Render a snapshot as a plain-text leaderboard.
fn render(snapshot: &MetricsSnapshot) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Total votes:      {}", snapshot.total_votes);
    let _ = writeln!(out, "Last 24 hours:    {}", snapshot.recent_votes);
    let _ = writeln!(out, "Coupon emails:    {}", snapshot.total_emails);
    let _ = writeln!(out);

    for (rank, project) in rank_by_votes(&snapshot.projects).into_iter().enumerate() {
        let _ = writeln!(
            out,
            "{:>3}. {:<32} {:<20} {:<6} {:>5}",
            rank + 1,
            project.title,
            project.team_name,
            project.category,
            project.vote_count
        );
    }

    if !snapshot.category_votes.is_empty() {
        let _ = writeln!(out);
        for (category, votes) in &snapshot.category_votes {
            let _ = writeln!(out, "{category:<6} {votes:>5}");
        }
    }

    out
}

/// Print the current leaderboard.
///
/// # Errors
///
/// Returns an error if the store cannot be read.
pub async fn show() -> Result<(), CommandError> {
    let store = connect().await?;
    let snapshot = MetricsAggregator::new(&store).snapshot(Utc::now()).await?;

    #[allow(clippy::print_stdout)]
    {
        print!("{}", render(&snapshot));
    }

    Ok(())
}
