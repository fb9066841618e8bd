//! Hackvote CLI - Database migrations and event management tools.
//!
//! # Usage
//!
//! ```bash
//! # Create or update the database schema
//! hackvote-cli migrate
//!
//! # Load projects from a YAML file
//! hackvote-cli projects seed projects.yaml
//!
//! # Export coupon registrations with fresh codes
//! hackvote-cli emails export --output coupons.csv
//!
//! # Print the leaderboard
//! hackvote-cli results
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "hackvote-cli")]
#[command(author, version, about = "Hackvote CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Manage projects
    Projects {
        #[command(subcommand)]
        action: ProjectsAction,
    },
    /// Manage coupon registrations
    Emails {
        #[command(subcommand)]
        action: EmailsAction,
    },
    /// Print the current leaderboard
    Results,
}

#[derive(Subcommand)]
enum ProjectsAction {
    /// Create projects from a YAML file
    Seed {
        /// Path to the YAML file
        file: PathBuf,
    },
}

#[derive(Subcommand)]
enum EmailsAction {
    /// Export registrations as CSV with fresh coupon codes
    Export {
        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() {
    // Logs go to stderr so exported CSV on stdout stays clean
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hackvote_cli=info,hackvote_server=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::CommandError> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Projects { action } => match action {
            ProjectsAction::Seed { file } => commands::projects::seed(&file).await?,
        },
        Commands::Emails { action } => match action {
            EmailsAction::Export { output } => {
                commands::emails::export(output.as_deref()).await?;
            }
        },
        Commands::Results => commands::results::show().await?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_export_output() {
        let cli = Cli::try_parse_from(["hackvote-cli", "emails", "export", "-o", "out.csv"]);
        assert!(matches!(
            cli.map(|c| c.command),
            Ok(Commands::Emails {
                action: EmailsAction::Export { output: Some(_) }
            })
        ));
    }
}
