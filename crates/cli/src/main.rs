//! Accounts CLI - database migrations and demo data.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! accounts-cli migrate
//!
//! # Insert 25 demo customers and 25 demo users
//! accounts-cli seed --count 25
//! ```
//!
//! # Environment Variables
//!
//! - `ACCOUNTS_DATABASE_URL` (or `DATABASE_URL`) - `PostgreSQL` connection string

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

use commands::CommandError;

#[derive(Parser)]
#[command(name = "accounts-cli")]
#[command(author, version, about = "Accounts API CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Insert demo customers and users
    Seed {
        /// Records to insert per entity kind
        #[arg(short, long, default_value_t = 10)]
        count: usize,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), CommandError> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Seed { count } => {
            let summary = commands::seed::run(count).await?;
            tracing::info!(
                inserted = summary.inserted,
                skipped = summary.skipped,
                "Seeding complete"
            );
        }
    }
    Ok(())
}
