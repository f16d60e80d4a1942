//! QuestVault CLI - Database migrations and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! qv-cli migrate
//!
//! # Grant the admin claim to a user
//! qv-cli admin grant -e keeper@example.com
//!
//! # Revoke the admin claim from a user
//! qv-cli admin revoke -e keeper@example.com
//!
//! # Issue a bearer token for the role service
//! qv-cli token issue -e keeper@example.com --ttl-days 30
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `admin grant` / `admin revoke` - Manage the boolean admin claim
//! - `token issue` - Issue an opaque bearer token for the role service

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "qv-cli")]
#[command(author, version, about = "QuestVault CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Manage the admin claim on user accounts
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
    /// Manage bearer tokens for the role service
    Token {
        #[command(subcommand)]
        action: TokenAction,
    },
}

#[derive(Subcommand)]
enum AdminAction {
    /// Grant the boolean admin claim to a user
    Grant {
        /// User's email address
        #[arg(short, long)]
        email: String,
    },
    /// Revoke the boolean admin claim from a user
    Revoke {
        /// User's email address
        #[arg(short, long)]
        email: String,
    },
}

#[derive(Subcommand)]
enum TokenAction {
    /// Issue a new bearer token and print it once
    Issue {
        /// Token owner's email address
        #[arg(short, long)]
        email: String,

        /// Days until the token expires (omit for no expiry)
        #[arg(long)]
        ttl_days: Option<i32>,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Admin { action } => match action {
            AdminAction::Grant { email } => {
                commands::admin::set_admin(&email, true).await?;
            }
            AdminAction::Revoke { email } => {
                commands::admin::set_admin(&email, false).await?;
            }
        },
        Commands::Token { action } => match action {
            TokenAction::Issue { email, ttl_days } => {
                commands::token::issue(&email, ttl_days).await?;
            }
        },
    }
    Ok(())
}
