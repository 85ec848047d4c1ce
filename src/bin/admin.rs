//! CLI administration tool for file-shortener.
//!
//! Creates and inspects links and checks the database without going through
//! the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Create a link (prompts for the URL when omitted)
//! cargo run --bin admin -- link create https://example.com --code promo
//!
//! # Show a link
//! cargo run --bin admin -- link show promo
//!
//! # Show link counts
//! cargo run --bin admin -- stats
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL`: PostgreSQL connection string, or `DB_HOST`, `DB_PORT`,
//!   `DB_USER`, `DB_PASSWORD` and `DB_NAME` to build one
//! - `BASE_URL` (optional): prefix used when printing short links

use file_shortener::application::services::LinkService;
use file_shortener::config::Config;
use file_shortener::domain::entities::Link;
use file_shortener::infrastructure::persistence::PgLinkRepository;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::{Confirm, Input};
use sqlx::PgPool;
use std::sync::Arc;

/// CLI tool for managing file-shortener.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level command groups.
#[derive(Subcommand)]
enum Commands {
    /// Manage links
    Link {
        #[command(subcommand)]
        action: LinkAction,
    },

    /// Show link counts
    Stats,

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

/// Link management subcommands.
#[derive(Subcommand)]
enum LinkAction {
    /// Create a short link for a URL
    Create {
        /// URL to shorten
        url: Option<String>,

        /// Custom short code (1-16 letters or digits)
        #[arg(short, long)]
        code: Option<String>,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Show a link by its short code
    Show {
        /// Short code
        code: String,
    },
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let database_url =
        Config::load_database_url().context("Failed to load database configuration")?;
    let base_url = std::env::var("BASE_URL")
        .unwrap_or_else(|_| "http://localhost:3000".to_string())
        .trim_end_matches('/')
        .to_string();

    let pool = PgPool::connect(&database_url)
        .await
        .context("Failed to connect to database")?;

    match cli.command {
        Commands::Link { action } => handle_link_action(action, &pool, &base_url).await?,
        Commands::Stats => handle_stats(&pool).await?,
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    Ok(())
}

/// Dispatches link management commands.
async fn handle_link_action(action: LinkAction, pool: &PgPool, base_url: &str) -> Result<()> {
    let repo = Arc::new(PgLinkRepository::new(Arc::new(pool.clone())));
    let service = LinkService::new(repo);

    match action {
        LinkAction::Create { url, code, yes } => {
            create_link(&service, base_url, url, code, yes).await?;
        }
        LinkAction::Show { code } => {
            show_link(&service, base_url, &code).await?;
        }
    }

    Ok(())
}

/// Creates a link with interactive prompts.
///
/// Goes through the same allocation rules as `POST /api/id`: reserved and
/// taken codes are refused, an already shortened URL returns its link.
async fn create_link(
    service: &LinkService,
    base_url: &str,
    url: Option<String>,
    code: Option<String>,
    skip_confirm: bool,
) -> Result<()> {
    println!("{}", "🔗 Create Link".bright_blue().bold());
    println!();

    let url = match url {
        Some(u) => u,
        None => Input::new()
            .with_prompt("URL")
            .with_initial_text("https://")
            .interact_text()?,
    };

    println!("  URL:  {}", url.cyan());
    match &code {
        Some(c) => println!("  Code: {}", c.bright_yellow()),
        None => println!("  Code: {}", "(generated)".bright_black()),
    }
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Create this link?")
            .default(true)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    let link = service
        .create_link(&url, code.as_deref())
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create link: {}", e))?;

    println!();
    println!("{}", "✅ Link ready!".green().bold());
    print_link(&link, base_url);

    Ok(())
}

async fn show_link(service: &LinkService, base_url: &str, code: &str) -> Result<()> {
    let link = service
        .get_link(code)
        .await
        .map_err(|e| anyhow::anyhow!("{}", e))?;

    print_link(&link, base_url);

    Ok(())
}

fn print_link(link: &Link, base_url: &str) {
    let kind = if link.is_file { "file".magenta() } else { "url".cyan() };

    println!();
    println!(
        "  Short link: {}",
        format!("{}/{}", base_url, link.short_code)
            .bright_yellow()
            .bold()
    );
    println!("  Original:   {}", link.original.bright_white());
    println!("  Kind:       {}", kind);
    println!(
        "  Created:    {}",
        link.created_at
            .format("%Y-%m-%d %H:%M")
            .to_string()
            .bright_black()
    );
    println!();
}

/// Displays link counts by kind.
async fn handle_stats(pool: &PgPool) -> Result<()> {
    println!("{}", "📊 Statistics".bright_blue().bold());
    println!();

    let links_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM links")
        .fetch_one(pool)
        .await?;

    let files_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM links WHERE is_file")
        .fetch_one(pool)
        .await?;

    println!(
        "  Links:      {}",
        links_count.to_string().bright_green().bold()
    );
    println!(
        "  File links: {}",
        files_count.to_string().bright_green().bold()
    );
    println!();

    Ok(())
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            sqlx::query("SELECT 1").fetch_one(pool).await?;

            println!("{}", "✅ Database connection OK".green().bold());
        }
    }

    Ok(())
}
