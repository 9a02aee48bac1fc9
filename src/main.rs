use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::info;

use wayfarer::config::Config;
use wayfarer::db::models::UserId;
use wayfarer::db::Database;
use wayfarer::likes::LikeRegistry;
use wayfarer::output::terminal;

/// Wayfarer: travel location recommendations from the places you liked.
#[derive(Parser)]
#[command(name = "wayfarer", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the database
    Init,

    /// Import locations from a CSV export
    Import {
        /// Path to the CSV file (Name, Zone, State, City, Entrance Fee in INR, Type)
        csv: PathBuf,
    },

    /// List locations
    Locations {
        /// Show at most this many locations
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Like a location (fails if it's already liked)
    Like {
        /// The user liking the location
        #[arg(long)]
        user: String,
        location_id: i64,
    },

    /// Like a location, or unlike it if it's already liked
    Toggle {
        #[arg(long)]
        user: String,
        location_id: i64,
    },

    /// Check whether a user likes a location
    IsLiked {
        #[arg(long)]
        user: String,
        location_id: i64,
    },

    /// List a user's liked locations
    Liked {
        #[arg(long)]
        user: String,
    },

    /// Show recommendations for a user
    Suggest {
        #[arg(long)]
        user: String,
    },

    /// Recompute and store recommendations for a user
    Refresh {
        #[arg(long)]
        user: String,
    },

    /// Show system status (DB stats)
    Status,

    /// Serve the JSON API
    #[cfg(feature = "web")]
    Serve {
        /// Port to listen on (defaults to WAYFARER_PORT or 8000)
        #[arg(long)]
        port: Option<u16>,

        /// Address to bind (defaults to WAYFARER_BIND or 127.0.0.1)
        #[arg(long)]
        bind: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Set up structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("wayfarer=info")),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::load()?;

    match cli.command {
        Commands::Init => {
            info!("Initializing Wayfarer database...");
            let db = wayfarer::db::initialize_sqlite(&config.db_path)?;
            let table_count = db.table_count().await?;
            println!("Database initialized at: {}", config.db_path);
            println!("Tables created: {table_count}");
            println!("\nNext step: cargo run -- import <locations.csv>");
        }

        Commands::Import { csv } => {
            let db = wayfarer::db::initialize_sqlite(&config.db_path)?;
            let summary = wayfarer::import::import_csv_file(&db, &csv).await?;
            println!(
                "{} Imported {} locations from {}",
                "✓".green(),
                summary.imported,
                csv.display()
            );
        }

        Commands::Locations { limit } => {
            let db = wayfarer::db::open_sqlite(&config.db_path)?;
            let mut locations = db.list_locations().await?;
            if let Some(limit) = limit {
                locations.truncate(limit);
            }
            terminal::display_locations("Locations", &locations);
        }

        Commands::Like { user, location_id } => {
            let (registry, user) = registry_for(&config, user)?;
            registry.like(&user, location_id).await?;
            println!("{} {user} likes location {location_id}", "✓".green());
        }

        Commands::Toggle { user, location_id } => {
            let (registry, user) = registry_for(&config, user)?;
            let outcome = registry.toggle(&user, location_id).await?;
            println!(
                "Location {location_id} is now {} by {user}",
                terminal::like_state(outcome.liked)
            );
        }

        Commands::IsLiked { user, location_id } => {
            let (registry, user) = registry_for(&config, user)?;
            let liked = registry.is_liked(&user, location_id).await?;
            println!(
                "Location {location_id}: {}",
                terminal::like_state(liked)
            );
        }

        Commands::Liked { user } => {
            let (registry, user) = registry_for(&config, user)?;
            let liked = registry.liked_locations(&user).await?;
            terminal::display_liked(user.as_str(), &liked);
        }

        Commands::Suggest { user } => {
            let (registry, user) = registry_for(&config, user)?;
            let locations = registry.store().read(&user).await?;
            terminal::display_locations(&format!("Suggestions for {user}"), &locations);
        }

        Commands::Refresh { user } => {
            let (registry, user) = registry_for(&config, user)?;
            let outcome = registry.store().refresh(&user).await?;
            terminal::display_refresh(user.as_str(), &outcome);
        }

        Commands::Status => {
            if !wayfarer::status::is_initialized(&config.db_path) {
                println!("Database: not initialized");
                println!("\nRun `wayfarer init` to set up the database.");
                return Ok(());
            }
            let db = wayfarer::db::open_sqlite(&config.db_path)?;
            wayfarer::status::show(&db, &config.db_path).await?;
        }

        #[cfg(feature = "web")]
        Commands::Serve { port, bind } => {
            let db = wayfarer::db::initialize_sqlite(&config.db_path)?;
            let state = wayfarer::web::AppState::new(db, config.recommend_settings());
            let port = port.unwrap_or(config.port);
            let bind = bind.unwrap_or_else(|| config.bind.clone());
            wayfarer::web::run_server(state, port, &bind).await?;
        }
    }

    Ok(())
}

/// Open the database and build a like registry for one user.
fn registry_for(config: &Config, user: String) -> Result<(LikeRegistry, UserId)> {
    if user.trim().is_empty() {
        anyhow::bail!("--user must not be empty");
    }
    let db: Arc<dyn Database> = wayfarer::db::open_sqlite(&config.db_path)?;
    let registry = LikeRegistry::new(db, config.recommend_settings());
    Ok((registry, UserId::new(user.trim())))
}
