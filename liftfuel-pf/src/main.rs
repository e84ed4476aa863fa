//! liftfuel-pf - Popularity fetch binary
//!
//! Queries the review-aggregator API for every location not yet present
//! in the popularity log, disambiguates the candidate businesses down
//! to one chain per location, and appends the results to the log
//! consumed by liftfuel-dl.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use liftfuel_common::config;
use liftfuel_common::db::{init_database, ChainRegistry, TRACKED_CHAINS};
use liftfuel_pf::services::fetch_loop::{run_fetch, FetchConfig, DEFAULT_MAX_CALLS};
use liftfuel_pf::services::review_client::ReviewClient;

/// Command-line arguments for liftfuel-pf
#[derive(Parser, Debug)]
#[command(name = "liftfuel-pf")]
#[command(about = "Fast-food popularity fetcher for liftfuel")]
#[command(version)]
struct Args {
    /// Data root folder holding the database and output artifacts
    #[arg(short, long, env = "LIFTFUEL_ROOT_FOLDER")]
    root_folder: Option<PathBuf>,

    /// Popularity CSV path (defaults to <root>/fast_food_chains.csv)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Review API key; repeat the flag to rotate several keys
    #[arg(long = "api-key")]
    api_keys: Vec<String>,

    /// Hard cap on API calls for this run
    #[arg(long, default_value_t = DEFAULT_MAX_CALLS)]
    max_calls: u32,

    /// Minimum delay between API requests, in milliseconds
    #[arg(long, default_value_t = 1000)]
    pace_ms: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "liftfuel_pf=info,liftfuel_common=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    info!("Starting liftfuel-pf (popularity fetch)");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let file_settings = config::load_file_settings().unwrap_or_default();
    let root_folder = config::resolve_root_folder(args.root_folder.as_deref(), &file_settings);
    config::ensure_root_folder(&root_folder)
        .with_context(|| format!("Failed to initialize root folder {}", root_folder.display()))?;

    let api_keys = config::resolve_api_keys(&args.api_keys, &file_settings);
    if api_keys.is_empty() {
        anyhow::bail!(
            "No review API keys configured (use --api-key, {}, or the config file)",
            config::API_KEYS_ENV
        );
    }

    let db_path = config::database_path(&root_folder);
    info!("Database: {}", db_path.display());
    let db = init_database(&db_path).await?;

    let registry = ChainRegistry::new(db.clone());
    registry.ensure_registered(&TRACKED_CHAINS).await?;
    registry.ensure_sentinel().await?;

    let csv_path = args
        .output
        .unwrap_or_else(|| root_folder.join("fast_food_chains.csv"));
    info!("Popularity log: {}", csv_path.display());

    let client = ReviewClient::new(args.pace_ms).context("Failed to create review API client")?;
    let fetch_config = FetchConfig {
        api_keys,
        max_calls: args.max_calls,
    };

    let summary = run_fetch(&db, &registry, &client, &fetch_config, &csv_path).await?;
    info!("{}", summary.display_string());

    Ok(())
}
