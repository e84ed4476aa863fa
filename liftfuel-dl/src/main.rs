//! liftfuel-dl - Data load binary
//!
//! Loads the popularity log and the nutrition CSV into the relational
//! store, joining rows against the chain registry and the location
//! registry. Builds the registry (tracked chains + "Other" sentinel)
//! before any record insertion.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use liftfuel_common::config;
use liftfuel_common::db::{init_database, ChainRegistry, TRACKED_CHAINS};
use liftfuel_dl::pipeline::{load_nutrition, load_popularity};

/// Command-line arguments for liftfuel-dl
#[derive(Parser, Debug)]
#[command(name = "liftfuel-dl")]
#[command(about = "CSV-to-SQLite loader for liftfuel")]
#[command(version)]
struct Args {
    /// Data root folder holding the database and input artifacts
    #[arg(short, long, env = "LIFTFUEL_ROOT_FOLDER")]
    root_folder: Option<PathBuf>,

    /// Popularity CSV to load (defaults to <root>/fast_food_chains.csv
    /// when that file exists)
    #[arg(long)]
    popularity: Option<PathBuf>,

    /// Nutrition CSV to load, long or wide form (defaults to
    /// <root>/restaurant_data.csv when that file exists)
    #[arg(long)]
    nutrition: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "liftfuel_dl=info,liftfuel_common=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    info!("Starting liftfuel-dl (data load)");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let file_settings = config::load_file_settings().unwrap_or_default();
    let root_folder = config::resolve_root_folder(args.root_folder.as_deref(), &file_settings);
    config::ensure_root_folder(&root_folder)
        .with_context(|| format!("Failed to initialize root folder {}", root_folder.display()))?;

    let db_path = config::database_path(&root_folder);
    info!("Database: {}", db_path.display());
    let db = init_database(&db_path).await?;

    // Registry before any record insertion
    let registry = ChainRegistry::new(db.clone());
    registry.ensure_registered(&TRACKED_CHAINS).await?;
    registry.ensure_sentinel().await?;
    info!("Chain registry ready");

    let popularity_path = args
        .popularity
        .or_else(|| existing(root_folder.join("fast_food_chains.csv")));
    let nutrition_path = args
        .nutrition
        .or_else(|| existing(root_folder.join("restaurant_data.csv")));

    if popularity_path.is_none() && nutrition_path.is_none() {
        anyhow::bail!("Nothing to load: no popularity or nutrition CSV found");
    }

    if let Some(path) = popularity_path {
        info!("Loading popularity data from {}", path.display());
        let summary = load_popularity(&db, &registry, &path).await?;
        info!("Popularity: {}", summary.display_string());
    }

    if let Some(path) = nutrition_path {
        info!("Loading nutrition data from {}", path.display());
        let summary = load_nutrition(&db, &registry, &path).await?;
        info!("Nutrition: {}", summary.display_string());
    }

    Ok(())
}

fn existing(path: PathBuf) -> Option<PathBuf> {
    path.exists().then_some(path)
}
