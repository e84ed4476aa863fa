//! Database initialization
//!
//! Opens (or creates) the liftfuel SQLite database and creates the
//! schema idempotently. Safe to call on every startup.

use crate::Result;
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use std::path::Path;
use tracing::info;

/// Initialize database connection and create tables if needed
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    // Create parent directory if it doesn't exist
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    // Use sqlite options to create database if it doesn't exist
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(&db_url)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    // Enable foreign keys
    sqlx::query("PRAGMA foreign_keys = ON").execute(&pool).await?;

    // WAL keeps the artifact readable while a load is in progress
    sqlx::query("PRAGMA journal_mode = WAL").execute(&pool).await?;

    sqlx::query("PRAGMA busy_timeout = 5000").execute(&pool).await?;

    // Schema creation (idempotent - safe to call multiple times)
    create_chains_table(&pool).await?;
    create_locations_table(&pool).await?;
    create_chain_popularity_table(&pool).await?;
    create_nutrition_facts_table(&pool).await?;

    Ok(pool)
}

/// Create the chain registry table
///
/// Rows are inserted by `ChainRegistry`; the reserved "Other" entry
/// lives at id 999.
async fn create_chains_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS chains (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL UNIQUE
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Create the location registry table
///
/// Populated by the external demographics ingest; created here so a
/// fresh database is usable end to end.
async fn create_locations_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS locations (
            id INTEGER PRIMARY KEY,
            city TEXT NOT NULL,
            state TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Create the popularity records table
async fn create_chain_popularity_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS chain_popularity (
            id INTEGER PRIMARY KEY,
            location_id INTEGER NOT NULL REFERENCES locations(id),
            name TEXT NOT NULL,
            chain_id INTEGER NOT NULL REFERENCES chains(id),
            review_count INTEGER NOT NULL,
            marker INTEGER NOT NULL DEFAULT 1,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
            CHECK (review_count >= 0)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_chain_popularity_location ON chain_popularity(location_id)")
        .execute(pool)
        .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_chain_popularity_chain ON chain_popularity(chain_id)")
        .execute(pool)
        .await?;

    Ok(())
}

/// Create the nutrition facts table
async fn create_nutrition_facts_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS nutrition_facts (
            id INTEGER PRIMARY KEY,
            restaurant TEXT NOT NULL,
            chain_id INTEGER REFERENCES chains(id),
            food TEXT NOT NULL,
            protein REAL,
            fat REAL,
            carbohydrates REAL,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_nutrition_facts_chain ON nutrition_facts(chain_id)")
        .execute(pool)
        .await?;

    Ok(())
}
