//! Location identity lookup
//!
//! Locations are registered by the external demographics ingest; this
//! module only resolves them by their derived `"{city}, {state}"` key
//! and fails loudly when a referenced location has no registered row.

use crate::db::models::LocationIdentity;
use crate::{Error, Result};
use sqlx::SqlitePool;

/// Resolve a location by its derived key (case-sensitive exact match)
pub async fn resolve_location(db: &SqlitePool, key: &str) -> Result<LocationIdentity> {
    let row: Option<(i64, String, String)> = sqlx::query_as(
        "SELECT id, city, state FROM locations WHERE city || ', ' || state = ?",
    )
    .bind(key)
    .fetch_optional(db)
    .await?;

    row.map(|(id, city, state)| LocationIdentity { id, city, state })
        .ok_or_else(|| Error::NotFound(format!("location '{}'", key)))
}

/// All derived location keys known to the store
pub async fn all_location_keys(db: &SqlitePool) -> Result<Vec<String>> {
    let keys = sqlx::query_scalar("SELECT city || ', ' || state FROM locations ORDER BY id")
        .fetch_all(db)
        .await?;

    Ok(keys)
}
