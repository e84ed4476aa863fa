//! Canonical chain registry
//!
//! Fixed enumeration of the tracked fast-food chains plus the reserved
//! catch-all "Other" identity. The registry owns no state beyond the
//! injected database handle; every mutation is persisted immediately.

use crate::db::models::ChainIdentity;
use crate::{Error, Result};
use sqlx::SqlitePool;

/// Reserved id for the catch-all "Other" identity. Auto-assigned ids
/// start at 1 and never reach it for the tracked chain set.
pub const SENTINEL_CHAIN_ID: i64 = 999;

/// Name of the catch-all identity
pub const SENTINEL_CHAIN_NAME: &str = "Other";

/// The chains tracked by the popularity pipeline
pub const TRACKED_CHAINS: [&str; 10] = [
    "McDonald's",
    "Burger King",
    "KFC",
    "Pizza Hut",
    "In-N-Out Burger",
    "Subway",
    "Wendy's",
    "Taco Bell",
    "Starbucks",
    "Dunkin'",
];

/// Chain registry backed by the shared database handle
pub struct ChainRegistry {
    db: SqlitePool,
}

impl ChainRegistry {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Insert every name not already present, assigning fresh ids in
    /// insertion order. Existing ids are never overwritten.
    pub async fn ensure_registered(&self, names: &[&str]) -> Result<()> {
        for name in names {
            sqlx::query("INSERT OR IGNORE INTO chains (name) VALUES (?)")
                .bind(name)
                .execute(&self.db)
                .await?;
        }

        Ok(())
    }

    /// Guarantee the reserved "Other" entry exists at its fixed id.
    /// Idempotent: calling twice never creates a second row nor moves it.
    pub async fn ensure_sentinel(&self) -> Result<()> {
        sqlx::query("INSERT OR IGNORE INTO chains (id, name) VALUES (?, ?)")
            .bind(SENTINEL_CHAIN_ID)
            .bind(SENTINEL_CHAIN_NAME)
            .execute(&self.db)
            .await?;

        Ok(())
    }

    /// Exact-name lookup
    pub async fn lookup(&self, name: &str) -> Result<Option<ChainIdentity>> {
        let row: Option<(i64, String)> =
            sqlx::query_as("SELECT id, name FROM chains WHERE name = ?")
                .bind(name)
                .fetch_optional(&self.db)
                .await?;

        Ok(row.map(|(id, name)| ChainIdentity { id, name }))
    }

    /// Lookup falling back to the "Other" sentinel for unmatched names
    pub async fn resolve_or_sentinel(&self, name: &str) -> Result<ChainIdentity> {
        if let Some(identity) = self.lookup(name).await? {
            return Ok(identity);
        }

        self.lookup(SENTINEL_CHAIN_NAME).await?.ok_or_else(|| {
            Error::NotFound(format!(
                "sentinel chain '{}' missing from registry",
                SENTINEL_CHAIN_NAME
            ))
        })
    }

    /// Tracked chain names, sentinel excluded. This is the filter set
    /// for chain disambiguation.
    pub async fn known_names(&self) -> Result<Vec<String>> {
        let names = sqlx::query_scalar("SELECT name FROM chains WHERE id != ? ORDER BY id")
            .bind(SENTINEL_CHAIN_ID)
            .fetch_all(&self.db)
            .await?;

        Ok(names)
    }
}
