//! Normalization/load pipeline
//!
//! Joins CSV rows against the chain registry and location resolver to
//! produce fully-keyed relational records. Partial-failure semantics
//! throughout: a row that fails location resolution or boundary
//! validation is skipped and logged, never aborting the batch; storage
//! errors always propagate. Each row's insert runs in its own scoped
//! transaction so a mid-row failure leaves no partial record.

use std::path::Path;

use sqlx::SqlitePool;
use tracing::{info, warn};

use liftfuel_common::db::{resolve_location, ChainRegistry};
use liftfuel_common::{Error, Result};

use crate::pivot::pivot_long_rows;
use crate::rows::{NutritionLongRow, NutritionWideRow, PopularityCsvRow};

/// End-of-load totals for one input file
#[derive(Debug, Clone, Default)]
pub struct LoadSummary {
    pub inserted: usize,
    pub skipped: usize,
}

impl LoadSummary {
    pub fn display_string(&self) -> String {
        format!("{} rows inserted, {} skipped", self.inserted, self.skipped)
    }
}

/// Load the popularity CSV into `chain_popularity`
///
/// Chain names resolve through the sentinel: an unmatched name (the
/// explicit "None" outcome included) maps to the "Other" identity,
/// with the raw name preserved alongside the foreign key.
pub async fn load_popularity(
    db: &SqlitePool,
    registry: &ChainRegistry,
    csv_path: &Path,
) -> Result<LoadSummary> {
    let mut reader = csv::Reader::from_path(csv_path)?;
    let mut summary = LoadSummary::default();

    for (line, row) in reader.deserialize::<PopularityCsvRow>().enumerate() {
        let row = match row {
            Ok(row) => row,
            Err(e) => {
                warn!(line = line + 2, error = %e, "Skipping malformed popularity row");
                summary.skipped += 1;
                continue;
            }
        };

        let location = match resolve_location(db, &row.location).await {
            Ok(location) => location,
            Err(Error::NotFound(_)) => {
                warn!(
                    location = %row.location,
                    line = line + 2,
                    "Unknown location, skipping row"
                );
                summary.skipped += 1;
                continue;
            }
            Err(e) => return Err(e),
        };

        let chain = registry.resolve_or_sentinel(&row.name).await?;

        let mut tx = db.begin().await?;
        sqlx::query(
            r#"
            INSERT INTO chain_popularity (location_id, name, chain_id, review_count, marker)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(location.id)
        .bind(&row.name)
        .bind(chain.id)
        .bind(row.review_count)
        .bind(!row.marker.is_empty())
        .execute(&mut *tx)
        .await?;
        tx.commit().await?;

        summary.inserted += 1;
    }

    info!("Popularity load finished: {}", summary.display_string());
    Ok(summary)
}

/// Load the nutrition CSV into `nutrition_facts`
///
/// Accepts either the scraper's long form (detected by its `Nutrient`
/// header and pivoted to wide) or the pivoted wide form directly.
/// Chain resolution uses a plain lookup: a restaurant with no registry
/// match persists with a null chain reference, which is distinct from
/// the "Other" sentinel.
pub async fn load_nutrition(
    db: &SqlitePool,
    registry: &ChainRegistry,
    csv_path: &Path,
) -> Result<LoadSummary> {
    let mut reader = csv::Reader::from_path(csv_path)?;
    let long_form = reader.headers()?.iter().any(|h| h == "Nutrient");

    let mut summary = LoadSummary::default();
    let wide_rows = if long_form {
        let mut long_rows: Vec<NutritionLongRow> = Vec::new();
        for (line, row) in reader.deserialize::<NutritionLongRow>().enumerate() {
            match row {
                Ok(row) => long_rows.push(row),
                Err(e) => {
                    warn!(line = line + 2, error = %e, "Skipping malformed nutrition row");
                    summary.skipped += 1;
                }
            }
        }
        pivot_long_rows(long_rows)
    } else {
        let mut rows: Vec<NutritionWideRow> = Vec::new();
        for (line, row) in reader.deserialize::<NutritionWideRow>().enumerate() {
            match row {
                Ok(row) => rows.push(row),
                Err(e) => {
                    warn!(line = line + 2, error = %e, "Skipping malformed nutrition row");
                    summary.skipped += 1;
                }
            }
        }
        rows
    };

    for row in wide_rows {
        let chain = registry.lookup(&row.restaurant).await?;

        let mut tx = db.begin().await?;
        sqlx::query(
            r#"
            INSERT INTO nutrition_facts (restaurant, chain_id, food, protein, fat, carbohydrates)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&row.restaurant)
        .bind(chain.as_ref().map(|c| c.id))
        .bind(&row.food)
        .bind(row.protein)
        .bind(row.fat)
        .bind(row.carbohydrates)
        .execute(&mut *tx)
        .await?;
        tx.commit().await?;

        summary.inserted += 1;
    }

    info!("Nutrition load finished: {}", summary.display_string());
    Ok(summary)
}
