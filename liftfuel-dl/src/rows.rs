//! Typed CSV row boundary
//!
//! Each input schema maps to an explicit record type deserialized at
//! the boundary. Rows missing required fields fail deserialization and
//! are skipped by the pipeline; nulls never travel further than the
//! optional nutrient columns, which are null by design.

use serde::{Deserialize, Deserializer};

/// Row of the popularity log produced by liftfuel-pf
#[derive(Debug, Clone, Deserialize)]
pub struct PopularityCsvRow {
    #[serde(rename = "Location")]
    pub location: String,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Review Count")]
    pub review_count: i64,
    #[serde(rename = "Marker", default)]
    pub marker: String,
}

/// Wide-form nutrition row, one food per row
#[derive(Debug, Clone, Deserialize)]
pub struct NutritionWideRow {
    #[serde(rename = "Restaurant")]
    pub restaurant: String,
    #[serde(rename = "Food")]
    pub food: String,
    #[serde(rename = "Protein", default, deserialize_with = "lenient_f64")]
    pub protein: Option<f64>,
    #[serde(rename = "Fat", default, deserialize_with = "lenient_f64")]
    pub fat: Option<f64>,
    #[serde(rename = "Carbohydrates", default, deserialize_with = "lenient_f64")]
    pub carbohydrates: Option<f64>,
}

/// Long-form nutrition row as emitted by the scraper, one nutrient per
/// row
#[derive(Debug, Clone, Deserialize)]
pub struct NutritionLongRow {
    #[serde(rename = "Restaurant")]
    pub restaurant: String,
    #[serde(rename = "Food")]
    pub food: String,
    #[serde(rename = "Nutrient")]
    pub nutrient: String,
    #[serde(rename = "Value", default)]
    pub value: String,
    #[serde(rename = "Unit", default)]
    pub unit: String,
}

/// Missing, empty, or unparseable nutrient values become null rather
/// than failing the row
fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(|s| s.trim().parse::<f64>().ok()))
}
