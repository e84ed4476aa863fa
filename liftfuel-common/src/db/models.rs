//! Database models

use serde::{Deserialize, Serialize};

/// A canonical fast-food chain identity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainIdentity {
    pub id: i64,
    pub name: String,
}

/// A location registered by the external demographics ingest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationIdentity {
    pub id: i64,
    pub city: String,
    pub state: String,
}

impl LocationIdentity {
    /// Derived lookup key, `"{city}, {state}"`
    pub fn key(&self) -> String {
        format!("{}, {}", self.city, self.state)
    }
}

/// One disambiguated popularity observation for a location
///
/// The raw `name` column keeps the explicit `"None"` outcome visible
/// even though its foreign key maps to the "Other" sentinel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainPopularityRecord {
    pub location_id: i64,
    pub name: String,
    pub chain_id: i64,
    pub review_count: i64,
    pub marker: bool,
}

/// One nutrition fact row; `chain_id` is None when the restaurant name
/// has no registry match (distinct from the "Other" sentinel)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NutritionRecord {
    pub restaurant: String,
    pub chain_id: Option<i64>,
    pub food: String,
    pub protein: Option<f64>,
    pub fat: Option<f64>,
    pub carbohydrates: Option<f64>,
}
