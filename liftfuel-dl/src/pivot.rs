//! Long-to-wide nutrition pivot
//!
//! The scraper emits one row per (food, nutrient); the load pipeline
//! consumes one row per food with the three macros as columns. Only
//! protein, fat and carbohydrate nutrients are kept; anything absent or
//! unparseable stays null. The first value seen for a macro wins.

use std::collections::HashMap;

use crate::rows::{NutritionLongRow, NutritionWideRow};

enum MacroColumn {
    Protein,
    Fat,
    Carbohydrates,
}

/// Map a scraped nutrient label onto a macro column. Labels vary
/// ("Protein", "Total lipid (fat)", "Carbohydrate, by difference"), so
/// matching is loose.
fn macro_column(nutrient: &str) -> Option<MacroColumn> {
    let label = nutrient.trim().to_ascii_lowercase();
    if label == "protein" {
        Some(MacroColumn::Protein)
    } else if label.contains("fat") || label.contains("lipid") {
        Some(MacroColumn::Fat)
    } else if label.starts_with("carbohydrate") {
        Some(MacroColumn::Carbohydrates)
    } else {
        None
    }
}

/// Pivot long-form rows into wide-form records, preserving first-seen
/// (restaurant, food) order
pub fn pivot_long_rows(rows: Vec<NutritionLongRow>) -> Vec<NutritionWideRow> {
    let mut wide: Vec<NutritionWideRow> = Vec::new();
    let mut index: HashMap<(String, String), usize> = HashMap::new();

    for row in rows {
        let key = (row.restaurant.clone(), row.food.clone());
        let i = match index.get(&key) {
            Some(&i) => i,
            None => {
                let i = wide.len();
                index.insert(key, i);
                wide.push(NutritionWideRow {
                    restaurant: row.restaurant.clone(),
                    food: row.food.clone(),
                    protein: None,
                    fat: None,
                    carbohydrates: None,
                });
                i
            }
        };
        let slot = &mut wide[i];

        let value = row.value.trim().parse::<f64>().ok();
        match macro_column(&row.nutrient) {
            Some(MacroColumn::Protein) => slot.protein = slot.protein.or(value),
            Some(MacroColumn::Fat) => slot.fat = slot.fat.or(value),
            Some(MacroColumn::Carbohydrates) => {
                slot.carbohydrates = slot.carbohydrates.or(value)
            }
            None => {}
        }
    }

    wide
}

#[cfg(test)]
mod tests {
    use super::*;

    fn long_row(restaurant: &str, food: &str, nutrient: &str, value: &str) -> NutritionLongRow {
        NutritionLongRow {
            restaurant: restaurant.to_string(),
            food: food.to_string(),
            nutrient: nutrient.to_string(),
            value: value.to_string(),
            unit: "g".to_string(),
        }
    }

    #[test]
    fn test_pivot_collects_macros_per_food() {
        let rows = vec![
            long_row("McDonald's", "Big Mac", "Protein", "25.1"),
            long_row("McDonald's", "Big Mac", "Total lipid (fat)", "33.0"),
            long_row("McDonald's", "Big Mac", "Carbohydrate, by difference", "46.0"),
            long_row("McDonald's", "Big Mac", "Sodium, Na", "1010"),
        ];

        let wide = pivot_long_rows(rows);
        assert_eq!(wide.len(), 1);
        assert_eq!(wide[0].restaurant, "McDonald's");
        assert_eq!(wide[0].food, "Big Mac");
        assert_eq!(wide[0].protein, Some(25.1));
        assert_eq!(wide[0].fat, Some(33.0));
        assert_eq!(wide[0].carbohydrates, Some(46.0));
    }

    #[test]
    fn test_pivot_keeps_distinct_foods_separate() {
        let rows = vec![
            long_row("Subway", "Turkey Sub", "Protein", "18"),
            long_row("Subway", "Meatball Sub", "Protein", "21"),
            long_row("Subway", "Turkey Sub", "Carbohydrate, by difference", "44"),
        ];

        let wide = pivot_long_rows(rows);
        assert_eq!(wide.len(), 2);
        assert_eq!(wide[0].food, "Turkey Sub");
        assert_eq!(wide[0].carbohydrates, Some(44.0));
        assert_eq!(wide[1].food, "Meatball Sub");
        assert_eq!(wide[1].carbohydrates, None);
    }

    #[test]
    fn test_pivot_missing_macro_stays_null() {
        let rows = vec![long_row("KFC", "Chicken Breast", "Protein", "39")];

        let wide = pivot_long_rows(rows);
        assert_eq!(wide[0].protein, Some(39.0));
        assert_eq!(wide[0].fat, None);
        assert_eq!(wide[0].carbohydrates, None);
    }

    #[test]
    fn test_pivot_unparseable_value_stays_null() {
        let rows = vec![long_row("KFC", "Chicken Breast", "Protein", "n/a")];

        let wide = pivot_long_rows(rows);
        assert_eq!(wide[0].protein, None);
    }

    #[test]
    fn test_pivot_first_value_wins() {
        let rows = vec![
            long_row("KFC", "Chicken Breast", "Protein", "39"),
            long_row("KFC", "Chicken Breast", "Protein", "41"),
        ];

        let wide = pivot_long_rows(rows);
        assert_eq!(wide[0].protein, Some(39.0));
    }
}
