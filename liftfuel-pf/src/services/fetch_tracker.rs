//! Incremental fetch tracking
//!
//! The popularity CSV append log is the source of truth for which
//! locations have already been fetched: a key is "fetched" once a row
//! bearing the marker exists for it, and absence of the artifact means
//! the entire input set is pending. Re-runs therefore never re-query a
//! location, and an interrupted run resumes from the unfetched
//! remainder without duplication.

use std::collections::{BTreeSet, HashSet};
use std::path::Path;

use liftfuel_common::Result;

use crate::popularity_log::PopularityRow;

/// Locations still requiring a fresh lookup
pub fn pending(
    all_locations: &BTreeSet<String>,
    previously_fetched: &HashSet<String>,
) -> BTreeSet<String> {
    all_locations
        .iter()
        .filter(|location| !previously_fetched.contains(*location))
        .cloned()
        .collect()
}

/// Location keys already marked as fetched in the persisted log
pub fn read_fetched_locations(csv_path: &Path) -> Result<HashSet<String>> {
    if !csv_path.exists() {
        return Ok(HashSet::new());
    }

    let mut reader = csv::Reader::from_path(csv_path)?;
    let mut fetched = HashSet::new();

    for row in reader.deserialize::<PopularityRow>() {
        let row = row?;
        if !row.marker.is_empty() {
            fetched.insert(row.location);
        }
    }

    Ok(fetched)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(keys: &[&str]) -> BTreeSet<String> {
        keys.iter().map(|k| k.to_string()).collect()
    }

    fn hashset(keys: &[&str]) -> HashSet<String> {
        keys.iter().map(|k| k.to_string()).collect()
    }

    #[test]
    fn test_pending_is_set_difference() {
        let all = set(&["Austin, TX", "Columbus, OH", "Reno, NV"]);
        let fetched = hashset(&["Columbus, OH"]);

        let result = pending(&all, &fetched);
        assert_eq!(result, set(&["Austin, TX", "Reno, NV"]));
    }

    #[test]
    fn test_pending_disjoint_from_fetched_and_covers_all() {
        let all = set(&["Austin, TX", "Columbus, OH", "Reno, NV"]);
        let fetched = hashset(&["Austin, TX", "Reno, NV"]);

        let result = pending(&all, &fetched);

        // pending ∩ fetched = ∅
        assert!(result.iter().all(|location| !fetched.contains(location)));

        // pending ∪ fetched ⊇ all
        assert!(all
            .iter()
            .all(|location| result.contains(location) || fetched.contains(location.as_str())));
    }

    #[test]
    fn test_everything_fetched_leaves_nothing_pending() {
        let all = set(&["Austin, TX", "Columbus, OH"]);
        let fetched = hashset(&["Austin, TX", "Columbus, OH"]);

        assert!(pending(&all, &fetched).is_empty());
    }

    #[test]
    fn test_missing_artifact_means_all_pending() {
        let dir = tempfile::tempdir().unwrap();
        let fetched = read_fetched_locations(&dir.path().join("missing.csv")).unwrap();
        assert!(fetched.is_empty());
    }

    #[test]
    fn test_reads_marked_locations_from_log() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fast_food_chains.csv");
        std::fs::write(
            &path,
            "Location,Name,Review Count,Marker\n\
             \"Columbus, OH\",McDonald's,120,✔\n\
             \"Reno, NV\",None,0,✔\n",
        )
        .unwrap();

        let fetched = read_fetched_locations(&path).unwrap();
        assert_eq!(fetched, hashset(&["Columbus, OH", "Reno, NV"]));
    }
}
