//! Popularity CSV append log
//!
//! One row per fetched location, appended only after disambiguation.
//! The log doubles as the incremental fetch tracker's source of truth,
//! so the header is written exactly once (on creation) and every row is
//! flushed immediately; an interrupted run leaves a parseable artifact.

use std::fs::{File, OpenOptions};
use std::path::Path;

use serde::{Deserialize, Serialize};

use liftfuel_common::Result;

/// Marker written once a location has been fetched
pub const FETCHED_MARKER: &str = "✔";

/// Name recorded when no tracked chain was observed at a location
pub const NO_DATA_NAME: &str = "None";

/// One persisted log row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PopularityRow {
    #[serde(rename = "Location")]
    pub location: String,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Review Count")]
    pub review_count: i64,
    #[serde(rename = "Marker", default)]
    pub marker: String,
}

/// Append-mode writer over the log artifact
pub struct PopularityLog {
    writer: csv::Writer<File>,
}

impl PopularityLog {
    /// Open the log for appending, creating it (with header) if missing.
    /// A zero-length file counts as new so the header is never skipped.
    pub fn append(path: &Path) -> Result<Self> {
        let newly_created = match std::fs::metadata(path) {
            Ok(meta) => meta.len() == 0,
            Err(_) => true,
        };

        let file = OpenOptions::new().create(true).append(true).open(path)?;
        let writer = csv::WriterBuilder::new()
            .has_headers(newly_created)
            .from_writer(file);

        Ok(Self { writer })
    }

    /// Record the disambiguated chain for a location
    pub fn append_chain(&mut self, location: &str, name: &str, review_count: i64) -> Result<()> {
        self.write_row(PopularityRow {
            location: location.to_string(),
            name: name.to_string(),
            review_count,
            marker: FETCHED_MARKER.to_string(),
        })
    }

    /// Record that a location was fetched but no tracked chain was
    /// observed there. Still marked, so it is never retried.
    pub fn append_no_data(&mut self, location: &str) -> Result<()> {
        self.write_row(PopularityRow {
            location: location.to_string(),
            name: NO_DATA_NAME.to_string(),
            review_count: 0,
            marker: FETCHED_MARKER.to_string(),
        })
    }

    fn write_row(&mut self, row: PopularityRow) -> Result<()> {
        self.writer.serialize(row)?;
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_written_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fast_food_chains.csv");

        {
            let mut log = PopularityLog::append(&path).unwrap();
            log.append_chain("Columbus, OH", "McDonald's", 120).unwrap();
        }
        {
            let mut log = PopularityLog::append(&path).unwrap();
            log.append_no_data("Reno, NV").unwrap();
        }

        let content = std::fs::read_to_string(&path).unwrap();
        let headers: Vec<&str> = content
            .lines()
            .filter(|line| line.starts_with("Location,"))
            .collect();
        assert_eq!(headers.len(), 1, "header must appear exactly once:\n{}", content);
        assert_eq!(content.lines().count(), 3);
    }

    #[test]
    fn test_empty_file_still_gets_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fast_food_chains.csv");

        // A run with nothing to fetch leaves an empty artifact behind
        std::fs::write(&path, "").unwrap();

        let mut log = PopularityLog::append(&path).unwrap();
        log.append_chain("Columbus, OH", "McDonald's", 120).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("Location,Name,Review Count,Marker"));
    }

    #[test]
    fn test_rows_round_trip_through_reader() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fast_food_chains.csv");

        let mut log = PopularityLog::append(&path).unwrap();
        log.append_chain("Columbus, OH", "McDonald's", 120).unwrap();
        log.append_no_data("Reno, NV").unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let rows: Vec<PopularityRow> = reader
            .deserialize()
            .collect::<std::result::Result<_, _>>()
            .unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].location, "Columbus, OH");
        assert_eq!(rows[0].marker, FETCHED_MARKER);
        assert_eq!(rows[1].name, NO_DATA_NAME);
        assert_eq!(rows[1].review_count, 0);
    }
}
