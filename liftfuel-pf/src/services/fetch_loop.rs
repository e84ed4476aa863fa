//! Popularity fetch loop
//!
//! Walks the pending location set sequentially, fetching candidates
//! one location at a time and appending one disambiguated row per
//! location to the popularity log. The loop stops cleanly when the
//! per-run quota ceiling is reached; whatever has been written so far
//! remains valid and resumable on the next run.

use std::collections::{BTreeSet, HashSet};
use std::path::Path;

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{info, warn};

use liftfuel_common::db::{all_location_keys, ChainRegistry};
use liftfuel_common::Result;

use crate::popularity_log::PopularityLog;
use crate::services::disambiguator;
use crate::services::fetch_tracker;
use crate::services::key_rotation::fetch_with_rotation;
use crate::services::review_client::CandidateSource;

/// Hard cap on external calls per run
pub const DEFAULT_MAX_CALLS: u32 = 300;

/// Per-run fetch configuration
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// API keys, tried in order for each location
    pub api_keys: Vec<String>,
    /// Quota ceiling for this run
    pub max_calls: u32,
}

/// End-of-run totals
#[derive(Debug, Clone, Default)]
pub struct FetchSummary {
    /// Locations pending at the start of the run
    pub pending: usize,
    /// Total API calls spent, successful or not
    pub api_calls: u32,
    /// Locations recorded with a tracked chain
    pub chains_recorded: usize,
    /// Locations recorded with the explicit no-data outcome
    pub no_data: usize,
    /// Locations left unfetched after exhausting every key
    pub failed: usize,
    /// Whether the quota ceiling stopped the loop
    pub quota_reached: bool,
}

impl FetchSummary {
    pub fn display_string(&self) -> String {
        format!(
            "{} pending, {} API calls, {} chains recorded, {} without tracked chains, {} failed{}",
            self.pending,
            self.api_calls,
            self.chains_recorded,
            self.no_data,
            self.failed,
            if self.quota_reached { " (quota reached)" } else { "" }
        )
    }
}

/// Run the popularity fetch over every pending location
pub async fn run_fetch<S: CandidateSource>(
    db: &SqlitePool,
    registry: &ChainRegistry,
    source: &S,
    config: &FetchConfig,
    csv_path: &Path,
) -> Result<FetchSummary> {
    let started_at = Utc::now();

    let all: BTreeSet<String> = all_location_keys(db).await?.into_iter().collect();
    let fetched = fetch_tracker::read_fetched_locations(csv_path)?;
    let pending = fetch_tracker::pending(&all, &fetched);

    info!(
        total = all.len(),
        fetched = fetched.len(),
        pending = pending.len(),
        "Fetch set computed"
    );

    let known: HashSet<String> = registry.known_names().await?.into_iter().collect();

    let mut log = PopularityLog::append(csv_path)?;
    let mut summary = FetchSummary {
        pending: pending.len(),
        ..Default::default()
    };

    for location in &pending {
        if summary.api_calls >= config.max_calls {
            summary.quota_reached = true;
            info!(
                api_calls = summary.api_calls,
                "Quota ceiling reached, stopping fetch loop"
            );
            break;
        }

        let outcome = fetch_with_rotation(source, &config.api_keys, location).await;
        summary.api_calls += outcome.attempts;

        match outcome.candidates {
            Some(candidates) => match disambiguator::choose(&known, &candidates) {
                Some(pick) => {
                    log.append_chain(location, &pick.name, pick.review_count)?;
                    summary.chains_recorded += 1;
                    info!(
                        location = %location,
                        chain = %pick.name,
                        reviews = pick.review_count,
                        "Chain recorded"
                    );
                }
                None => {
                    log.append_no_data(location)?;
                    summary.no_data += 1;
                    info!(location = %location, "No tracked chain observed");
                }
            },
            None => {
                summary.failed += 1;
                warn!(
                    location = %location,
                    attempts = outcome.attempts,
                    "Every API key exhausted, leaving location unfetched"
                );
            }
        }
    }

    info!(
        elapsed_ms = (Utc::now() - started_at).num_milliseconds(),
        "Fetch run finished: {}",
        summary.display_string()
    );

    Ok(summary)
}
