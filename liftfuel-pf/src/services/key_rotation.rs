//! API key rotation for the review-aggregator quota
//!
//! Each location is attempted once per key, in order, stopping at the
//! first successful fetch. Every attempt counts against the run quota,
//! whether or not it succeeded.

use tracing::warn;

use crate::services::review_client::{Business, CandidateSource};

/// Progress of the key rotation for one location
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RotationState {
    NoAttempt,
    Attempted { key_index: usize },
    Succeeded { key_index: usize },
    Exhausted,
}

/// Result of rotating through the available keys for one location
#[derive(Debug)]
pub struct RotationOutcome {
    /// Candidates from the first successful attempt; None when every
    /// key failed and the location stays unfetched
    pub candidates: Option<Vec<Business>>,
    /// Number of API calls spent on this location
    pub attempts: u32,
    /// Final state of the rotation
    pub state: RotationState,
}

/// Ordered iteration over the available keys for a single location
#[derive(Debug)]
pub struct KeyRotation<'a> {
    keys: &'a [String],
    next_index: usize,
    state: RotationState,
}

impl<'a> KeyRotation<'a> {
    pub fn new(keys: &'a [String]) -> Self {
        Self {
            keys,
            next_index: 0,
            state: RotationState::NoAttempt,
        }
    }

    /// The key for the next attempt, or None once the list is exhausted
    pub fn next_key(&mut self) -> Option<&'a str> {
        match self.keys.get(self.next_index) {
            Some(key) => {
                self.state = RotationState::Attempted {
                    key_index: self.next_index,
                };
                self.next_index += 1;
                Some(key.as_str())
            }
            None => {
                self.state = RotationState::Exhausted;
                None
            }
        }
    }

    /// Record that the most recent attempt succeeded
    pub fn mark_succeeded(&mut self) {
        if let RotationState::Attempted { key_index } = self.state {
            self.state = RotationState::Succeeded { key_index };
        }
    }

    pub fn state(&self) -> &RotationState {
        &self.state
    }

    /// Attempts made so far (= API calls spent)
    pub fn attempts(&self) -> u32 {
        self.next_index as u32
    }
}

/// Try each API key in order until one fetch succeeds
pub async fn fetch_with_rotation<S: CandidateSource>(
    source: &S,
    api_keys: &[String],
    location: &str,
) -> RotationOutcome {
    let mut rotation = KeyRotation::new(api_keys);

    while let Some(key) = rotation.next_key() {
        match source.search(key, location).await {
            Ok(candidates) => {
                rotation.mark_succeeded();
                return RotationOutcome {
                    candidates: Some(candidates),
                    attempts: rotation.attempts(),
                    state: rotation.state().clone(),
                };
            }
            Err(e) => {
                warn!(
                    location = %location,
                    state = ?rotation.state(),
                    error = %e,
                    "Fetch attempt failed, trying next key"
                );
            }
        }
    }

    RotationOutcome {
        candidates: None,
        attempts: rotation.attempts(),
        state: RotationState::Exhausted,
    }
}
