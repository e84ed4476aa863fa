//! Chain disambiguation
//!
//! Reduces the candidate businesses observed at one location to a
//! single representative chain. Ranking is occurrence count first,
//! lexicographic name as the stable secondary key; when the top two
//! counts are exactly equal the lexicographic choice is overridden by
//! the highest aggregate review count among the tied names, with first
//! occurrence as the final fallback.

use std::collections::HashSet;

use crate::services::review_client::Business;

/// The chain selected for one location
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainPick {
    pub name: String,
    /// Highest review count among the winner's observations (not the
    /// sum, and not the occurrence count used for ranking)
    pub review_count: i64,
}

/// Per-name tally over the filtered candidates
struct NameTally {
    name: String,
    count: u32,
    total_reviews: i64,
    max_reviews: i64,
    first_seen: usize,
}

/// Select the representative chain among the candidates, or None when
/// no tracked chain was observed at the location.
pub fn choose(known_chains: &HashSet<String>, candidates: &[Business]) -> Option<ChainPick> {
    let mut tally: Vec<NameTally> = Vec::new();

    for business in candidates {
        if !known_chains.contains(&business.name) {
            continue;
        }

        match tally.iter_mut().find(|t| t.name == business.name) {
            Some(t) => {
                t.count += 1;
                t.total_reviews += business.review_count;
                t.max_reviews = t.max_reviews.max(business.review_count);
            }
            None => {
                let first_seen = tally.len();
                tally.push(NameTally {
                    name: business.name.clone(),
                    count: 1,
                    total_reviews: business.review_count,
                    max_reviews: business.review_count,
                    first_seen,
                });
            }
        }
    }

    if tally.is_empty() {
        return None;
    }

    // Primary ranking: count descending, name ascending as stable key
    let mut ranked: Vec<&NameTally> = tally.iter().collect();
    ranked.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));

    let top_count = ranked[0].count;
    let winner = if ranked.len() > 1 && ranked[1].count == top_count {
        // Top two counts tied: override with the highest aggregate
        // review count among the tied names, first occurrence last
        ranked
            .iter()
            .take_while(|t| t.count == top_count)
            .min_by(|a, b| {
                b.total_reviews
                    .cmp(&a.total_reviews)
                    .then_with(|| a.first_seen.cmp(&b.first_seen))
            })
            .copied()?
    } else {
        ranked[0]
    };

    Some(ChainPick {
        name: winner.name.clone(),
        review_count: winner.max_reviews,
    })
}
