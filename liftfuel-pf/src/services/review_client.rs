//! Review-aggregator API client
//!
//! Business search with a mandatory inter-request pacing delay. One
//! request is made at a time; the pacing is a backpressure concern for
//! the aggregator's rate limits, not a correctness concern.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::sync::Mutex;

const SEARCH_BASE_URL: &str = "https://api.yelp.com/v3/businesses/search";
const USER_AGENT: &str = "liftfuel/0.1.0";
const SEARCH_TERM: &str = "fast food";
const SEARCH_LIMIT: &str = "50";

/// Review API client errors
#[derive(Debug, Error)]
pub enum ReviewApiError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Invalid API key")]
    InvalidApiKey,

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("API error {0}: {1}")]
    ApiError(u16, String),

    #[error("Parse error: {0}")]
    ParseError(String),
}

/// Business search response
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BusinessSearchResponse {
    pub businesses: Vec<Business>,
}

/// One business observation returned by the aggregator, prior to
/// disambiguation
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Business {
    pub name: String,
    pub review_count: i64,
}

/// Source of candidate business records for a location. The fetch loop
/// runs against this seam so tests can substitute canned responses.
#[allow(async_fn_in_trait)]
pub trait CandidateSource {
    async fn search(&self, api_key: &str, location: &str) -> Result<Vec<Business>, ReviewApiError>;
}

/// Rate limiter enforcing the inter-request pacing delay
struct RateLimiter {
    last_request: Mutex<Option<Instant>>,
    min_interval: Duration,
}

impl RateLimiter {
    fn new(min_interval_ms: u64) -> Self {
        Self {
            last_request: Mutex::new(None),
            min_interval: Duration::from_millis(min_interval_ms),
        }
    }

    /// Wait if necessary to comply with the pacing delay
    async fn wait(&self) {
        let mut last = self.last_request.lock().await;

        if let Some(last_time) = *last {
            let elapsed = last_time.elapsed();
            if elapsed < self.min_interval {
                let wait_time = self.min_interval - elapsed;
                tracing::debug!("Rate limiting: waiting {:?}", wait_time);
                tokio::time::sleep(wait_time).await;
            }
        }

        *last = Some(Instant::now());
    }
}

/// Review-aggregator API client
pub struct ReviewClient {
    http_client: reqwest::Client,
    rate_limiter: Arc<RateLimiter>,
}

impl ReviewClient {
    pub fn new(pace_ms: u64) -> Result<Self, ReviewApiError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| ReviewApiError::NetworkError(e.to_string()))?;

        Ok(Self {
            http_client,
            rate_limiter: Arc::new(RateLimiter::new(pace_ms)),
        })
    }

    /// Search fast-food businesses near a location with one API key
    pub async fn search_businesses(
        &self,
        api_key: &str,
        location: &str,
    ) -> Result<Vec<Business>, ReviewApiError> {
        // Rate limit
        self.rate_limiter.wait().await;

        tracing::debug!(location = %location, "Querying review-aggregator API");

        let response = self
            .http_client
            .get(SEARCH_BASE_URL)
            .bearer_auth(api_key)
            .query(&[
                ("term", SEARCH_TERM),
                ("location", location),
                ("limit", SEARCH_LIMIT),
            ])
            .send()
            .await
            .map_err(|e| ReviewApiError::NetworkError(e.to_string()))?;

        let status = response.status();

        if status == 401 {
            return Err(ReviewApiError::InvalidApiKey);
        }

        if status == 429 {
            return Err(ReviewApiError::RateLimitExceeded);
        }

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(ReviewApiError::ApiError(status.as_u16(), error_text));
        }

        let parsed: BusinessSearchResponse = response
            .json()
            .await
            .map_err(|e| ReviewApiError::ParseError(e.to_string()))?;

        tracing::info!(
            location = %location,
            candidates = parsed.businesses.len(),
            "Business search succeeded"
        );

        Ok(parsed.businesses)
    }
}

impl CandidateSource for ReviewClient {
    async fn search(&self, api_key: &str, location: &str) -> Result<Vec<Business>, ReviewApiError> {
        self.search_businesses(api_key, location).await
    }
}
