use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::core::traits::{ListingSource, SourceError};
use crate::models::Listing;
use crate::services::seen::{SeenListings, SeenListingsError};

/// Errors that can occur when talking to the Earn listings API
#[derive(Debug, Error)]
pub enum EarnError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    ApiError(String),

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),

    #[error("Seen-listing tracking failed: {0}")]
    TrackingError(#[from] SeenListingsError),
}

impl From<EarnError> for SourceError {
    fn from(err: EarnError) -> Self {
        match err {
            EarnError::InvalidResponse(msg) => SourceError::InvalidResponse(msg),
            other => SourceError::Unavailable(other.to_string()),
        }
    }
}

/// Superteam Earn listings client
///
/// Fetches the public listings feed and hands out listings not yet acknowledged:
/// - listings published before the lookback window are ignored
/// - listings acknowledged into [`SeenListings`] are ignored
/// - malformed entries are logged and skipped
pub struct EarnClient {
    api_url: String,
    client: Client,
    lookback: chrono::Duration,
    seen: Arc<SeenListings>,
}

impl EarnClient {
    /// Create a new Earn client
    pub fn new(
        api_url: String,
        timeout_secs: u64,
        lookback_minutes: i64,
        seen: Arc<SeenListings>,
    ) -> Result<Self, EarnError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;

        Ok(Self {
            api_url,
            client,
            lookback: chrono::Duration::minutes(lookback_minutes),
            seen,
        })
    }

    /// Fetch and parse the current listings feed
    pub async fn fetch_listings(&self) -> Result<Vec<Listing>, EarnError> {
        tracing::debug!("Fetching listings from: {}", self.api_url);

        let response = self.client.get(&self.api_url).send().await?;

        if !response.status().is_success() {
            return Err(EarnError::ApiError(format!(
                "Failed to fetch listings: {}",
                response.status()
            )));
        }

        let json: Value = response.json().await?;
        parse_listings(&json)
    }

    /// Drop listings published before the lookback window
    ///
    /// Listings without a publish date are kept; the seen tracker dedupes them.
    pub fn filter_recent(&self, listings: Vec<Listing>, now: DateTime<Utc>) -> Vec<Listing> {
        let cutoff = now - self.lookback;

        listings
            .into_iter()
            .filter(|listing| listing.published_at.map_or(true, |published| published >= cutoff))
            .collect()
    }
}

#[async_trait]
impl ListingSource for EarnClient {
    async fn fetch_new_listings(&self) -> Result<Vec<Listing>, SourceError> {
        let listings = self.fetch_listings().await?;
        let total = listings.len();
        let recent = self.filter_recent(listings, Utc::now());

        let mut fresh = Vec::with_capacity(recent.len());
        for listing in recent {
            if self.seen.is_seen(&listing.slug).await.map_err(EarnError::from)? {
                continue;
            }
            fresh.push(listing);
        }

        tracing::debug!("Feed returned {} listings, {} new", total, fresh.len());

        Ok(fresh)
    }

    async fn acknowledge(&self, listings: &[Listing]) -> Result<(), SourceError> {
        for listing in listings {
            self.seen.mark_seen(&listing.slug).await.map_err(EarnError::from)?;
        }

        tracing::debug!("Marked {} listings as seen", listings.len());
        Ok(())
    }

    fn source_name(&self) -> &str {
        "superteam-earn"
    }
}

/// Parse a feed body into listings
///
/// Accepts a bare array or an object wrapping it in `listings` or `data`.
/// Entries that fail to deserialize (unknown type, malformed deadline, ...)
/// are skipped.
pub fn parse_listings(json: &Value) -> Result<Vec<Listing>, EarnError> {
    let documents = json
        .as_array()
        .or_else(|| json.get("listings").and_then(|l| l.as_array()))
        .or_else(|| json.get("data").and_then(|d| d.as_array()))
        .ok_or_else(|| EarnError::InvalidResponse("Missing listings array".into()))?;

    let listings = documents
        .iter()
        .filter_map(|doc| match serde_json::from_value::<Listing>(doc.clone()) {
            Ok(listing) => Some(listing),
            Err(e) => {
                let slug = doc.get("slug").and_then(|s| s.as_str()).unwrap_or("<unknown>");
                tracing::warn!("Skipping malformed listing {}: {}", slug, e);
                None
            }
        })
        .collect();

    Ok(listings)
}
