//! Collaborator interfaces used by the dispatch engine
//!
//! The engine only depends on these traits; concrete HTTP and database
//! implementations live in `crate::services`.

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{Listing, NotificationMessage, Recipient, RecipientId};

/// Errors from a listing source
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Listing source unavailable: {0}")]
    Unavailable(String),

    #[error("Invalid listing feed: {0}")]
    InvalidResponse(String),
}

/// Errors from a preference store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Preference store unavailable: {0}")]
    Unavailable(String),

    #[error("Invalid preference data: {0}")]
    InvalidData(String),
}

/// Reasons a single delivery can fail
///
/// Always returned as a value so one failing recipient never aborts a cycle.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DeliveryError {
    #[error("Recipient blocked the bot: {0}")]
    Blocked(String),

    #[error("Invalid recipient: {0}")]
    InvalidRecipient(String),

    #[error("Rate limited (retry after {retry_after:?}s)")]
    RateLimited { retry_after: Option<u64> },

    #[error("API returned error {status}: {description}")]
    Api { status: u16, description: String },

    #[error("Transport error: {0}")]
    Transport(String),
}

/// Supplies listings published since the previous call
#[async_trait]
pub trait ListingSource: Send + Sync {
    /// Listings are returned again on later calls until acknowledged
    async fn fetch_new_listings(&self) -> Result<Vec<Listing>, SourceError>;

    /// Record `listings` as handled so later fetches skip them
    ///
    /// Called only after a cycle over `listings` has completed.
    async fn acknowledge(&self, _listings: &[Listing]) -> Result<(), SourceError> {
        Ok(())
    }

    /// Name used in logs
    fn source_name(&self) -> &str;
}

/// Supplies subscribed recipients and their stored preferences
#[async_trait]
pub trait PreferenceStore: Send + Sync {
    async fn fetch_active_recipients(&self) -> Result<Vec<Recipient>, StoreError>;
}

/// Delivers one message to one recipient
#[async_trait]
pub trait DeliveryChannel: Send + Sync {
    async fn send(
        &self,
        recipient: &RecipientId,
        message: &NotificationMessage,
    ) -> Result<(), DeliveryError>;
}
