use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};
use validator::Validate;

use crate::core::{
    filters::is_eligible,
    formatter::MessageFormatter,
    traits::{DeliveryChannel, ListingSource, PreferenceStore, SourceError, StoreError},
};
use crate::models::{Listing, NotificationMessage, Recipient, RecipientId};

/// Pause after every attempted send, keeps us under the Bot API rate limits
pub const DEFAULT_SEND_DELAY: Duration = Duration::from_millis(100);

/// Errors that abort a whole dispatch cycle
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("Failed to fetch new listings: {0}")]
    ListingSource(#[source] SourceError),

    #[error("Failed to fetch recipients: {0}")]
    PreferenceStore(#[source] StoreError),

    #[error("A dispatch cycle is already in progress")]
    CycleInProgress,
}

/// A delivery that did not go through
#[derive(Debug, Clone, Serialize)]
pub struct DeliveryFailure {
    pub recipient_id: RecipientId,
    pub listing_slug: String,
    pub reason: String,
}

/// Send count for one listing
#[derive(Debug, Clone, Serialize)]
pub struct ListingReport {
    pub slug: String,
    pub title: String,
    pub sent: usize,
    pub failed: usize,
}

/// A listing that was skipped because its data is unusable
#[derive(Debug, Clone, Serialize)]
pub struct ListingAnomaly {
    pub slug: String,
    pub reason: String,
}

/// Aggregate result of one dispatch cycle
#[derive(Debug, Clone, Default, Serialize)]
pub struct DispatchOutcome {
    pub listings_processed: usize,
    pub recipients_considered: usize,
    pub notifications_sent: usize,
    pub failures: Vec<DeliveryFailure>,
    pub listing_reports: Vec<ListingReport>,
    pub skipped_listings: Vec<ListingAnomaly>,
}

impl DispatchOutcome {
    pub fn failed_count(&self) -> usize {
        self.failures.len()
    }
}

/// Dispatch engine - matches listings against recipients and delivers them
///
/// # Cycle
/// 1. Fetch recipients once
/// 2. For every listing and every recipient with preferences, check eligibility
/// 3. Format and send, recording failures without stopping
/// 4. Sleep `send_delay` after every attempted send
///
/// Sends are sequential with at most one outstanding at a time, spaced by the
/// delay. Only one cycle may run at a time per dispatcher; overlapping calls
/// get [`DispatchError::CycleInProgress`].
pub struct Dispatcher {
    store: Arc<dyn PreferenceStore>,
    channel: Arc<dyn DeliveryChannel>,
    formatter: MessageFormatter,
    send_delay: Duration,
    cycle_guard: Mutex<()>,
}

impl Dispatcher {
    pub fn new(
        store: Arc<dyn PreferenceStore>,
        channel: Arc<dyn DeliveryChannel>,
        formatter: MessageFormatter,
    ) -> Self {
        Self {
            store,
            channel,
            formatter,
            send_delay: DEFAULT_SEND_DELAY,
            cycle_guard: Mutex::new(()),
        }
    }

    pub fn with_send_delay(mut self, send_delay: Duration) -> Self {
        self.send_delay = send_delay;
        self
    }

    /// Fetch new listings from `source` and dispatch them
    ///
    /// Listings are acknowledged back to `source` only once the cycle has
    /// completed, so an aborted cycle offers them again next time.
    pub async fn run_cycle(&self, source: &dyn ListingSource) -> Result<DispatchOutcome, DispatchError> {
        let _guard = self
            .cycle_guard
            .try_lock()
            .map_err(|_| DispatchError::CycleInProgress)?;

        debug!("Starting notification cycle from {}", source.source_name());

        let listings = source
            .fetch_new_listings()
            .await
            .map_err(DispatchError::ListingSource)?;

        if listings.is_empty() {
            info!("No new listings to process");
        } else {
            info!("Found {} new listings from {}", listings.len(), source.source_name());
        }

        let outcome = self.dispatch_listings(&listings).await?;

        if !listings.is_empty() {
            if let Err(err) = source.acknowledge(&listings).await {
                warn!("Failed to acknowledge listings with {}: {}", source.source_name(), err);
            }
        }

        Ok(outcome)
    }

    /// Dispatch a batch of listings to every eligible recipient
    pub async fn dispatch(&self, listings: &[Listing]) -> Result<DispatchOutcome, DispatchError> {
        let _guard = self
            .cycle_guard
            .try_lock()
            .map_err(|_| DispatchError::CycleInProgress)?;

        self.dispatch_listings(listings).await
    }

    async fn dispatch_listings(&self, listings: &[Listing]) -> Result<DispatchOutcome, DispatchError> {
        if listings.is_empty() {
            return Ok(DispatchOutcome::default());
        }

        let recipients = self
            .store
            .fetch_active_recipients()
            .await
            .map_err(DispatchError::PreferenceStore)?;

        info!(
            "Processing {} listings for {} recipients",
            listings.len(),
            recipients.len()
        );

        let mut outcome = DispatchOutcome {
            recipients_considered: recipients.len(),
            ..Default::default()
        };

        for listing in listings {
            if let Err(errors) = listing.validate() {
                warn!("Skipping invalid listing {:?}: {}", listing.slug, errors);
                outcome.skipped_listings.push(ListingAnomaly {
                    slug: listing.slug.clone(),
                    reason: errors.to_string(),
                });
                continue;
            }

            let report = self
                .notify_recipients(listing, &recipients, &mut outcome.failures)
                .await;

            if report.sent > 0 {
                info!("\"{}\": {} notifications sent", listing.title, report.sent);
            } else {
                debug!("\"{}\": no notifications sent", listing.title);
            }

            outcome.listings_processed += 1;
            outcome.notifications_sent += report.sent;
            outcome.listing_reports.push(report);
        }

        info!(
            recipients = outcome.recipients_considered,
            listings = outcome.listings_processed,
            sent = outcome.notifications_sent,
            failed = outcome.failed_count(),
            skipped = outcome.skipped_listings.len(),
            "Notification cycle complete"
        );

        Ok(outcome)
    }

    /// Deliver one listing to every eligible recipient
    async fn notify_recipients(
        &self,
        listing: &Listing,
        recipients: &[Recipient],
        failures: &mut Vec<DeliveryFailure>,
    ) -> ListingReport {
        debug!("Processing listing: {}", listing.title);

        let mut report = ListingReport {
            slug: listing.slug.clone(),
            title: listing.title.clone(),
            sent: 0,
            failed: 0,
        };
        let mut message: Option<NotificationMessage> = None;

        for recipient in recipients {
            let Some(preferences) = recipient.preferences.as_ref() else {
                debug!("Recipient {} has no preferences set, skipping", recipient.id);
                continue;
            };

            if !is_eligible(listing, preferences) {
                debug!("Recipient {} not eligible for \"{}\"", recipient.id, listing.title);
                continue;
            }

            let message = message.get_or_insert_with(|| self.formatter.format(listing));

            match self.channel.send(&recipient.id, message).await {
                Ok(()) => {
                    debug!("Notified recipient {} about \"{}\"", recipient.id, listing.title);
                    report.sent += 1;
                }
                Err(err) => {
                    error!("Failed to notify recipient {}: {}", recipient.id, err);
                    report.failed += 1;
                    failures.push(DeliveryFailure {
                        recipient_id: recipient.id.clone(),
                        listing_slug: listing.slug.clone(),
                        reason: err.to_string(),
                    });
                }
            }

            if !self.send_delay.is_zero() {
                tokio::time::sleep(self.send_delay).await;
            }
        }

        report
    }
}
