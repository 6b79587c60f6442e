//! Earn Notify - Telegram notifications for new Superteam Earn listings
//!
//! This library provides the dispatch pipeline used by the notification bot:
//! an eligibility predicate over per-user preferences, a message formatter and
//! a throttled dispatch engine with per-recipient failure isolation.

pub mod config;
pub mod core;
pub mod models;
pub mod services;

// Re-export commonly used types
pub use crate::core::{is_eligible, DispatchError, DispatchOutcome, Dispatcher, MessageFormatter};
pub use crate::core::{DeliveryChannel, DeliveryError, ListingSource, PreferenceStore};
pub use models::{Listing, ListingType, NotificationMessage, Preferences, Recipient, RecipientId};
