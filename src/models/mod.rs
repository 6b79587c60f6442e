// Model exports
pub mod domain;
pub mod message;

pub use domain::{CompensationType, Listing, ListingType, Preferences, Recipient, RecipientId, Sponsor};
pub use message::NotificationMessage;
