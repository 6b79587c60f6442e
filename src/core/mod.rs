// Core pipeline exports
pub mod dispatcher;
pub mod filters;
pub mod formatter;
pub mod traits;

pub use dispatcher::{DeliveryFailure, DispatchError, DispatchOutcome, Dispatcher, ListingAnomaly, ListingReport};
pub use filters::{is_eligible, matches_listing_type, matches_region, matches_skills, within_usd_range};
pub use formatter::MessageFormatter;
pub use traits::{DeliveryChannel, DeliveryError, ListingSource, PreferenceStore, SourceError, StoreError};
