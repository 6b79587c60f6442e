// Service exports
pub mod earn;
pub mod postgres;
pub mod seen;
pub mod telegram;

pub use earn::{EarnClient, EarnError};
pub use postgres::{PostgresError, PostgresPreferenceStore};
pub use seen::{SeenKey, SeenListings, SeenListingsError};
pub use telegram::TelegramChannel;
