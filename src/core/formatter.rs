use crate::models::{CompensationType, Listing, NotificationMessage};

pub const DEFAULT_LISTING_BASE_URL: &str = "https://earn.superteam.fun/listings";
pub const DEFAULT_UTM_SOURCE: &str = "telegrambot";

/// Turns listings into notification messages
///
/// Formatting is pure: the same listing always yields the same message.
#[derive(Debug, Clone)]
pub struct MessageFormatter {
    listing_base_url: String,
    utm_source: String,
}

impl MessageFormatter {
    pub fn new(listing_base_url: impl Into<String>, utm_source: impl Into<String>) -> Self {
        let listing_base_url: String = listing_base_url.into();

        Self {
            listing_base_url: listing_base_url.trim_end_matches('/').to_string(),
            utm_source: utm_source.into(),
        }
    }

    /// Build the notification for a listing
    pub fn format(&self, listing: &Listing) -> NotificationMessage {
        NotificationMessage {
            type_label: listing.kind.label().to_string(),
            title: listing.title.clone(),
            reward: reward_text(listing),
            sponsor: listing.sponsor.name.clone(),
            skills: skills_text(listing),
            deadline: deadline_text(listing),
            url: self.listing_url(&listing.slug),
        }
    }

    /// Tracked outbound link to the listing page
    pub fn listing_url(&self, slug: &str) -> String {
        format!(
            "{}/{}?utm_source={}",
            self.listing_base_url,
            urlencoding::encode(slug),
            urlencoding::encode(&self.utm_source)
        )
    }
}

impl Default for MessageFormatter {
    fn default() -> Self {
        Self::new(DEFAULT_LISTING_BASE_URL, DEFAULT_UTM_SOURCE)
    }
}

/// Reward line; the first matching rule wins
pub fn reward_text(listing: &Listing) -> String {
    match listing.compensation_type {
        CompensationType::Variable => return "Variable Comp".to_string(),
        CompensationType::Range => {
            if let (Some(min), Some(max)) = (listing.min_reward_ask, listing.max_reward_ask) {
                return format!("${} - ${}", min, max);
            }
        }
        CompensationType::Fixed => {}
    }

    match listing.usd_value {
        Some(usd) => {
            let amount = listing.reward_amount.unwrap_or(usd);
            let token = listing
                .token
                .as_deref()
                .map(|t| format!(" {}", t))
                .unwrap_or_default();
            format!("{}{} (${})", amount, token, usd)
        }
        None => "Amount TBD".to_string(),
    }
}

/// Deadline rendered as e.g. `Mar 5, 2025` (UTC, English month names)
pub fn deadline_text(listing: &Listing) -> String {
    listing
        .deadline
        .map(|deadline| deadline.format("%b %-d, %Y").to_string())
        .unwrap_or_else(|| "No deadline specified".to_string())
}

pub fn skills_text(listing: &Listing) -> String {
    if listing.skills.is_empty() {
        "Not specified".to_string()
    } else {
        listing.skills.join(", ")
    }
}
