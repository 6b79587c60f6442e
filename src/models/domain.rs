use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use validator::Validate;

/// Kind of opportunity published on the listings feed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListingType {
    Bounty,
    Project,
}

impl ListingType {
    /// Human-readable label used in notifications
    pub fn label(&self) -> &'static str {
        match self {
            ListingType::Bounty => "Bounty",
            ListingType::Project => "Project",
        }
    }
}

/// How the sponsor pays out the reward
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompensationType {
    #[default]
    Fixed,
    Range,
    Variable,
}

/// Sponsoring entity of a listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sponsor {
    pub name: String,
}

/// A published bounty or project
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Listing {
    #[validate(length(min = 1))]
    pub slug: String,
    #[validate(length(min = 1))]
    pub title: String,
    #[serde(rename = "type")]
    pub kind: ListingType,
    #[serde(rename = "usdValue", default)]
    pub usd_value: Option<f64>,
    #[serde(rename = "compensationType", default)]
    pub compensation_type: CompensationType,
    #[serde(rename = "minRewardAsk", default)]
    pub min_reward_ask: Option<f64>,
    #[serde(rename = "maxRewardAsk", default)]
    pub max_reward_ask: Option<f64>,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(rename = "rewardAmount", default)]
    pub reward_amount: Option<f64>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub deadline: Option<DateTime<Utc>>,
    pub sponsor: Sponsor,
    #[serde(rename = "publishedAt", default)]
    pub published_at: Option<DateTime<Utc>>,
}

/// Chat identifier of a subscribed user
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecipientId(pub String);

impl RecipientId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecipientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecipientId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Stored notification filters of a recipient
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(rename = "minUsdValue", default)]
    pub min_usd_value: Option<f64>,
    #[serde(rename = "maxUsdValue", default)]
    pub max_usd_value: Option<f64>,
    pub bounties: bool,
    pub projects: bool,
    /// Empty means no skill filter
    #[serde(default)]
    pub skills: Vec<String>,
}

/// A subscribed user together with their stored preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recipient {
    pub id: RecipientId,
    #[serde(rename = "firstName", default)]
    pub first_name: Option<String>,
    /// `None` when the user never configured filters
    #[serde(default)]
    pub preferences: Option<Preferences>,
}
