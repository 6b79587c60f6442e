use crate::models::{Listing, ListingType, Preferences};

/// Check whether a listing should be delivered to a recipient
///
/// Every filter below must pass. The checks are independent of each other and
/// free of side effects, so the order only matters for short-circuiting.
#[inline]
pub fn is_eligible(listing: &Listing, preferences: &Preferences) -> bool {
    matches_listing_type(listing, preferences)
        && within_usd_range(listing, preferences)
        && matches_skills(listing, preferences)
        && matches_region(listing, preferences)
}

/// Type filter: bounties and projects are opted into separately
#[inline]
pub fn matches_listing_type(listing: &Listing, preferences: &Preferences) -> bool {
    match listing.kind {
        ListingType::Bounty => preferences.bounties,
        ListingType::Project => preferences.projects,
    }
}

/// Value-range filter
///
/// Listings without a known USD value always pass.
#[inline]
pub fn within_usd_range(listing: &Listing, preferences: &Preferences) -> bool {
    let Some(value) = listing.usd_value else {
        return true;
    };

    if let Some(min) = preferences.min_usd_value {
        if value < min {
            return false;
        }
    }

    if let Some(max) = preferences.max_usd_value {
        if value > max {
            return false;
        }
    }

    true
}

/// Skill filter: at least one tag in common, case-sensitive
///
/// Skipped when either side has no skills.
#[inline]
pub fn matches_skills(listing: &Listing, preferences: &Preferences) -> bool {
    if preferences.skills.is_empty() || listing.skills.is_empty() {
        return true;
    }

    listing
        .skills
        .iter()
        .any(|skill| preferences.skills.contains(skill))
}

/// Region filter. Every recipient is currently treated as globally eligible.
#[inline]
pub fn matches_region(_listing: &Listing, _preferences: &Preferences) -> bool {
    true
}
