// Unit tests for Earn Notify

use earn_notify::core::{
    filters::{is_eligible, matches_skills, within_usd_range},
    formatter::{reward_text, MessageFormatter},
};
use earn_notify::models::{CompensationType, Listing, ListingType, Preferences, Sponsor};

fn create_listing(kind: ListingType, usd_value: Option<f64>, skills: &[&str]) -> Listing {
    Listing {
        slug: "listing".to_string(),
        title: "Listing".to_string(),
        kind,
        usd_value,
        compensation_type: CompensationType::Fixed,
        min_reward_ask: None,
        max_reward_ask: None,
        token: None,
        reward_amount: None,
        skills: skills.iter().map(|s| s.to_string()).collect(),
        deadline: None,
        sponsor: Sponsor { name: "Sponsor".to_string() },
        published_at: None,
    }
}

fn preferences(
    bounties: bool,
    projects: bool,
    min: Option<f64>,
    max: Option<f64>,
    skills: &[&str],
) -> Preferences {
    Preferences {
        min_usd_value: min,
        max_usd_value: max,
        bounties,
        projects,
        skills: skills.iter().map(|s| s.to_string()).collect(),
    }
}

#[test]
fn test_scenario_a_eligible() {
    let listing = create_listing(ListingType::Bounty, Some(500.0), &["Rust"]);
    let prefs = preferences(true, false, Some(100.0), Some(1000.0), &["Rust", "Go"]);

    assert!(is_eligible(&listing, &prefs));
}

#[test]
fn test_scenario_b_type_filter() {
    let listing = create_listing(ListingType::Bounty, Some(500.0), &["Rust"]);
    let prefs = preferences(false, false, Some(100.0), Some(1000.0), &["Rust", "Go"]);

    assert!(!is_eligible(&listing, &prefs));
}

#[test]
fn test_scenario_c_range_filter() {
    let listing = create_listing(ListingType::Project, Some(5000.0), &[]);
    let prefs = preferences(true, true, None, Some(1000.0), &[]);

    assert!(!is_eligible(&listing, &prefs));
}

#[test]
fn test_unknown_usd_value_never_rejected_by_range() {
    let listing = create_listing(ListingType::Bounty, None, &[]);
    let bounds = [
        (None, None),
        (Some(0.0), Some(0.0)),
        (Some(1_000_000.0), None),
        (None, Some(1.0)),
        (Some(500.0), Some(100.0)),
    ];

    for (min, max) in bounds {
        let prefs = preferences(true, true, min, max, &[]);
        assert!(within_usd_range(&listing, &prefs), "rejected with min={:?} max={:?}", min, max);
    }
}

#[test]
fn test_empty_preference_skills_never_reject() {
    let prefs = preferences(true, true, None, None, &[]);

    for skills in [&[][..], &["Rust"][..], &["Design", "Writing"][..]] {
        let listing = create_listing(ListingType::Bounty, Some(10.0), skills);
        assert!(matches_skills(&listing, &prefs));
    }
}

#[test]
fn test_empty_listing_skills_never_reject() {
    let listing = create_listing(ListingType::Bounty, Some(10.0), &[]);

    for skills in [&[][..], &["Rust"][..], &["Design", "Writing"][..]] {
        let prefs = preferences(true, true, None, None, skills);
        assert!(matches_skills(&listing, &prefs));
    }
}

#[test]
fn test_disjoint_skills_reject() {
    let listing = create_listing(ListingType::Bounty, Some(10.0), &["Frontend", "Design"]);
    let prefs = preferences(true, true, None, None, &["Rust", "Go"]);

    assert!(!is_eligible(&listing, &prefs));
}

#[test]
fn test_scenario_d_variable_comp() {
    for usd_value in [None, Some(0.0), Some(750.0)] {
        let mut listing = create_listing(ListingType::Project, usd_value, &[]);
        listing.compensation_type = CompensationType::Variable;
        listing.min_reward_ask = Some(100.0);
        listing.max_reward_ask = Some(200.0);

        assert_eq!(reward_text(&listing), "Variable Comp");
    }
}

#[test]
fn test_formatter_idempotent() {
    let formatter = MessageFormatter::new("https://earn.superteam.fun/listings", "telegrambot");
    let mut listing = create_listing(ListingType::Project, Some(1200.0), &["Rust", "Solana"]);
    listing.token = Some("USDC".to_string());

    let first = formatter.format(&listing);
    let second = formatter.format(&listing);

    assert_eq!(first, second);
    assert_eq!(first.to_string(), second.to_string());
    assert_eq!(first.type_label, "Project");
    assert_eq!(first.reward, "1200 USDC ($1200)");
    assert_eq!(first.skills, "Rust, Solana");
    assert_eq!(first.deadline, "No deadline specified");
}
