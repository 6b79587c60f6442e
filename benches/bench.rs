// Criterion benchmarks for Earn Notify

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use earn_notify::core::{filters::is_eligible, MessageFormatter};
use earn_notify::models::{CompensationType, Listing, ListingType, Preferences, Sponsor};

const SKILLS: &[&str] = &[
    "Rust", "Go", "Frontend", "Backend", "Design", "Writing", "Research", "Solana", "Video", "Growth",
];

fn create_listing(id: usize) -> Listing {
    Listing {
        slug: format!("listing-{}", id),
        title: format!("Listing {}", id),
        kind: if id % 2 == 0 { ListingType::Bounty } else { ListingType::Project },
        usd_value: if id % 5 == 0 { None } else { Some((id * 100) as f64) },
        compensation_type: CompensationType::Fixed,
        min_reward_ask: None,
        max_reward_ask: None,
        token: Some("USDC".to_string()),
        reward_amount: Some((id * 100) as f64),
        skills: vec![SKILLS[id % SKILLS.len()].to_string(), SKILLS[(id + 3) % SKILLS.len()].to_string()],
        deadline: None,
        sponsor: Sponsor { name: "Sponsor".to_string() },
        published_at: None,
    }
}

fn create_preferences(id: usize) -> Preferences {
    Preferences {
        min_usd_value: Some(100.0),
        max_usd_value: Some(5000.0),
        bounties: true,
        projects: id % 3 == 0,
        skills: vec![SKILLS[id % SKILLS.len()].to_string()],
    }
}

fn bench_is_eligible(c: &mut Criterion) {
    let listing = create_listing(7);
    let preferences = create_preferences(7);

    c.bench_function("is_eligible", |b| {
        b.iter(|| is_eligible(black_box(&listing), black_box(&preferences)));
    });
}

fn bench_format(c: &mut Criterion) {
    let formatter = MessageFormatter::default();
    let listing = create_listing(7);

    c.bench_function("format_message", |b| {
        b.iter(|| formatter.format(black_box(&listing)).to_string());
    });
}

fn bench_eligibility_matrix(c: &mut Criterion) {
    let mut group = c.benchmark_group("eligibility_matrix");

    for recipients in [100usize, 1_000, 10_000] {
        let listings: Vec<Listing> = (0..20).map(create_listing).collect();
        let preferences: Vec<Preferences> = (0..recipients).map(create_preferences).collect();

        group.bench_with_input(BenchmarkId::from_parameter(recipients), &recipients, |b, _| {
            b.iter(|| {
                listings
                    .iter()
                    .map(|listing| preferences.iter().filter(|p| is_eligible(listing, p)).count())
                    .sum::<usize>()
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_is_eligible, bench_format, bench_eligibility_matrix);
criterion_main!(benches);
