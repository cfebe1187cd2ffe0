// Criterion benchmarks for Yonder Match

use chrono::{Duration, TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use yonder_match::core::{calculate_match_score, Scorer};
use yonder_match::models::{Actor, ActorRole, Region, ScoringWeights};

fn make_candidate(id: usize) -> Actor {
    let regions = ["QLD", "NSW", "VIC", "WA"];
    let skills = ["Agriculture", "Hospitality", "Marketing", "Construction", "Retail"];

    Actor {
        actor_id: format!("cand-{}", id),
        role: ActorRole::Candidate,
        display_name: format!("Candidate {}", id),
        headline: None,
        skills: skills
            .iter()
            .take(1 + id % skills.len())
            .map(|s| s.to_string())
            .collect(),
        industries: Default::default(),
        location: Region::new(regions[id % regions.len()]),
        available_from: Some(
            Utc.with_ymd_and_hms(2025, 8, 1, 0, 0, 0).unwrap().date_naive()
                + Duration::days((id % 60) as i64),
        ),
        visa_tag: None,
        updated_at: Utc.with_ymd_and_hms(2025, 7, 1, 0, 0, 0).unwrap()
            + Duration::minutes(id as i64),
        contact: None,
    }
}

fn make_viewer() -> Actor {
    let mut viewer = make_candidate(0);
    viewer.actor_id = "emp-1".to_string();
    viewer.role = ActorRole::Employer;
    viewer.skills = ["Agriculture".to_string(), "Hospitality".to_string()]
        .into_iter()
        .collect();
    viewer.location = Region::new("QLD");
    viewer.available_from = Some(Utc.with_ymd_and_hms(2025, 9, 1, 0, 0, 0).unwrap().date_naive());
    viewer
}

fn bench_match_score(c: &mut Criterion) {
    let viewer = make_viewer();
    let candidate = make_candidate(7);
    let weights = ScoringWeights::default();

    c.bench_function("calculate_match_score", |b| {
        b.iter(|| calculate_match_score(black_box(&viewer), black_box(&candidate), &weights));
    });
}

fn bench_ranking(c: &mut Criterion) {
    let viewer = make_viewer();
    let scorer = Scorer::with_default_weights();

    let mut group = c.benchmark_group("rank_candidates");
    for size in [10usize, 100, 1000] {
        let candidates: Vec<Actor> = (1..=size).map(make_candidate).collect();
        group.bench_with_input(BenchmarkId::from_parameter(size), &candidates, |b, cands| {
            b.iter(|| scorer.rank(black_box(&viewer), black_box(cands)));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_match_score, bench_ranking);
criterion_main!(benches);
