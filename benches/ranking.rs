//! Ranking and Aggregation Benchmarks
//!
//! Run with: cargo bench --bench ranking

use chrono::{Duration, Utc};
use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use uuid::Uuid;
use verifyd::model::{Entity, Review};
use verifyd::reviews::{aggregate_reviews, rating_distribution};
use verifyd::search::rank_entities;

fn entities(n: usize) -> Vec<Entity> {
    (0..n)
        .map(|i| {
            let mut e = Entity::named(&format!("Listing {}", i));
            e.industry = Some(if i % 3 == 0 { "Education" } else { "Healthcare" }.to_string());
            e.category_tags = vec!["school".to_string(), "clinic".to_string()];
            e.keywords = vec![format!("kw{}", i)];
            e.description = Some("A listing used for benchmarking".to_string());
            e
        })
        .collect()
}

fn reviews(n: usize, users: usize) -> Vec<Review> {
    let entity = Uuid::new_v4();
    let user_ids: Vec<Uuid> = (0..users).map(|_| Uuid::new_v4()).collect();
    let start = Utc::now();
    (0..n)
        .map(|i| Review {
            id: Uuid::new_v4(),
            user_id: user_ids[i % users],
            business_id: entity,
            rating: (i % 5) as i32 + 1,
            content: "Benchmark review".to_string(),
            created_at: start - Duration::minutes(i as i64),
            is_proof_submitted: false,
            is_verified: false,
            custom_verification_tag: None,
            proof_url: None,
            upvotes: 0,
            downvotes: 0,
            business_response: None,
            business_response_at: None,
            profile: None,
        })
        .collect()
}

fn benchmark_rank_entities(c: &mut Criterion) {
    let mut group = c.benchmark_group("rank_entities");

    for size in [100, 1000, 10000].iter() {
        let input = entities(*size);
        group.throughput(Throughput::Elements(*size as u64));
        group.bench_with_input(format!("{}_entities", size), &input, |b, input| {
            b.iter(|| rank_entities(black_box("edu"), black_box(input)));
        });
    }

    group.finish();
}

fn benchmark_aggregate_reviews(c: &mut Criterion) {
    let mut group = c.benchmark_group("aggregate_reviews");

    for size in [100, 1000, 10000].iter() {
        let input = reviews(*size, size / 4);
        group.throughput(Throughput::Elements(*size as u64));
        group.bench_with_input(format!("{}_rows", size), &input, |b, input| {
            b.iter(|| {
                let current = aggregate_reviews(black_box(input));
                rating_distribution(&current)
            });
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_rank_entities, benchmark_aggregate_reviews);
criterion_main!(benches);
