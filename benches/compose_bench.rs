use chrono::{DateTime, Utc};
use content_dispatcher::views::{communities_document, community_document};
use content_dispatcher::{ProductProfile, RollingWindow, WindowUnit};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use std::hint::black_box;

fn now() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2024-06-01T00:00:00Z")
        .expect("valid timestamp")
        .with_timezone(&Utc)
}

fn profiles() -> Vec<(&'static str, ProductProfile)> {
    vec![
        ("default", ProductProfile::default()),
        (
            "extended",
            ProductProfile {
                alternative_title: true,
                extended_facts: true,
                image_metadata: true,
                ..Default::default()
            },
        ),
    ]
}

// Cutoff computation
fn benchmark_cutoff(c: &mut Criterion) {
    let mut group = c.benchmark_group("cutoff");
    for unit in [WindowUnit::Months, WindowUnit::Days] {
        let window = RollingWindow::new(7, unit);
        group.bench_with_input(BenchmarkId::new("compute", unit.as_str()), &window, |b, window| {
            b.iter(|| black_box(window.cutoff(black_box(now())).expect("in range")))
        });
    }
    group.finish();
}

// Document composition and serialization
fn benchmark_documents(c: &mut Criterion) {
    let cutoff = RollingWindow::new(2, WindowUnit::Months)
        .cutoff(now())
        .expect("in range");

    let mut group = c.benchmark_group("documents");
    for (name, profile) in profiles() {
        group.bench_with_input(BenchmarkId::new("community_list", name), &profile, |b, profile| {
            b.iter(|| {
                let doc = communities_document(black_box(profile), &cutoff);
                black_box(serde_json::to_vec(&doc).expect("serializable"))
            })
        });
        group.bench_with_input(BenchmarkId::new("community_detail", name), &profile, |b, profile| {
            b.iter(|| {
                let doc = community_document(black_box(profile), "communities/susya");
                black_box(serde_json::to_vec(&doc).expect("serializable"))
            })
        });
    }
    group.finish();
}

criterion_group!(benches, benchmark_cutoff, benchmark_documents);
criterion_main!(benches);
