//! Performance benchmarks for OpenCanvas core operations
//!
//! Run with: `cargo bench -p opencanvas-core`
//!
//! These benchmarks measure the grouping critical path:
//! - Document parse and byte-preserving re-serialization
//! - Full grouping pass without file I/O
//! - Full grouping pass with file content reads from an in-memory vault

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use opencanvas_core::models::CanvasDocument;
use opencanvas_core::services::{CanvasGrouper, NodeNormalizer};
use opencanvas_core::storage::InMemoryFileResolver;
use opencanvas_core::FilterRule;
use serde_json::json;
use std::sync::Arc;
use tokio::runtime::Runtime;

/// Generate a canvas with `node_count` nodes cycling through every node type
fn generate_canvas(node_count: usize) -> String {
    let hosts = ["github.com", "docs.rs", "crates.io", "example.org"];
    let nodes: Vec<_> = (0..node_count)
        .map(|i| {
            let (x, y) = ((i % 50) as i64 * 250, (i / 50) as i64 * 150);
            match i % 4 {
                0 => json!({"id": format!("n{}", i), "type": "text", "text": format!("Note {}", i),
                            "x": x, "y": y, "width": 200, "height": 100}),
                1 => json!({"id": format!("n{}", i), "type": "file", "file": format!("notes/{}.txt", i % 10),
                            "x": x, "y": y, "width": 200, "height": 100, "color": "4"}),
                2 => json!({"id": format!("n{}", i), "type": "link",
                            "url": format!("https://{}/page/{}", hosts[i % hosts.len()], i),
                            "x": x, "y": y, "width": 200, "height": 100}),
                _ => json!({"id": format!("n{}", i), "type": "group", "label": "Group",
                            "x": x, "y": y, "width": 400, "height": 300}),
            }
        })
        .collect();
    json!({"nodes": nodes, "edges": []}).to_string()
}

fn rules() -> Vec<FilterRule> {
    vec![
        FilterRule::new("GitHub", "github.com"),
        FilterRule::new("Docs", "docs.rs"),
        FilterRule::new("Crates", "crates.io"),
    ]
}

/// Benchmark parse plus re-serialization of a 1000-node document
fn bench_document_round_trip(c: &mut Criterion) {
    let text = generate_canvas(1000);

    c.bench_function("document_round_trip_1000", |b| {
        b.iter(|| {
            let document = CanvasDocument::parse(black_box(&text)).unwrap();
            black_box(document.to_json_pretty().unwrap());
        });
    });
}

/// Benchmark grouping passes of increasing size
///
/// Target: a 1000-node canvas groups well under one frame (16ms)
fn bench_grouping_pass(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let rules = rules();
    let grouper = CanvasGrouper::default();

    let mut group = c.benchmark_group("grouping_pass");
    for size in [100, 1000] {
        let text = generate_canvas(size);
        group.bench_function(format!("{}_nodes", size), |b| {
            b.iter(|| rt.block_on(async { black_box(grouper.group(&text, &rules).await) }));
        });
    }
    group.finish();
}

/// Benchmark a grouping pass that reads file content for every file node
fn bench_grouping_with_file_content(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let rules = rules();
    let text = generate_canvas(1000);

    let resolver = InMemoryFileResolver::with_files(
        (0..10).map(|i| (format!("notes/{}.txt", i), "line of text\n".repeat(50))),
    );
    let grouper = CanvasGrouper::new(NodeNormalizer::default().with_resolver(Arc::new(resolver)));

    let mut group = c.benchmark_group("grouping_pass");
    group.sample_size(20);
    group.bench_function("1000_nodes_with_file_content", |b| {
        b.iter(|| rt.block_on(async { black_box(grouper.group(&text, &rules).await) }));
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_document_round_trip,
    bench_grouping_pass,
    bench_grouping_with_file_content
);
criterion_main!(benches);
