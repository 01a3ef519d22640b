//! Benchmarks for full-document registry rebuilds.
//!
//! Run with: cargo bench -p hxsync-widgets

use chrono::NaiveDate;
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use hxsync_core::config::SyncConfig;
use hxsync_core::dom::{Document, ElementSpec};
use hxsync_widgets::BuildContext;
use hxsync_widgets::provider::HeadlessProvider;
use hxsync_widgets::registry::Registries;
use std::hint::black_box;

/// A table of `rows` records, each with a tooltip, a date field, and two
/// affordances, the shape of a typical maintenance listing.
fn listing(rows: usize) -> Document {
    let rows = (0..rows).map(|i| {
        ElementSpec::new("tr").id(format!("row-{i}")).children([
            ElementSpec::new("td").child(ElementSpec::new("span").attr("data-bs-toggle", "tooltip")),
            ElementSpec::new("td").child(ElementSpec::new("input").attr("data-date-picker", "true")),
            ElementSpec::new("td").children([
                ElementSpec::new("button")
                    .attr("data-confirm", "delete")
                    .attr("hx-delete", format!("/records/{i}/")),
                ElementSpec::new("button")
                    .attr("data-confirm", "reactivate")
                    .attr("data-url", format!("/records/{i}/reactivate/")),
            ]),
        ])
    });
    Document::from_fragment([ElementSpec::new("table").children(rows)])
}

fn bench_rebuild_all(c: &mut Criterion) {
    let mut group = c.benchmark_group("registry/rebuild_all");
    let config = SyncConfig::default();
    let ctx = BuildContext {
        config: &config,
        today: NaiveDate::from_ymd_opt(2026, 10, 18).unwrap_or_default(),
    };

    for rows in [10, 100, 1000] {
        let doc = listing(rows);
        let mut provider = HeadlessProvider::new();
        let mut registries = Registries::new();
        group.bench_with_input(BenchmarkId::new("rows", rows), &(), |b, _| {
            b.iter(|| {
                let reports = registries.rebuild_all(&doc, &ctx, &mut provider);
                black_box(reports);
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_rebuild_all);
criterion_main!(benches);
