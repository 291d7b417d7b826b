//! Benchmarks for SB8200 status page collection

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use sb8200::{html, Collector, RawTable, Table};

const STATUS_PAGE: &str = include_str!("../tests/fixtures/cmconnectionstatus.html");

fn generate_downstream(channels: usize) -> RawTable {
    let mut cells = vec![vec![
        "Channel ID".to_string(),
        "Lock Status".to_string(),
        "Modulation".to_string(),
        "Frequency".to_string(),
        "Power".to_string(),
        "SNR/MER".to_string(),
        "Corrected".to_string(),
        "Uncorrectables".to_string(),
    ]];
    for i in 0..channels {
        cells.push(vec![
            (i + 1).to_string(),
            "Locked".to_string(),
            "QAM256".to_string(),
            format!("{} Hz", 549_000_000 + i * 6_000_000),
            format!("{:.1} dBmV", 5.0 - (i % 10) as f64 * 0.3),
            format!("{:.1} dB", 43.0 - (i % 5) as f64 * 0.2),
            (i * 17).to_string(),
            (i % 3).to_string(),
        ]);
    }
    RawTable::new(Some("Downstream Bonded Channels"), cells)
}

fn bench_page(c: &mut Criterion) {
    let mut group = c.benchmark_group("page");
    let collector = Collector::new();

    group.bench_function("parse_tables", |b| {
        b.iter(|| {
            let tables = html::parse_tables(black_box(STATUS_PAGE));
            black_box(tables);
        })
    });

    group.bench_function("collect_page", |b| {
        b.iter(|| {
            let obs = collector.collect_page(black_box(STATUS_PAGE));
            black_box(obs);
        })
    });

    group.finish();
}

fn bench_tables(c: &mut Criterion) {
    let mut group = c.benchmark_group("tables");
    let collector = Collector::new();

    // 32 is a full DOCSIS 3.0 bonding group
    let table = generate_downstream(32);
    group.throughput(Throughput::Elements(32));

    group.bench_function("extract_32_channels", |b| {
        b.iter(|| {
            let extracted = Table::extract(black_box(&table));
            black_box(extracted);
        })
    });

    group.bench_function("collect_32_channels", |b| {
        b.iter(|| {
            let obs = collector.collect_tables(std::slice::from_ref(&table));
            black_box(obs);
        })
    });

    group.finish();
}

criterion_group!(benches, bench_page, bench_tables);
criterion_main!(benches);
