use chrono::{Days, NaiveDate};
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};

use xplog::{
    core::tracker::Tracker,
    entry::{LogDraft, XpLogEntry},
    persist::memory::MemoryStore,
    stats::{domain_stats, recent_logs},
};

fn base_day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, 1).expect("valid date")
}

fn entry(i: u64) -> XpLogEntry {
    XpLogEntry {
        domain: format!("D{}", i % 8),
        task: format!("task {i}"),
        xp: (i % 90 + 1) as u32,
        date: base_day() + Days::new(i % 365),
    }
}

fn bench_appends(c: &mut Criterion) {
    c.bench_function("tracker_append_1k", |b| {
        b.iter(|| {
            let mut tracker = Tracker::new(MemoryStore::default());
            for i in 0..1_000u64 {
                tracker
                    .append_log_on(
                        LogDraft {
                            domain: format!("D{}", i % 8),
                            task: format!("task {i}"),
                            xp: (i % 90 + 1) as u32,
                        },
                        base_day() + Days::new(i % 365),
                    )
                    .expect("append");
            }
        });
    });
}

fn bench_domain_stats(c: &mut Criterion) {
    let logs: Vec<XpLogEntry> = (0..50_000).map(entry).collect();
    c.bench_function("domain_stats_50k", |b| {
        b.iter(|| {
            let _ = domain_stats(&logs);
        });
    });
}

fn bench_recent_window(c: &mut Criterion) {
    let mut group = c.benchmark_group("recent_logs");
    let logs: Vec<XpLogEntry> = (0..50_000).map(entry).collect();
    let today = base_day() + Days::new(365);

    for days in [7u64, 30, 90] {
        group.bench_with_input(BenchmarkId::from_parameter(days), &days, |b, &days| {
            b.iter(|| {
                let _ = recent_logs(&logs, days, today);
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_appends, bench_domain_stats, bench_recent_window);
criterion_main!(benches);
