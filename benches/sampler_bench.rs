use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use proctop::app::{App, SortKey, sort_processes};
use proctop::config::Config;
use proctop::system::delta::{self, TickMap};
use proctop::system::sampler::{Sampler, parse_cpu_snapshot};
use proctop::system::snapshot::{MemorySnapshot, ProcessSnapshot};
use proctop::ui;
use ratatui::Terminal;
use ratatui::backend::TestBackend;
use std::fmt::Write;
use std::hint::black_box;

fn make_stat(cores: usize) -> String {
    let mut out = String::from("cpu  104729 3571 88211 990037 1223 407 211 97 53 11\n");
    for core in 0..cores {
        let _ = writeln!(
            out,
            "cpu{core} {} 446 11026 123754 152 50 26 12 6 1",
            13091 + core * 7
        );
    }
    out.push_str("intr 987654321 0 0 0\nctxt 192837465\n");
    out
}

fn make_processes(n: usize) -> Vec<ProcessSnapshot> {
    (0..n)
        .map(|i| ProcessSnapshot {
            pid: i as u32 + 1,
            name: format!("proc_{i}"),
            state: if i % 7 == 0 { 'R' } else { 'S' },
            ticks: ((n - i) as u64 + 1) * 13,
            rss_kb: ((i % 500) as u64 + 1) * 256,
            uid: (i % 8) as u32 + 1000,
        })
        .collect()
}

fn bench_parse_cpu_snapshot(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_cpu_snapshot_8_64_256");

    for cores in [8usize, 64, 256] {
        let content = make_stat(cores);
        group.bench_with_input(
            BenchmarkId::from_parameter(cores),
            &content,
            |b, content| {
                b.iter(|| {
                    let snap = parse_cpu_snapshot(black_box(content));
                    black_box(snap);
                })
            },
        );
    }

    group.finish();
}

fn bench_derive_and_sort(c: &mut Criterion) {
    let mut group = c.benchmark_group("derive_and_sort_500_1000_2000");

    for size in [500usize, 1000, 2000] {
        let processes = make_processes(size);
        let prev_ticks: TickMap = processes.iter().map(|p| (p.pid, p.ticks / 2)).collect();
        group.bench_with_input(
            BenchmarkId::from_parameter(size),
            &processes,
            |b, processes| {
                b.iter(|| {
                    let (mut derived, next_ticks) = delta::derive(
                        black_box(processes.clone()),
                        &prev_ticks,
                        400,
                        8,
                        16_000_000,
                    );
                    sort_processes(&mut derived, SortKey::Cpu);
                    black_box((derived, next_ticks));
                })
            },
        );
    }

    group.finish();
}

fn bench_dashboard_draw(c: &mut Criterion) {
    let mut group = c.benchmark_group("dashboard_draw_500_1000_2000");

    for size in [500usize, 1000, 2000] {
        let mut app = App::with_sampler(Config::default(), Sampler::at_root("/nonexistent"));
        let (mut derived, _) = delta::derive(make_processes(size), &TickMap::new(), 400, 8, 16_000_000);
        sort_processes(&mut derived, SortKey::Cpu);
        app.processes = derived;
        app.core_percents = (0..8).map(|id| (id, (id as f64) * 11.0)).collect();
        app.global_cpu_percent = 44.0;
        app.memory = MemorySnapshot {
            total_kb: 16_000_000,
            available_kb: 4_000_000,
            swap_total_kb: 2_000_000,
            swap_free_kb: 1_500_000,
        };

        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| {
                let backend = TestBackend::new(160, 50);
                let mut terminal = Terminal::new(backend).expect("bench terminal init failed");
                terminal
                    .draw(|frame| ui::draw(frame, black_box(&mut app)))
                    .expect("bench draw failed");
                black_box(terminal.backend());
            })
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_parse_cpu_snapshot,
    bench_derive_and_sort,
    bench_dashboard_draw
);
criterion_main!(benches);
