//! Benchmarks for the front-panel hot path.
//!
//! Measures the pure parts of a transaction: feeding keys through the state
//! machine, rendering screens and formatting the ledger line. Peripheral I/O
//! is excluded.
//!
//! # Run Benchmarks
//!
//! ```sh
//! cargo bench --bench panel_bench
//!
//! # Compare against a saved baseline
//! cargo bench --bench panel_bench -- --save-baseline main
//! cargo bench --bench panel_bench -- --baseline main
//! ```

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use rollcall_core::{Identifier, TimeStamp, TransactionKind, Weekday};
use rollcall_hardware::KeypadKey;
use rollcall_panel::render::{Outcome, home_screen, result_screen, status_screen};
use rollcall_panel::{ScreenText, StateMachine};
use rollcall_storage::{Directory, LedgerRecord};
use std::hint::black_box;

fn keys(symbols: &str) -> Vec<KeypadKey> {
    symbols.chars().filter_map(KeypadKey::from_symbol).collect()
}

/// Key sequences through the state machine, from Idle back to Idle.
fn bench_state_machine(c: &mut Criterion) {
    let mut group = c.benchmark_group("state_machine");

    let sequences = [
        ("arrival", "*12#"),
        ("abort", "D4C"),
        ("noisy_entry", "*#AB*1D#2AB#"),
    ];

    for (name, symbols) in sequences {
        let keys = keys(symbols);
        group.throughput(Throughput::Elements(keys.len() as u64));
        group.bench_with_input(BenchmarkId::new("apply", name), &keys, |b, keys| {
            b.iter(|| {
                let mut machine = StateMachine::new();
                for &key in keys {
                    black_box(machine.apply(black_box(key)));
                }
                machine.pause_elapsed();
                black_box(machine.current_state())
            });
        });
    }

    group.finish();
}

/// Screen rendering for every screen that reads the clock.
fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("render");
    let now = TimeStamp::new(Weekday::Fri, (12, 5, 23), (16, 32, 0)).unwrap();
    let outcome = Outcome::Recorded {
        kind: TransactionKind::Arrival,
        identifier: Identifier::new(12).unwrap(),
        name: "Asha".to_string(),
        persisted: true,
    };

    group.bench_function("home", |b| {
        b.iter(|| black_box(home_screen(black_box(Some(&now)), ScreenText::MENU_HINT)))
    });
    group.bench_function("home_clock_fault", |b| {
        b.iter(|| black_box(home_screen(black_box(None), ScreenText::MENU_HINT)))
    });
    group.bench_function("status", |b| {
        b.iter(|| black_box(status_screen("192.168.4.1", black_box(Some(&now)))))
    });
    group.bench_function("result", |b| {
        b.iter(|| black_box(result_screen(black_box(&outcome))))
    });

    group.finish();
}

/// Ledger line formatting and directory lookup for one confirmation.
fn bench_record(c: &mut Criterion) {
    let mut group = c.benchmark_group("record");
    group.throughput(Throughput::Elements(1));

    let now = TimeStamp::new(Weekday::Fri, (12, 5, 23), (16, 32, 0)).unwrap();
    let json = (0..100)
        .map(|id| format!(r#"{{"id": {id}, "name": "Member {id}"}}"#))
        .collect::<Vec<_>>()
        .join(",");
    let directory = Directory::from_json(&format!("[{json}]")).unwrap();

    group.bench_function("lookup_and_format", |b| {
        b.iter(|| {
            let identifier = Identifier::new(black_box(42)).unwrap();
            let name = directory.lookup(identifier).unwrap();
            let record = LedgerRecord::new(now, identifier, name, TransactionKind::Departure);
            black_box(record.to_csv_line())
        });
    });

    group.bench_function("directory_parse_100", |b| {
        let json = format!("[{json}]");
        b.iter(|| black_box(Directory::from_json(black_box(&json))))
    });

    group.finish();
}

criterion_group!(benches, bench_state_machine, bench_render, bench_record);
criterion_main!(benches);
