//! Spin throughput
//!
//! Full spins of both demo games in simulation mode (no act history), plus
//! one history-recording run of the cascade game for comparison.
//!
//! ```bash
//! cargo bench --bench spin_bench
//! ```

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use rf_slot_logic::{SlotLab, SpinRequest};

const SPINS: u64 = 1_000;

fn bench_spins(c: &mut Criterion) {
    let lab = SlotLab::builtin().unwrap();
    let request = SpinRequest::default();

    let mut group = c.benchmark_group("spin");
    group.throughput(Throughput::Elements(SPINS));

    for summary in lab.summary() {
        let mut machine = lab.new_machine(summary.game_id, true, Some(7)).unwrap();
        group.bench_with_input(
            BenchmarkId::new("sim", summary.logic.as_str()),
            &request,
            |b, request| {
                b.iter(|| {
                    for _ in 0..SPINS {
                        black_box(machine.spin(request).unwrap());
                    }
                })
            },
        );
    }

    let mut machine = lab.new_machine(1, false, Some(7)).unwrap();
    group.bench_with_input(BenchmarkId::new("history", "demo_cascade"), &request, |b, request| {
        b.iter(|| {
            for _ in 0..SPINS {
                black_box(machine.spin(request).unwrap());
            }
        })
    });

    group.finish();
}

criterion_group!(benches, bench_spins);
criterion_main!(benches);
