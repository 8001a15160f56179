// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use criterion::{criterion_group, criterion_main, Criterion};
use tempo_core::{Executor, ScheduledExecutor};

fn bench_tick_throughput(c: &mut Criterion) {
    c.bench_function("executor_enqueue_run_1000", |b| {
        b.iter(|| {
            let executor = Executor::new();
            for _ in 0..1000 {
                executor.next_tick(|| Ok(()));
            }
            executor.run().unwrap();
        });
    });
}

fn bench_timer_scheduling(c: &mut Criterion) {
    c.bench_function("scheduler_mixed_delays_1000", |b| {
        b.iter(|| {
            let scheduler = ScheduledExecutor::new();
            for i in 0..1000u64 {
                scheduler.schedule_delayed(|| Ok(()), i % 50);
            }
            scheduler.run().unwrap();
        });
    });
}

criterion_group!(benches, bench_tick_throughput, bench_timer_scheduling);
criterion_main!(benches);
