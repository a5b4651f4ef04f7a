//! Tracker reconciliation cost at growing candidate counts.
//!
//! Each iteration swaps roughly a tenth of the candidate set, which is the
//! common case for creatures wandering in and out of view.
//!
//! Run with: `cargo bench --bench tracker_benchmarks`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use offscreen_core::prelude::*;

struct Window {
    ids: Vec<EntityId>,
    offset: usize,
    width: usize,
}

impl TrackPolicy<EntityId, Buffered<f32>> for Window {
    type Candidate = EntityId;

    fn candidates(&mut self) -> Vec<EntityId> {
        let len = self.ids.len();
        (0..self.width)
            .map(|i| self.ids[(self.offset + i) % len])
            .collect()
    }

    fn key(&self, c: &EntityId) -> EntityId {
        *c
    }

    fn exists(&mut self, c: &EntityId) -> bool {
        c.index() % 7 != 0
    }

    fn create(&mut self, _c: &EntityId) -> Buffered<f32> {
        Buffered::new(0.0)
    }
}

fn bench_reconcile(c: &mut Criterion) {
    let mut group = c.benchmark_group("tracker_update");
    for &width in &[10usize, 100, 1000] {
        let mut alloc = EntityAllocator::new();
        let ids: Vec<EntityId> = (0..width * 2).map(|_| alloc.allocate()).collect();
        group.bench_with_input(BenchmarkId::from_parameter(width), &width, |b, &width| {
            let mut tracker = Tracker::new();
            let mut window = Window {
                ids: ids.clone(),
                offset: 0,
                width,
            };
            b.iter(|| {
                window.offset = (window.offset + width / 10 + 1) % ids.len();
                black_box(tracker.update(&mut window));
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_reconcile);
criterion_main!(benches);
