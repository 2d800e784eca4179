use std::sync::Arc;

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use chronicle_core::{Capability, CapabilityDefinition, Event, EventSourced, HandlerTable, StreamId};
use chronicle_infra::event_store::InMemoryEventStore;

#[derive(Debug, Clone)]
struct Adjusted {
    delta: i64,
}

impl Event for Adjusted {
    fn event_type(&self) -> &'static str {
        "Adjusted"
    }
}

/// Minimal aggregate: a running balance.
#[derive(Debug, Clone)]
struct Balance {
    amount: i64,
    capability: Capability<Balance>,
}

impl Balance {
    fn new(definition: &CapabilityDefinition<Balance>) -> Self {
        Self {
            amount: 0,
            capability: definition.capability(),
        }
    }

    fn apply_adjusted(&mut self, event: &Adjusted) {
        self.amount += event.delta;
    }
}

impl EventSourced for Balance {
    type Event = Adjusted;
    type Store = InMemoryEventStore<Adjusted>;

    fn register_handlers(handlers: &mut HandlerTable<Self>) {
        handlers.on_type("Adjusted", Balance::apply_adjusted);
    }

    fn capability(&self) -> &Capability<Self> {
        &self.capability
    }

    fn capability_mut(&mut self) -> &mut Capability<Self> {
        &mut self.capability
    }
}

fn bench_apply_latency(c: &mut Criterion) {
    let mut group = c.benchmark_group("apply_latency");
    group.sample_size(1000);

    let definition = CapabilityDefinition::<Balance>::new();
    group.bench_function("apply_single_event", |b| {
        b.iter(|| {
            let mut balance = Balance::new(&definition);
            balance.apply(Adjusted { delta: 1 }).unwrap();
            black_box(balance.amount);
        });
    });

    group.finish();
}

fn bench_store_throughput(c: &mut Criterion) {
    let mut group = c.benchmark_group("store_throughput");

    for batch_size in [1, 10, 100, 1000].iter() {
        group.throughput(Throughput::Elements(*batch_size as u64));
        group.bench_with_input(
            BenchmarkId::new("store_buffer", batch_size),
            batch_size,
            |b, &size| {
                let store = Arc::new(InMemoryEventStore::new());
                let definition = CapabilityDefinition::<Balance>::with_event_store(store);
                let stream = StreamId::from("balance-bench");

                b.iter(|| {
                    let mut balance = Balance::new(&definition);
                    for i in 0..size {
                        balance.apply(Adjusted { delta: i as i64 }).unwrap();
                    }
                    balance.store_to(&stream).unwrap();
                    black_box(balance.amount);
                });
            },
        );
    }

    group.finish();
}

fn bench_replay_speed(c: &mut Criterion) {
    let mut group = c.benchmark_group("replay_speed");

    for event_count in [10, 100, 1000, 10000].iter() {
        group.throughput(Throughput::Elements(*event_count as u64));
        group.bench_with_input(
            BenchmarkId::new("load_stream", event_count),
            event_count,
            |b, &count| {
                let store = Arc::new(InMemoryEventStore::new());
                let definition = CapabilityDefinition::<Balance>::with_event_store(store);
                let stream = StreamId::from("balance-bench");

                // Pre-populate the stream.
                let mut seed = Balance::new(&definition);
                for i in 0..count {
                    seed.apply(Adjusted { delta: i as i64 }).unwrap();
                }
                seed.store_to(&stream).unwrap();

                b.iter(|| {
                    let balance = Balance::new(&definition).loaded(&stream).unwrap();
                    black_box(balance.amount);
                });
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_apply_latency,
    bench_store_throughput,
    bench_replay_speed
);
criterion_main!(benches);
