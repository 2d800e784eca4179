//! Test fixtures: a counter aggregate and a scriptable in-memory store.

use std::collections::HashMap;
use std::sync::Mutex;

use thiserror::Error;

use crate::{
    Capability, CapabilityDefinition, Event, EventKind, EventSourced, EventStore, HandlerTable,
    StreamId,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Incremented {
    pub by: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reset;

/// Deliberately has no handler on `Counter`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Doubled;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CounterEvent {
    Incremented(Incremented),
    Reset(Reset),
    Doubled(Doubled),
}

impl Event for CounterEvent {
    fn event_type(&self) -> &'static str {
        match self {
            CounterEvent::Incremented(_) => "Incremented",
            CounterEvent::Reset(_) => "Reset",
            CounterEvent::Doubled(_) => "Doubled",
        }
    }
}

impl EventKind<CounterEvent> for Incremented {
    const EVENT_TYPE: &'static str = "Incremented";

    fn from_event(event: &CounterEvent) -> Option<&Self> {
        match event {
            CounterEvent::Incremented(e) => Some(e),
            _ => None,
        }
    }
}

impl EventKind<CounterEvent> for Reset {
    const EVENT_TYPE: &'static str = "Reset";

    fn from_event(event: &CounterEvent) -> Option<&Self> {
        match event {
            CounterEvent::Reset(e) => Some(e),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Counter {
    pub total: i64,
    capability: Capability<Counter>,
}

impl Counter {
    pub fn new(definition: &CapabilityDefinition<Counter>) -> Self {
        Self {
            total: 0,
            capability: definition.capability(),
        }
    }

    fn apply_incremented(&mut self, event: &Incremented) {
        self.total += event.by;
    }

    fn apply_reset(&mut self, _event: &Reset) {
        self.total = 0;
    }
}

impl EventSourced for Counter {
    type Event = CounterEvent;
    type Store = MemoryStore;

    fn aggregate_type() -> &'static str {
        "Counter"
    }

    fn register_handlers(handlers: &mut HandlerTable<Self>) {
        handlers
            .on::<Incremented>(Counter::apply_incremented)
            .on::<Reset>(Counter::apply_reset);
    }

    fn capability(&self) -> &Capability<Self> {
        &self.capability
    }

    fn capability_mut(&mut self) -> &mut Capability<Self> {
        &mut self.capability
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MemoryStoreError {
    #[error("store unavailable")]
    Unavailable,
}

#[derive(Debug, Default)]
struct MemoryStoreState {
    streams: HashMap<StreamId, Vec<CounterEvent>>,
    published: Vec<(String, CounterEvent)>,
    fail_reads: bool,
    publishes_left: Option<usize>,
}

/// Store double recording every publish; can be told to fail.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<MemoryStoreState>,
}

impl MemoryStore {
    pub fn seed(&self, stream: &str, events: impl IntoIterator<Item = CounterEvent>) {
        let mut state = self.state.lock().unwrap();
        state
            .streams
            .entry(StreamId::from(stream))
            .or_default()
            .extend(events);
    }

    pub fn events(&self, stream: &str) -> Vec<CounterEvent> {
        let state = self.state.lock().unwrap();
        state
            .streams
            .get(&StreamId::from(stream))
            .cloned()
            .unwrap_or_default()
    }

    pub fn published(&self) -> Vec<(String, CounterEvent)> {
        self.state.lock().unwrap().published.clone()
    }

    pub fn fail_reads(&self, fail: bool) {
        self.state.lock().unwrap().fail_reads = fail;
    }

    /// Let `n` more publishes succeed, then fail every following one.
    pub fn fail_publish_after(&self, n: usize) {
        self.state.lock().unwrap().publishes_left = Some(n);
    }
}

impl EventStore<CounterEvent> for MemoryStore {
    type Error = MemoryStoreError;

    fn read_stream_events_forward(
        &self,
        stream: &StreamId,
    ) -> Result<Vec<CounterEvent>, Self::Error> {
        let state = self.state.lock().unwrap();
        if state.fail_reads {
            return Err(MemoryStoreError::Unavailable);
        }
        Ok(state.streams.get(stream).cloned().unwrap_or_default())
    }

    fn publish_event(&self, event: &CounterEvent, stream: &StreamId) -> Result<(), Self::Error> {
        let mut state = self.state.lock().unwrap();
        match state.publishes_left {
            Some(0) => return Err(MemoryStoreError::Unavailable),
            Some(ref mut left) => *left -= 1,
            None => {}
        }
        state
            .streams
            .entry(stream.clone())
            .or_default()
            .push(event.clone());
        state.published.push((stream.to_string(), event.clone()));
        Ok(())
    }
}
