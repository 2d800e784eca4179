//! Infrastructure layer: event store implementations for the aggregate capability.

pub mod event_store;

#[cfg(test)]
mod testing;

pub use event_store::{
    FaultyEventStore, FaultyStoreError, InMemoryEventStore, InMemoryStoreError, RecordedEvent,
};
