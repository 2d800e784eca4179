//! Event store implementations.
//!
//! Both stores implement [`chronicle_core::EventStore`]; neither is durable.
//! Use them for tests, benchmarks and local development.

pub mod faulty;
pub mod in_memory;
pub mod recorded;

pub use faulty::{FaultyEventStore, FaultyStoreError};
pub use in_memory::{InMemoryEventStore, InMemoryStoreError};
pub use recorded::RecordedEvent;
