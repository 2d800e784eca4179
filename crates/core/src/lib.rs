//! `chronicle-core`: event-sourced aggregate capability.
//!
//! Turns a domain type into an aggregate whose state is derived from events:
//! `apply` routes an event through a pluggable [`ApplyStrategy`] and buffers it
//! as unpublished; `load` replays a stream from an [`EventStore`]; `store`
//! publishes the buffer back. No storage, serialization or IO lives here.

pub mod aggregate;
pub mod capability;
pub mod error;
pub mod event;
pub mod store;
pub mod strategy;
pub mod stream;

#[cfg(test)]
mod testing;

pub use aggregate::{AggregateResult, Capability, EventSourced, Lifecycle, StoreErrorOf};
pub use capability::{CapabilityDefinition, CapabilityDefinitionBuilder};
pub use error::{AggregateError, InvalidStreamId, NoHandlerFound};
pub use event::{Event, EventKind};
pub use store::EventStore;
pub use strategy::{ApplyStrategy, HandlerTable, Unmapped, handler_name};
pub use stream::StreamId;
