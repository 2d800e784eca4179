//! Event store boundary consumed by `load` and `store`.
//!
//! The capability only needs two operations from a store: read a stream
//! forward and publish one event to a stream. Durability, stream naming and
//! store-side concurrency control are the implementation's business.

use std::sync::Arc;

use crate::event::Event;
use crate::stream::StreamId;

/// Append-only, per-stream event log.
///
/// ## Read semantics
///
/// `read_stream_events_forward()` returns every event of the stream in the
/// order it was published. An unknown stream is an empty stream, not an error.
///
/// ## Publish semantics
///
/// `publish_event()` appends exactly one event. Ordering across several calls
/// is whatever order the caller issues them in; `store` issues them in the
/// order the events were applied.
pub trait EventStore<E: Event>: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Load the full stream, oldest event first.
    fn read_stream_events_forward(&self, stream: &StreamId) -> Result<Vec<E>, Self::Error>;

    /// Append one event to the named stream.
    fn publish_event(&self, event: &E, stream: &StreamId) -> Result<(), Self::Error>;
}

impl<E, S> EventStore<E> for Arc<S>
where
    E: Event,
    S: EventStore<E> + ?Sized,
{
    type Error = S::Error;

    fn read_stream_events_forward(&self, stream: &StreamId) -> Result<Vec<E>, Self::Error> {
        (**self).read_stream_events_forward(stream)
    }

    fn publish_event(&self, event: &E, stream: &StreamId) -> Result<(), Self::Error> {
        (**self).publish_event(event, stream)
    }
}
