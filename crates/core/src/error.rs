//! Capability error model.

use thiserror::Error;

/// Raised when an applied (or replayed) event has no registered handler.
///
/// The default strategy never swallows this; lenient strategies may choose to
/// ignore unmapped events instead of returning it.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("no handler `{handler}` for event type `{event_type}` on aggregate `{aggregate_type}`")]
pub struct NoHandlerFound {
    pub aggregate_type: &'static str,
    pub event_type: &'static str,
    /// Conventional handler name the aggregate was expected to register.
    pub handler: String,
}

impl NoHandlerFound {
    pub fn new(aggregate_type: &'static str, event_type: &'static str) -> Self {
        Self {
            aggregate_type,
            event_type,
            handler: crate::strategy::handler_name(event_type),
        }
    }
}

/// Error returned by the `load`/`store` boundary operations.
///
/// `S` is the error type of the event store in use. Store errors are carried
/// unchanged; the capability adds no retry or recovery around them.
#[derive(Debug, Error)]
pub enum AggregateError<S> {
    /// An applied or replayed event could not be dispatched.
    #[error(transparent)]
    NoHandlerFound(#[from] NoHandlerFound),

    /// Neither a per-call store nor a default store was available.
    #[error("no event store configured")]
    NoEventStoreConfigured,

    /// `store` was called without a stream and the aggregate was never loaded.
    #[error("no stream specified")]
    NoStreamSpecified,

    /// The event store failed to read or publish.
    #[error("event store error: {0}")]
    Store(#[source] S),
}

impl<S> AggregateError<S> {
    pub fn is_no_handler_found(&self) -> bool {
        matches!(self, Self::NoHandlerFound(_))
    }

    /// Returns the underlying store error, if this failure came from the store.
    pub fn store_error(&self) -> Option<&S> {
        match self {
            Self::Store(e) => Some(e),
            _ => None,
        }
    }
}

/// A stream identifier failed validation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("invalid stream identifier: {0}")]
pub struct InvalidStreamId(pub String);
