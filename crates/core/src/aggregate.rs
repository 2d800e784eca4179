//! Event-sourced aggregate capability.
//!
//! A domain type becomes an event-sourced aggregate by embedding a
//! [`Capability`] and implementing [`EventSourced`]:
//!
//! ```ignore
//! pub struct Order {
//!     status: OrderStatus,
//!     capability: Capability<Order>,
//! }
//!
//! impl EventSourced for Order {
//!     type Event = OrderEvent;
//!     type Store = InMemoryEventStore<OrderEvent>;
//!
//!     fn register_handlers(handlers: &mut HandlerTable<Self>) { /* ... */ }
//!     fn capability(&self) -> &Capability<Self> { &self.capability }
//!     fn capability_mut(&mut self) -> &mut Capability<Self> { &mut self.capability }
//! }
//! ```
//!
//! `apply`, `load` and `store` then come for free as provided methods.
//!
//! ## Unpublished events
//!
//! Every successful `apply` both runs the strategy's dispatch and appends the
//! event to the unpublished buffer. A failing dispatch appends nothing. The
//! buffer is emptied after a successful `load` (replayed events are history)
//! and after a successful `store` (the events are persisted).
//!
//! ## Partial failures
//!
//! Neither boundary operation is transactional:
//!
//! - a replay that fails midway keeps the state mutations (and buffered events)
//!   of the events replayed before the failure;
//! - a publish that fails midway leaves the *whole* buffer in place, including
//!   events the store already accepted, so retrying `store` can publish them
//!   twice.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::error::{AggregateError, NoHandlerFound};
use crate::event::Event;
use crate::store::EventStore;
use crate::strategy::{ApplyStrategy, HandlerTable};
use crate::stream::StreamId;

/// Error type of an aggregate's event store.
pub type StoreErrorOf<A> =
    <<A as EventSourced>::Store as EventStore<<A as EventSourced>::Event>>::Error;

/// Result of the `load`/`store` boundary operations for aggregate `A`.
pub type AggregateResult<A, T> = Result<T, AggregateError<StoreErrorOf<A>>>;

/// Where an aggregate instance is in its publish cycle.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Lifecycle {
    /// Constructed, nothing applied, never loaded or stored.
    Fresh,
    /// Has unpublished events.
    Dirty,
    /// Buffer emptied by a successful `load` or `store`.
    Clean,
}

/// Per-instance capability state embedded in the domain type.
///
/// Holds the shared strategy and default store (from the
/// [`CapabilityDefinition`](crate::CapabilityDefinition)), the stream the
/// aggregate was last loaded from, and the unpublished events.
pub struct Capability<A: EventSourced> {
    strategy: Arc<dyn ApplyStrategy<A>>,
    default_store: Option<Arc<A::Store>>,
    loaded_stream: Option<StreamId>,
    unpublished: Vec<A::Event>,
    version: u64,
    synced: bool,
}

impl<A: EventSourced> Capability<A> {
    pub(crate) fn new(
        strategy: Arc<dyn ApplyStrategy<A>>,
        default_store: Option<Arc<A::Store>>,
    ) -> Self {
        Self {
            strategy,
            default_store,
            loaded_stream: None,
            unpublished: Vec::new(),
            version: 0,
            synced: false,
        }
    }

    /// Events applied since construction or the last successful `load`/`store`,
    /// in the order they were applied.
    pub fn unpublished_events(&self) -> &[A::Event] {
        &self.unpublished
    }

    /// Stream identifier remembered from the last successful `load`.
    pub fn loaded_stream(&self) -> Option<&StreamId> {
        self.loaded_stream.as_ref()
    }

    /// Number of events applied to this instance, replayed ones included.
    ///
    /// This counts local applies, not the stream revision: events a `load`
    /// discards from the buffer still shaped the state and stay counted.
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn lifecycle(&self) -> Lifecycle {
        if !self.unpublished.is_empty() {
            Lifecycle::Dirty
        } else if self.synced {
            Lifecycle::Clean
        } else {
            Lifecycle::Fresh
        }
    }

    pub fn has_default_store(&self) -> bool {
        self.default_store.is_some()
    }

    pub fn strategy(&self) -> &Arc<dyn ApplyStrategy<A>> {
        &self.strategy
    }
}

impl<A: EventSourced> Default for Capability<A> {
    /// Convention strategy, no default store.
    fn default() -> Self {
        Self::new(Arc::new(HandlerTable::<A>::from_conventions()), None)
    }
}

impl<A: EventSourced> Clone for Capability<A> {
    fn clone(&self) -> Self {
        Self {
            strategy: Arc::clone(&self.strategy),
            default_store: self.default_store.clone(),
            loaded_stream: self.loaded_stream.clone(),
            unpublished: self.unpublished.clone(),
            version: self.version,
            synced: self.synced,
        }
    }
}

impl<A: EventSourced> core::fmt::Debug for Capability<A> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Capability")
            .field("aggregate_type", &A::aggregate_type())
            .field("has_default_store", &self.default_store.is_some())
            .field("loaded_stream", &self.loaded_stream)
            .field("unpublished", &self.unpublished)
            .field("version", &self.version)
            .finish()
    }
}

/// Event-sourced aggregate: a domain type whose state is driven by events.
///
/// Implementors supply the event and store types and access to their embedded
/// [`Capability`]; everything else is provided.
pub trait EventSourced: Sized + 'static {
    type Event: Event;
    type Store: EventStore<Self::Event> + ?Sized;

    /// Aggregate type name used in diagnostics.
    fn aggregate_type() -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Register this aggregate's handlers for the convention strategy.
    ///
    /// Aggregates configured with a custom strategy can leave this empty.
    fn register_handlers(_handlers: &mut HandlerTable<Self>) {}

    fn capability(&self) -> &Capability<Self>;

    fn capability_mut(&mut self) -> &mut Capability<Self>;

    /// Dispatch `event` to the aggregate's handler, then buffer it as unpublished.
    ///
    /// If dispatch fails the event is not buffered.
    fn apply(&mut self, event: Self::Event) -> Result<(), NoHandlerFound> {
        let strategy = Arc::clone(&self.capability().strategy);
        strategy.dispatch(self, &event)?;

        let capability = self.capability_mut();
        capability.version += 1;
        capability.unpublished.push(event);
        Ok(())
    }

    /// Replay `stream` from the default event store.
    fn load(&mut self, stream: impl Into<StreamId>) -> AggregateResult<Self, &mut Self> {
        self.load_with(stream, None)
    }

    /// Replay `stream` from an explicit event store.
    fn load_from(
        &mut self,
        stream: impl Into<StreamId>,
        store: &Self::Store,
    ) -> AggregateResult<Self, &mut Self> {
        self.load_with(stream, Some(store))
    }

    /// By-value `load`, for construct-then-load chains.
    fn loaded(mut self, stream: impl Into<StreamId>) -> AggregateResult<Self, Self> {
        self.load(stream)?;
        Ok(self)
    }

    /// Replay every event of `stream` through `apply`, in publication order.
    ///
    /// On success the unpublished buffer is emptied (including anything that
    /// was pending before the call) and `stream` becomes the loaded-from stream.
    /// `store` falls back to the capability's default store when `None`.
    fn load_with(
        &mut self,
        stream: impl Into<StreamId>,
        store: Option<&Self::Store>,
    ) -> AggregateResult<Self, &mut Self> {
        let stream = stream.into();
        let default_store = self.capability().default_store.clone();
        let store = store
            .or(default_store.as_deref())
            .ok_or(AggregateError::NoEventStoreConfigured)?;

        let pending = self.capability().unpublished.len();
        let events = store
            .read_stream_events_forward(&stream)
            .map_err(AggregateError::Store)?;
        let replayed = events.len();

        for event in events {
            self.apply(event)?;
        }

        if pending > 0 {
            warn!(
                aggregate_type = Self::aggregate_type(),
                stream = %stream,
                discarded = pending,
                "load discarded unpublished events"
            );
        }
        debug!(
            aggregate_type = Self::aggregate_type(),
            stream = %stream,
            replayed,
            "aggregate loaded"
        );

        let capability = self.capability_mut();
        capability.unpublished.clear();
        capability.loaded_stream = Some(stream);
        capability.synced = true;

        Ok(self)
    }

    /// Publish unpublished events to the loaded-from stream in the default store.
    fn store(&mut self) -> AggregateResult<Self, ()> {
        self.store_with(None, None)
    }

    /// Publish unpublished events to an explicit stream in the default store.
    fn store_to(&mut self, stream: impl Into<StreamId>) -> AggregateResult<Self, ()> {
        self.store_with(Some(stream.into()), None)
    }

    /// Publish unpublished events to the loaded-from stream in an explicit store.
    fn store_in(&mut self, store: &Self::Store) -> AggregateResult<Self, ()> {
        self.store_with(None, Some(store))
    }

    /// Publish each unpublished event, in applied order, one call per event.
    ///
    /// `stream` falls back to the loaded-from stream and `store` to the default
    /// store. The buffer is cleared only once every publish has succeeded.
    /// Publishing to an explicit stream does not change the loaded-from stream.
    fn store_with(
        &mut self,
        stream: Option<StreamId>,
        store: Option<&Self::Store>,
    ) -> AggregateResult<Self, ()> {
        let stream = match stream {
            Some(stream) => stream,
            None => self
                .capability()
                .loaded_stream
                .clone()
                .ok_or(AggregateError::NoStreamSpecified)?,
        };
        let default_store = self.capability().default_store.clone();
        let store = store
            .or(default_store.as_deref())
            .ok_or(AggregateError::NoEventStoreConfigured)?;

        for event in &self.capability().unpublished {
            store
                .publish_event(event, &stream)
                .map_err(AggregateError::Store)?;
        }

        let capability = self.capability_mut();
        let published = capability.unpublished.len();
        capability.unpublished.clear();
        capability.synced = true;

        debug!(
            aggregate_type = Self::aggregate_type(),
            stream = %stream,
            published,
            "aggregate stored"
        );

        Ok(())
    }
}
