//! Capability definitions: construction-time configuration shared by aggregates.

use std::sync::Arc;

use crate::aggregate::{Capability, EventSourced};
use crate::strategy::{ApplyStrategy, HandlerTable};

/// Shared configuration from which aggregate capabilities are produced.
///
/// A definition fixes two things for every aggregate built from it:
///
/// - **strategy**: the [`ApplyStrategy`] (default: the aggregate's convention
///   table, see [`HandlerTable::from_conventions`]);
/// - **event store**: the default store for `load`/`store` when no store is
///   passed per call (default: none).
///
/// Build it once and hand [`capability()`](Self::capability) to each new
/// aggregate instance.
pub struct CapabilityDefinition<A: EventSourced> {
    strategy: Arc<dyn ApplyStrategy<A>>,
    event_store: Option<Arc<A::Store>>,
}

impl<A: EventSourced> CapabilityDefinition<A> {
    /// Convention strategy, no default event store.
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Convention strategy with a default event store.
    pub fn with_event_store(store: impl Into<Arc<A::Store>>) -> Self {
        Self::builder().event_store(store).build()
    }

    pub fn builder() -> CapabilityDefinitionBuilder<A> {
        CapabilityDefinitionBuilder {
            strategy: None,
            event_store: None,
        }
    }

    /// Fresh per-instance capability state sharing this definition's strategy
    /// and default store.
    pub fn capability(&self) -> Capability<A> {
        Capability::new(Arc::clone(&self.strategy), self.event_store.clone())
    }

    pub fn strategy(&self) -> &Arc<dyn ApplyStrategy<A>> {
        &self.strategy
    }

    pub fn event_store(&self) -> Option<&Arc<A::Store>> {
        self.event_store.as_ref()
    }
}

impl<A: EventSourced> Default for CapabilityDefinition<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: EventSourced> Clone for CapabilityDefinition<A> {
    fn clone(&self) -> Self {
        Self {
            strategy: Arc::clone(&self.strategy),
            event_store: self.event_store.clone(),
        }
    }
}

impl<A: EventSourced> core::fmt::Debug for CapabilityDefinition<A> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CapabilityDefinition")
            .field("aggregate_type", &A::aggregate_type())
            .field("has_event_store", &self.event_store.is_some())
            .finish()
    }
}

/// Builder for [`CapabilityDefinition`].
pub struct CapabilityDefinitionBuilder<A: EventSourced> {
    strategy: Option<Arc<dyn ApplyStrategy<A>>>,
    event_store: Option<Arc<A::Store>>,
}

impl<A: EventSourced> CapabilityDefinitionBuilder<A> {
    pub fn strategy(mut self, strategy: impl ApplyStrategy<A> + 'static) -> Self {
        self.strategy = Some(Arc::new(strategy));
        self
    }

    /// Use a strategy that is already shared elsewhere.
    pub fn shared_strategy(mut self, strategy: Arc<dyn ApplyStrategy<A>>) -> Self {
        self.strategy = Some(strategy);
        self
    }

    pub fn event_store(mut self, store: impl Into<Arc<A::Store>>) -> Self {
        self.event_store = Some(store.into());
        self
    }

    pub fn build(self) -> CapabilityDefinition<A> {
        CapabilityDefinition {
            strategy: self
                .strategy
                .unwrap_or_else(|| Arc::new(HandlerTable::<A>::from_conventions())),
            event_store: self.event_store,
        }
    }
}
