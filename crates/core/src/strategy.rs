//! Apply strategies: routing an event to the aggregate's mutation logic.
//!
//! A strategy is chosen once per [`CapabilityDefinition`](crate::CapabilityDefinition)
//! and shared by every aggregate built from it, so it must not carry
//! per-aggregate state.
//!
//! ## Default: convention table
//!
//! [`HandlerTable::from_conventions`] builds a strict table from the handlers an
//! aggregate registers in [`EventSourced::register_handlers`]. Handlers are
//! conventionally named `apply_<event type in snake_case>`:
//!
//! ```ignore
//! impl EventSourced for Order {
//!     fn register_handlers(handlers: &mut HandlerTable<Self>) {
//!         handlers
//!             .on::<OrderCreated>(Order::apply_order_created)
//!             .on::<OrderExpired>(Order::apply_order_expired);
//!     }
//!     // ...
//! }
//! ```
//!
//! An event whose type tag has no entry fails with [`NoHandlerFound`].
//!
//! ## Custom strategies
//!
//! Anything implementing [`ApplyStrategy`] works: a lenient table that ignores
//! unmapped events, or a plain closure (`Fn(&mut A, &A::Event) -> Result<..>`).

use std::collections::HashMap;

use crate::aggregate::EventSourced;
use crate::error::NoHandlerFound;
use crate::event::{Event, EventKind};

/// Dispatch policy: invoke the mutation logic matching the event's type.
pub trait ApplyStrategy<A: EventSourced>: Send + Sync {
    fn dispatch(&self, aggregate: &mut A, event: &A::Event) -> Result<(), NoHandlerFound>;
}

impl<A, F> ApplyStrategy<A> for F
where
    A: EventSourced,
    F: Fn(&mut A, &A::Event) -> Result<(), NoHandlerFound> + Send + Sync,
{
    fn dispatch(&self, aggregate: &mut A, event: &A::Event) -> Result<(), NoHandlerFound> {
        self(aggregate, event)
    }
}

/// Conventional handler name for an event type tag.
///
/// `OrderCreated` → `apply_order_created`, `order.expired` → `apply_order_expired`.
pub fn handler_name(event_type: &str) -> String {
    let chars: Vec<char> = event_type.chars().collect();
    let mut name = String::from("apply_");
    let prefix = name.len();

    for (i, &c) in chars.iter().enumerate() {
        if !c.is_alphanumeric() {
            if name.len() > prefix && !name.ends_with('_') {
                name.push('_');
            }
            continue;
        }

        if c.is_uppercase() && i > 0 {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            let boundary = prev.is_lowercase()
                || prev.is_ascii_digit()
                || (prev.is_uppercase() && next_is_lower);
            if boundary && !name.ends_with('_') {
                name.push('_');
            }
        }
        name.extend(c.to_lowercase());
    }

    while name.len() > prefix && name.ends_with('_') {
        name.pop();
    }
    name
}

/// What a [`HandlerTable`] does with an event type it has no handler for.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub enum Unmapped {
    /// Fail with [`NoHandlerFound`].
    #[default]
    Reject,
    /// Do nothing; the event is still buffered by `apply`.
    Ignore,
}

type Handler<A> = Box<
    dyn Fn(&mut A, &<A as EventSourced>::Event) -> Result<(), NoHandlerFound> + Send + Sync,
>;

/// Lookup table from event type tag to handler.
pub struct HandlerTable<A: EventSourced> {
    handlers: HashMap<&'static str, Handler<A>>,
    unmapped: Unmapped,
}

impl<A: EventSourced> HandlerTable<A> {
    /// Empty table that rejects unmapped event types.
    pub fn strict() -> Self {
        Self::with_unmapped(Unmapped::Reject)
    }

    /// Empty table that ignores unmapped event types.
    pub fn lenient() -> Self {
        Self::with_unmapped(Unmapped::Ignore)
    }

    pub fn with_unmapped(unmapped: Unmapped) -> Self {
        Self {
            handlers: HashMap::new(),
            unmapped,
        }
    }

    /// Strict table filled with the aggregate's own registrations.
    ///
    /// This is the default strategy of a capability definition.
    pub fn from_conventions() -> Self {
        let mut table = Self::strict();
        A::register_handlers(&mut table);
        table
    }

    /// Register a typed handler for the event kind `K`.
    ///
    /// Registering the same type tag twice replaces the earlier handler.
    pub fn on<K>(&mut self, handler: impl Fn(&mut A, &K) + Send + Sync + 'static) -> &mut Self
    where
        K: EventKind<A::Event>,
    {
        self.handlers.insert(
            K::EVENT_TYPE,
            Box::new(move |aggregate: &mut A, event: &A::Event| -> Result<(), NoHandlerFound> {
                // A tag that matches but a payload that does not project means
                // the event kind is wired to the wrong variant.
                let payload = K::from_event(event)
                    .ok_or_else(|| NoHandlerFound::new(A::aggregate_type(), event.event_type()))?;
                handler(aggregate, payload);
                Ok(())
            }),
        );
        self
    }

    /// Register a handler that receives the whole event for `event_type`.
    pub fn on_type(
        &mut self,
        event_type: &'static str,
        handler: impl Fn(&mut A, &A::Event) + Send + Sync + 'static,
    ) -> &mut Self {
        self.handlers.insert(
            event_type,
            Box::new(move |aggregate: &mut A, event: &A::Event| -> Result<(), NoHandlerFound> {
                handler(aggregate, event);
                Ok(())
            }),
        );
        self
    }

    pub fn handles(&self, event_type: &str) -> bool {
        self.handlers.contains_key(event_type)
    }

    pub fn unmapped(&self) -> Unmapped {
        self.unmapped
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl<A: EventSourced> Default for HandlerTable<A> {
    fn default() -> Self {
        Self::from_conventions()
    }
}

impl<A: EventSourced> core::fmt::Debug for HandlerTable<A> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let mut event_types: Vec<&str> = self.handlers.keys().copied().collect();
        event_types.sort_unstable();
        f.debug_struct("HandlerTable")
            .field("aggregate_type", &A::aggregate_type())
            .field("event_types", &event_types)
            .field("unmapped", &self.unmapped)
            .finish()
    }
}

impl<A: EventSourced> ApplyStrategy<A> for HandlerTable<A> {
    fn dispatch(&self, aggregate: &mut A, event: &A::Event) -> Result<(), NoHandlerFound> {
        match self.handlers.get(event.event_type()) {
            Some(handler) => handler(aggregate, event),
            None => match self.unmapped {
                Unmapped::Reject => Err(NoHandlerFound::new(
                    A::aggregate_type(),
                    event.event_type(),
                )),
                Unmapped::Ignore => Ok(()),
            },
        }
    }
}
