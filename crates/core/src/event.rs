//! Event traits.

/// A domain-agnostic event.
///
/// Events are immutable facts. The capability treats them opaquely apart from
/// the type tag, which drives dispatch to the aggregate's handlers.
pub trait Event: Clone + core::fmt::Debug + Send + Sync + 'static {
    /// Stable event type tag (e.g. `"OrderCreated"`).
    fn event_type(&self) -> &'static str;
}

/// A concrete payload type for one event type tag of the event enum `E`.
///
/// Implementing this lets handlers be registered against the payload type
/// directly (`HandlerTable::on::<OrderCreated>(..)`) instead of matching on the
/// whole enum.
pub trait EventKind<E: Event>: Sized + 'static {
    /// Type tag this payload is published under. Must equal
    /// `event.event_type()` for every event `from_event` accepts.
    const EVENT_TYPE: &'static str;

    /// Project the payload out of the event, if the event is of this kind.
    fn from_event(event: &E) -> Option<&Self>;
}
