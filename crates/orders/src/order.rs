use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use chronicle_core::{
    Capability, CapabilityDefinition, Event, EventKind, EventSourced, EventStore, HandlerTable,
    StreamId,
};

use crate::error::OrderError;

/// Order identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(Uuid);

impl OrderId {
    /// Uses UUIDv7 (time-ordered). Prefer `from_uuid` in tests for determinism.
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Stream holding this order's events (`orders-<uuid>`).
    pub fn stream_id(&self) -> StreamId {
        StreamId::new(format!("orders-{}", self.0))
    }
}

impl Default for OrderId {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Display for OrderId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Order status lifecycle.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Nothing applied yet.
    #[default]
    Pending,
    Created,
    Confirmed,
    Expired,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Created => "created",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Expired => "expired",
        }
    }
}

impl core::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Order line: SKU, quantity, unit price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    pub line_no: u32,
    pub sku: String,
    pub quantity: i64,
    /// Price in smallest currency unit (e.g., cents).
    pub unit_price: u64,
}

/// Event: OrderCreated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderCreated {
    pub order_id: OrderId,
    pub customer: String,
    pub occurred_at: DateTime<Utc>,
}

/// Event: LineAdded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineAdded {
    pub line_no: u32,
    pub sku: String,
    pub quantity: i64,
    pub unit_price: u64,
    pub occurred_at: DateTime<Utc>,
}

/// Event: OrderConfirmed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderConfirmed {
    pub occurred_at: DateTime<Utc>,
}

/// Event: OrderExpired.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderExpired {
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderEvent {
    OrderCreated(OrderCreated),
    LineAdded(LineAdded),
    OrderConfirmed(OrderConfirmed),
    OrderExpired(OrderExpired),
}

impl OrderEvent {
    pub fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            OrderEvent::OrderCreated(e) => e.occurred_at,
            OrderEvent::LineAdded(e) => e.occurred_at,
            OrderEvent::OrderConfirmed(e) => e.occurred_at,
            OrderEvent::OrderExpired(e) => e.occurred_at,
        }
    }
}

/// Event tags are the payload type names.
macro_rules! order_event_kinds {
    ($($kind:ident),* $(,)?) => {
        impl Event for OrderEvent {
            fn event_type(&self) -> &'static str {
                match self {
                    $(OrderEvent::$kind(_) => stringify!($kind),)*
                }
            }
        }

        $(
            impl EventKind<OrderEvent> for $kind {
                const EVENT_TYPE: &'static str = stringify!($kind);

                fn from_event(event: &OrderEvent) -> Option<&Self> {
                    match event {
                        OrderEvent::$kind(e) => Some(e),
                        _ => None,
                    }
                }
            }
        )*
    };
}

order_event_kinds!(OrderCreated, LineAdded, OrderConfirmed, OrderExpired);

/// Domain state of an order, everything derived from its events.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct OrderState {
    pub id: Option<OrderId>,
    pub customer: Option<String>,
    pub status: OrderStatus,
    pub lines: Vec<OrderLine>,
    pub created_at: Option<DateTime<Utc>>,
    pub expired_at: Option<DateTime<Utc>>,
}

/// Aggregate root: Order.
///
/// Generic over the event store so the domain does not pick a storage
/// backend; callers fix `S` when they build the capability definition.
pub struct Order<S>
where
    S: EventStore<OrderEvent> + ?Sized + 'static,
{
    state: OrderState,
    capability: Capability<Order<S>>,
}

impl<S> Order<S>
where
    S: EventStore<OrderEvent> + ?Sized + 'static,
{
    /// Empty, not-yet-created order (ready for commands or rehydration).
    pub fn new(definition: &CapabilityDefinition<Self>) -> Self {
        Self {
            state: OrderState::default(),
            capability: definition.capability(),
        }
    }

    pub fn state(&self) -> &OrderState {
        &self.state
    }

    pub fn id(&self) -> Option<OrderId> {
        self.state.id
    }

    pub fn status(&self) -> OrderStatus {
        self.state.status
    }

    pub fn lines(&self) -> &[OrderLine] {
        &self.state.lines
    }

    /// Sum of quantity × unit price over all lines.
    ///
    /// Saturates at `u64::MAX`; `add_line` never lets an order get there, but
    /// replayed streams are not re-validated.
    pub fn total(&self) -> u64 {
        self.state.lines.iter().fold(0u64, |total, l| {
            total.saturating_add(l.quantity.unsigned_abs().saturating_mul(l.unit_price))
        })
    }

    pub fn is_modifiable(&self) -> bool {
        matches!(self.state.status, OrderStatus::Created)
    }

    /// Command: create the order.
    pub fn create(
        &mut self,
        order_id: OrderId,
        customer: impl Into<String>,
        occurred_at: DateTime<Utc>,
    ) -> Result<(), OrderError> {
        if self.state.status != OrderStatus::Pending {
            return Err(OrderError::AlreadyCreated);
        }

        let customer = customer.into();
        if customer.trim().is_empty() {
            return Err(OrderError::validation("customer must not be empty"));
        }

        self.apply(OrderEvent::OrderCreated(OrderCreated {
            order_id,
            customer,
            occurred_at,
        }))?;
        Ok(())
    }

    /// Command: add a line to a created order.
    pub fn add_line(
        &mut self,
        sku: impl Into<String>,
        quantity: i64,
        unit_price: u64,
        occurred_at: DateTime<Utc>,
    ) -> Result<(), OrderError> {
        self.ensure_created()?;
        if !self.is_modifiable() {
            return Err(OrderError::InvalidStatus(self.state.status));
        }

        if quantity <= 0 {
            return Err(OrderError::validation("quantity must be positive"));
        }

        if unit_price == 0 {
            return Err(OrderError::validation("unit_price must be positive"));
        }

        quantity
            .unsigned_abs()
            .checked_mul(unit_price)
            .and_then(|line_total| self.total().checked_add(line_total))
            .ok_or_else(|| OrderError::validation("order total overflow"))?;

        let next_line_no = (self.state.lines.len() as u32) + 1;
        self.apply(OrderEvent::LineAdded(LineAdded {
            line_no: next_line_no,
            sku: sku.into(),
            quantity,
            unit_price,
            occurred_at,
        }))?;
        Ok(())
    }

    /// Command: confirm a created order with at least one line.
    pub fn confirm(&mut self, occurred_at: DateTime<Utc>) -> Result<(), OrderError> {
        self.ensure_created()?;
        if self.state.status != OrderStatus::Created {
            return Err(OrderError::InvalidStatus(self.state.status));
        }

        if self.state.lines.is_empty() {
            return Err(OrderError::validation("cannot confirm order without lines"));
        }

        self.apply(OrderEvent::OrderConfirmed(OrderConfirmed { occurred_at }))?;
        Ok(())
    }

    /// Command: expire an order that was never confirmed.
    pub fn expire(&mut self, occurred_at: DateTime<Utc>) -> Result<(), OrderError> {
        self.ensure_created()?;
        if self.state.status != OrderStatus::Created {
            return Err(OrderError::InvalidStatus(self.state.status));
        }

        self.apply(OrderEvent::OrderExpired(OrderExpired { occurred_at }))?;
        Ok(())
    }

    fn ensure_created(&self) -> Result<(), OrderError> {
        if self.state.status == OrderStatus::Pending {
            return Err(OrderError::NotCreated);
        }
        Ok(())
    }

    fn apply_order_created(&mut self, event: &OrderCreated) {
        self.state.id = Some(event.order_id);
        self.state.customer = Some(event.customer.clone());
        self.state.status = OrderStatus::Created;
        self.state.lines.clear();
        self.state.created_at = Some(event.occurred_at);
    }

    fn apply_line_added(&mut self, event: &LineAdded) {
        self.state.lines.push(OrderLine {
            line_no: event.line_no,
            sku: event.sku.clone(),
            quantity: event.quantity,
            unit_price: event.unit_price,
        });
    }

    fn apply_order_confirmed(&mut self, _event: &OrderConfirmed) {
        self.state.status = OrderStatus::Confirmed;
    }

    fn apply_order_expired(&mut self, event: &OrderExpired) {
        self.state.status = OrderStatus::Expired;
        self.state.expired_at = Some(event.occurred_at);
    }
}

impl<S> EventSourced for Order<S>
where
    S: EventStore<OrderEvent> + ?Sized + 'static,
{
    type Event = OrderEvent;
    type Store = S;

    fn aggregate_type() -> &'static str {
        "Order"
    }

    fn register_handlers(handlers: &mut HandlerTable<Self>) {
        handlers
            .on::<OrderCreated>(Self::apply_order_created)
            .on::<LineAdded>(Self::apply_line_added)
            .on::<OrderConfirmed>(Self::apply_order_confirmed)
            .on::<OrderExpired>(Self::apply_order_expired);
    }

    fn capability(&self) -> &Capability<Self> {
        &self.capability
    }

    fn capability_mut(&mut self) -> &mut Capability<Self> {
        &mut self.capability
    }
}

impl<S> Clone for Order<S>
where
    S: EventStore<OrderEvent> + ?Sized + 'static,
{
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
            capability: self.capability.clone(),
        }
    }
}

impl<S> core::fmt::Debug for Order<S>
where
    S: EventStore<OrderEvent> + ?Sized + 'static,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Order")
            .field("state", &self.state)
            .field("capability", &self.capability)
            .finish()
    }
}
