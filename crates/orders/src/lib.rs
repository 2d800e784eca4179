//! Orders domain module (event-sourced).
//!
//! A small, complete aggregate built on `chronicle-core`: every state change
//! goes through `apply`, and orders are persisted and rebuilt through
//! `store`/`load` against whatever event store the caller configures.

pub mod error;
pub mod order;

pub use error::OrderError;
pub use order::{
    LineAdded, Order, OrderConfirmed, OrderCreated, OrderEvent, OrderExpired, OrderId, OrderLine,
    OrderState, OrderStatus,
};
