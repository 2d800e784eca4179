//! Order domain errors.

use thiserror::Error;

use chronicle_core::NoHandlerFound;

use crate::order::OrderStatus;

/// Domain-level order error.
///
/// Business rule failures plus the dispatch failure surfaced by `apply`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OrderError {
    /// A value failed validation (e.g. non-positive quantity).
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("order already exists")]
    AlreadyCreated,

    #[error("order does not exist")]
    NotCreated,

    /// The order's status does not allow the requested transition.
    #[error("order is {0}")]
    InvalidStatus(OrderStatus),

    #[error(transparent)]
    Dispatch(#[from] NoHandlerFound),
}

impl OrderError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}
