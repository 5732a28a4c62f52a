//! Domain error types.

use common::ProductId;
use thiserror::Error;

use crate::OrderStatus;

/// Errors raised by order construction and status validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum OrderError {
    /// An order must contain at least one line item.
    #[error("order must contain at least one item")]
    EmptyOrder,

    /// Every line item quantity must be positive.
    #[error("quantity for product {0} must be greater than zero")]
    ZeroQuantity(ProductId),

    /// Price snapshots are never negative.
    #[error("price for product {0} must not be negative")]
    NegativePrice(ProductId),

    /// The requested transition is not in the transition table.
    #[error("invalid status transition from {from} to {to}")]
    InvalidTransition { from: OrderStatus, to: OrderStatus },

    /// Owner cancellation is only permitted from `pending`.
    #[error("order is {0}, only pending orders can be cancelled")]
    NotCancellable(OrderStatus),

    /// An unrecognized status string.
    #[error("unknown order status: {0}")]
    UnknownStatus(String),
}
