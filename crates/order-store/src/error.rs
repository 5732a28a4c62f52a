//! Store error types.

use common::OrderId;
use thiserror::Error;

/// Errors raised by order store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No order exists with the given ID.
    #[error("order not found: {0}")]
    NotFound(OrderId),

    /// Database error.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Serialization error on a persisted payload.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
