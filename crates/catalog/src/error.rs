//! Catalog client error types.

use common::ProductId;
use thiserror::Error;

/// Errors raised by catalog operations.
///
/// `NotFound` and `InsufficientStock` are business outcomes the caller
/// surfaces directly; `Unavailable` means the service could not be
/// reached within the bounded timeout and the caller may retry.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The product does not exist in the catalog.
    #[error("product {0} not found")]
    NotFound(ProductId),

    /// The catalog rejected a stock decrement.
    #[error("insufficient stock for product {0}")]
    InsufficientStock(ProductId),

    /// The catalog service is unreachable or timed out.
    #[error("catalog service unavailable: {0}")]
    Unavailable(String),

    /// The catalog answered with something outside its contract.
    #[error("unexpected catalog response: {0}")]
    Unexpected(String),
}
