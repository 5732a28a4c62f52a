//! Workflow error taxonomy.
//!
//! Business-rule failures carry the violated constraint and are client
//! errors; `Upstream` is a distinguishable condition the caller may
//! retry. The engine never retries on its own.

use common::{OrderId, ProductId};
use domain::OrderError;
use order_store::StoreError;
use thiserror::Error;

/// Errors surfaced by order workflow operations.
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// The order does not exist or is not visible to the caller.
    #[error("order not found: {0}")]
    OrderNotFound(OrderId),

    /// A requested product could not be resolved in the catalog.
    #[error("product {0} not found")]
    ProductNotFound(ProductId),

    /// The catalog could not cover the requested quantity.
    #[error("insufficient stock for product {0}")]
    InsufficientStock(ProductId),

    /// The operation requires the admin role.
    #[error("admin access required")]
    AdminRequired,

    /// A domain invariant was violated (empty order, bad quantity,
    /// invalid transition, non-cancellable state).
    #[error(transparent)]
    Order(#[from] OrderError),

    /// An upstream service (catalog, identity, event bus) was
    /// unreachable within the bounded timeout.
    #[error("upstream service unavailable: {0}")]
    Upstream(String),

    /// Persistence failure.
    #[error("order store error: {0}")]
    Store(StoreError),
}

impl From<StoreError> for WorkflowError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(id) => WorkflowError::OrderNotFound(id),
            other => WorkflowError::Store(other),
        }
    }
}

impl From<catalog::CatalogError> for WorkflowError {
    fn from(e: catalog::CatalogError) -> Self {
        match e {
            catalog::CatalogError::NotFound(id) => WorkflowError::ProductNotFound(id),
            catalog::CatalogError::InsufficientStock(id) => WorkflowError::InsufficientStock(id),
            catalog::CatalogError::Unavailable(msg) => WorkflowError::Upstream(msg),
            catalog::CatalogError::Unexpected(msg) => WorkflowError::Upstream(msg),
        }
    }
}
