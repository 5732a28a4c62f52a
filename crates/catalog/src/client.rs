//! Catalog client trait and item snapshot type.

use async_trait::async_trait;
use common::{BearerToken, Money, ProductId};
use serde::{Deserialize, Serialize};

use crate::CatalogError;

/// An item as reported by the catalog service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogItem {
    /// The product identifier.
    pub product_id: ProductId,
    /// Human-readable product name.
    pub name: String,
    /// Current unit price.
    pub price: Money,
    /// Units currently in stock.
    pub available_qty: u32,
}

/// Operations against the catalog service.
///
/// All calls are made on behalf of a caller and forward that caller's
/// bearer credential unchanged.
#[async_trait]
pub trait CatalogClient: Send + Sync {
    /// Fetches price and stock for a product.
    async fn fetch_item(
        &self,
        token: &BearerToken,
        product_id: &ProductId,
    ) -> Result<CatalogItem, CatalogError>;

    /// Atomically decrements stock by `quantity`.
    ///
    /// The catalog performs its own check-and-decrement; a rejection here
    /// is authoritative even if an earlier `fetch_item` reported enough
    /// stock.
    async fn decrement_stock(
        &self,
        token: &BearerToken,
        product_id: &ProductId,
        quantity: u32,
    ) -> Result<(), CatalogError>;

    /// Restores stock by `quantity`. Used as a compensating action.
    async fn increment_stock(
        &self,
        token: &BearerToken,
        product_id: &ProductId,
        quantity: u32,
    ) -> Result<(), CatalogError>;
}
