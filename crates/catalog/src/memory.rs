//! In-memory catalog client for tests.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use common::{BearerToken, ProductId};

use crate::{CatalogClient, CatalogError, CatalogItem};

#[derive(Debug, Default)]
struct InMemoryCatalogState {
    items: HashMap<ProductId, CatalogItem>,
    increments: Vec<(ProductId, u32)>,
    unavailable: bool,
    fail_decrement_for: Option<ProductId>,
}

/// In-memory catalog for testing.
///
/// Decrement is an atomic check-and-decrement under a single lock, the
/// same guarantee the real catalog provides at its source of truth.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalogClient {
    state: Arc<RwLock<InMemoryCatalogState>>,
}

impl InMemoryCatalogClient {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces an item.
    pub fn put_item(&self, item: CatalogItem) {
        let mut state = self.state.write().unwrap();
        state.items.insert(item.product_id.clone(), item);
    }

    /// Returns the current stock for a product, if it exists.
    pub fn stock_of(&self, product_id: &ProductId) -> Option<u32> {
        self.state
            .read()
            .unwrap()
            .items
            .get(product_id)
            .map(|item| item.available_qty)
    }

    /// Returns every compensating increment received, in call order.
    pub fn increment_log(&self) -> Vec<(ProductId, u32)> {
        self.state.read().unwrap().increments.clone()
    }

    /// Simulates the whole service being unreachable.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.state.write().unwrap().unavailable = unavailable;
    }

    /// Forces the next decrements for `product_id` to be rejected, as if
    /// stock changed between pre-check and decrement.
    pub fn set_fail_decrement(&self, product_id: Option<ProductId>) {
        self.state.write().unwrap().fail_decrement_for = product_id;
    }
}

#[async_trait]
impl CatalogClient for InMemoryCatalogClient {
    async fn fetch_item(
        &self,
        _token: &BearerToken,
        product_id: &ProductId,
    ) -> Result<CatalogItem, CatalogError> {
        let state = self.state.read().unwrap();
        if state.unavailable {
            return Err(CatalogError::Unavailable("connection refused".to_string()));
        }
        state
            .items
            .get(product_id)
            .cloned()
            .ok_or_else(|| CatalogError::NotFound(product_id.clone()))
    }

    async fn decrement_stock(
        &self,
        _token: &BearerToken,
        product_id: &ProductId,
        quantity: u32,
    ) -> Result<(), CatalogError> {
        let mut state = self.state.write().unwrap();
        if state.unavailable {
            return Err(CatalogError::Unavailable("connection refused".to_string()));
        }
        if state.fail_decrement_for.as_ref() == Some(product_id) {
            return Err(CatalogError::InsufficientStock(product_id.clone()));
        }
        let item = state
            .items
            .get_mut(product_id)
            .ok_or_else(|| CatalogError::NotFound(product_id.clone()))?;
        if item.available_qty < quantity {
            return Err(CatalogError::InsufficientStock(product_id.clone()));
        }
        item.available_qty -= quantity;
        Ok(())
    }

    async fn increment_stock(
        &self,
        _token: &BearerToken,
        product_id: &ProductId,
        quantity: u32,
    ) -> Result<(), CatalogError> {
        let mut state = self.state.write().unwrap();
        if state.unavailable {
            return Err(CatalogError::Unavailable("connection refused".to_string()));
        }
        let item = state
            .items
            .get_mut(product_id)
            .ok_or_else(|| CatalogError::NotFound(product_id.clone()))?;
        item.available_qty += quantity;
        state.increments.push((product_id.clone(), quantity));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::Money;

    fn token() -> BearerToken {
        BearerToken::new("test-token")
    }

    fn widget(qty: u32) -> CatalogItem {
        CatalogItem {
            product_id: ProductId::new("SKU-001"),
            name: "Widget".to_string(),
            price: Money::from_cents(1000),
            available_qty: qty,
        }
    }

    #[tokio::test]
    async fn fetch_and_decrement() {
        let catalog = InMemoryCatalogClient::new();
        catalog.put_item(widget(5));
        let id = ProductId::new("SKU-001");

        let item = catalog.fetch_item(&token(), &id).await.unwrap();
        assert_eq!(item.available_qty, 5);

        catalog.decrement_stock(&token(), &id, 3).await.unwrap();
        assert_eq!(catalog.stock_of(&id), Some(2));
    }

    #[tokio::test]
    async fn decrement_rejects_when_stock_is_short() {
        let catalog = InMemoryCatalogClient::new();
        catalog.put_item(widget(2));
        let id = ProductId::new("SKU-001");

        let result = catalog.decrement_stock(&token(), &id, 3).await;
        assert!(matches!(result, Err(CatalogError::InsufficientStock(_))));
        // Rejection leaves stock untouched.
        assert_eq!(catalog.stock_of(&id), Some(2));
    }

    #[tokio::test]
    async fn unknown_product_is_not_found() {
        let catalog = InMemoryCatalogClient::new();
        let id = ProductId::new("SKU-404");

        let result = catalog.fetch_item(&token(), &id).await;
        assert!(matches!(result, Err(CatalogError::NotFound(_))));
    }

    #[tokio::test]
    async fn increment_restores_stock_and_is_logged() {
        let catalog = InMemoryCatalogClient::new();
        catalog.put_item(widget(0));
        let id = ProductId::new("SKU-001");

        catalog.increment_stock(&token(), &id, 4).await.unwrap();
        assert_eq!(catalog.stock_of(&id), Some(4));
        assert_eq!(catalog.increment_log(), vec![(id, 4)]);
    }

    #[tokio::test]
    async fn unavailable_mode_fails_every_call() {
        let catalog = InMemoryCatalogClient::new();
        catalog.put_item(widget(5));
        catalog.set_unavailable(true);
        let id = ProductId::new("SKU-001");

        assert!(matches!(
            catalog.fetch_item(&token(), &id).await,
            Err(CatalogError::Unavailable(_))
        ));
        assert!(matches!(
            catalog.decrement_stock(&token(), &id, 1).await,
            Err(CatalogError::Unavailable(_))
        ));
    }
}
