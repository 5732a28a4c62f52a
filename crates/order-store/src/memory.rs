//! In-memory order store implementation for testing.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use common::{OrderId, UserId};
use domain::{Order, OrderQuery, OrderStatus};
use tokio::sync::RwLock;

use crate::{OrderStore, Result, StoreError};

/// In-memory order store.
///
/// Provides the same interface and ordering guarantees as the
/// PostgreSQL implementation.
#[derive(Clone, Default)]
pub struct InMemoryOrderStore {
    orders: Arc<RwLock<HashMap<OrderId, Order>>>,
}

impl InMemoryOrderStore {
    /// Creates a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the total number of stored orders.
    pub async fn order_count(&self) -> usize {
        self.orders.read().await.len()
    }
}

fn newest_first(orders: &mut [Order]) {
    orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}

#[async_trait]
impl OrderStore for InMemoryOrderStore {
    async fn insert(&self, order: Order) -> Result<Order> {
        let mut orders = self.orders.write().await;
        orders.insert(order.id, order.clone());
        Ok(order)
    }

    async fn find_by_id(&self, id: OrderId) -> Result<Option<Order>> {
        Ok(self.orders.read().await.get(&id).cloned())
    }

    async fn find_by_user(&self, user_id: UserId) -> Result<Vec<Order>> {
        let orders = self.orders.read().await;
        let mut matched: Vec<Order> = orders
            .values()
            .filter(|o| o.user_id == user_id)
            .cloned()
            .collect();
        newest_first(&mut matched);
        Ok(matched)
    }

    async fn find_by_query(&self, query: &OrderQuery) -> Result<(Vec<Order>, u64)> {
        let orders = self.orders.read().await;
        let mut matched: Vec<Order> = orders
            .values()
            .filter(|o| query.status.is_none_or(|s| o.status == s))
            .cloned()
            .collect();
        newest_first(&mut matched);

        let total = matched.len() as u64;
        let page: Vec<Order> = matched
            .into_iter()
            .skip(query.offset() as usize)
            .take(query.limit as usize)
            .collect();

        Ok((page, total))
    }

    async fn update_status(&self, id: OrderId, status: OrderStatus) -> Result<Order> {
        let mut orders = self.orders.write().await;
        let order = orders.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        order.status = status;
        order.updated_at = Utc::now();
        Ok(order.clone())
    }

    async fn delete(&self, id: OrderId) -> Result<()> {
        let mut orders = self.orders.write().await;
        orders.remove(&id).ok_or(StoreError::NotFound(id))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::Money;
    use domain::{LineItem, ShippingAddress};

    fn address() -> ShippingAddress {
        ShippingAddress {
            line1: "1 Main St".to_string(),
            line2: None,
            city: "Springfield".to_string(),
            postal_code: "12345".to_string(),
            country: "US".to_string(),
        }
    }

    fn order_for(user_id: UserId) -> Order {
        Order::new(
            user_id,
            vec![LineItem::new("SKU-001", 1, Money::from_cents(1000))],
            address(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn insert_and_find_by_id() {
        let store = InMemoryOrderStore::new();
        let order = order_for(UserId::new());

        store.insert(order.clone()).await.unwrap();

        let found = store.find_by_id(order.id).await.unwrap().unwrap();
        assert_eq!(found, order);
    }

    #[tokio::test]
    async fn find_missing_order_returns_none() {
        let store = InMemoryOrderStore::new();
        assert!(store.find_by_id(OrderId::new()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn find_by_user_is_scoped() {
        let store = InMemoryOrderStore::new();
        let alice = UserId::new();
        let bob = UserId::new();

        store.insert(order_for(alice)).await.unwrap();
        store.insert(order_for(alice)).await.unwrap();
        store.insert(order_for(bob)).await.unwrap();

        let orders = store.find_by_user(alice).await.unwrap();
        assert_eq!(orders.len(), 2);
        assert!(orders.iter().all(|o| o.user_id == alice));
    }

    #[tokio::test]
    async fn find_by_query_filters_status_and_paginates() {
        let store = InMemoryOrderStore::new();
        let user = UserId::new();

        for _ in 0..5 {
            store.insert(order_for(user)).await.unwrap();
        }
        let shipped = store.insert(order_for(user)).await.unwrap();
        store
            .update_status(shipped.id, OrderStatus::Processing)
            .await
            .unwrap();

        let (page, total) = store
            .find_by_query(&OrderQuery::new(Some(OrderStatus::Pending), 1, 3))
            .await
            .unwrap();
        assert_eq!(total, 5);
        assert_eq!(page.len(), 3);

        let (page2, total2) = store
            .find_by_query(&OrderQuery::new(Some(OrderStatus::Pending), 2, 3))
            .await
            .unwrap();
        assert_eq!(total2, 5);
        assert_eq!(page2.len(), 2);

        let (all, total_all) = store
            .find_by_query(&OrderQuery::new(None, 1, 10))
            .await
            .unwrap();
        assert_eq!(total_all, 6);
        assert_eq!(all.len(), 6);
    }

    #[tokio::test]
    async fn update_status_refreshes_updated_at() {
        let store = InMemoryOrderStore::new();
        let order = store.insert(order_for(UserId::new())).await.unwrap();

        let updated = store
            .update_status(order.id, OrderStatus::Processing)
            .await
            .unwrap();
        assert_eq!(updated.status, OrderStatus::Processing);
        assert!(updated.updated_at >= order.updated_at);
    }

    #[tokio::test]
    async fn update_status_on_missing_order_fails() {
        let store = InMemoryOrderStore::new();
        let result = store
            .update_status(OrderId::new(), OrderStatus::Processing)
            .await;
        assert!(matches!(result, Err(StoreError::NotFound(_))));
    }

    #[tokio::test]
    async fn delete_removes_order() {
        let store = InMemoryOrderStore::new();
        let order = store.insert(order_for(UserId::new())).await.unwrap();

        store.delete(order.id).await.unwrap();
        assert!(store.find_by_id(order.id).await.unwrap().is_none());
        assert!(matches!(
            store.delete(order.id).await,
            Err(StoreError::NotFound(_))
        ));
    }
}
