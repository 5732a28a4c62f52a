//! Order store trait.

use async_trait::async_trait;
use common::{OrderId, UserId};
use domain::{Order, OrderQuery, OrderStatus};

use crate::Result;

/// Persistence operations for order records.
///
/// Visibility filtering (admin vs. owner) is the workflow engine's job;
/// the store answers exactly what it is asked.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Persists a new order and returns it.
    async fn insert(&self, order: Order) -> Result<Order>;

    /// Looks up an order by ID.
    async fn find_by_id(&self, id: OrderId) -> Result<Option<Order>>;

    /// Returns all orders owned by a user, newest first.
    async fn find_by_user(&self, user_id: UserId) -> Result<Vec<Order>>;

    /// Returns one page of orders matching the query, newest first,
    /// plus the total match count.
    async fn find_by_query(&self, query: &OrderQuery) -> Result<(Vec<Order>, u64)>;

    /// Sets a new status and refreshes `updated_at`, returning the
    /// updated record. Fails with [`crate::StoreError::NotFound`] if the
    /// order does not exist.
    async fn update_status(&self, id: OrderId, status: OrderStatus) -> Result<Order>;

    /// Removes an order. Fails with [`crate::StoreError::NotFound`] if
    /// the order does not exist.
    async fn delete(&self, id: OrderId) -> Result<()>;
}
