//! The order workflow engine.

use std::sync::Arc;

use cache::{CacheKey, CacheStore};
use catalog::CatalogClient;
use common::{Caller, OrderId, ProductId, Role};
use domain::{LineItem, Order, OrderError, OrderPage, OrderQuery, OrderStatus, ShippingAddress};
use order_store::OrderStore;
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::events::{EventPublisher, OrderPlaced};
use crate::{Result, WorkflowError, keys};

/// One requested order line, before pricing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OrderLine {
    pub product_id: ProductId,
    pub quantity: u32,
}

/// Input to [`OrderWorkflow::place_order`].
#[derive(Debug, Clone, Deserialize)]
pub struct PlaceOrderRequest {
    pub items: Vec<OrderLine>,
    pub shipping_address: ShippingAddress,
}

/// Orchestrates order placement, reads, status transitions, and
/// cancellation across the order store, the catalog service, the cache
/// layer, and the event bus.
///
/// Per-item catalog calls during placement are issued sequentially so
/// that rollback on partial failure is attributable per item. The
/// engine pre-checks availability as a fast-fail only; the catalog's
/// own check-and-decrement is authoritative under concurrency.
pub struct OrderWorkflow {
    store: Arc<dyn OrderStore>,
    catalog: Arc<dyn CatalogClient>,
    cache: Arc<dyn CacheStore>,
    events: Arc<dyn EventPublisher>,
}

impl OrderWorkflow {
    /// Creates a new workflow engine over the given collaborators.
    pub fn new(
        store: Arc<dyn OrderStore>,
        catalog: Arc<dyn CatalogClient>,
        cache: Arc<dyn CacheStore>,
        events: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            store,
            catalog,
            cache,
            events,
        }
    }

    /// Places a new order for the caller.
    ///
    /// Walks the requested lines in input order: resolves price and
    /// stock (cache first), snapshots the price, then asks the catalog
    /// for an authoritative decrement. If any step fails, stock already
    /// decremented for earlier lines is restored best-effort and the
    /// error identifies the offending product. No order record is
    /// persisted for a failed placement.
    #[tracing::instrument(skip(self, caller, request), fields(user_id = %caller.user_id))]
    pub async fn place_order(&self, caller: &Caller, request: PlaceOrderRequest) -> Result<Order> {
        metrics::counter!("orders_placement_attempts_total").increment(1);
        let start = std::time::Instant::now();

        if request.items.is_empty() {
            return Err(OrderError::EmptyOrder.into());
        }
        for line in &request.items {
            if line.quantity == 0 {
                return Err(OrderError::ZeroQuantity(line.product_id.clone()).into());
            }
        }

        let mut snapshots: Vec<LineItem> = Vec::with_capacity(request.items.len());
        let mut decremented: Vec<(ProductId, u32)> = Vec::new();

        for line in &request.items {
            let item = match self.resolve_item(caller, &line.product_id).await {
                Ok(item) => item,
                Err(e) => {
                    self.roll_back_decrements(caller, &decremented).await;
                    return Err(e);
                }
            };

            // Fast-fail only; the decrement below decides.
            if line.quantity > item.available_qty {
                self.roll_back_decrements(caller, &decremented).await;
                return Err(WorkflowError::InsufficientStock(line.product_id.clone()));
            }

            snapshots.push(LineItem::new(
                line.product_id.clone(),
                line.quantity,
                item.price,
            ));

            if let Err(e) = self
                .catalog
                .decrement_stock(&caller.token, &line.product_id, line.quantity)
                .await
            {
                self.roll_back_decrements(caller, &decremented).await;
                return Err(e.into());
            }

            // Stock changed; the cached item snapshot is stale.
            self.cache_delete(&keys::item_detail(&line.product_id)).await;
            decremented.push((line.product_id.clone(), line.quantity));
        }

        let order = match Order::new(caller.user_id, snapshots, request.shipping_address) {
            Ok(order) => order,
            Err(e) => {
                self.roll_back_decrements(caller, &decremented).await;
                return Err(e.into());
            }
        };
        let order = match self.store.insert(order).await {
            Ok(order) => order,
            Err(e) => {
                self.roll_back_decrements(caller, &decremented).await;
                return Err(e.into());
            }
        };

        self.cache_set_json(&keys::order_detail(order.id, caller), &order, keys::DETAIL_TTL)
            .await;
        self.cache_delete_prefix(&keys::user_list_prefix(caller.role, caller.user_id))
            .await;
        self.cache_delete_prefix(&keys::role_list_prefix(Role::Admin))
            .await;

        let event = OrderPlaced {
            order_id: order.id,
            user_id: order.user_id,
            items: order.items.clone(),
            status: order.status,
        };
        if let Err(e) = self.events.publish(event).await {
            tracing::warn!(order_id = %order.id, error = %e, "failed to publish OrderPlaced");
        }

        metrics::counter!("orders_placed_total").increment(1);
        metrics::histogram!("order_placement_duration_seconds")
            .record(start.elapsed().as_secs_f64());
        tracing::info!(order_id = %order.id, total_cents = order.total_amount.cents(), "order placed");

        Ok(order)
    }

    /// Loads one order, cache first.
    ///
    /// Non-admin callers only see their own orders; an order owned by
    /// someone else reads as not found.
    #[tracing::instrument(skip(self, caller), fields(user_id = %caller.user_id))]
    pub async fn get_order(&self, caller: &Caller, order_id: OrderId) -> Result<Order> {
        let key = keys::order_detail(order_id, caller);
        if let Some(order) = self.cache_get_json::<Order>(&key).await {
            return Ok(order);
        }

        let order = self
            .store
            .find_by_id(order_id)
            .await?
            .ok_or(WorkflowError::OrderNotFound(order_id))?;

        if !caller.is_admin() && !order.owned_by(caller.user_id) {
            return Err(WorkflowError::OrderNotFound(order_id));
        }

        self.cache_set_json(&key, &order, keys::DETAIL_TTL).await;
        Ok(order)
    }

    /// Lists orders, cache first.
    ///
    /// Admin callers get the full store, optionally status-filtered and
    /// paginated. Everyone else gets all of their own orders.
    #[tracing::instrument(skip(self, caller), fields(user_id = %caller.user_id))]
    pub async fn list_orders(&self, caller: &Caller, query: OrderQuery) -> Result<OrderPage> {
        let key = keys::order_list(caller, &query);
        if let Some(page) = self.cache_get_json::<OrderPage>(&key).await {
            return Ok(page);
        }

        let page = if caller.is_admin() {
            let (orders, total) = self.store.find_by_query(&query).await?;
            OrderPage {
                orders,
                total,
                page: query.page,
                limit: query.limit,
            }
        } else {
            let orders = self.store.find_by_user(caller.user_id).await?;
            let total = orders.len() as u64;
            OrderPage {
                orders,
                total,
                page: query.page,
                limit: query.limit,
            }
        };

        self.cache_set_json(&key, &page, keys::LIST_TTL).await;
        Ok(page)
    }

    /// Transitions an order's status along the transition table.
    /// Admin only.
    #[tracing::instrument(skip(self, caller), fields(user_id = %caller.user_id))]
    pub async fn update_status(
        &self,
        caller: &Caller,
        order_id: OrderId,
        new_status: OrderStatus,
    ) -> Result<Order> {
        if !caller.is_admin() {
            return Err(WorkflowError::AdminRequired);
        }

        let order = self
            .store
            .find_by_id(order_id)
            .await?
            .ok_or(WorkflowError::OrderNotFound(order_id))?;

        order.status.validate_transition(new_status)?;
        let updated = self.store.update_status(order_id, new_status).await?;

        // Drop every cached view of this order, then refresh the
        // caller's own, and invalidate admin and owner list caches.
        self.cache_delete_prefix(&keys::order_detail_prefix(order_id))
            .await;
        self.cache_set_json(
            &keys::order_detail(order_id, caller),
            &updated,
            keys::DETAIL_TTL,
        )
        .await;
        self.cache_delete_prefix(&keys::role_list_prefix(Role::Admin))
            .await;
        self.cache_delete_prefix(&keys::user_list_prefix(Role::Customer, updated.user_id))
            .await;

        metrics::counter!("orders_status_transitions_total").increment(1);
        tracing::info!(%order_id, from = %order.status, to = %new_status, "order status updated");

        Ok(updated)
    }

    /// Cancels a `pending` order. Owner only.
    ///
    /// Restores stock for each line item best-effort, then deletes the
    /// order record and invalidates its caches. Returns nothing; the
    /// deleted order body is not echoed back.
    #[tracing::instrument(skip(self, caller), fields(user_id = %caller.user_id))]
    pub async fn cancel_order(&self, caller: &Caller, order_id: OrderId) -> Result<()> {
        let order = self
            .store
            .find_by_id(order_id)
            .await?
            .ok_or(WorkflowError::OrderNotFound(order_id))?;

        if !order.owned_by(caller.user_id) {
            return Err(WorkflowError::OrderNotFound(order_id));
        }
        if !order.status.can_cancel() {
            return Err(OrderError::NotCancellable(order.status).into());
        }

        for item in &order.items {
            match self
                .catalog
                .increment_stock(&caller.token, &item.product_id, item.quantity)
                .await
            {
                Ok(()) => {
                    self.cache_delete(&keys::item_detail(&item.product_id)).await;
                }
                Err(e) => {
                    tracing::error!(
                        %order_id,
                        product_id = %item.product_id,
                        quantity = item.quantity,
                        error = %e,
                        "compensating stock restore failed"
                    );
                }
            }
        }

        self.store.delete(order_id).await?;

        self.cache_delete_prefix(&keys::order_detail_prefix(order_id))
            .await;
        self.cache_delete_prefix(&keys::user_list_prefix(caller.role, caller.user_id))
            .await;
        self.cache_delete_prefix(&keys::role_list_prefix(Role::Admin))
            .await;

        metrics::counter!("orders_cancelled_total").increment(1);
        tracing::info!(%order_id, "order cancelled");

        Ok(())
    }

    /// Resolves an item's current price and stock, cache first.
    async fn resolve_item(
        &self,
        caller: &Caller,
        product_id: &ProductId,
    ) -> Result<catalog::CatalogItem> {
        let key = keys::item_detail(product_id);
        if let Some(item) = self.cache_get_json::<catalog::CatalogItem>(&key).await {
            return Ok(item);
        }

        let item = self.catalog.fetch_item(&caller.token, product_id).await?;
        self.cache_set_json(&key, &item, keys::DETAIL_TTL).await;
        Ok(item)
    }

    /// Restores stock for already-decremented lines, in reverse order.
    /// Failures are logged and do not mask the original error.
    async fn roll_back_decrements(&self, caller: &Caller, decremented: &[(ProductId, u32)]) {
        for (product_id, quantity) in decremented.iter().rev() {
            match self
                .catalog
                .increment_stock(&caller.token, product_id, *quantity)
                .await
            {
                Ok(()) => {
                    self.cache_delete(&keys::item_detail(product_id)).await;
                }
                Err(e) => {
                    tracing::error!(
                        %product_id,
                        quantity,
                        error = %e,
                        "stock rollback failed after aborted placement"
                    );
                }
            }
        }
        if !decremented.is_empty() {
            metrics::counter!("orders_placement_rollbacks_total").increment(1);
        }
    }

    // Cache access is advisory: failures are logged and the operation
    // falls through to the source of truth.

    async fn cache_get_json<T: DeserializeOwned>(&self, key: &CacheKey) -> Option<T> {
        match self.cache.get(key).await {
            Ok(Some(raw)) => match serde_json::from_str(&raw) {
                Ok(value) => {
                    metrics::counter!("cache_hits_total").increment(1);
                    Some(value)
                }
                Err(e) => {
                    tracing::warn!(%key, error = %e, "dropping undecodable cache entry");
                    self.cache_delete(key).await;
                    None
                }
            },
            Ok(None) => {
                metrics::counter!("cache_misses_total").increment(1);
                None
            }
            Err(e) => {
                tracing::warn!(%key, error = %e, "cache read failed, reading from source");
                None
            }
        }
    }

    async fn cache_set_json<T: serde::Serialize>(
        &self,
        key: &CacheKey,
        value: &T,
        ttl: std::time::Duration,
    ) {
        let raw = match serde_json::to_string(value) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(%key, error = %e, "failed to serialize cache value");
                return;
            }
        };
        if let Err(e) = self.cache.set(key, raw, ttl).await {
            tracing::warn!(%key, error = %e, "cache write failed");
        }
    }

    async fn cache_delete(&self, key: &CacheKey) {
        if let Err(e) = self.cache.delete(key).await {
            tracing::warn!(%key, error = %e, "cache delete failed");
        }
    }

    async fn cache_delete_prefix(&self, prefix: &CacheKey) {
        if let Err(e) = self.cache.delete_prefix(prefix).await {
            tracing::warn!(%prefix, error = %e, "cache prefix invalidation failed");
        }
    }
}
