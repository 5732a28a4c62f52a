//! Domain events and the outbound publisher seam.
//!
//! Events are published fire-and-forget after the order is persisted;
//! publish failures are logged by the engine and never fail the request.

use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use common::{OrderId, UserId};
use domain::{LineItem, OrderStatus};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Event emitted once an order has been successfully placed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderPlaced {
    pub order_id: OrderId,
    pub user_id: UserId,
    pub items: Vec<LineItem>,
    pub status: OrderStatus,
}

/// Errors raised by event publication.
#[derive(Debug, Error)]
pub enum PublishError {
    /// The event bus could not be reached.
    #[error("event bus unavailable: {0}")]
    Unavailable(String),
}

/// Outbound publisher for domain events.
///
/// Injected into the workflow engine; there is no process-wide emitter.
#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Publishes an [`OrderPlaced`] event, best effort.
    async fn publish(&self, event: OrderPlaced) -> Result<(), PublishError>;
}

/// Publisher that records events to the log stream.
///
/// Stands in for a real event bus in dev deployments.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingEventPublisher;

impl TracingEventPublisher {
    /// Creates a new tracing publisher.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl EventPublisher for TracingEventPublisher {
    async fn publish(&self, event: OrderPlaced) -> Result<(), PublishError> {
        tracing::info!(
            order_id = %event.order_id,
            user_id = %event.user_id,
            items = event.items.len(),
            status = %event.status,
            "order placed"
        );
        Ok(())
    }
}

/// In-memory publisher for tests.
#[derive(Debug, Clone, Default)]
pub struct InMemoryEventPublisher {
    events: Arc<RwLock<Vec<OrderPlaced>>>,
    fail: Arc<RwLock<bool>>,
}

impl InMemoryEventPublisher {
    /// Creates a new in-memory publisher.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns every published event, in publish order.
    pub fn published(&self) -> Vec<OrderPlaced> {
        self.events.read().unwrap().clone()
    }

    /// Configures the publisher to fail on publish.
    pub fn set_fail(&self, fail: bool) {
        *self.fail.write().unwrap() = fail;
    }
}

#[async_trait]
impl EventPublisher for InMemoryEventPublisher {
    async fn publish(&self, event: OrderPlaced) -> Result<(), PublishError> {
        if *self.fail.read().unwrap() {
            return Err(PublishError::Unavailable("broker down".to_string()));
        }
        self.events.write().unwrap().push(event);
        Ok(())
    }
}
