//! The order workflow engine.
//!
//! Orchestrates order placement (sequential stock reservation with
//! compensating rollback), reads through the cache layer, the status
//! state machine, and owner cancellation with best-effort stock restore.

mod engine;
mod error;
mod events;
pub mod keys;

pub use engine::{OrderLine, OrderWorkflow, PlaceOrderRequest};
pub use error::WorkflowError;
pub use events::{
    EventPublisher, InMemoryEventPublisher, OrderPlaced, PublishError, TracingEventPublisher,
};

/// Convenience type alias for workflow results.
pub type Result<T> = std::result::Result<T, WorkflowError>;
