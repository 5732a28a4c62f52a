//! Order status state machine.

use serde::{Deserialize, Serialize};

use crate::OrderError;

/// The status of an order in its lifecycle.
///
/// Status transitions:
/// ```text
/// pending ──┬──► processing ──► shipped ──► delivered
///           │
///           └──► cancelled
/// ```
///
/// `delivered` and `cancelled` are terminal. Owner-initiated cancellation
/// is only permitted while the order is still `pending`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Order has been placed, stock reserved, awaiting processing.
    #[default]
    Pending,

    /// Order is being prepared for shipment.
    Processing,

    /// Order has left the warehouse.
    Shipped,

    /// Order has reached the customer (terminal state).
    Delivered,

    /// Order was cancelled by an administrator (terminal state).
    Cancelled,
}

impl OrderStatus {
    /// Returns true if the transition to `next` is in the transition table.
    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        matches!(
            (self, next),
            (OrderStatus::Pending, OrderStatus::Processing)
                | (OrderStatus::Pending, OrderStatus::Cancelled)
                | (OrderStatus::Processing, OrderStatus::Shipped)
                | (OrderStatus::Shipped, OrderStatus::Delivered)
        )
    }

    /// Validates the transition to `next`, naming both states on failure.
    pub fn validate_transition(&self, next: OrderStatus) -> Result<(), OrderError> {
        if self.can_transition_to(next) {
            Ok(())
        } else {
            Err(OrderError::InvalidTransition {
                from: *self,
                to: next,
            })
        }
    }

    /// Returns true if the owner may cancel an order in this status.
    pub fn can_cancel(&self) -> bool {
        matches!(self, OrderStatus::Pending)
    }

    /// Returns true if this is a terminal status (no further transitions).
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }

    /// Returns the status name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Processing => "processing",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = OrderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(OrderStatus::Pending),
            "processing" => Ok(OrderStatus::Processing),
            "shipped" => Ok(OrderStatus::Shipped),
            "delivered" => Ok(OrderStatus::Delivered),
            "cancelled" => Ok(OrderStatus::Cancelled),
            other => Err(OrderError::UnknownStatus(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_status_is_pending() {
        assert_eq!(OrderStatus::default(), OrderStatus::Pending);
    }

    #[test]
    fn pending_transitions() {
        assert!(OrderStatus::Pending.can_transition_to(OrderStatus::Processing));
        assert!(OrderStatus::Pending.can_transition_to(OrderStatus::Cancelled));
        assert!(!OrderStatus::Pending.can_transition_to(OrderStatus::Shipped));
        assert!(!OrderStatus::Pending.can_transition_to(OrderStatus::Delivered));
    }

    #[test]
    fn processing_transitions() {
        assert!(OrderStatus::Processing.can_transition_to(OrderStatus::Shipped));
        assert!(!OrderStatus::Processing.can_transition_to(OrderStatus::Delivered));
        assert!(!OrderStatus::Processing.can_transition_to(OrderStatus::Cancelled));
        assert!(!OrderStatus::Processing.can_transition_to(OrderStatus::Pending));
    }

    #[test]
    fn shipped_transitions() {
        assert!(OrderStatus::Shipped.can_transition_to(OrderStatus::Delivered));
        assert!(!OrderStatus::Shipped.can_transition_to(OrderStatus::Processing));
        assert!(!OrderStatus::Shipped.can_transition_to(OrderStatus::Cancelled));
    }

    #[test]
    fn terminal_statuses_have_no_transitions() {
        for next in [
            OrderStatus::Pending,
            OrderStatus::Processing,
            OrderStatus::Shipped,
            OrderStatus::Delivered,
            OrderStatus::Cancelled,
        ] {
            assert!(!OrderStatus::Delivered.can_transition_to(next));
            assert!(!OrderStatus::Cancelled.can_transition_to(next));
        }
        assert!(OrderStatus::Delivered.is_terminal());
        assert!(OrderStatus::Cancelled.is_terminal());
    }

    #[test]
    fn only_pending_can_cancel() {
        assert!(OrderStatus::Pending.can_cancel());
        assert!(!OrderStatus::Processing.can_cancel());
        assert!(!OrderStatus::Shipped.can_cancel());
        assert!(!OrderStatus::Delivered.can_cancel());
        assert!(!OrderStatus::Cancelled.can_cancel());
    }

    #[test]
    fn validate_transition_names_both_states() {
        let err = OrderStatus::Pending
            .validate_transition(OrderStatus::Shipped)
            .unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("pending"));
        assert!(msg.contains("shipped"));
    }

    #[test]
    fn status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&OrderStatus::Processing).unwrap(),
            "\"processing\""
        );
        let status: OrderStatus = serde_json::from_str("\"delivered\"").unwrap();
        assert_eq!(status, OrderStatus::Delivered);
    }

    #[test]
    fn status_parses_from_str() {
        assert_eq!(
            "cancelled".parse::<OrderStatus>().unwrap(),
            OrderStatus::Cancelled
        );
        assert!("unknown".parse::<OrderStatus>().is_err());
    }
}
