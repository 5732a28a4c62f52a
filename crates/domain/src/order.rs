//! The order record and its line items.

use chrono::{DateTime, Utc};
use common::{Money, OrderId, ProductId, UserId};
use serde::{Deserialize, Serialize};

use crate::{OrderError, OrderStatus};

/// A `{productId, quantity, price}` snapshot within an order.
///
/// The price is captured from the catalog at order time and never
/// recomputed from live catalog prices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// The product identifier.
    pub product_id: ProductId,

    /// Quantity ordered.
    pub quantity: u32,

    /// Price per unit at order time.
    pub price: Money,
}

impl LineItem {
    /// Creates a new line item.
    pub fn new(product_id: impl Into<ProductId>, quantity: u32, price: Money) -> Self {
        Self {
            product_id: product_id.into(),
            quantity,
            price,
        }
    }

    /// Returns the total price for this line (price * quantity).
    pub fn total_price(&self) -> Money {
        self.price.multiply(self.quantity)
    }
}

/// Shipping destination recorded with the order. Immutable after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingAddress {
    pub line1: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line2: Option<String>,
    pub city: String,
    pub postal_code: String,
    pub country: String,
}

/// A persisted order record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    /// Opaque unique identifier, assigned at creation.
    pub id: OrderId,

    /// Owning identity; immutable after creation.
    pub user_id: UserId,

    /// Line items in input order.
    pub items: Vec<LineItem>,

    /// Sum of `price * quantity` over items, computed once at creation.
    pub total_amount: Money,

    /// Shipping destination.
    pub shipping_address: ShippingAddress,

    /// Current lifecycle status.
    pub status: OrderStatus,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Creates a new `pending` order, validating its invariants and
    /// computing the total from the given price snapshots.
    pub fn new(
        user_id: UserId,
        items: Vec<LineItem>,
        shipping_address: ShippingAddress,
    ) -> Result<Self, OrderError> {
        if items.is_empty() {
            return Err(OrderError::EmptyOrder);
        }
        let mut total = Money::zero();
        for item in &items {
            if item.quantity == 0 {
                return Err(OrderError::ZeroQuantity(item.product_id.clone()));
            }
            if item.price.is_negative() {
                return Err(OrderError::NegativePrice(item.product_id.clone()));
            }
            total += item.total_price();
        }

        let now = Utc::now();
        Ok(Self {
            id: OrderId::new(),
            user_id,
            items,
            total_amount: total,
            shipping_address,
            status: OrderStatus::Pending,
            created_at: now,
            updated_at: now,
        })
    }

    /// Returns the number of line items.
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Returns true if the given user owns this order.
    pub fn owned_by(&self, user_id: UserId) -> bool {
        self.user_id == user_id
    }
}
