//! Listing query parameters and paginated results.

use serde::{Deserialize, Serialize};

use crate::{Order, OrderStatus};

/// Default page size for order listings.
pub const DEFAULT_LIMIT: u32 = 10;

/// Maximum page size accepted from clients.
pub const MAX_LIMIT: u32 = 100;

/// Filter and pagination parameters for order listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderQuery {
    /// Restrict to a single status (admin listings only).
    pub status: Option<OrderStatus>,
    /// 1-based page number.
    pub page: u32,
    /// Page size.
    pub limit: u32,
}

impl OrderQuery {
    /// Creates a query with clamped pagination: `page >= 1`,
    /// `1 <= limit <= 100`.
    pub fn new(status: Option<OrderStatus>, page: u32, limit: u32) -> Self {
        Self {
            status,
            page: page.max(1),
            limit: limit.clamp(1, MAX_LIMIT),
        }
    }

    /// Returns the number of records to skip.
    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.limit)
    }
}

impl Default for OrderQuery {
    fn default() -> Self {
        Self::new(None, 1, DEFAULT_LIMIT)
    }
}

/// One page of orders plus the total match count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderPage {
    pub orders: Vec<Order>,
    pub total: u64,
    pub page: u32,
    pub limit: u32,
}
