//! Cache key construction and TTL policy.
//!
//! All order cache keys are caller-scoped (user ID and role are part of
//! the key) so two identities can never read each other's entries
//! through a shared namespace. List keys put the role first, which makes
//! "every admin list" and "this user's lists" both expressible as
//! prefixes for invalidation.

use std::time::Duration;

use cache::CacheKey;
use common::{Caller, OrderId, ProductId, Role, UserId};
use domain::OrderQuery;

/// TTL for list views.
pub const LIST_TTL: Duration = Duration::from_secs(300);

/// TTL for detail views (orders and catalog items).
pub const DETAIL_TTL: Duration = Duration::from_secs(600);

const ORDER_DETAIL: &str = "orders:detail";
const ORDER_LIST: &str = "orders:list";
const ITEM_DETAIL: &str = "items:detail";

/// Detail key for one order as seen by one caller.
pub fn order_detail(order_id: OrderId, caller: &Caller) -> CacheKey {
    CacheKey::new(ORDER_DETAIL)
        .part(order_id)
        .part(caller.user_id)
        .part(caller.role)
}

/// Prefix covering every caller-scoped detail entry for one order.
pub fn order_detail_prefix(order_id: OrderId) -> CacheKey {
    CacheKey::new(ORDER_DETAIL).part(order_id)
}

/// List key for one caller and one query.
pub fn order_list(caller: &Caller, query: &OrderQuery) -> CacheKey {
    let status = query
        .status
        .map(|s| s.as_str())
        .unwrap_or("all");
    CacheKey::new(ORDER_LIST)
        .part(caller.role)
        .part(caller.user_id)
        .part(status)
        .part(query.page)
        .part(query.limit)
}

/// Prefix covering every list entry cached for a role (e.g. all admin
/// listings).
pub fn role_list_prefix(role: Role) -> CacheKey {
    CacheKey::new(ORDER_LIST).part(role)
}

/// Prefix covering every list entry cached for one user under one role.
pub fn user_list_prefix(role: Role, user_id: UserId) -> CacheKey {
    CacheKey::new(ORDER_LIST).part(role).part(user_id)
}

/// Detail key for a catalog item snapshot.
pub fn item_detail(product_id: &ProductId) -> CacheKey {
    CacheKey::new(ITEM_DETAIL).part(product_id)
}
