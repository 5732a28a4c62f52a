//! Shared types used across the order service crates.

mod identity;
mod ids;
mod money;

pub use identity::{BearerToken, Caller, Role};
pub use ids::{OrderId, ProductId, UserId};
pub use money::Money;
