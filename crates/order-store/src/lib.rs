//! Order persistence: the store trait and its in-memory and PostgreSQL
//! implementations.

mod error;
mod memory;
mod postgres;
mod store;

pub use error::StoreError;
pub use memory::InMemoryOrderStore;
pub use postgres::PostgresOrderStore;
pub use store::OrderStore;

/// Convenience type alias for store results.
pub type Result<T> = std::result::Result<T, StoreError>;
