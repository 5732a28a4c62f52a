//! Client for the catalog (items) service.
//!
//! The catalog owns item pricing and stock. Stock decrement is the
//! authoritative check-and-decrement: callers may pre-check availability
//! as a fast-fail, but only the decrement result decides.

mod client;
mod error;
mod http;
mod memory;

pub use client::{CatalogClient, CatalogItem};
pub use error::CatalogError;
pub use http::HttpCatalogClient;
pub use memory::InMemoryCatalogClient;
