//! HTTP implementation of the catalog client.

use std::time::Duration;

use async_trait::async_trait;
use common::{BearerToken, Money, ProductId};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use crate::{CatalogClient, CatalogError, CatalogItem};

/// Catalog client backed by the items service HTTP API.
///
/// Endpoints:
/// - `GET  {base}/api/items/{id}`
/// - `PUT  {base}/api/items/{id}/decrement` with `{"quantity": n}`
/// - `PUT  {base}/api/items/{id}/increment` with `{"quantity": n}`
///
/// Every request carries the caller's bearer credential and the client's
/// bounded timeout; timeouts and connection failures surface as
/// [`CatalogError::Unavailable`].
#[derive(Debug, Clone)]
pub struct HttpCatalogClient {
    base_url: String,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct ItemPayload {
    name: String,
    price: Money,
    available_qty: u32,
}

#[derive(Debug, Serialize)]
struct QuantityPayload {
    quantity: u32,
}

impl HttpCatalogClient {
    /// Creates a client for the items service at `base_url` with the
    /// given per-request timeout.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, CatalogError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CatalogError::Unexpected(e.to_string()))?;

        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }

        Ok(Self { base_url, client })
    }

    fn item_url(&self, product_id: &ProductId) -> String {
        format!("{}/api/items/{}", self.base_url, product_id)
    }

    async fn put_quantity(
        &self,
        token: &BearerToken,
        product_id: &ProductId,
        verb: &str,
        quantity: u32,
    ) -> Result<(), CatalogError> {
        let url = format!("{}/{verb}", self.item_url(product_id));
        let response = self
            .client
            .put(&url)
            .bearer_auth(token.as_str())
            .json(&QuantityPayload { quantity })
            .send()
            .await
            .map_err(map_transport_error)?;

        match response.status() {
            status if status.is_success() => Ok(()),
            StatusCode::NOT_FOUND => Err(CatalogError::NotFound(product_id.clone())),
            StatusCode::BAD_REQUEST if verb == "decrement" => {
                Err(CatalogError::InsufficientStock(product_id.clone()))
            }
            status => Err(CatalogError::Unexpected(format!(
                "{verb} for {product_id} returned {status}"
            ))),
        }
    }
}

fn map_transport_error(e: reqwest::Error) -> CatalogError {
    if e.is_timeout() || e.is_connect() {
        CatalogError::Unavailable(e.to_string())
    } else {
        CatalogError::Unexpected(e.to_string())
    }
}

#[async_trait]
impl CatalogClient for HttpCatalogClient {
    #[tracing::instrument(skip(self, token))]
    async fn fetch_item(
        &self,
        token: &BearerToken,
        product_id: &ProductId,
    ) -> Result<CatalogItem, CatalogError> {
        let response = self
            .client
            .get(self.item_url(product_id))
            .bearer_auth(token.as_str())
            .send()
            .await
            .map_err(map_transport_error)?;

        match response.status() {
            status if status.is_success() => {
                let payload: ItemPayload = response
                    .json()
                    .await
                    .map_err(|e| CatalogError::Unexpected(e.to_string()))?;
                Ok(CatalogItem {
                    product_id: product_id.clone(),
                    name: payload.name,
                    price: payload.price,
                    available_qty: payload.available_qty,
                })
            }
            StatusCode::NOT_FOUND => Err(CatalogError::NotFound(product_id.clone())),
            status => Err(CatalogError::Unexpected(format!(
                "fetch for {product_id} returned {status}"
            ))),
        }
    }

    #[tracing::instrument(skip(self, token))]
    async fn decrement_stock(
        &self,
        token: &BearerToken,
        product_id: &ProductId,
        quantity: u32,
    ) -> Result<(), CatalogError> {
        self.put_quantity(token, product_id, "decrement", quantity)
            .await
    }

    #[tracing::instrument(skip(self, token))]
    async fn increment_stock(
        &self,
        token: &BearerToken,
        product_id: &ProductId,
        quantity: u32,
    ) -> Result<(), CatalogError> {
        self.put_quantity(token, product_id, "increment", quantity)
            .await
    }
}
