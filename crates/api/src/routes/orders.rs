//! Order endpoints.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use common::OrderId;
use domain::{Order, OrderPage, OrderQuery, OrderStatus, ShippingAddress};
use serde::{Deserialize, Serialize};
use workflow::PlaceOrderRequest;

use crate::AppState;
use crate::error::ApiError;
use crate::extract::AuthCaller;

// -- Request types --

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub status: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: OrderStatus,
}

// -- Response types --

#[derive(Debug, Serialize)]
pub struct LineItemResponse {
    pub product_id: String,
    pub quantity: u32,
    pub price_cents: i64,
}

#[derive(Debug, Serialize)]
pub struct OrderResponse {
    pub id: String,
    pub user_id: String,
    pub items: Vec<LineItemResponse>,
    pub total_cents: i64,
    pub shipping_address: ShippingAddress,
    pub status: OrderStatus,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Order> for OrderResponse {
    fn from(order: Order) -> Self {
        Self {
            id: order.id.to_string(),
            user_id: order.user_id.to_string(),
            items: order
                .items
                .iter()
                .map(|item| LineItemResponse {
                    product_id: item.product_id.to_string(),
                    quantity: item.quantity,
                    price_cents: item.price.cents(),
                })
                .collect(),
            total_cents: order.total_amount.cents(),
            shipping_address: order.shipping_address,
            status: order.status,
            created_at: order.created_at.to_rfc3339(),
            updated_at: order.updated_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct OrderListResponse {
    pub orders: Vec<OrderResponse>,
    pub total: u64,
    pub page: u32,
    pub limit: u32,
}

impl From<OrderPage> for OrderListResponse {
    fn from(page: OrderPage) -> Self {
        Self {
            orders: page.orders.into_iter().map(OrderResponse::from).collect(),
            total: page.total,
            page: page.page,
            limit: page.limit,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CancelResponse {
    pub message: &'static str,
}

// -- Handlers --

/// POST /orders — place a new order.
#[tracing::instrument(skip(state, caller, request))]
pub async fn create(
    State(state): State<AppState>,
    AuthCaller(caller): AuthCaller,
    Json(request): Json<PlaceOrderRequest>,
) -> Result<(StatusCode, Json<OrderResponse>), ApiError> {
    let order = state.workflow.place_order(&caller, request).await?;
    Ok((StatusCode::CREATED, Json(order.into())))
}

/// GET /orders — list orders visible to the caller.
#[tracing::instrument(skip(state, caller))]
pub async fn list(
    State(state): State<AppState>,
    AuthCaller(caller): AuthCaller,
    Query(params): Query<ListParams>,
) -> Result<Json<OrderListResponse>, ApiError> {
    let status = params
        .status
        .as_deref()
        .map(|s| {
            s.parse::<OrderStatus>()
                .map_err(|e| ApiError::BadRequest(e.to_string()))
        })
        .transpose()?;

    let query = OrderQuery::new(
        status,
        params.page.unwrap_or(1),
        params.limit.unwrap_or(domain::DEFAULT_LIMIT),
    );

    let page = state.workflow.list_orders(&caller, query).await?;
    Ok(Json(page.into()))
}

/// GET /orders/{id} — fetch one order.
#[tracing::instrument(skip(state, caller))]
pub async fn get(
    State(state): State<AppState>,
    AuthCaller(caller): AuthCaller,
    Path(id): Path<String>,
) -> Result<Json<OrderResponse>, ApiError> {
    let order_id = parse_order_id(&id)?;
    let order = state.workflow.get_order(&caller, order_id).await?;
    Ok(Json(order.into()))
}

/// PATCH /orders/{id} — transition an order's status. Admin only.
#[tracing::instrument(skip(state, caller))]
pub async fn update_status(
    State(state): State<AppState>,
    AuthCaller(caller): AuthCaller,
    Path(id): Path<String>,
    Json(request): Json<UpdateStatusRequest>,
) -> Result<Json<OrderResponse>, ApiError> {
    let order_id = parse_order_id(&id)?;
    let order = state
        .workflow
        .update_status(&caller, order_id, request.status)
        .await?;
    Ok(Json(order.into()))
}

/// DELETE /orders/{id} — cancel a pending order. Owner only.
#[tracing::instrument(skip(state, caller))]
pub async fn cancel(
    State(state): State<AppState>,
    AuthCaller(caller): AuthCaller,
    Path(id): Path<String>,
) -> Result<Json<CancelResponse>, ApiError> {
    let order_id = parse_order_id(&id)?;
    state.workflow.cancel_order(&caller, order_id).await?;
    Ok(Json(CancelResponse {
        message: "Order cancelled",
    }))
}

fn parse_order_id(id: &str) -> Result<OrderId, ApiError> {
    let uuid = uuid::Uuid::parse_str(id)
        .map_err(|e| ApiError::BadRequest(format!("Invalid order ID: {e}")))?;
    Ok(OrderId::from_uuid(uuid))
}
