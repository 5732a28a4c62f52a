//! Integration tests for the API server.

use std::sync::{Arc, OnceLock};

use auth::StaticIdentityVerifier;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use cache::InMemoryCache;
use catalog::{CatalogItem, InMemoryCatalogClient};
use common::{Money, ProductId, Role, UserId};
use metrics_exporter_prometheus::PrometheusHandle;
use tower::ServiceExt;
use workflow::{InMemoryEventPublisher, OrderWorkflow};

static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

fn get_metrics_handle() -> PrometheusHandle {
    METRICS_HANDLE
        .get_or_init(|| {
            let builder = metrics_exporter_prometheus::PrometheusBuilder::new();
            builder
                .install_recorder()
                .expect("failed to install Prometheus recorder")
        })
        .clone()
}

struct World {
    app: axum::Router,
    catalog: InMemoryCatalogClient,
    verifier: StaticIdentityVerifier,
    alice: UserId,
}

fn setup() -> World {
    let store = order_store::InMemoryOrderStore::new();
    let catalog = InMemoryCatalogClient::new();
    let verifier = StaticIdentityVerifier::new();

    let alice = UserId::new();
    let bob = UserId::new();
    let admin = UserId::new();
    verifier.register("alice-token", alice, Role::Customer);
    verifier.register("bob-token", bob, Role::Customer);
    verifier.register("admin-token", admin, Role::Admin);

    let workflow = OrderWorkflow::new(
        Arc::new(store),
        Arc::new(catalog.clone()),
        Arc::new(InMemoryCache::new()),
        Arc::new(InMemoryEventPublisher::new()),
    );
    let state = api::AppState::new(Arc::new(workflow), Arc::new(verifier.clone()));
    let app = api::create_app(state, get_metrics_handle());

    World {
        app,
        catalog,
        verifier,
        alice,
    }
}

fn stock(world: &World, id: &str, price_cents: i64, qty: u32) {
    world.catalog.put_item(CatalogItem {
        product_id: ProductId::new(id),
        name: id.to_string(),
        price: Money::from_cents(price_cents),
        available_qty: qty,
    });
}

fn order_body(lines: &[(&str, u32)]) -> String {
    let items: Vec<serde_json::Value> = lines
        .iter()
        .map(|(id, qty)| serde_json::json!({"product_id": id, "quantity": qty}))
        .collect();
    serde_json::json!({
        "items": items,
        "shipping_address": {
            "line1": "1 Main St",
            "city": "Springfield",
            "postal_code": "12345",
            "country": "US"
        }
    })
    .to_string()
}

fn request(method: &str, uri: &str, token: Option<&str>, body: Option<String>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn place_order(world: &World, token: &str, lines: &[(&str, u32)]) -> serde_json::Value {
    let response = world
        .app
        .clone()
        .oneshot(request("POST", "/orders", Some(token), Some(order_body(lines))))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await
}

#[tokio::test]
async fn health_check() {
    let world = setup();

    let response = world
        .app
        .oneshot(request("GET", "/health", None, None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
}

#[tokio::test]
async fn orders_require_a_token() {
    let world = setup();

    let response = world
        .app
        .clone()
        .oneshot(request("GET", "/orders", None, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = world
        .app
        .oneshot(request("GET", "/orders", Some("forged-token"), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn create_order_returns_created_with_totals() {
    let world = setup();
    stock(&world, "SKU-001", 1000, 10);
    stock(&world, "SKU-002", 500, 10);

    let json = place_order(&world, "alice-token", &[("SKU-001", 3), ("SKU-002", 1)]).await;

    assert_eq!(json["total_cents"], 3500);
    assert_eq!(json["status"], "pending");
    assert_eq!(json["user_id"], world.alice.to_string());
    assert_eq!(json["items"].as_array().unwrap().len(), 2);
    assert_eq!(json["items"][0]["price_cents"], 1000);
}

#[tokio::test]
async fn create_order_names_the_failing_product() {
    let world = setup();
    stock(&world, "SKU-001", 1000, 2);

    let response = world
        .app
        .clone()
        .oneshot(request(
            "POST",
            "/orders",
            Some("alice-token"),
            Some(order_body(&[("SKU-001", 5)])),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "insufficient_stock");
    assert!(json["error"].as_str().unwrap().contains("SKU-001"));

    let response = world
        .app
        .oneshot(request(
            "POST",
            "/orders",
            Some("alice-token"),
            Some(order_body(&[("SKU-404", 1)])),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "product_not_found");
    assert!(json["error"].as_str().unwrap().contains("SKU-404"));
}

#[tokio::test]
async fn get_order_is_scoped_to_its_owner() {
    let world = setup();
    stock(&world, "SKU-001", 1000, 10);

    let created = place_order(&world, "alice-token", &[("SKU-001", 1)]).await;
    let id = created["id"].as_str().unwrap();

    let response = world
        .app
        .clone()
        .oneshot(request("GET", &format!("/orders/{id}"), Some("alice-token"), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Another customer cannot see it; an admin can.
    let response = world
        .app
        .clone()
        .oneshot(request("GET", &format!("/orders/{id}"), Some("bob-token"), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = world
        .app
        .clone()
        .oneshot(request("GET", &format!("/orders/{id}"), Some("admin-token"), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = world
        .app
        .oneshot(request("GET", "/orders/not-a-uuid", Some("alice-token"), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn listing_is_scoped_and_admin_sees_all() {
    let world = setup();
    stock(&world, "SKU-001", 1000, 100);

    place_order(&world, "alice-token", &[("SKU-001", 1)]).await;
    place_order(&world, "bob-token", &[("SKU-001", 2)]).await;

    let response = world
        .app
        .clone()
        .oneshot(request("GET", "/orders", Some("alice-token"), None))
        .await
        .unwrap();
    let json = body_json(response).await;
    assert_eq!(json["total"], 1);
    assert_eq!(
        json["orders"][0]["user_id"],
        world.alice.to_string()
    );

    let response = world
        .app
        .clone()
        .oneshot(request("GET", "/orders?status=pending", Some("admin-token"), None))
        .await
        .unwrap();
    let json = body_json(response).await;
    assert_eq!(json["total"], 2);

    let response = world
        .app
        .oneshot(request("GET", "/orders?status=bogus", Some("admin-token"), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn status_updates_are_admin_only_and_validated() {
    let world = setup();
    stock(&world, "SKU-001", 1000, 10);

    let created = place_order(&world, "alice-token", &[("SKU-001", 1)]).await;
    let id = created["id"].as_str().unwrap();

    let response = world
        .app
        .clone()
        .oneshot(request(
            "PATCH",
            &format!("/orders/{id}"),
            Some("alice-token"),
            Some(serde_json::json!({"status": "processing"}).to_string()),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // pending -> shipped skips a step.
    let response = world
        .app
        .clone()
        .oneshot(request(
            "PATCH",
            &format!("/orders/{id}"),
            Some("admin-token"),
            Some(serde_json::json!({"status": "shipped"}).to_string()),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "invalid_transition");
    let message = json["error"].as_str().unwrap();
    assert!(message.contains("pending"));
    assert!(message.contains("shipped"));

    let response = world
        .app
        .clone()
        .oneshot(request(
            "PATCH",
            &format!("/orders/{id}"),
            Some("admin-token"),
            Some(serde_json::json!({"status": "processing"}).to_string()),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "processing");

    // The owner's next read reflects the new status.
    let response = world
        .app
        .oneshot(request("GET", &format!("/orders/{id}"), Some("alice-token"), None))
        .await
        .unwrap();
    let json = body_json(response).await;
    assert_eq!(json["status"], "processing");
}

#[tokio::test]
async fn cancellation_deletes_pending_orders_only() {
    let world = setup();
    stock(&world, "SKU-001", 1000, 10);

    let created = place_order(&world, "alice-token", &[("SKU-001", 4)]).await;
    let id = created["id"].as_str().unwrap();

    let response = world
        .app
        .clone()
        .oneshot(request("DELETE", &format!("/orders/{id}"), Some("alice-token"), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["message"], "Order cancelled");

    // Stock was restored and the record is gone.
    assert_eq!(world.catalog.stock_of(&ProductId::new("SKU-001")), Some(10));
    let response = world
        .app
        .clone()
        .oneshot(request("GET", &format!("/orders/{id}"), Some("alice-token"), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // A non-pending order cannot be cancelled.
    let created = place_order(&world, "alice-token", &[("SKU-001", 1)]).await;
    let id = created["id"].as_str().unwrap();
    world
        .app
        .clone()
        .oneshot(request(
            "PATCH",
            &format!("/orders/{id}"),
            Some("admin-token"),
            Some(serde_json::json!({"status": "processing"}).to_string()),
        ))
        .await
        .unwrap();

    let response = world
        .app
        .oneshot(request("DELETE", &format!("/orders/{id}"), Some("alice-token"), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "invalid_state");
}

#[tokio::test]
async fn auth_outage_is_not_unauthorized() {
    let world = setup();
    world.verifier.set_unavailable(true);

    let response = world
        .app
        .oneshot(request("GET", "/orders", Some("alice-token"), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let json = body_json(response).await;
    assert_eq!(json["code"], "upstream_unavailable");
}

#[tokio::test]
async fn metrics_endpoint_renders() {
    let world = setup();

    let response = world
        .app
        .oneshot(request("GET", "/metrics", None, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
