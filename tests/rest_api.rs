//! End-to-end REST tests against a file-backed SQLite catalog.
//!
//! Run with: cargo test --test rest_api --features sqlite

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use gearsphere::catalog::Category;
use gearsphere::config::Config;
use gearsphere::handlers::rest::{router, AppState};
use gearsphere::storage::{init_storage, CatalogStore};

struct TestApp {
    app: Router,
    store: Arc<dyn CatalogStore>,
    _dir: tempfile::TempDir,
}

async fn test_app() -> TestApp {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let mut config = Config::for_test();
    config.storage.path = dir
        .path()
        .join("catalog.db")
        .to_str()
        .expect("non-utf8 temp path")
        .to_string();

    let store = init_storage(&config.storage)
        .await
        .expect("failed to init storage");
    let app = router(
        AppState::new(Arc::clone(&store), config.catalog.media_root.clone()),
        config.server.request_timeout(),
    );
    TestApp {
        app,
        store,
        _dir: dir,
    }
}

async fn call(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(value) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };

    let resp = app
        .clone()
        .oneshot(builder.body(body).expect("failed to build request"))
        .await
        .expect("request failed");
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), 1024 * 1024)
        .await
        .expect("failed to read body");
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("response is not JSON")
    };
    (status, json)
}

async fn add(app: &Router, name: &str, price: f64, stock: i64, specs: Value) -> i64 {
    let (status, json) = call(
        app,
        Method::POST,
        "/api/products",
        Some(json!({
            "name": name,
            "price": price,
            "stock": stock,
            "manufacturer": "Test",
            "specs": specs,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "create failed: {json}");
    json["product_id"].as_i64().expect("missing product_id")
}

/// One affordable product for every category.
async fn seed_full_catalog(app: &Router) {
    for category in Category::ALL {
        add(app, category.display_name(), 1_000.0, 10, json!({"category": category.display_name()})).await;
    }
}

#[tokio::test]
async fn test_entry_level_gaming_build() {
    let t = test_app().await;
    seed_full_catalog(&t.app).await;

    let (status, json) = call(&t.app, Method::GET, "/api/build/suggest?budget=150000&usage=gaming", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["label"], "Entry Level");
    assert_eq!(json["usage"], "Gaming");
    assert_eq!(json["total"], 10_000.0);
    let build = json["build"].as_object().expect("build is not an object");
    assert_eq!(build.len(), 10);
    assert!(build.values().all(|p| !p.is_null()));
    assert!(json.get("debug").is_none());
}

#[tokio::test]
async fn test_zero_budget_rejected() {
    let t = test_app().await;
    let (status, json) = call(&t.app, Method::GET, "/api/build/suggest?budget=0&usage=gaming", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json, json!({"success": false, "message": "Invalid budget"}));
}

#[tokio::test]
async fn test_unknown_usage_echoes_input() {
    let t = test_app().await;
    // Fits the gaming GPU ceiling (33,000 at 100k) but not workstation (22,000).
    add(&t.app, "RTX 3060", 30_000.0, 4, json!({"category": "Video Card", "memory": 12})).await;

    let (_, json) = call(&t.app, Method::GET, "/api/build/suggest?budget=100000&usage=unknown_value", None).await;
    assert_eq!(json["usage"], "Unknown_value");
    assert_eq!(json["build"]["gpu"]["name"], "RTX 3060");
    assert_eq!(json["label"], "Entry Level");
}

#[tokio::test]
async fn test_empty_category_debug_message() {
    let t = test_app().await;
    add(&t.app, "Ryzen 5", 20_000.0, 10, json!({"category": "CPU"})).await;

    let (_, json) = call(&t.app, Method::GET, "/api/build/suggest?budget=200000&usage=workstation", None).await;
    assert_eq!(json["build"]["cpu"]["name"], "Ryzen 5");
    assert!(json["build"]["monitor"].is_null());
    assert_eq!(
        json["debug"]["monitor"],
        "No product found in monitor under LKR 6,600.00"
    );
    assert!(json["debug"].get("cpu").is_none());
}

#[tokio::test]
async fn test_ultimate_budget_skips_unavailable_products() {
    let t = test_app().await;
    let sold_out = add(&t.app, "Sold out", 100_000.0, 0, json!({"category": "CPU"})).await;
    let available = add(&t.app, "Available", 90_000.0, 3, json!({"category": "CPU"})).await;
    let discontinued = add(&t.app, "Retired", 95_000.0, 50, json!({"category": "CPU"})).await;

    let (status, _) = call(
        &t.app,
        Method::POST,
        &format!("/api/products/{discontinued}/stock"),
        Some(json!({"stock": 50, "status": "Discontinued"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, json) = call(&t.app, Method::GET, "/api/build/suggest?budget=900000", None).await;
    assert_eq!(json["label"], "Ultimate");
    assert_eq!(json["build"]["cpu"]["product_id"], available);
    assert_ne!(json["build"]["cpu"]["product_id"], sold_out);
}

#[tokio::test]
async fn test_product_lifecycle() {
    let t = test_app().await;
    let id = add(
        &t.app,
        "Corsair RM750",
        32_000.0,
        12,
        json!({"category": "Power Supply", "wattage": 750, "type": "ATX", "modular": "Full"}),
    )
    .await;

    let (status, json) = call(&t.app, Method::GET, &format!("/api/categories/psu/products/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["specs"]["wattage"], 750);
    assert_eq!(json["data"]["specs"]["type"], "ATX");
    assert_eq!(json["data"]["status"], "In Stock");

    // Reclassify as a case: attributes move tables.
    let (status, _) = call(
        &t.app,
        Method::PUT,
        &format!("/api/products/{id}"),
        Some(json!({
            "name": "Corsair 4000D",
            "price": 30_000.0,
            "stock": 5,
            "manufacturer": "Corsair",
            "specs": {"category": "PC Case", "type": "ATX Mid Tower", "color": "Black"}
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, json) = call(&t.app, Method::GET, "/api/categories/psu/products", None).await;
    assert!(json["data"].as_array().expect("data is not an array").is_empty());

    let (_, json) = call(&t.app, Method::GET, &format!("/api/products/{id}"), None).await;
    assert_eq!(json["product"]["category"], "PC Case");
    assert_eq!(json["product"]["status"], "Low Stock");
    assert_eq!(json["product"]["specs"]["color"], "Black");

    let (status, _) = call(&t.app, Method::DELETE, &format!("/api/products/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(t.store.get_product(id).await.expect("lookup failed").is_none());

    let (status, json) = call(&t.app, Method::GET, &format!("/api/products/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["success"], false);
}

#[tokio::test]
async fn test_stock_update_missing_product() {
    let t = test_app().await;
    let (status, json) = call(
        &t.app,
        Method::POST,
        "/api/products/404/stock",
        Some(json!({"stock": 1})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["success"], false);
}
