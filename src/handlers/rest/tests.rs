use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use super::*;
use crate::storage::MockCatalogStore;

fn test_router(store: Arc<MockCatalogStore>) -> Router {
    router(AppState::new(store, None), Duration::from_secs(10))
}

async fn send(app: Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(value) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };

    let resp = app
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), 1024 * 1024)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    send(app, Method::GET, uri, None).await
}

fn cpu_payload(name: &str, price: f64, stock: i64) -> Value {
    json!({
        "name": name,
        "price": price,
        "stock": stock,
        "manufacturer": "AMD",
        "specs": { "category": "CPU", "socket": "AM5", "core_count": 6 }
    })
}

#[tokio::test]
async fn test_health() {
    let (status, _) = get(test_router(Arc::new(MockCatalogStore::new())), "/api/health").await;
    assert_eq!(status, StatusCode::OK);
}

// ============================================================================
// Build suggestion
// ============================================================================

#[tokio::test]
async fn test_suggest_invalid_budget() {
    let app = test_router(Arc::new(MockCatalogStore::new()));

    for uri in [
        "/api/build/suggest?budget=0",
        "/api/build/suggest?budget=-10",
        "/api/build/suggest?budget=abc",
        "/api/build/suggest?budget=150000abc",
        "/api/build/suggest",
    ] {
        let (status, json) = get(app.clone(), uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(json, json!({"success": false, "message": "Invalid budget"}));
    }
}

#[tokio::test]
async fn test_suggest_empty_catalog() {
    let app = test_router(Arc::new(MockCatalogStore::new()));
    let (status, json) = get(app, "/api/build/suggest?budget=150000&usage=gaming").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], true);
    assert_eq!(json["label"], "Entry Level");
    assert_eq!(json["usage"], "Gaming");
    assert_eq!(json["total"], 0.0);
    assert_eq!(json["build"].as_object().unwrap().len(), 10);
    assert!(json["build"]["gpu"].is_null());
    assert_eq!(
        json["debug"]["gpu"],
        "No product found in video_card under LKR 49,500.00"
    );
}

#[tokio::test]
async fn test_suggest_missing_usage_echoes_empty_label() {
    let store = Arc::new(MockCatalogStore::new());
    // Fits the gaming GPU ceiling at 100k (33,000), not workstation (22,000)
    // or multimedia (24,200).
    store
        .create_product(
            serde_json::from_value(json!({
                "name": "RTX 3060",
                "price": 30_000.0,
                "stock": 10,
                "manufacturer": "NVIDIA",
                "specs": {"category": "Video Card"}
            }))
            .unwrap(),
        )
        .await
        .unwrap();
    let app = test_router(store);

    for uri in [
        "/api/build/suggest?budget=100000",
        "/api/build/suggest?budget=100000&usage=",
    ] {
        let (status, json) = get(app.clone(), uri).await;
        assert_eq!(status, StatusCode::OK, "{uri}");
        assert_eq!(json["usage"], "", "{uri}");
        assert_eq!(json["label"], "Entry Level");
        assert_eq!(json["build"]["gpu"]["name"], "RTX 3060", "{uri}");
        assert_eq!(json["total"], 30_000.0);
    }
}

// ============================================================================
// Catalog
// ============================================================================

#[tokio::test]
async fn test_create_and_get_product() {
    let store = Arc::new(MockCatalogStore::new());
    let app = test_router(Arc::clone(&store));

    let (status, json) = send(
        app.clone(),
        Method::POST,
        "/api/products",
        Some(cpu_payload("Ryzen 5 7600", 65_000.0, 3)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["message"], "Product added successfully");
    let id = json["product_id"].as_i64().unwrap();

    let (status, json) = get(app, &format!("/api/products/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["product"]["name"], "Ryzen 5 7600");
    assert_eq!(json["product"]["category"], "CPU");
    assert_eq!(json["product"]["status"], "Low Stock");
    assert_eq!(json["product"]["specs"]["socket"], "AM5");
}

#[tokio::test]
async fn test_create_rejects_bad_payloads() {
    let app = test_router(Arc::new(MockCatalogStore::new()));

    let (status, json) = send(
        app.clone(),
        Method::POST,
        "/api/products",
        Some(cpu_payload("Ryzen", -1.0, 3)),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["success"], false);

    let (status, json) = send(
        app,
        Method::POST,
        "/api/products",
        Some(json!({"name": "x", "price": 1, "manufacturer": "y", "specs": {"category": "Toaster"}})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["success"], false);
}

#[tokio::test]
async fn test_get_missing_product() {
    let app = test_router(Arc::new(MockCatalogStore::new()));
    let (status, json) = get(app, "/api/products/77").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["success"], false);
}

#[tokio::test]
async fn test_list_products_by_category() {
    let store = Arc::new(MockCatalogStore::new());
    let app = test_router(Arc::clone(&store));
    send(app.clone(), Method::POST, "/api/products", Some(cpu_payload("A", 1.0, 9))).await;
    send(
        app.clone(),
        Method::POST,
        "/api/products",
        Some(json!({
            "name": "B", "price": 2.0, "stock": 9, "manufacturer": "LG",
            "specs": {"category": "Monitor", "refresh_rate": 144}
        })),
    )
    .await;

    let (_, json) = get(app.clone(), "/api/products").await;
    assert_eq!(json["products"].as_array().unwrap().len(), 2);
    assert_eq!(json["products"][0]["name"], "B");

    let (_, json) = get(app.clone(), "/api/products?category=monitor").await;
    assert_eq!(json["products"].as_array().unwrap().len(), 1);

    let (status, _) = get(app, "/api/products?category=toaster").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_update_product_and_missing_target() {
    let store = Arc::new(MockCatalogStore::new());
    let app = test_router(Arc::clone(&store));
    send(app.clone(), Method::POST, "/api/products", Some(cpu_payload("Old", 1.0, 9))).await;

    let (status, json) = send(
        app.clone(),
        Method::PUT,
        "/api/products/1",
        Some(cpu_payload("New", 2.0, 0)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["message"], "Product updated successfully");

    let product = store.get_product(1).await.unwrap().unwrap();
    assert_eq!(product.name, "New");
    assert_eq!(product.status.as_str(), "Out of Stock");

    let (status, _) = send(app, Method::PUT, "/api/products/2", Some(cpu_payload("X", 2.0, 0))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_stock() {
    let store = Arc::new(MockCatalogStore::new());
    let app = test_router(Arc::clone(&store));
    send(app.clone(), Method::POST, "/api/products", Some(cpu_payload("Ryzen", 1.0, 9))).await;

    let (status, json) = send(
        app.clone(),
        Method::POST,
        "/api/products/1/stock",
        Some(json!({"stock": 2, "last_restock_date": "2026-03-01 10:00:00"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["new_stock"], 2);
    assert_eq!(json["data"]["new_status"], "Low Stock");
    assert_eq!(json["data"]["last_restock_date"], "2026-03-01 10:00:00");

    let (status, _) = send(
        app,
        Method::POST,
        "/api/products/1/stock",
        Some(json!({"stock": -3})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_delete_product_removes_image() {
    let media = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(media.path().join("uploads")).unwrap();
    let image = media.path().join("uploads/cpu.png");
    std::fs::write(&image, b"png").unwrap();

    let store = Arc::new(MockCatalogStore::new());
    let app = router(
        AppState::new(store.clone(), Some(media.path().to_path_buf())),
        Duration::from_secs(10),
    );

    let mut payload = cpu_payload("Ryzen", 1.0, 9);
    payload["image_url"] = json!("/uploads/cpu.png");
    send(app.clone(), Method::POST, "/api/products", Some(payload)).await;

    let (status, json) = send(app.clone(), Method::DELETE, "/api/products/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["message"], "Product deleted successfully");
    assert!(!image.exists());
    assert!(store.is_empty().await);

    let (status, _) = send(app, Method::DELETE, "/api/products/1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_category_endpoints() {
    let store = Arc::new(MockCatalogStore::new());
    let app = test_router(Arc::clone(&store));
    send(app.clone(), Method::POST, "/api/products", Some(cpu_payload("Ryzen", 1.0, 9))).await;

    let (status, json) = get(app.clone(), "/api/categories/cpu/products").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"][0]["specs"]["core_count"], 6);

    let (status, json) = get(app.clone(), "/api/categories/cpu/products/1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["name"], "Ryzen");

    let (status, _) = get(app.clone(), "/api/categories/monitor/products/1").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, json) = get(app, "/api/categories/toaster/products").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["success"], false);
}

#[tokio::test]
async fn test_storage_failure_is_500() {
    let store = Arc::new(MockCatalogStore::new());
    store.set_fail_on_read(true).await;

    let (status, json) = get(test_router(store), "/api/products").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["success"], false);
}
