//! Catalog endpoints.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::{ApiError, AppState};
use crate::catalog::{
    remove_product_image, CatalogEntry, Category, NewProduct, Product, StockStatus, StockUpdate,
    StockUpdateRequest, LOW_STOCK_THRESHOLD,
};

// ============================================================================
// Response types
// ============================================================================

#[derive(Serialize)]
pub(super) struct ProductListResponse {
    success: bool,
    products: Vec<Product>,
}

#[derive(Serialize)]
pub(super) struct ProductResponse {
    success: bool,
    product: CatalogEntry,
}

#[derive(Serialize)]
pub(super) struct EntriesResponse {
    success: bool,
    data: Vec<CatalogEntry>,
}

#[derive(Serialize)]
pub(super) struct EntryResponse {
    success: bool,
    data: CatalogEntry,
}

#[derive(Serialize)]
pub(super) struct MessageResponse {
    success: bool,
    message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    product_id: Option<i64>,
}

#[derive(Serialize)]
pub(super) struct StockResponse {
    success: bool,
    message: &'static str,
    data: StockUpdate,
}

#[derive(Debug, Deserialize)]
pub(super) struct ListParams {
    category: Option<String>,
}

fn message(message: &'static str) -> Json<MessageResponse> {
    Json(MessageResponse {
        success: true,
        message,
        product_id: None,
    })
}

fn body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))
}

fn parse_category(raw: &str) -> Result<Category, ApiError> {
    raw.parse::<Category>()
        .map_err(|e| ApiError::NotFound(e.to_string()))
}

fn product_not_found(product_id: i64) -> ApiError {
    ApiError::NotFound(format!("Product {} not found", product_id))
}

// ============================================================================
// Handlers
// ============================================================================

/// `GET /api/products[?category=]`
pub(super) async fn list_products(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<ProductListResponse>, ApiError> {
    let category = params
        .category
        .as_deref()
        .filter(|c| !c.trim().is_empty())
        .map(|c| {
            c.parse::<Category>()
                .map_err(|e| ApiError::BadRequest(e.to_string()))
        })
        .transpose()?;

    let products = state.store.list_products(category).await?;
    Ok(Json(ProductListResponse {
        success: true,
        products,
    }))
}

/// `GET /api/products/:id`
pub(super) async fn get_product(
    State(state): State<AppState>,
    Path(product_id): Path<i64>,
) -> Result<Json<ProductResponse>, ApiError> {
    let product = state
        .store
        .get_with_attributes(product_id)
        .await?
        .ok_or_else(|| product_not_found(product_id))?;

    Ok(Json(ProductResponse {
        success: true,
        product,
    }))
}

/// `POST /api/products`
pub(super) async fn create_product(
    State(state): State<AppState>,
    payload: Result<Json<NewProduct>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let product = body(payload)?;
    product.validate().map_err(ApiError::BadRequest)?;

    let product_id = state.store.create_product(product).await?;
    Ok(Json(MessageResponse {
        success: true,
        message: "Product added successfully",
        product_id: Some(product_id),
    }))
}

/// `PUT /api/products/:id`
pub(super) async fn update_product(
    State(state): State<AppState>,
    Path(product_id): Path<i64>,
    payload: Result<Json<NewProduct>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let product = body(payload)?;
    product.validate().map_err(ApiError::BadRequest)?;

    state.store.update_product(product_id, product).await?;
    Ok(message("Product updated successfully"))
}

/// `POST /api/products/:id/stock`
pub(super) async fn update_stock(
    State(state): State<AppState>,
    Path(product_id): Path<i64>,
    payload: Result<Json<StockUpdateRequest>, JsonRejection>,
) -> Result<Json<StockResponse>, ApiError> {
    let request = body(payload)?;
    if request.stock < 0 {
        return Err(ApiError::BadRequest(
            "Stock must not be negative".to_string(),
        ));
    }

    let update = state.store.update_stock(product_id, request).await?;
    info!(
        product_id,
        stock = update.new_stock,
        status = %update.new_status,
        "stock updated"
    );
    if update.new_stock <= LOW_STOCK_THRESHOLD && update.new_status != StockStatus::Discontinued {
        warn!(
            product_id,
            stock = update.new_stock,
            threshold = LOW_STOCK_THRESHOLD,
            "product stock is low"
        );
    }

    Ok(Json(StockResponse {
        success: true,
        message: "Stock updated successfully",
        data: update,
    }))
}

/// `DELETE /api/products/:id`
///
/// Removes the product's image from the media root as well, best effort.
pub(super) async fn delete_product(
    State(state): State<AppState>,
    Path(product_id): Path<i64>,
) -> Result<Json<MessageResponse>, ApiError> {
    let product = state.store.delete_product(product_id).await?;

    if let (Some(root), Some(image_url)) = (&state.media_root, &product.image_url) {
        remove_product_image(root, image_url).await;
    }

    Ok(message("Product deleted successfully"))
}

/// `GET /api/categories/:category/products`
pub(super) async fn category_products(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> Result<Json<EntriesResponse>, ApiError> {
    let category = parse_category(&category)?;
    let data = state.store.list_with_attributes(category).await?;
    Ok(Json(EntriesResponse {
        success: true,
        data,
    }))
}

/// `GET /api/categories/:category/products/:id`
pub(super) async fn category_product(
    State(state): State<AppState>,
    Path((category, product_id)): Path<(String, i64)>,
) -> Result<Json<EntryResponse>, ApiError> {
    let category = parse_category(&category)?;
    let entry = state
        .store
        .get_with_attributes(product_id)
        .await?
        .filter(|entry| entry.product.category == category)
        .ok_or_else(|| product_not_found(product_id))?;

    Ok(Json(EntryResponse {
        success: true,
        data: entry,
    }))
}
