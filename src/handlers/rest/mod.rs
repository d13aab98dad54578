//! REST API for the storefront.
//!
//! Endpoints:
//! - `GET /api/health`: health check
//! - `GET /api/build/suggest?budget=&usage=`: build suggestion
//! - `GET|POST /api/products`, `GET|PUT|DELETE /api/products/:id`: catalog
//! - `POST /api/products/:id/stock`: stock level update
//! - `GET /api/categories/:category/products[/:id]`: products with attributes

mod build;
mod error;
mod products;

#[cfg(test)]
mod tests;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::Router;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::build::BuildAllocator;
use crate::config::ServerConfig;
use crate::storage::CatalogStore;
use crate::utils::bootstrap::shutdown_signal;

pub use error::ApiError;

/// Shared state for axum handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn CatalogStore>,
    pub allocator: BuildAllocator,
    /// Where product images live; `None` leaves images alone on delete.
    pub media_root: Option<PathBuf>,
}

impl AppState {
    pub fn new(store: Arc<dyn CatalogStore>, media_root: Option<PathBuf>) -> Self {
        Self {
            allocator: BuildAllocator::new(Arc::clone(&store)),
            store,
            media_root,
        }
    }
}

/// Start the REST server.
///
/// When the configured port is 0, the OS assigns an ephemeral port. The
/// actual bound port is always logged. Returns after a shutdown signal
/// once in-flight requests have drained.
pub async fn serve(
    state: AppState,
    config: &ServerConfig,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let app = router(state, config.request_timeout());
    let listener = tokio::net::TcpListener::bind(config.bind_address()).await?;
    let actual_port = listener.local_addr()?.port();
    info!(host = %config.host, port = actual_port, "storefront REST API listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

/// Build the axum router (separated for testing).
pub fn router(state: AppState, request_timeout: Duration) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/build/suggest", get(build::suggest))
        .route(
            "/api/products",
            get(products::list_products).post(products::create_product),
        )
        .route(
            "/api/products/:id",
            get(products::get_product)
                .put(products::update_product)
                .delete(products::delete_product),
        )
        .route("/api/products/:id/stock", post(products::update_stock))
        .route(
            "/api/categories/:category/products",
            get(products::category_products),
        )
        .route(
            "/api/categories/:category/products/:id",
            get(products::category_product),
        )
        .layer(TimeoutLayer::new(request_timeout))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> StatusCode {
    StatusCode::OK
}
