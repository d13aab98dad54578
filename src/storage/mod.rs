//! Catalog storage.
//!
//! `CatalogStore` is the data-access seam for everything that reads or
//! writes products. The SQLite implementation is feature-gated; the mock
//! is an in-memory double with failure injection for tests.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, info};

use crate::catalog::{
    Category, CatalogEntry, NewProduct, Product, StockUpdate, StockUpdateRequest,
};
use crate::config::StorageConfig;

#[cfg(feature = "sqlite")]
pub mod schema;
#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(any(test, feature = "test-utils"))]
pub mod mock;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteCatalogStore;

#[cfg(any(test, feature = "test-utils"))]
pub use mock::MockCatalogStore;

/// Result type for catalog store operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// Errors from catalog store operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("database error: {0}")]
    Database(String),

    #[error("product {product_id} not found")]
    NotFound { product_id: i64 },

    #[error("corrupt row: {0}")]
    CorruptRow(String),
}

#[cfg(feature = "sqlite")]
impl From<sqlx::Error> for StorageError {
    fn from(err: sqlx::Error) -> Self {
        StorageError::Database(err.to_string())
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        StorageError::CorruptRow(err.to_string())
    }
}

/// Product catalog persistence.
#[async_trait]
pub trait CatalogStore: Send + Sync + 'static {
    /// Create tables and indexes if they don't exist.
    async fn init_schema(&self) -> Result<()>;

    /// Insert a product and its category attributes. Returns the new id.
    async fn create_product(&self, product: NewProduct) -> Result<i64>;

    /// Replace a product's fields and attributes.
    ///
    /// The status is recomputed from stock. A category change moves the
    /// attribute row to the new category's table.
    async fn update_product(&self, product_id: i64, product: NewProduct) -> Result<()>;

    /// Set stock level, status and restock date.
    async fn update_stock(
        &self,
        product_id: i64,
        request: StockUpdateRequest,
    ) -> Result<StockUpdate>;

    async fn get_product(&self, product_id: i64) -> Result<Option<Product>>;

    /// All products, or those of one category, newest first.
    async fn list_products(&self, category: Option<Category>) -> Result<Vec<Product>>;

    /// Products of a category with their attributes, newest first.
    async fn list_with_attributes(&self, category: Category) -> Result<Vec<CatalogEntry>>;

    async fn get_with_attributes(&self, product_id: i64) -> Result<Option<CatalogEntry>>;

    /// Delete a product and its attributes. Returns the deleted row.
    async fn delete_product(&self, product_id: i64) -> Result<Product>;

    /// Highest-priced purchasable product of `category` priced at or below
    /// `max_price`. Ties go to the lowest product id.
    async fn best_affordable(&self, category: Category, max_price: f64)
        -> Result<Option<Product>>;
}

/// Initialize the catalog store based on configuration.
pub async fn init_storage(
    config: &StorageConfig,
) -> std::result::Result<Arc<dyn CatalogStore>, Box<dyn std::error::Error>> {
    info!("Storage: {} at {}", config.storage_type, config.path);

    match config.storage_type.as_str() {
        #[cfg(feature = "sqlite")]
        "sqlite" => {
            use std::time::Duration;

            use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};

            if let Some(parent) = std::path::Path::new(&config.path).parent() {
                std::fs::create_dir_all(parent)?;
            }

            let opts = SqliteConnectOptions::new()
                .filename(&config.path)
                .journal_mode(SqliteJournalMode::Wal)
                .busy_timeout(Duration::from_secs(30))
                .foreign_keys(true)
                .create_if_missing(true);

            let pool = SqlitePoolOptions::new()
                .max_connections(config.max_connections)
                .connect_with(opts)
                .await?;

            let store = Arc::new(SqliteCatalogStore::new(pool));
            store.init_schema().await?;

            Ok(store)
        }
        #[cfg(not(feature = "sqlite"))]
        "sqlite" => {
            error!("SQLite storage requested but 'sqlite' feature is not enabled");
            Err("SQLite feature not enabled".into())
        }
        other => {
            error!("Unknown storage type: {}", other);
            Err(format!("Unknown storage type: {}", other).into())
        }
    }
}
