//! In-memory catalog store for testing.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{CatalogStore, Result, StorageError};
use crate::catalog::{
    restock_timestamp_now, Category, CatalogEntry, CategoryAttributes, NewProduct, Product,
    StockUpdate, StockUpdateRequest,
};


/// Mock catalog store that keeps products in memory.
///
/// Mirrors the SQLite store's ordering and tie-breaking so allocator and
/// handler tests can run without a database.
#[derive(Default)]
pub struct MockCatalogStore {
    products: RwLock<BTreeMap<i64, (Product, CategoryAttributes)>>,
    next_id: RwLock<i64>,
    fail_on_read: RwLock<bool>,
    fail_on_write: RwLock<bool>,
    fail_on_category: RwLock<Option<Category>>,
}

impl MockCatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn set_fail_on_read(&self, fail: bool) {
        *self.fail_on_read.write().await = fail;
    }

    pub async fn set_fail_on_write(&self, fail: bool) {
        *self.fail_on_write.write().await = fail;
    }

    /// Make `best_affordable` fail for one category only.
    pub async fn set_fail_on_category(&self, category: Option<Category>) {
        *self.fail_on_category.write().await = category;
    }

    pub async fn is_empty(&self) -> bool {
        self.products.read().await.is_empty()
    }

    async fn check_read(&self) -> Result<()> {
        if *self.fail_on_read.read().await {
            return Err(StorageError::Database("mock read failure".to_string()));
        }
        Ok(())
    }

    async fn check_write(&self) -> Result<()> {
        if *self.fail_on_write.read().await {
            return Err(StorageError::Database("mock write failure".to_string()));
        }
        Ok(())
    }
}

fn to_product(product_id: i64, new: &NewProduct, previous: Option<&Product>) -> Product {
    Product {
        product_id,
        name: new.name.clone(),
        category: new.category(),
        price: new.price,
        stock: new.stock,
        status: new.status(),
        manufacturer: new.manufacturer.clone(),
        description: new.description.clone(),
        image_url: new
            .image_url
            .clone()
            .or_else(|| previous.and_then(|p| p.image_url.clone())),
        last_restock_date: previous.and_then(|p| p.last_restock_date.clone()),
    }
}

#[async_trait]
impl CatalogStore for MockCatalogStore {
    async fn init_schema(&self) -> Result<()> {
        Ok(())
    }

    async fn create_product(&self, product: NewProduct) -> Result<i64> {
        self.check_write().await?;
        let mut next_id = self.next_id.write().await;
        *next_id += 1;
        let product_id = *next_id;

        let row = to_product(product_id, &product, None);
        self.products
            .write()
            .await
            .insert(product_id, (row, product.specs));
        Ok(product_id)
    }

    async fn update_product(&self, product_id: i64, product: NewProduct) -> Result<()> {
        self.check_write().await?;
        let mut products = self.products.write().await;
        let entry = products
            .get_mut(&product_id)
            .ok_or(StorageError::NotFound { product_id })?;

        let row = to_product(product_id, &product, Some(&entry.0));
        *entry = (row, product.specs);
        Ok(())
    }

    async fn update_stock(
        &self,
        product_id: i64,
        request: StockUpdateRequest,
    ) -> Result<StockUpdate> {
        self.check_write().await?;
        let mut products = self.products.write().await;
        let (product, _) = products
            .get_mut(&product_id)
            .ok_or(StorageError::NotFound { product_id })?;

        let status = request.resolved_status();
        let last_restock_date = request
            .last_restock_date
            .clone()
            .unwrap_or_else(restock_timestamp_now);

        product.stock = request.stock;
        product.status = status;
        product.last_restock_date = Some(last_restock_date.clone());

        Ok(StockUpdate {
            product_id,
            new_stock: request.stock,
            new_status: status,
            last_restock_date,
        })
    }

    async fn get_product(&self, product_id: i64) -> Result<Option<Product>> {
        self.check_read().await?;
        Ok(self
            .products
            .read()
            .await
            .get(&product_id)
            .map(|(p, _)| p.clone()))
    }

    async fn list_products(&self, category: Option<Category>) -> Result<Vec<Product>> {
        self.check_read().await?;
        Ok(self
            .products
            .read()
            .await
            .values()
            .rev()
            .filter(|(p, _)| category.map_or(true, |c| p.category == c))
            .map(|(p, _)| p.clone())
            .collect())
    }

    async fn list_with_attributes(&self, category: Category) -> Result<Vec<CatalogEntry>> {
        self.check_read().await?;
        Ok(self
            .products
            .read()
            .await
            .values()
            .rev()
            .filter(|(p, _)| p.category == category)
            .map(|(p, specs)| CatalogEntry {
                product: p.clone(),
                specs: specs.clone(),
            })
            .collect())
    }

    async fn get_with_attributes(&self, product_id: i64) -> Result<Option<CatalogEntry>> {
        self.check_read().await?;
        Ok(self
            .products
            .read()
            .await
            .get(&product_id)
            .map(|(p, specs)| CatalogEntry {
                product: p.clone(),
                specs: specs.clone(),
            }))
    }

    async fn delete_product(&self, product_id: i64) -> Result<Product> {
        self.check_write().await?;
        self.products
            .write()
            .await
            .remove(&product_id)
            .map(|(p, _)| p)
            .ok_or(StorageError::NotFound { product_id })
    }

    async fn best_affordable(
        &self,
        category: Category,
        max_price: f64,
    ) -> Result<Option<Product>> {
        self.check_read().await?;
        if *self.fail_on_category.read().await == Some(category) {
            return Err(StorageError::Database(format!(
                "mock failure for {}",
                category.table()
            )));
        }

        // BTreeMap iterates by ascending id, so keeping the first maximum
        // gives the lowest id on price ties.
        let products = self.products.read().await;
        let mut best: Option<&Product> = None;
        for (product, _) in products.values() {
            if product.category != category
                || product.price > max_price
                || !product.status.is_purchasable()
            {
                continue;
            }
            if best.map_or(true, |b| product.price > b.price) {
                best = Some(product);
            }
        }
        Ok(best.cloned())
    }
}
