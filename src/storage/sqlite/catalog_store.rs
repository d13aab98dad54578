//! SQLite-backed catalog store.

use async_trait::async_trait;
use sea_query::{Alias, Expr, Order, Query, SimpleExpr, SqliteQueryBuilder};
use sea_query_binder::SqlxBinder;
use sqlx::{Sqlite, SqlitePool, Transaction};
use tracing::{debug, info};

use crate::catalog::{
    restock_timestamp_now, Category, CatalogEntry, NewProduct, Product, StockStatus, StockUpdate,
    StockUpdateRequest,
};
use crate::storage::schema::{
    attribute_columns, create_extension_table, create_products_table, Products,
    CREATE_PRODUCTS_PRICE_INDEX, EXTENSION_CATEGORY, EXTENSION_PRODUCT_ID,
};
use crate::storage::{CatalogStore, Result, StorageError};

use super::rows::{attribute_values, product_select, read_attributes, read_product, with_attributes};

/// SQLite-backed catalog store.
pub struct SqliteCatalogStore {
    pool: SqlitePool,
}

impl SqliteCatalogStore {
    /// Create a new SQLite catalog store.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn insert_attributes(
        tx: &mut Transaction<'_, Sqlite>,
        product_id: i64,
        product: &NewProduct,
    ) -> Result<()> {
        let category = product.category();

        let mut columns = vec![
            Alias::new(EXTENSION_PRODUCT_ID),
            Alias::new(EXTENSION_CATEGORY),
        ];
        columns.extend(attribute_columns(category).iter().map(|c| Alias::new(c.name)));

        let mut values: Vec<SimpleExpr> = vec![product_id.into(), category.display_name().into()];
        values.extend(attribute_values(&product.specs)?);

        let (sql, params) = Query::insert()
            .into_table(Alias::new(category.table()))
            .columns(columns)
            .values_panic(values)
            .build_sqlx(SqliteQueryBuilder);

        sqlx::query_with(&sql, params).execute(&mut **tx).await?;
        Ok(())
    }

    async fn delete_attributes(
        tx: &mut Transaction<'_, Sqlite>,
        product_id: i64,
        category: Category,
    ) -> Result<()> {
        let (sql, params) = Query::delete()
            .from_table(Alias::new(category.table()))
            .and_where(Expr::col(Alias::new(EXTENSION_PRODUCT_ID)).eq(product_id))
            .build_sqlx(SqliteQueryBuilder);

        sqlx::query_with(&sql, params).execute(&mut **tx).await?;
        Ok(())
    }

    async fn fetch_product(
        tx: &mut Transaction<'_, Sqlite>,
        product_id: i64,
    ) -> Result<Option<Product>> {
        let (sql, params) = product_select()
            .and_where(Expr::col((Products::Table, Products::ProductId)).eq(product_id))
            .build_sqlx(SqliteQueryBuilder);

        let row = sqlx::query_with(&sql, params)
            .fetch_optional(&mut **tx)
            .await?;
        row.as_ref().map(read_product).transpose()
    }
}

#[async_trait]
impl CatalogStore for SqliteCatalogStore {
    async fn init_schema(&self) -> Result<()> {
        sqlx::query("PRAGMA foreign_keys = ON")
            .execute(&self.pool)
            .await?;

        sqlx::query(&create_products_table())
            .execute(&self.pool)
            .await?;

        sqlx::query(CREATE_PRODUCTS_PRICE_INDEX)
            .execute(&self.pool)
            .await?;

        for category in Category::ALL {
            sqlx::query(&create_extension_table(category))
                .execute(&self.pool)
                .await?;
        }

        Ok(())
    }

    async fn create_product(&self, product: NewProduct) -> Result<i64> {
        let now = chrono::Utc::now().to_rfc3339();
        let mut tx = self.pool.begin().await?;

        let (sql, params) = Query::insert()
            .into_table(Products::Table)
            .columns([
                Products::Name,
                Products::Category,
                Products::Price,
                Products::Stock,
                Products::Status,
                Products::Manufacturer,
                Products::Description,
                Products::ImageUrl,
                Products::CreatedAt,
            ])
            .values_panic([
                product.name.clone().into(),
                product.category().display_name().into(),
                product.price.into(),
                product.stock.into(),
                product.status().as_str().into(),
                product.manufacturer.clone().into(),
                product.description.clone().into(),
                product.image_url.clone().into(),
                now.into(),
            ])
            .build_sqlx(SqliteQueryBuilder);

        let product_id = sqlx::query_with(&sql, params)
            .execute(&mut *tx)
            .await?
            .last_insert_rowid();

        Self::insert_attributes(&mut tx, product_id, &product).await?;
        tx.commit().await?;

        info!(product_id, category = %product.category(), "product created");
        Ok(product_id)
    }

    async fn update_product(&self, product_id: i64, product: NewProduct) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        let existing = Self::fetch_product(&mut tx, product_id)
            .await?
            .ok_or(StorageError::NotFound { product_id })?;

        // Child row first: the composite foreign key pins it to the old category.
        Self::delete_attributes(&mut tx, product_id, existing.category).await?;

        let mut update = Query::update();
        update
            .table(Products::Table)
            .values([
                (Products::Name, product.name.clone().into()),
                (Products::Category, product.category().display_name().into()),
                (Products::Price, product.price.into()),
                (Products::Stock, product.stock.into()),
                (Products::Status, product.status().as_str().into()),
                (Products::Manufacturer, product.manufacturer.clone().into()),
                (Products::Description, product.description.clone().into()),
            ])
            .and_where(Expr::col(Products::ProductId).eq(product_id));

        // A missing image keeps the current one.
        if let Some(image_url) = &product.image_url {
            update.value(Products::ImageUrl, image_url.clone());
        }

        let (sql, params) = update.build_sqlx(SqliteQueryBuilder);
        sqlx::query_with(&sql, params).execute(&mut *tx).await?;

        Self::insert_attributes(&mut tx, product_id, &product).await?;
        tx.commit().await?;

        if existing.category != product.category() {
            info!(
                product_id,
                from = %existing.category,
                to = %product.category(),
                "product moved to another category"
            );
        }
        debug!(product_id, "product updated");
        Ok(())
    }

    async fn update_stock(
        &self,
        product_id: i64,
        request: StockUpdateRequest,
    ) -> Result<StockUpdate> {
        let status = request.resolved_status();
        let last_restock_date = request
            .last_restock_date
            .clone()
            .unwrap_or_else(restock_timestamp_now);

        let (sql, params) = Query::update()
            .table(Products::Table)
            .values([
                (Products::Stock, request.stock.into()),
                (Products::Status, status.as_str().into()),
                (Products::LastRestockDate, last_restock_date.clone().into()),
            ])
            .and_where(Expr::col(Products::ProductId).eq(product_id))
            .build_sqlx(SqliteQueryBuilder);

        let result = sqlx::query_with(&sql, params).execute(&self.pool).await?;
        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound { product_id });
        }

        Ok(StockUpdate {
            product_id,
            new_stock: request.stock,
            new_status: status,
            last_restock_date,
        })
    }

    async fn get_product(&self, product_id: i64) -> Result<Option<Product>> {
        let (sql, params) = product_select()
            .and_where(Expr::col((Products::Table, Products::ProductId)).eq(product_id))
            .build_sqlx(SqliteQueryBuilder);

        let row = sqlx::query_with(&sql, params)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(read_product).transpose()
    }

    async fn list_products(&self, category: Option<Category>) -> Result<Vec<Product>> {
        let mut select = product_select();
        if let Some(category) = category {
            select.and_where(
                Expr::col((Products::Table, Products::Category)).eq(category.display_name()),
            );
        }
        let (sql, params) = select
            .order_by((Products::Table, Products::ProductId), Order::Desc)
            .build_sqlx(SqliteQueryBuilder);

        let rows = sqlx::query_with(&sql, params).fetch_all(&self.pool).await?;
        rows.iter().map(read_product).collect()
    }

    async fn list_with_attributes(&self, category: Category) -> Result<Vec<CatalogEntry>> {
        let mut select = product_select();
        with_attributes(&mut select, category);
        let (sql, params) = select
            .order_by((Products::Table, Products::ProductId), Order::Desc)
            .build_sqlx(SqliteQueryBuilder);

        let rows = sqlx::query_with(&sql, params).fetch_all(&self.pool).await?;
        rows.iter()
            .map(|row| {
                Ok(CatalogEntry {
                    product: read_product(row)?,
                    specs: read_attributes(row, category)?,
                })
            })
            .collect()
    }

    async fn get_with_attributes(&self, product_id: i64) -> Result<Option<CatalogEntry>> {
        let Some(product) = self.get_product(product_id).await? else {
            return Ok(None);
        };

        let mut select = product_select();
        with_attributes(&mut select, product.category);
        let (sql, params) = select
            .and_where(Expr::col((Products::Table, Products::ProductId)).eq(product_id))
            .build_sqlx(SqliteQueryBuilder);

        let row = sqlx::query_with(&sql, params)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Ok(Some(CatalogEntry {
                product: read_product(&row)?,
                specs: read_attributes(&row, product.category)?,
            })),
            None => Err(StorageError::CorruptRow(format!(
                "product {} has no {} attributes",
                product_id,
                product.category.table()
            ))),
        }
    }

    async fn delete_product(&self, product_id: i64) -> Result<Product> {
        let mut tx = self.pool.begin().await?;

        let product = Self::fetch_product(&mut tx, product_id)
            .await?
            .ok_or(StorageError::NotFound { product_id })?;

        Self::delete_attributes(&mut tx, product_id, product.category).await?;

        let (sql, params) = Query::delete()
            .from_table(Products::Table)
            .and_where(Expr::col(Products::ProductId).eq(product_id))
            .build_sqlx(SqliteQueryBuilder);
        sqlx::query_with(&sql, params).execute(&mut *tx).await?;

        tx.commit().await?;

        info!(product_id, category = %product.category, "product deleted");
        Ok(product)
    }

    async fn best_affordable(
        &self,
        category: Category,
        max_price: f64,
    ) -> Result<Option<Product>> {
        let table = Alias::new(category.table());
        let mut select = product_select();
        select
            .inner_join(
                table.clone(),
                Expr::col((table, Alias::new(EXTENSION_PRODUCT_ID)))
                    .equals((Products::Table, Products::ProductId)),
            )
            .and_where(Expr::col((Products::Table, Products::Price)).lte(max_price))
            .and_where(
                Expr::col((Products::Table, Products::Status))
                    .is_in(StockStatus::PURCHASABLE.map(|s| s.as_str())),
            )
            .order_by((Products::Table, Products::Price), Order::Desc)
            .order_by((Products::Table, Products::ProductId), Order::Asc)
            .limit(1);

        let (sql, params) = select.build_sqlx(SqliteQueryBuilder);
        let row = sqlx::query_with(&sql, params)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(read_product).transpose()
    }
}
