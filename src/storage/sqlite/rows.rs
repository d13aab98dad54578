//! Row <-> model conversion for catalog tables.

use sea_query::{Alias, Expr, Query, SelectStatement, SimpleExpr, Value};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use crate::catalog::{Category, CategoryAttributes, Product, StockStatus};
use crate::storage::schema::{attribute_columns, ColumnKind, Products};
use crate::storage::{Result, StorageError};

/// Prefix for attribute columns selected alongside product columns.
const ATTR_PREFIX: &str = "attr_";

const PRODUCT_COLUMNS: [Products; 10] = [
    Products::ProductId,
    Products::Name,
    Products::Category,
    Products::Price,
    Products::Stock,
    Products::Status,
    Products::Manufacturer,
    Products::Description,
    Products::ImageUrl,
    Products::LastRestockDate,
];

/// SELECT of all product columns, qualified by the products table.
pub(super) fn product_select() -> SelectStatement {
    let mut select = Query::select();
    select
        .columns(PRODUCT_COLUMNS.map(|c| (Products::Table, c)))
        .from(Products::Table);
    select
}

/// Add the category's attribute columns (aliased) to a product SELECT
/// joined on the extension table.
pub(super) fn with_attributes(select: &mut SelectStatement, category: Category) {
    let table = Alias::new(category.table());
    select.inner_join(
        table.clone(),
        Expr::col((table.clone(), Alias::new("product_id")))
            .equals((Products::Table, Products::ProductId)),
    );
    for column in attribute_columns(category) {
        select.expr_as(
            Expr::col((table.clone(), Alias::new(column.name))),
            Alias::new(format!("{ATTR_PREFIX}{}", column.name)),
        );
    }
}

pub(super) fn read_product(row: &SqliteRow) -> Result<Product> {
    let category: String = row.try_get("category")?;
    let status: String = row.try_get("status")?;

    Ok(Product {
        product_id: row.try_get("product_id")?,
        name: row.try_get("name")?,
        category: category
            .parse::<Category>()
            .map_err(|e| StorageError::CorruptRow(e.to_string()))?,
        price: row.try_get("price")?,
        stock: row.try_get("stock")?,
        status: status.parse::<StockStatus>().map_err(StorageError::CorruptRow)?,
        manufacturer: row.try_get("manufacturer")?,
        description: row.try_get("description")?,
        image_url: row.try_get("image_url")?,
        last_restock_date: row.try_get("last_restock_date")?,
    })
}

pub(super) fn read_attributes(row: &SqliteRow, category: Category) -> Result<CategoryAttributes> {
    let mut fields = serde_json::Map::new();

    for column in attribute_columns(category) {
        let key = format!("{ATTR_PREFIX}{}", column.name);
        let value = match column.kind {
            ColumnKind::Text => serde_json::to_value(row.try_get::<Option<String>, _>(key.as_str())?)?,
            ColumnKind::Integer => serde_json::to_value(row.try_get::<Option<i64>, _>(key.as_str())?)?,
            ColumnKind::Real => serde_json::to_value(row.try_get::<Option<f64>, _>(key.as_str())?)?,
            ColumnKind::Bool => serde_json::to_value(row.try_get::<Option<bool>, _>(key.as_str())?)?,
        };
        fields.insert(column.name.to_string(), value);
    }

    Ok(CategoryAttributes::from_fields(category, fields)?)
}

/// Attribute values in `attribute_columns` order, typed per column kind.
pub(super) fn attribute_values(attributes: &CategoryAttributes) -> Result<Vec<SimpleExpr>> {
    let fields = attributes.to_fields()?;

    Ok(attribute_columns(attributes.category())
        .iter()
        .map(|column| {
            let field = fields.get(column.name).filter(|v| !v.is_null());
            let value: Value = match column.kind {
                ColumnKind::Text => field.and_then(|v| v.as_str()).map(str::to_string).into(),
                ColumnKind::Integer => field.and_then(|v| v.as_i64()).into(),
                ColumnKind::Real => field.and_then(|v| v.as_f64()).into(),
                ColumnKind::Bool => field.and_then(|v| v.as_bool()).map(i64::from).into(),
            };
            value.into()
        })
        .collect())
}
