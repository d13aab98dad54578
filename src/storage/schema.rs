//! Sea-query schema definitions and DDL for catalog tables.
//!
//! Every category has an extension table keyed 1:1 to `products`. The
//! extension row carries the category too, pinned by a `CHECK`, and a
//! composite foreign key onto `products (product_id, category)`, so an
//! attribute row can only exist for a product of the matching category.

use sea_query::Iden;

use crate::catalog::{Category, StockStatus};

/// Products table schema.
#[derive(Iden)]
pub enum Products {
    Table,
    #[iden = "product_id"]
    ProductId,
    #[iden = "name"]
    Name,
    #[iden = "category"]
    Category,
    #[iden = "price"]
    Price,
    #[iden = "stock"]
    Stock,
    #[iden = "status"]
    Status,
    #[iden = "manufacturer"]
    Manufacturer,
    #[iden = "description"]
    Description,
    #[iden = "image_url"]
    ImageUrl,
    #[iden = "last_restock_date"]
    LastRestockDate,
    #[iden = "created_at"]
    CreatedAt,
}

/// Column shared by every extension table.
pub const EXTENSION_PRODUCT_ID: &str = "product_id";
/// Category discriminator column on every extension table.
pub const EXTENSION_CATEGORY: &str = "category";

/// Storage class of an attribute column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Text,
    Integer,
    Real,
    /// Stored as INTEGER 0/1.
    Bool,
}

impl ColumnKind {
    fn sql_type(self) -> &'static str {
        match self {
            ColumnKind::Text => "TEXT",
            ColumnKind::Integer | ColumnKind::Bool => "INTEGER",
            ColumnKind::Real => "REAL",
        }
    }
}

/// An attribute column of an extension table.
///
/// `name` matches the serde field name of the attribute struct.
#[derive(Debug, Clone, Copy)]
pub struct AttributeColumn {
    pub name: &'static str,
    pub kind: ColumnKind,
}

const fn col(name: &'static str, kind: ColumnKind) -> AttributeColumn {
    AttributeColumn { name, kind }
}

use ColumnKind::{Bool, Integer, Real, Text};

const CPU_COLUMNS: &[AttributeColumn] = &[
    col("series", Text),
    col("socket", Text),
    col("core_count", Integer),
    col("thread_count", Integer),
    col("core_clock", Real),
    col("core_boost_clock", Real),
    col("tdp", Integer),
    col("integrated_graphics", Text),
];

const MOTHERBOARD_COLUMNS: &[AttributeColumn] = &[
    col("socket", Text),
    col("form_factor", Text),
    col("chipset", Text),
    col("memory_max", Integer),
    col("memory_slots", Integer),
    col("memory_type", Text),
    col("sata_ports", Integer),
    col("wifi", Bool),
];

const MEMORY_COLUMNS: &[AttributeColumn] = &[
    col("memory_type", Text),
    col("speed", Text),
    col("modules", Text),
    col("cas_latency", Integer),
    col("voltage", Real),
];

const STORAGE_COLUMNS: &[AttributeColumn] = &[
    col("storage_type", Text),
    col("capacity", Text),
    col("interface", Text),
    col("form_factor", Text),
];

const VIDEO_CARD_COLUMNS: &[AttributeColumn] = &[
    col("chipset", Text),
    col("memory", Integer),
    col("memory_type", Text),
    col("core_clock", Real),
    col("boost_clock", Real),
    col("interface", Text),
    col("length", Real),
    col("tdp", Integer),
    col("cooling", Text),
];

const POWER_SUPPLY_COLUMNS: &[AttributeColumn] = &[
    col("wattage", Integer),
    col("type", Text),
    col("efficiency_rating", Text),
    col("length", Real),
    col("modular", Text),
    col("sata_connectors", Integer),
];

const PC_CASE_COLUMNS: &[AttributeColumn] = &[
    col("type", Text),
    col("side_panel", Text),
    col("color", Text),
    col("max_gpu_length", Real),
    col("volume", Real),
    col("dimensions", Text),
];

const CPU_COOLER_COLUMNS: &[AttributeColumn] = &[
    col("fan_rpm", Text),
    col("noise_level", Text),
    col("color", Text),
    col("height", Real),
    col("water_cooled", Bool),
];

const MONITOR_COLUMNS: &[AttributeColumn] = &[
    col("screen_size", Real),
    col("resolution", Text),
    col("refresh_rate", Integer),
    col("panel_type", Text),
    col("aspect_ratio", Text),
    col("brightness", Text),
];

const OPERATING_SYSTEM_COLUMNS: &[AttributeColumn] = &[
    col("model", Text),
    col("mode", Text),
    col("version", Text),
    col("max_supported_memory", Text),
];

/// Attribute columns of a category's extension table.
pub fn attribute_columns(category: Category) -> &'static [AttributeColumn] {
    match category {
        Category::Cpu => CPU_COLUMNS,
        Category::Motherboard => MOTHERBOARD_COLUMNS,
        Category::Memory => MEMORY_COLUMNS,
        Category::Storage => STORAGE_COLUMNS,
        Category::VideoCard => VIDEO_CARD_COLUMNS,
        Category::PowerSupply => POWER_SUPPLY_COLUMNS,
        Category::PcCase => PC_CASE_COLUMNS,
        Category::CpuCooler => CPU_COOLER_COLUMNS,
        Category::OperatingSystem => OPERATING_SYSTEM_COLUMNS,
        Category::Monitor => MONITOR_COLUMNS,
    }
}

fn quoted_list<'a>(values: impl Iterator<Item = &'a str>) -> String {
    values
        .map(|v| format!("'{}'", v))
        .collect::<Vec<_>>()
        .join(", ")
}

/// DDL for the `products` table.
pub fn create_products_table() -> String {
    let categories = quoted_list(Category::ALL.iter().map(|c| c.display_name()));
    let statuses = quoted_list(
        [
            StockStatus::InStock,
            StockStatus::LowStock,
            StockStatus::OutOfStock,
            StockStatus::Discontinued,
        ]
        .iter()
        .map(|s| s.as_str()),
    );

    format!(
        "CREATE TABLE IF NOT EXISTS products (
            product_id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            category TEXT NOT NULL CHECK (category IN ({categories})),
            price REAL NOT NULL CHECK (price >= 0),
            stock INTEGER NOT NULL DEFAULT 0 CHECK (stock >= 0),
            status TEXT NOT NULL CHECK (status IN ({statuses})),
            manufacturer TEXT NOT NULL,
            description TEXT,
            image_url TEXT,
            last_restock_date TEXT,
            created_at TEXT NOT NULL,
            UNIQUE (product_id, category)
        )"
    )
}

/// Index backing the affordability query.
pub const CREATE_PRODUCTS_PRICE_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_products_category_status_price
     ON products (category, status, price DESC)";

/// DDL for a category's extension table.
pub fn create_extension_table(category: Category) -> String {
    let display = category.display_name();
    let columns: String = attribute_columns(category)
        .iter()
        .map(|c| format!("\"{}\" {},\n            ", c.name, c.kind.sql_type()))
        .collect();

    format!(
        "CREATE TABLE IF NOT EXISTS {table} (
            {EXTENSION_PRODUCT_ID} INTEGER PRIMARY KEY,
            {EXTENSION_CATEGORY} TEXT NOT NULL DEFAULT '{display}' CHECK ({EXTENSION_CATEGORY} = '{display}'),
            {columns}FOREIGN KEY ({EXTENSION_PRODUCT_ID}, {EXTENSION_CATEGORY})
                REFERENCES products (product_id, category) ON DELETE CASCADE
        )",
        table = category.table(),
    )
}
