//! Product catalog model.
//!
//! A product belongs to exactly one of ten component categories. The
//! category-specific hardware attributes live in a separate extension
//! record per category (see [`attributes`]), so the category of a new
//! product is derived from the attribute variant it is created with.

pub mod attributes;


use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

pub use attributes::CategoryAttributes;

/// Stock level at or below which a product is "Low Stock".
pub const LOW_STOCK_THRESHOLD: i64 = 5;

/// Component category.
///
/// Declaration order is the stable iteration order used by the build
/// allocator and by API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "CPU")]
    Cpu,
    #[serde(rename = "Motherboard")]
    Motherboard,
    #[serde(rename = "Memory")]
    Memory,
    #[serde(rename = "Storage")]
    Storage,
    #[serde(rename = "Video Card")]
    VideoCard,
    #[serde(rename = "Power Supply")]
    PowerSupply,
    #[serde(rename = "PC Case")]
    PcCase,
    #[serde(rename = "CPU Cooler")]
    CpuCooler,
    #[serde(rename = "Operating System")]
    OperatingSystem,
    #[serde(rename = "Monitor")]
    Monitor,
}

impl Category {
    /// All categories in iteration order.
    pub const ALL: [Category; 10] = [
        Category::Cpu,
        Category::Motherboard,
        Category::Memory,
        Category::Storage,
        Category::VideoCard,
        Category::PowerSupply,
        Category::PcCase,
        Category::CpuCooler,
        Category::OperatingSystem,
        Category::Monitor,
    ];

    /// Key used in build suggestions (`"gpu"`, `"ram"`, ...).
    pub fn build_key(self) -> &'static str {
        match self {
            Category::Cpu => "cpu",
            Category::Motherboard => "motherboard",
            Category::Memory => "ram",
            Category::Storage => "storage",
            Category::VideoCard => "gpu",
            Category::PowerSupply => "psu",
            Category::PcCase => "case",
            Category::CpuCooler => "cooler",
            Category::OperatingSystem => "os",
            Category::Monitor => "monitor",
        }
    }

    /// Name of the extension table holding this category's attributes.
    pub fn table(self) -> &'static str {
        match self {
            Category::Cpu => "cpu",
            Category::Motherboard => "motherboard",
            Category::Memory => "memory",
            Category::Storage => "storage",
            Category::VideoCard => "video_card",
            Category::PowerSupply => "power_supply",
            Category::PcCase => "pc_case",
            Category::CpuCooler => "cpu_cooler",
            Category::OperatingSystem => "operating_system",
            Category::Monitor => "monitor",
        }
    }

    /// Human-readable name, also the value stored in `products.category`.
    pub fn display_name(self) -> &'static str {
        match self {
            Category::Cpu => "CPU",
            Category::Motherboard => "Motherboard",
            Category::Memory => "Memory",
            Category::Storage => "Storage",
            Category::VideoCard => "Video Card",
            Category::PowerSupply => "Power Supply",
            Category::PcCase => "PC Case",
            Category::CpuCooler => "CPU Cooler",
            Category::OperatingSystem => "Operating System",
            Category::Monitor => "Monitor",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Error returned when a string names no known category.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown product category: {0}")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    /// Accepts the display name, table name or build key, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Category::ALL
            .into_iter()
            .find(|c| {
                c.display_name().eq_ignore_ascii_case(needle)
                    || c.table().eq_ignore_ascii_case(needle)
                    || c.build_key().eq_ignore_ascii_case(needle)
            })
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

/// Inventory status of a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StockStatus {
    #[serde(rename = "In Stock")]
    InStock,
    #[serde(rename = "Low Stock")]
    LowStock,
    #[serde(rename = "Out of Stock")]
    OutOfStock,
    #[serde(rename = "Discontinued")]
    Discontinued,
}

impl StockStatus {
    /// Statuses eligible for build suggestions.
    pub const PURCHASABLE: [StockStatus; 2] = [StockStatus::InStock, StockStatus::LowStock];

    /// Derive the status from a stock level.
    pub fn from_stock(stock: i64) -> Self {
        if stock <= 0 {
            StockStatus::OutOfStock
        } else if stock <= LOW_STOCK_THRESHOLD {
            StockStatus::LowStock
        } else {
            StockStatus::InStock
        }
    }

    /// Derive the status from a stock level unless explicitly discontinued.
    pub fn resolve(stock: i64, discontinued: bool) -> Self {
        if discontinued {
            StockStatus::Discontinued
        } else {
            Self::from_stock(stock)
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            StockStatus::InStock => "In Stock",
            StockStatus::LowStock => "Low Stock",
            StockStatus::OutOfStock => "Out of Stock",
            StockStatus::Discontinued => "Discontinued",
        }
    }

    pub fn is_purchasable(self) -> bool {
        Self::PURCHASABLE.contains(&self)
    }
}

impl fmt::Display for StockStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StockStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "In Stock" => Ok(StockStatus::InStock),
            "Low Stock" => Ok(StockStatus::LowStock),
            "Out of Stock" => Ok(StockStatus::OutOfStock),
            "Discontinued" => Ok(StockStatus::Discontinued),
            other => Err(format!("unknown stock status: {other}")),
        }
    }
}

/// A catalog product (the `products` row).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Product {
    pub product_id: i64,
    pub name: String,
    pub category: Category,
    pub price: f64,
    pub stock: i64,
    pub status: StockStatus,
    pub manufacturer: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub last_restock_date: Option<String>,
}

/// A product together with its category attributes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogEntry {
    #[serde(flatten)]
    pub product: Product,
    pub specs: CategoryAttributes,
}

/// Payload for creating or replacing a product.
///
/// The category comes from `specs`; there is no separate category field
/// that could disagree with it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub price: f64,
    #[serde(default)]
    pub stock: i64,
    pub manufacturer: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    pub specs: CategoryAttributes,
}

impl NewProduct {
    pub fn category(&self) -> Category {
        self.specs.category()
    }

    pub fn status(&self) -> StockStatus {
        StockStatus::from_stock(self.stock)
    }

    /// Check the fields the store relies on.
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Product name is required".to_string());
        }
        if self.manufacturer.trim().is_empty() {
            return Err("Manufacturer is required".to_string());
        }
        if !self.price.is_finite() || self.price < 0.0 {
            return Err("Price must be a non-negative number".to_string());
        }
        if self.stock < 0 {
            return Err("Stock must not be negative".to_string());
        }
        Ok(())
    }
}

/// Request to change a product's stock level.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StockUpdateRequest {
    pub stock: i64,
    /// Only `"Discontinued"` is honoured; any other value is recomputed from stock.
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub last_restock_date: Option<String>,
}

impl StockUpdateRequest {
    pub fn resolved_status(&self) -> StockStatus {
        let discontinued = self.status.as_deref() == Some(StockStatus::Discontinued.as_str());
        StockStatus::resolve(self.stock, discontinued)
    }
}

/// Result of a stock update.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StockUpdate {
    pub product_id: i64,
    pub new_stock: i64,
    pub new_status: StockStatus,
    pub last_restock_date: String,
}

/// Timestamp format used for `last_restock_date`.
pub const RESTOCK_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Current local time formatted as a restock date.
pub fn restock_timestamp_now() -> String {
    chrono::Local::now().format(RESTOCK_DATE_FORMAT).to_string()
}

/// Remove a product image from disk if it lives under `media_root`.
///
/// Best effort: failures are logged and swallowed.
pub async fn remove_product_image(media_root: &Path, image_url: &str) {
    let relative = image_url.trim_start_matches('/');
    let candidate = media_root.join(relative);

    let (Ok(root), Ok(path)) = (
        tokio::fs::canonicalize(media_root).await,
        tokio::fs::canonicalize(&candidate).await,
    ) else {
        debug!(image = image_url, "product image not present, nothing to remove");
        return;
    };

    if !path.starts_with(&root) {
        warn!(image = image_url, "refusing to remove image outside media root");
        return;
    }

    match tokio::fs::remove_file(&path).await {
        Ok(()) => debug!(path = %path.display(), "removed product image"),
        Err(e) => warn!(path = %path.display(), error = %e, "failed to remove product image"),
    }
}
