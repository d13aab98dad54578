//! Catalog storage configuration.

use serde::Deserialize;

/// Storage configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Storage backend. Only `"sqlite"` is supported.
    #[serde(rename = "type")]
    pub storage_type: String,
    /// Database file path.
    pub path: String,
    /// Connection pool size.
    pub max_connections: u32,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            storage_type: "sqlite".to_string(),
            path: "./data/catalog.db".to_string(),
            max_connections: 5,
        }
    }
}
