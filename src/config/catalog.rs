//! Catalog media configuration.

use std::path::PathBuf;

use serde::Deserialize;

/// Catalog configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Directory product image URLs are resolved against. Deleting a
    /// product removes its image from here; unset disables removal.
    pub media_root: Option<PathBuf>,
}
