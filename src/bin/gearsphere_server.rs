//! gearsphere-server: storefront REST API
//!
//! Serves the component catalog and the budget build suggester over HTTP,
//! backed by a SQLite catalog database.
//!
//! ## Architecture
//! ```text
//! [Client] -> [REST API :8080] -> [BuildAllocator] -> [CatalogStore]
//!                    |                                      |
//!                    +----------- catalog CRUD -------------+
//!                                                           v
//!                                                       [SQLite]
//! ```
//!
//! ## Configuration
//! - `--config <path>` or GEARSPHERE_CONFIG: YAML config file
//! - GEARSPHERE__SERVER__PORT: REST API port (default: 8080)
//! - GEARSPHERE__STORAGE__PATH: SQLite database path (default: ./data/catalog.db)
//! - GEARSPHERE__CATALOG__MEDIA_ROOT: product image directory
//! - GEARSPHERE_LOG: tracing filter (default: info)

use tracing::{error, info};

use gearsphere::config::Config;
use gearsphere::handlers::rest::{self, AppState};
use gearsphere::storage::init_storage;
use gearsphere::utils::bootstrap::{init_tracing, parse_config_path};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let config_path = parse_config_path();
    let config = Config::load(config_path.as_deref()).map_err(|e| {
        error!(error = %e, "failed to load configuration");
        e
    })?;

    info!(
        port = config.server.port,
        storage = %config.storage.storage_type,
        "starting gearsphere-server"
    );

    let store = init_storage(&config.storage).await?;
    let state = AppState::new(store, config.catalog.media_root.clone());

    rest::serve(state, &config.server)
        .await
        .map_err(|e| -> Box<dyn std::error::Error> { e })?;

    info!("gearsphere-server stopped");
    Ok(())
}
