//! SQLite implementation of the catalog store.

mod catalog_store;
mod rows;


pub use catalog_store::SqliteCatalogStore;
