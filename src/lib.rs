//! Gearsphere - PC component storefront backend
//!
//! A product catalog of ten component categories with typed per-category
//! attributes, and a budget allocator that suggests a complete build for a
//! budget and usage profile.

pub mod build;
pub mod catalog;
pub mod config;
pub mod handlers;
pub mod storage;
pub mod utils;
