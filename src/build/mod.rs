//! Build suggestion.
//!
//! Splits a budget across the ten component categories using a usage
//! profile, then picks the most expensive purchasable product at or under
//! each category's ceiling. Categories are independent: an empty category
//! or a failed lookup yields `null` for that slot and never blocks others.

pub mod profile;
pub mod tier;


use std::sync::Arc;

use futures::future::join_all;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use tracing::{debug, info, warn};

use crate::catalog::{Category, Product};
use crate::storage::CatalogStore;

pub use profile::UsageProfile;
pub use tier::BudgetTier;

/// Headroom applied on top of each category's weighted share.
pub const FLEX_FACTOR: f64 = 1.10;

/// Errors from build suggestion.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BuildError {
    #[error("Invalid budget")]
    InvalidBudget,
}

/// Price ceiling for one category.
pub fn ceiling(budget: f64, weight: f64) -> f64 {
    budget * weight * FLEX_FACTOR
}

/// Values keyed by category, serialized as a JSON object keyed by build key
/// in category order.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryMap<T>(Vec<(Category, T)>);

impl<T> CategoryMap<T> {
    pub fn get(&self, category: Category) -> Option<&T> {
        self.0
            .iter()
            .find(|(c, _)| *c == category)
            .map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Category, &T)> {
        self.0.iter().map(|(c, v)| (*c, v))
    }
}

impl<T: Serialize> Serialize for CategoryMap<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (category, value) in &self.0 {
            map.serialize_entry(category.build_key(), value)?;
        }
        map.end()
    }
}

/// Chosen product (or none) for every category.
pub type BuildSelection = CategoryMap<Option<Product>>;

/// A build suggestion.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BuildResult {
    pub success: bool,
    pub build: BuildSelection,
    pub total: f64,
    pub label: String,
    pub usage: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debug: Option<CategoryMap<String>>,
}

/// Trim and lowercase a usage string.
pub fn normalize_usage(usage: &str) -> String {
    usage.trim().to_lowercase()
}

/// Normalized usage with its first character upper-cased.
pub fn usage_label(normalized: &str) -> String {
    let mut chars = normalized.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Format an amount with thousands separators and two decimals.
pub fn format_amount(value: f64) -> String {
    let fixed = format!("{:.2}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 { "-" } else { "" };
    format!("{sign}{grouped}.{frac_part}")
}

/// Budget allocator backed by a catalog store.
#[derive(Clone)]
pub struct BuildAllocator {
    store: Arc<dyn CatalogStore>,
}

impl BuildAllocator {
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        Self { store }
    }

    /// Suggest a build for `budget` (LKR) and a usage profile name.
    ///
    /// Unknown usage falls back to the gaming profile. The returned usage
    /// label echoes the caller's input rather than the resolved profile.
    pub async fn suggest_build(&self, budget: f64, usage: &str) -> Result<BuildResult, BuildError> {
        if !budget.is_finite() || budget <= 0.0 {
            return Err(BuildError::InvalidBudget);
        }

        let normalized = normalize_usage(usage);
        let profile = UsageProfile::from_usage(&normalized).unwrap_or_else(|| {
            warn!(usage = %normalized, "unknown usage, falling back to gaming profile");
            UsageProfile::Gaming
        });

        let lookups = Category::ALL.map(|category| {
            let max_price = ceiling(budget, profile.weight(category));
            let store = Arc::clone(&self.store);
            async move {
                let found = match store.best_affordable(category, max_price).await {
                    Ok(found) => found,
                    Err(e) => {
                        warn!(
                            category = %category,
                            error = %e,
                            "product lookup failed, leaving slot empty"
                        );
                        None
                    }
                };
                (category, max_price, found)
            }
        });

        let mut selection = Vec::with_capacity(Category::ALL.len());
        let mut notes = Vec::new();
        let mut total = 0.0;

        for (category, max_price, found) in join_all(lookups).await {
            match &found {
                Some(product) => total += product.price,
                None => {
                    let message = format!(
                        "No product found in {} under LKR {}",
                        category.table(),
                        format_amount(max_price)
                    );
                    debug!(category = %category, "{}", message);
                    notes.push((category, message));
                }
            }
            selection.push((category, found));
        }

        let tier = BudgetTier::classify(budget);
        info!(
            budget,
            profile = %profile,
            total,
            tier = %tier,
            missing = notes.len(),
            "build suggested"
        );

        Ok(BuildResult {
            success: true,
            build: CategoryMap(selection),
            total,
            label: tier.label().to_string(),
            usage: usage_label(&normalized),
            debug: (!notes.is_empty()).then_some(CategoryMap(notes)),
        })
    }
}
