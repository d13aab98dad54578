//! Budget tier classification.

use std::fmt;

/// Coarse label for the size of a requested budget (LKR).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BudgetTier {
    BelowMinimum,
    EntryLevel,
    Budget,
    MidRange,
    HighEnd,
    Premium,
    Ultimate,
}

impl BudgetTier {
    /// Classify a raw budget. Total over all reals; anything under the
    /// entry threshold (including NaN) is `BelowMinimum`.
    pub fn classify(budget: f64) -> Self {
        if (100_000.0..=200_000.0).contains(&budget) {
            BudgetTier::EntryLevel
        } else if budget > 200_000.0 && budget <= 300_000.0 {
            BudgetTier::Budget
        } else if budget > 300_000.0 && budget <= 400_000.0 {
            BudgetTier::MidRange
        } else if budget > 400_000.0 && budget <= 500_000.0 {
            BudgetTier::HighEnd
        } else if budget > 500_000.0 && budget <= 750_000.0 {
            BudgetTier::Premium
        } else if budget > 750_000.0 {
            BudgetTier::Ultimate
        } else {
            BudgetTier::BelowMinimum
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            BudgetTier::BelowMinimum => "Below Minimum",
            BudgetTier::EntryLevel => "Entry Level",
            BudgetTier::Budget => "Budget",
            BudgetTier::MidRange => "Mid-Range",
            BudgetTier::HighEnd => "High-End",
            BudgetTier::Premium => "Premium",
            BudgetTier::Ultimate => "Ultimate",
        }
    }
}

impl fmt::Display for BudgetTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
