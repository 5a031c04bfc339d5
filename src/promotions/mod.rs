//! Promotions

use thiserror::Error;

mod bulk;
mod bundle;

pub use bulk::*;
pub use bundle::*;

/// Errors raised when a promotion definition is invalid.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PromotionError {
    /// The promotion does not name an item (promotion name).
    #[error("promotion {0}: the affected item can't be empty")]
    EmptyAffectedItem(String),

    /// A bulk promotion must trigger at one unit or more (promotion name).
    #[error("promotion {0}: the discount trigger amount can't be zero")]
    ZeroTriggerCount(String),

    /// Discount percentages must be in `[0, 100)` (promotion name, percentage).
    #[error("promotion {0}: the discount percentage must be between 0% and 99%, got {1}%")]
    DiscountOutOfRange(String, u8),

    /// A bundle must contain at least one unit (promotion name).
    #[error("promotion {0}: the buy amount can't be zero or below")]
    ZeroBuy(String),

    /// A bundle must charge at least one unit (promotion name).
    #[error("promotion {0}: the pay amount can't be zero or below")]
    ZeroPay(String),

    /// A bundle can't charge more units than it contains (promotion name, buy, pay).
    #[error("promotion {0}: the amount to pay ({2}) can't be higher than the amount to buy ({1})")]
    PayExceedsBuy(String, u32, u32),
}

/// Promotion definitions for one load, in configuration order.
#[derive(Debug, Clone, Default)]
pub struct Promotions {
    /// Bulk percentage discounts
    pub bulk: Vec<BulkPromotion>,

    /// Buy-N-pay-M bundles
    pub bundle: Vec<BundlePromotion>,
}

impl Promotions {
    /// Create a promotion set from bulk and bundle definitions.
    #[must_use]
    pub fn new(bulk: Vec<BulkPromotion>, bundle: Vec<BundlePromotion>) -> Self {
        Self { bulk, bundle }
    }

    /// Total number of promotions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bulk.len() + self.bundle.len()
    }

    /// Whether no promotions are defined.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bulk.is_empty() && self.bundle.is_empty()
    }
}

fn require_affected_item(name: &str, affected_item: &str) -> Result<(), PromotionError> {
    if affected_item.trim().is_empty() {
        Err(PromotionError::EmptyAffectedItem(name.to_string()))
    } else {
        Ok(())
    }
}
