//! Checkout prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    basket::{BasketId, BasketIdError, BasketStore, ItemCounts},
    catalog::{Catalog, CatalogEntry, CatalogError},
    config::{ConfigError, load_catalog, load_promotions},
    pricer::{Pricer, PricerError},
    pricing::PricingError,
    promotions::{BulkPromotion, BundlePromotion, PromotionError, Promotions},
    receipt::{Receipt, ReceiptError, ReceiptLine},
    rules::{PricingRule, RuleContribution, RuleEngine, RuleSet, RulesError},
};
