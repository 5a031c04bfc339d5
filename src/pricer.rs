//! Pricer
//!
//! The operations the service layer calls: create a basket, scan items into it,
//! price it and remove it.

use std::sync::Arc;

use thiserror::Error;
use tracing::{info, warn};

use crate::{
    basket::{BasketId, BasketStore, ItemCounts},
    catalog::Catalog,
    promotions::Promotions,
    receipt::Receipt,
    rules::{RuleEngine, RuleSet, RulesError},
};

/// Errors returned to callers of the [`Pricer`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PricerError {
    /// No live basket has this id.
    #[error("the basket {0} doesn't exist")]
    BasketNotFound(BasketId),

    /// The item is not in the catalog.
    #[error("the item {0} is not configured")]
    ItemNotConfigured(String),

    /// Rules were not loaded, or the total couldn't be calculated.
    #[error(transparent)]
    Rules(#[from] RulesError),
}

/// Prices baskets against a catalog and the active promotions.
///
/// `Pricer` is `Sync`; share it between threads behind an `Arc`.
#[derive(Debug)]
pub struct Pricer {
    catalog: Arc<Catalog>,
    rules: RuleEngine,
    baskets: BasketStore,
}

impl Pricer {
    /// Create a pricer from a catalog and a rule engine.
    pub fn new(catalog: impl Into<Arc<Catalog>>, rules: RuleEngine) -> Self {
        Self {
            catalog: catalog.into(),
            rules,
            baskets: BasketStore::new(),
        }
    }

    /// Create a pricer with the given promotions loaded.
    ///
    /// # Errors
    ///
    /// Returns a [`RulesError`] if the promotions can't form a rule set.
    pub fn with_promotions(
        catalog: impl Into<Arc<Catalog>>,
        promotions: Promotions,
    ) -> Result<Self, RulesError> {
        Ok(Self::new(catalog, RuleEngine::with_promotions(promotions)?))
    }

    /// Replace the active promotions.
    ///
    /// # Errors
    ///
    /// Returns a [`RulesError`] if the promotions can't form a rule set; the previous
    /// promotions stay active.
    pub fn load_promotions(&self, promotions: Promotions) -> Result<(), RulesError> {
        self.rules.load_promotions(promotions)
    }

    /// Create an empty basket.
    #[tracing::instrument(name = "pricer.create_basket", skip(self), fields(basket_id))]
    pub fn create_basket(&self) -> BasketId {
        let id = self.baskets.create_basket();

        tracing::Span::current().record("basket_id", tracing::field::display(id));

        info!("created basket");

        id
    }

    /// Scan one unit of `item` into the basket.
    ///
    /// # Errors
    ///
    /// - [`PricerError::ItemNotConfigured`]: the item is not in the catalog. The basket is
    ///   left unchanged.
    /// - [`PricerError::BasketNotFound`]: no live basket has this id.
    #[tracing::instrument(name = "pricer.scan_item", skip(self), fields(basket_id = %basket))]
    pub fn scan_item(&self, item: &str, basket: BasketId) -> Result<(), PricerError> {
        if !self.catalog.contains(item) {
            warn!("item is not configured");

            return Err(PricerError::ItemNotConfigured(item.to_string()));
        }

        if !self.baskets.add_item(basket, item) {
            warn!("basket doesn't exist");

            return Err(PricerError::BasketNotFound(basket));
        }

        info!("scanned item");

        Ok(())
    }

    /// Total price of the basket after promotions, in minor units.
    ///
    /// # Errors
    ///
    /// - [`PricerError::BasketNotFound`]: no live basket has this id.
    /// - [`PricerError::Rules`]: no rules are loaded, or the total overflowed.
    #[tracing::instrument(name = "pricer.total", skip(self), fields(basket_id = %basket), err)]
    pub fn total(&self, basket: BasketId) -> Result<i64, PricerError> {
        let items = self.basket_items(basket)?;

        let total = self.rules.compute_total(&items, &self.catalog)?;

        info!(total, "priced basket");

        Ok(total)
    }

    /// Per-rule breakdown of the basket total.
    ///
    /// # Errors
    ///
    /// Same as [`Pricer::total`].
    #[tracing::instrument(name = "pricer.receipt", skip(self), fields(basket_id = %basket), err)]
    pub fn receipt(&self, basket: BasketId) -> Result<Receipt, PricerError> {
        let items = self.basket_items(basket)?;
        let rule_set = self.rules.snapshot()?;

        let contributions = rule_set
            .evaluate(&items, &self.catalog)
            .map_err(RulesError::from)?;
        let subtotal = RuleSet::full_price()
            .compute_total(&items, &self.catalog)
            .map_err(RulesError::from)?;

        Ok(Receipt::new(&items, &self.catalog, contributions, subtotal))
    }

    /// Remove the basket. Removing an unknown or already removed basket is not an error.
    #[tracing::instrument(name = "pricer.remove_basket", skip(self), fields(basket_id = %basket))]
    pub fn remove_basket(&self, basket: BasketId) {
        if self.baskets.remove_basket(basket) {
            info!("removed basket");
        }
    }

    /// Snapshot of the items scanned into the basket.
    ///
    /// # Errors
    ///
    /// Returns [`PricerError::BasketNotFound`] if no live basket has this id.
    pub fn basket_items(&self, basket: BasketId) -> Result<ItemCounts, PricerError> {
        self.baskets.snapshot(basket).ok_or_else(|| {
            warn!(basket_id = %basket, "basket doesn't exist");

            PricerError::BasketNotFound(basket)
        })
    }

    /// Number of live baskets.
    pub fn basket_count(&self) -> usize {
        self.baskets.len()
    }

    /// The catalog items are priced from.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// The rule engine holding the active promotions.
    pub fn rules(&self) -> &RuleEngine {
        &self.rules
    }
}
