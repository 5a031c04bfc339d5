//! Rules
//!
//! A [`RuleSet`] is the ordered list of pricing rules built from one promotions load,
//! together with the set of items those promotions claim. Bulk rules come first, then
//! bundle rules, then a single default rule that prices everything left over.
//!
//! The [`RuleEngine`] holds the active rule set behind a single `Arc` so a reload
//! swaps rules and promoted items together.

use std::sync::Arc;

use parking_lot::RwLock;
use rust_decimal::Decimal;
use rustc_hash::FxHashSet;
use smallvec::SmallVec;
use thiserror::Error;
use tracing::{debug, info};

use crate::{
    basket::ItemCounts,
    catalog::Catalog,
    pricing::{PricingError, line_price, to_minor_units},
    promotions::{BulkPromotion, BundlePromotion, Promotions},
};

/// Label used for the default rule in breakdowns.
pub const DEFAULT_RULE_NAME: &str = "Full price";

/// Errors raised when loading or evaluating rules.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RulesError {
    /// Two promotions claim the same item (item, first promotion, second promotion).
    #[error("item {0} is already promoted by {1}, so {2} can't claim it")]
    ItemAlreadyPromoted(String, String, String),

    /// Prices were requested before any promotions were loaded.
    #[error("pricing rules have not been loaded")]
    NotLoaded,

    /// Wrapped pricing arithmetic error.
    #[error(transparent)]
    Pricing(#[from] PricingError),
}

/// A single pricing rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PricingRule {
    /// Percentage discount once a quantity is reached
    Bulk(BulkPromotion),

    /// Buy N, pay M
    Bundle(BundlePromotion),

    /// Full price for every item no promotion claims
    Default,
}

impl PricingRule {
    /// Display name of the rule.
    pub fn name(&self) -> &str {
        match self {
            PricingRule::Bulk(bulk) => bulk.name(),
            PricingRule::Bundle(bundle) => bundle.name(),
            PricingRule::Default => DEFAULT_RULE_NAME,
        }
    }

    /// The item this rule claims, if it is a promotion.
    pub fn affected_item(&self) -> Option<&str> {
        match self {
            PricingRule::Bulk(bulk) => Some(bulk.affected_item()),
            PricingRule::Bundle(bundle) => Some(bundle.affected_item()),
            PricingRule::Default => None,
        }
    }

    /// Units of the basket this rule prices.
    fn units(
        &self,
        items: &ItemCounts,
        catalog: &Catalog,
        promoted: &FxHashSet<String>,
    ) -> u32 {
        match self.affected_item() {
            Some(item) => items.get(item).copied().unwrap_or_default(),
            None => items
                .iter()
                .filter(|(item, _)| !promoted.contains(*item) && catalog.contains(item))
                .map(|(_, count)| *count)
                .fold(0, u32::saturating_add),
        }
    }

    /// Contribution of this rule to the basket total, in minor units.
    fn subtotal(
        &self,
        items: &ItemCounts,
        catalog: &Catalog,
        promoted: &FxHashSet<String>,
    ) -> Result<i64, PricingError> {
        match self {
            PricingRule::Bulk(bulk) => bulk.subtotal(items, catalog),
            PricingRule::Bundle(bundle) => bundle.subtotal(items, catalog),
            PricingRule::Default => default_subtotal(items, catalog, promoted),
        }
    }
}

/// Sum every unclaimed item at full price, rounding once at the end.
fn default_subtotal(
    items: &ItemCounts,
    catalog: &Catalog,
    promoted: &FxHashSet<String>,
) -> Result<i64, PricingError> {
    let total = items
        .iter()
        .filter(|(item, _)| !promoted.contains(*item))
        .filter_map(|(item, count)| catalog.unit_price(item).map(|price| (price, *count)))
        .try_fold(Decimal::ZERO, |acc, (price, count)| {
            acc.checked_add(line_price(price, count)?)
                .ok_or(PricingError::Overflow)
        })?;

    to_minor_units(total)
}

/// What one rule added to a basket total.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleContribution {
    /// Rule name
    pub rule: String,

    /// Units of the basket priced by the rule
    pub units: u32,

    /// Amount added to the total, in minor units
    pub subtotal: i64,
}

/// Ordered pricing rules and the items their promotions claim.
#[derive(Debug, Clone)]
pub struct RuleSet {
    rules: Vec<PricingRule>,
    promoted_items: FxHashSet<String>,
}

impl RuleSet {
    /// Build a rule set from promotion definitions.
    ///
    /// # Errors
    ///
    /// Returns [`RulesError::ItemAlreadyPromoted`] if more than one promotion targets the
    /// same item.
    pub fn new(promotions: Promotions) -> Result<Self, RulesError> {
        let Promotions { bulk, bundle } = promotions;

        let mut rules = Vec::with_capacity(bulk.len() + bundle.len() + 1);
        let mut promoted_items = FxHashSet::default();

        let promotion_rules = bulk
            .into_iter()
            .map(PricingRule::Bulk)
            .chain(bundle.into_iter().map(PricingRule::Bundle));

        for rule in promotion_rules {
            let Some(item) = rule.affected_item() else {
                continue;
            };

            if !promoted_items.insert(item.to_string()) {
                let claimed_by = rules
                    .iter()
                    .find(|existing: &&PricingRule| existing.affected_item() == Some(item))
                    .map_or_else(String::new, |existing| existing.name().to_string());

                return Err(RulesError::ItemAlreadyPromoted(
                    item.to_string(),
                    claimed_by,
                    rule.name().to_string(),
                ));
            }

            debug!(
                rule = rule.name(),
                item, "default rule will not be applied to promoted item"
            );

            rules.push(rule);
        }

        rules.push(PricingRule::Default);

        Ok(Self {
            rules,
            promoted_items,
        })
    }

    /// A rule set with no promotions: every item is charged at full price.
    #[must_use]
    pub fn full_price() -> Self {
        Self {
            rules: vec![PricingRule::Default],
            promoted_items: FxHashSet::default(),
        }
    }

    /// Rules in evaluation order. The default rule is always last.
    pub fn rules(&self) -> &[PricingRule] {
        &self.rules
    }

    /// Items claimed by a promotion.
    pub fn promoted_items(&self) -> &FxHashSet<String> {
        &self.promoted_items
    }

    /// Whether a promotion claims the item.
    pub fn is_promoted(&self, item: &str) -> bool {
        self.promoted_items.contains(item)
    }

    /// Run every rule over the basket and report what each one contributed.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::Overflow`] if a subtotal can't be represented.
    pub fn evaluate(
        &self,
        items: &ItemCounts,
        catalog: &Catalog,
    ) -> Result<SmallVec<[RuleContribution; 4]>, PricingError> {
        self.rules
            .iter()
            .map(|rule| -> Result<RuleContribution, PricingError> {
                Ok(RuleContribution {
                    rule: rule.name().to_string(),
                    units: rule.units(items, catalog, &self.promoted_items),
                    subtotal: rule.subtotal(items, catalog, &self.promoted_items)?,
                })
            })
            .collect()
    }

    /// Total price of the basket in minor units.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::Overflow`] if the total can't be represented.
    pub fn compute_total(
        &self,
        items: &ItemCounts,
        catalog: &Catalog,
    ) -> Result<i64, PricingError> {
        self.rules.iter().try_fold(0_i64, |total, rule| {
            let subtotal = rule.subtotal(items, catalog, &self.promoted_items)?;

            total.checked_add(subtotal).ok_or(PricingError::Overflow)
        })
    }
}

/// Holds the active [`RuleSet`] and swaps it atomically on reload.
#[derive(Debug, Default)]
pub struct RuleEngine {
    active: RwLock<Option<Arc<RuleSet>>>,
}

impl RuleEngine {
    /// Create an engine with no rules loaded.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an engine with the given promotions already loaded.
    ///
    /// # Errors
    ///
    /// Returns a [`RulesError`] if the promotions can't form a rule set.
    pub fn with_promotions(promotions: Promotions) -> Result<Self, RulesError> {
        let engine = Self::new();

        engine.load_promotions(promotions)?;

        Ok(engine)
    }

    /// Replace the active rules with ones built from `promotions`.
    ///
    /// The previous rules stay active if the new ones can't be built.
    ///
    /// # Errors
    ///
    /// Returns [`RulesError::ItemAlreadyPromoted`] if more than one promotion targets the
    /// same item.
    pub fn load_promotions(&self, promotions: Promotions) -> Result<(), RulesError> {
        let bulk = promotions.bulk.len();
        let bundle = promotions.bundle.len();

        let rule_set = Arc::new(RuleSet::new(promotions)?);

        *self.active.write() = Some(rule_set);

        info!(bulk, bundle, "loaded pricing rules");

        Ok(())
    }

    /// Whether rules have been loaded.
    pub fn is_loaded(&self) -> bool {
        self.active.read().is_some()
    }

    /// The active rule set.
    ///
    /// # Errors
    ///
    /// Returns [`RulesError::NotLoaded`] if no rules have been loaded yet.
    pub fn snapshot(&self) -> Result<Arc<RuleSet>, RulesError> {
        self.active.read().clone().ok_or(RulesError::NotLoaded)
    }

    /// Total price of the basket in minor units under the active rules.
    ///
    /// # Errors
    ///
    /// Returns [`RulesError::NotLoaded`] before the first load, or
    /// [`RulesError::Pricing`] if the total can't be represented.
    pub fn compute_total(&self, items: &ItemCounts, catalog: &Catalog) -> Result<i64, RulesError> {
        Ok(self.snapshot()?.compute_total(items, catalog)?)
    }
}
