//! Rules file

use serde::Deserialize;
use tracing::warn;

use crate::{
    catalog::Catalog,
    config::ConfigError,
    promotions::{BulkPromotion, BundlePromotion, PromotionError, Promotions},
};

/// Root of a rules file
#[derive(Debug, Deserialize)]
pub struct RulesFile {
    /// Promotion definitions
    #[serde(default)]
    pub rules: RuleDefinitions,
}

/// Promotion definitions grouped by kind
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleDefinitions {
    /// Bulk percentage discounts
    #[serde(default)]
    pub bulk_rules: Vec<BulkRuleDefinition>,

    /// Buy N, pay M bundles
    #[serde(default)]
    pub nxm_rules: Vec<BundleRuleDefinition>,
}

/// Bulk discount definition
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkRuleDefinition {
    /// Rule name
    #[serde(default)]
    pub rule_name: String,

    /// Item the discount applies to
    #[serde(default)]
    pub affected_item: String,

    /// Units needed to trigger the discount
    #[serde(default)]
    pub trigger_amount: i64,

    /// Percentage off every unit once triggered
    #[serde(default)]
    pub discount_percentage: i64,
}

impl TryFrom<BulkRuleDefinition> for BulkPromotion {
    type Error = PromotionError;

    fn try_from(definition: BulkRuleDefinition) -> Result<Self, Self::Error> {
        // Out of range values fall back to ones the constructor rejects.
        BulkPromotion::new(
            definition.rule_name,
            definition.affected_item,
            u32::try_from(definition.trigger_amount).unwrap_or(0),
            u8::try_from(definition.discount_percentage).unwrap_or(u8::MAX),
        )
    }
}

/// Bundle definition
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BundleRuleDefinition {
    /// Rule name
    #[serde(default)]
    pub rule_name: String,

    /// Item the bundle applies to
    #[serde(default)]
    pub affected_item: String,

    /// Units in a bundle
    #[serde(default)]
    pub buy_n: i64,

    /// Units charged per bundle
    #[serde(default)]
    pub pay_m: i64,
}

impl TryFrom<BundleRuleDefinition> for BundlePromotion {
    type Error = PromotionError;

    fn try_from(definition: BundleRuleDefinition) -> Result<Self, Self::Error> {
        BundlePromotion::new(
            definition.rule_name,
            definition.affected_item,
            u32::try_from(definition.buy_n).unwrap_or(0),
            u32::try_from(definition.pay_m).unwrap_or(0),
        )
    }
}

/// Parse a rules file into promotions, skipping invalid rules.
///
/// Rules for items missing from the catalog are kept; they never contribute to a total.
///
/// # Errors
///
/// Returns [`ConfigError::Yaml`] if the YAML is malformed.
pub fn parse_promotions(contents: &str, catalog: &Catalog) -> Result<Promotions, ConfigError> {
    let file: RulesFile = serde_norway::from_str(contents)?;

    let bulk = file
        .rules
        .bulk_rules
        .into_iter()
        .filter_map(|definition| {
            let name = definition.rule_name.clone();

            BulkPromotion::try_from(definition)
                .inspect_err(|err| warn!(rule = %name, error = %err, "skipping invalid rule"))
                .ok()
        })
        .inspect(|promotion| {
            warn_if_unstocked(promotion.name(), promotion.affected_item(), catalog);
        })
        .collect();

    let bundle = file
        .rules
        .nxm_rules
        .into_iter()
        .filter_map(|definition| {
            let name = definition.rule_name.clone();

            BundlePromotion::try_from(definition)
                .inspect_err(|err| warn!(rule = %name, error = %err, "skipping invalid rule"))
                .ok()
        })
        .inspect(|promotion| {
            warn_if_unstocked(promotion.name(), promotion.affected_item(), catalog);
        })
        .collect();

    Ok(Promotions::new(bulk, bundle))
}

fn warn_if_unstocked(rule: &str, item: &str, catalog: &Catalog) {
    if !catalog.contains(item) {
        warn!(rule, item, "rule targets an item that isn't in the catalog");
    }
}
