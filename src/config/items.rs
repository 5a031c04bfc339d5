//! Items file

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use rusty_money::iso::{self, Currency};
use serde::Deserialize;
use tracing::{info, warn};

use crate::{
    catalog::{Catalog, CatalogEntry},
    config::ConfigError,
};

/// Root of an items file
#[derive(Debug, Deserialize)]
pub struct ItemsFile {
    /// ISO currency code, defaults to EUR
    #[serde(default)]
    pub currency: Option<String>,

    /// Item id -> definition
    #[serde(default)]
    pub items: BTreeMap<String, ItemDefinition>,
}

/// A single item definition
#[derive(Debug, Deserialize)]
pub struct ItemDefinition {
    /// Display name
    #[serde(default)]
    pub name: String,

    /// Unit price in major units (e.g. `7.50`)
    pub price: Decimal,
}

/// Resolve a currency code.
///
/// # Errors
///
/// Returns [`ConfigError::UnknownCurrency`] unless the code is GBP, USD or EUR.
pub fn parse_currency(code: &str) -> Result<&'static Currency, ConfigError> {
    match code.trim() {
        "GBP" => Ok(iso::GBP),
        "USD" => Ok(iso::USD),
        "EUR" => Ok(iso::EUR),
        other => Err(ConfigError::UnknownCurrency(other.to_string())),
    }
}

/// Parse an items file into a catalog, skipping invalid items.
///
/// # Errors
///
/// Returns a [`ConfigError`] if the YAML is malformed or the currency is unknown.
pub fn parse_catalog(contents: &str) -> Result<Catalog, ConfigError> {
    let file: ItemsFile = serde_norway::from_str(contents)?;

    let currency = match file.currency.as_deref() {
        Some(code) => parse_currency(code)?,
        None => iso::EUR,
    };

    let mut catalog = Catalog::new(currency);

    for (id, definition) in file.items {
        match CatalogEntry::new(id.as_str(), definition.name, definition.price) {
            Ok(entry) => {
                info!(item = %id, price = %entry.unit_price(), "loaded item");

                catalog.insert(entry);
            }
            Err(err) => warn!(item = %id, error = %err, "skipping invalid item"),
        }
    }

    Ok(catalog)
}
