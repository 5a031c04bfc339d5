//! Catalog
//!
//! The read-only mapping of sellable item identifiers to display name and unit price.

use rust_decimal::Decimal;
use rustc_hash::FxHashMap;
use rusty_money::iso::{Currency, EUR};
use thiserror::Error;

/// Errors raised when building catalog entries.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    /// Item identifiers must not be empty.
    #[error("item id can't be empty")]
    EmptyId,

    /// Item display names must not be empty (item id).
    #[error("the name of item {0} can't be empty")]
    EmptyName(String),

    /// Unit prices must be strictly positive (item id, price).
    #[error("the price of item {0} must be greater than zero, got {1}")]
    NonPositivePrice(String, Decimal),
}

/// A sellable item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    id: String,
    name: String,
    unit_price: Decimal,
}

impl CatalogEntry {
    /// Create a new catalog entry.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] if the id or name is empty, or the price is not positive.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        unit_price: Decimal,
    ) -> Result<Self, CatalogError> {
        let id = id.into();
        let name = name.into();

        if id.trim().is_empty() {
            return Err(CatalogError::EmptyId);
        }

        if name.trim().is_empty() {
            return Err(CatalogError::EmptyName(id));
        }

        if unit_price <= Decimal::ZERO {
            return Err(CatalogError::NonPositivePrice(id, unit_price));
        }

        Ok(Self {
            id,
            name,
            unit_price,
        })
    }

    /// Item identifier
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Display name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Price of a single unit in major units
    pub fn unit_price(&self) -> Decimal {
        self.unit_price
    }
}

/// Catalog of every item that can be scanned into a basket.
#[derive(Debug, Clone)]
pub struct Catalog {
    entries: FxHashMap<String, CatalogEntry>,
    currency: &'static Currency,
}

impl Catalog {
    /// Create an empty catalog priced in the given currency.
    #[must_use]
    pub fn new(currency: &'static Currency) -> Self {
        Self {
            entries: FxHashMap::default(),
            currency,
        }
    }

    /// Create a catalog from a list of entries.
    ///
    /// Later entries replace earlier ones with the same id.
    pub fn with_entries(
        entries: impl IntoIterator<Item = CatalogEntry>,
        currency: &'static Currency,
    ) -> Self {
        let mut catalog = Self::new(currency);

        for entry in entries {
            catalog.insert(entry);
        }

        catalog
    }

    /// Add an entry, returning the entry it replaced, if any.
    pub fn insert(&mut self, entry: CatalogEntry) -> Option<CatalogEntry> {
        self.entries.insert(entry.id.clone(), entry)
    }

    /// Look up an item.
    pub fn get(&self, id: &str) -> Option<&CatalogEntry> {
        self.entries.get(id)
    }

    /// Unit price of an item, if it is stocked.
    pub fn unit_price(&self, id: &str) -> Option<Decimal> {
        self.entries.get(id).map(CatalogEntry::unit_price)
    }

    /// Whether the item is stocked.
    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    /// Iterate over the entries, sorted by item id.
    pub fn iter(&self) -> impl Iterator<Item = &CatalogEntry> {
        let mut entries: Vec<&CatalogEntry> = self.entries.values().collect();

        entries.sort_by(|a, b| a.id.cmp(&b.id));

        entries.into_iter()
    }

    /// Number of stocked items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the catalog has no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Currency prices are expressed in, used for display.
    #[must_use]
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new(EUR)
    }
}
