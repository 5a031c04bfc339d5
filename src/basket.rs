//! Basket
//!
//! The basket session store: every live basket and the counts of the items scanned
//! into it.
//!
//! The store directory is guarded by one lock that is only held while a basket is
//! looked up, inserted or removed. Each basket guards its own item counts, so work on
//! one basket never waits for another. The directory lock is always released before a
//! basket lock is taken.

use std::{
    fmt::{self, Display, Formatter},
    str::FromStr,
    sync::Arc,
};

use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use thiserror::Error;
use uuid::Uuid;

/// Item id → number of units scanned. Items never scanned are absent.
pub type ItemCounts = FxHashMap<String, u32>;

/// Errors parsing a basket id.
#[derive(Debug, Error)]
pub enum BasketIdError {
    /// The string is not a basket id.
    #[error("invalid basket id {0}")]
    Invalid(String, #[source] uuid::Error),
}

/// Opaque, time-ordered basket identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BasketId(Uuid);

impl BasketId {
    /// Generate a fresh id. Ids generated later sort after earlier ones.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// The underlying UUID.
    #[must_use]
    pub const fn into_uuid(self) -> Uuid {
        self.0
    }
}

impl Default for BasketId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for BasketId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl FromStr for BasketId {
    type Err = BasketIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|err| BasketIdError::Invalid(s.to_string(), err))
    }
}

/// A single basket's scanned items.
#[derive(Debug, Default)]
struct Basket {
    items: RwLock<ItemCounts>,
}

impl Basket {
    fn add_item(&self, item: &str) {
        let mut items = self.items.write();

        match items.get_mut(item) {
            Some(count) => *count = count.saturating_add(1),
            None => {
                items.insert(item.to_string(), 1);
            }
        }
    }

    fn snapshot(&self) -> ItemCounts {
        self.items.read().clone()
    }
}

/// Concurrent registry of live baskets.
#[derive(Debug, Default)]
pub struct BasketStore {
    baskets: RwLock<FxHashMap<BasketId, Arc<Basket>>>,
}

impl BasketStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty basket and return its id.
    pub fn create_basket(&self) -> BasketId {
        let id = BasketId::new();

        self.baskets.write().insert(id, Arc::default());

        id
    }

    /// Copy of the basket's item counts, or `None` if there is no such basket.
    pub fn snapshot(&self, id: BasketId) -> Option<ItemCounts> {
        self.basket(id).map(|basket| basket.snapshot())
    }

    /// Add one unit of `item` to the basket.
    ///
    /// Returns `false` if there is no such basket. The item id is not checked. A count
    /// stops at `u32::MAX`; further scans of that item are not counted.
    pub fn add_item(&self, id: BasketId, item: &str) -> bool {
        match self.basket(id) {
            Some(basket) => {
                basket.add_item(item);
                true
            }
            None => false,
        }
    }

    /// Remove the basket. Removing an unknown basket does nothing.
    ///
    /// Returns whether a basket was removed.
    pub fn remove_basket(&self, id: BasketId) -> bool {
        self.baskets.write().remove(&id).is_some()
    }

    /// Whether the basket is live.
    pub fn contains(&self, id: BasketId) -> bool {
        self.baskets.read().contains_key(&id)
    }

    /// Number of live baskets.
    pub fn len(&self) -> usize {
        self.baskets.read().len()
    }

    /// Whether there are no live baskets.
    pub fn is_empty(&self) -> bool {
        self.baskets.read().is_empty()
    }

    /// Look up a basket, releasing the directory lock before returning.
    fn basket(&self, id: BasketId) -> Option<Arc<Basket>> {
        self.baskets.read().get(&id).cloned()
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use testresult::TestResult;

    use super::*;

    #[test]
    fn create_basket_inserts_empty_basket() {
        let store = BasketStore::new();

        let id = store.create_basket();

        assert_eq!(store.len(), 1);
        assert!(store.contains(id));
        assert_eq!(store.snapshot(id), Some(ItemCounts::default()));
    }

    #[test]
    fn basket_ids_are_unique_and_ordered() {
        let store = BasketStore::new();

        let ids: Vec<BasketId> = (0..100).map(|_| store.create_basket()).collect();

        let mut sorted = ids.clone();
        sorted.sort();
        sorted.dedup();

        assert_eq!(sorted, ids);
        assert_eq!(store.len(), 100);
    }

    #[test]
    fn basket_id_round_trips_through_string() -> TestResult {
        let id = BasketId::new();

        assert_eq!(id.to_string().parse::<BasketId>()?, id);

        Ok(())
    }

    #[test]
    fn basket_id_rejects_garbage() {
        let result = "FAKEBASKETID".parse::<BasketId>();

        assert!(matches!(result, Err(BasketIdError::Invalid(s, _)) if s == "FAKEBASKETID"));
    }

    #[test]
    fn add_item_increments_counts() {
        let store = BasketStore::new();
        let id = store.create_basket();

        assert!(store.add_item(id, "VOUCHER"));
        assert!(store.add_item(id, "VOUCHER"));
        assert!(store.add_item(id, "MUG"));

        let items = store.snapshot(id).unwrap_or_default();

        assert_eq!(items.get("VOUCHER"), Some(&2));
        assert_eq!(items.get("MUG"), Some(&1));
        assert_eq!(items.get("TSHIRT"), None);
    }

    #[test]
    fn add_item_count_stops_at_max() {
        let basket = Basket {
            items: RwLock::new([("VOUCHER".to_string(), u32::MAX)].into_iter().collect()),
        };

        basket.add_item("VOUCHER");

        assert_eq!(basket.snapshot().get("VOUCHER"), Some(&u32::MAX));
    }

    #[test]
    fn add_item_to_unknown_basket_returns_false() {
        let store = BasketStore::new();

        assert!(!store.add_item(BasketId::new(), "VOUCHER"));
        assert!(store.is_empty());
    }

    #[test]
    fn snapshot_is_a_copy() {
        let store = BasketStore::new();
        let id = store.create_basket();

        store.add_item(id, "MUG");
        let before = store.snapshot(id);
        store.add_item(id, "MUG");

        assert_eq!(before.and_then(|items| items.get("MUG").copied()), Some(1));
        assert_eq!(store.snapshot(id).and_then(|items| items.get("MUG").copied()), Some(2));
    }

    #[test]
    fn remove_basket_is_idempotent() {
        let store = BasketStore::new();
        let id = store.create_basket();
        let other = store.create_basket();

        assert!(store.remove_basket(id));
        assert!(!store.remove_basket(id));
        assert!(!store.remove_basket(BasketId::new()));

        assert!(!store.contains(id));
        assert!(store.contains(other));
        assert_eq!(store.snapshot(id), None);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn concurrent_scans_into_one_basket_are_all_counted() {
        let store = BasketStore::new();
        let id = store.create_basket();

        thread::scope(|scope| {
            for _ in 0..8 {
                scope.spawn(|| {
                    for _ in 0..250 {
                        store.add_item(id, "VOUCHER");
                    }
                });
            }
        });

        let count = store.snapshot(id).and_then(|items| items.get("VOUCHER").copied());

        assert_eq!(count, Some(2000));
    }
}
