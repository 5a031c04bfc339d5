//! Bulk Promotion
//!
//! A percentage discount on every unit of an item once the basket holds enough of them.

use std::num::NonZeroU32;

use crate::{
    basket::ItemCounts,
    catalog::Catalog,
    pricing::{PricingError, apply_percent_off, line_price, to_minor_units},
    promotions::{PromotionError, require_affected_item},
};

/// Bulk percentage discount
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkPromotion {
    name: String,
    affected_item: String,
    trigger_count: NonZeroU32,
    discount_percent: u8,
}

impl BulkPromotion {
    /// Create a new bulk promotion.
    ///
    /// # Errors
    ///
    /// Returns a [`PromotionError`] if the affected item is empty, the trigger count is
    /// zero, or the discount is 100% or more.
    pub fn new(
        name: impl Into<String>,
        affected_item: impl Into<String>,
        trigger_count: u32,
        discount_percent: u8,
    ) -> Result<Self, PromotionError> {
        let name = name.into();
        let affected_item = affected_item.into();

        require_affected_item(&name, &affected_item)?;

        let Some(trigger_count) = NonZeroU32::new(trigger_count) else {
            return Err(PromotionError::ZeroTriggerCount(name));
        };

        if discount_percent >= 100 {
            return Err(PromotionError::DiscountOutOfRange(name, discount_percent));
        }

        Ok(Self {
            name,
            affected_item,
            trigger_count,
            discount_percent,
        })
    }

    /// Promotion name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Item the discount applies to
    pub fn affected_item(&self) -> &str {
        &self.affected_item
    }

    /// Number of units that triggers the discount
    pub fn trigger_count(&self) -> u32 {
        self.trigger_count.get()
    }

    /// Discount percentage, `0..100`
    pub fn discount_percent(&self) -> u8 {
        self.discount_percent
    }

    /// Whether `quantity` units are enough to trigger the discount.
    pub fn is_triggered(&self, quantity: u32) -> bool {
        quantity >= self.trigger_count.get()
    }

    /// Price every unit of the affected item in the basket, in minor units.
    ///
    /// Below the trigger count the units are charged at full price; once it is reached
    /// the discount applies to all of them, not just the excess. Items missing from the
    /// catalog contribute nothing.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::Overflow`] if the subtotal can't be represented.
    pub fn subtotal(&self, items: &ItemCounts, catalog: &Catalog) -> Result<i64, PricingError> {
        let quantity = items.get(&self.affected_item).copied().unwrap_or_default();

        if quantity == 0 {
            return Ok(0);
        }

        let Some(unit_price) = catalog.unit_price(&self.affected_item) else {
            return Ok(0);
        };

        let full_price = line_price(unit_price, quantity)?;

        if self.is_triggered(quantity) {
            to_minor_units(apply_percent_off(full_price, self.discount_percent)?)
        } else {
            to_minor_units(full_price)
        }
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use rusty_money::iso::EUR;
    use testresult::TestResult;

    use crate::catalog::CatalogEntry;

    use super::*;

    fn catalog() -> TestResult<Catalog> {
        Ok(Catalog::with_entries(
            [
                CatalogEntry::new("VOUCHER", "Company Voucher", Decimal::new(500, 2))?,
                CatalogEntry::new("TSHIRT", "Company T-Shirt", Decimal::new(2000, 2))?,
                CatalogEntry::new("MUG", "Company Coffee Mug", Decimal::new(750, 2))?,
            ],
            EUR,
        ))
    }

    fn counts(items: &[(&str, u32)]) -> ItemCounts {
        items
            .iter()
            .map(|(id, count)| ((*id).to_string(), *count))
            .collect()
    }

    fn tshirt_bulk() -> Result<BulkPromotion, PromotionError> {
        BulkPromotion::new("Bulk TSHIRT", "TSHIRT", 3, 5)
    }

    #[test]
    fn new_rejects_zero_trigger() {
        let result = BulkPromotion::new("Bulk", "TSHIRT", 0, 5);

        assert_eq!(result, Err(PromotionError::ZeroTriggerCount("Bulk".to_string())));
    }

    #[test]
    fn new_rejects_full_discount() {
        let result = BulkPromotion::new("Bulk", "TSHIRT", 3, 100);

        assert_eq!(
            result,
            Err(PromotionError::DiscountOutOfRange("Bulk".to_string(), 100))
        );
    }

    #[test]
    fn accessors_return_constructor_values() -> TestResult {
        let promo = tshirt_bulk()?;

        assert_eq!(promo.name(), "Bulk TSHIRT");
        assert_eq!(promo.affected_item(), "TSHIRT");
        assert_eq!(promo.trigger_count(), 3);
        assert_eq!(promo.discount_percent(), 5);

        Ok(())
    }

    #[test]
    fn discount_applies_to_every_unit_once_triggered() -> TestResult {
        let subtotal = tshirt_bulk()?.subtotal(&counts(&[("TSHIRT", 3)]), &catalog()?)?;

        assert_eq!(subtotal, 5700);

        Ok(())
    }

    #[test]
    fn below_trigger_charges_full_price() -> TestResult {
        let subtotal = tshirt_bulk()?.subtotal(&counts(&[("TSHIRT", 2)]), &catalog()?)?;

        assert_eq!(subtotal, 4000);

        Ok(())
    }

    #[test]
    fn other_items_are_ignored() -> TestResult {
        let items = counts(&[("VOUCHER", 1), ("MUG", 1)]);

        assert_eq!(tshirt_bulk()?.subtotal(&items, &catalog()?)?, 0);

        Ok(())
    }

    #[test]
    fn unstocked_item_contributes_nothing() -> TestResult {
        let promo = BulkPromotion::new("Bulk HAT", "HAT", 1, 50)?;

        assert_eq!(promo.subtotal(&counts(&[("HAT", 4)]), &catalog()?)?, 0);

        Ok(())
    }

    #[test]
    fn discounted_subtotal_rounds_to_nearest_minor_unit() -> TestResult {
        // 3 x 7.50 = 22.50, less 15% = 19.125
        let promo = BulkPromotion::new("Bulk MUG", "MUG", 3, 15)?;

        assert_eq!(promo.subtotal(&counts(&[("MUG", 3)]), &catalog()?)?, 1913);

        Ok(())
    }
}
