//! Bundle Promotion
//!
//! Buy N, pay M: every complete bundle of N units is charged as M units.

use std::num::NonZeroU32;

use crate::{
    basket::ItemCounts,
    catalog::Catalog,
    pricing::{PricingError, line_price, to_minor_units},
    promotions::{PromotionError, require_affected_item},
};

/// Buy-N-pay-M bundle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundlePromotion {
    name: String,
    affected_item: String,
    buy: NonZeroU32,
    pay: NonZeroU32,
}

impl BundlePromotion {
    /// Create a new bundle promotion.
    ///
    /// # Errors
    ///
    /// Returns a [`PromotionError`] if the affected item is empty, either amount is zero,
    /// or `pay` exceeds `buy`.
    pub fn new(
        name: impl Into<String>,
        affected_item: impl Into<String>,
        buy: u32,
        pay: u32,
    ) -> Result<Self, PromotionError> {
        let name = name.into();
        let affected_item = affected_item.into();

        require_affected_item(&name, &affected_item)?;

        let Some(pay) = NonZeroU32::new(pay) else {
            return Err(PromotionError::ZeroPay(name));
        };

        let Some(buy) = NonZeroU32::new(buy) else {
            return Err(PromotionError::ZeroBuy(name));
        };

        if buy < pay {
            return Err(PromotionError::PayExceedsBuy(name, buy.get(), pay.get()));
        }

        Ok(Self {
            name,
            affected_item,
            buy,
            pay,
        })
    }

    /// Promotion name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Item the bundle applies to
    pub fn affected_item(&self) -> &str {
        &self.affected_item
    }

    /// Units in a complete bundle
    pub fn buy(&self) -> u32 {
        self.buy.get()
    }

    /// Units charged per complete bundle
    pub fn pay(&self) -> u32 {
        self.pay.get()
    }

    /// Number of units charged for `quantity` units bought.
    pub fn chargeable_units(&self, quantity: u32) -> u32 {
        let bundles = quantity / self.buy;
        let remainder = quantity % self.buy;

        bundles * self.pay.get() + remainder
    }

    /// Price every unit of the affected item in the basket, in minor units.
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

        to_minor_units(line_price(unit_price, self.chargeable_units(quantity))?)
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

    fn voucher_two_for_one() -> Result<BundlePromotion, PromotionError> {
        BundlePromotion::new("2x1 VOUCHER", "VOUCHER", 2, 1)
    }

    fn voucher_count(count: u32) -> ItemCounts {
        [("VOUCHER".to_string(), count)].into_iter().collect()
    }

    #[test]
    fn new_rejects_zero_amounts() {
        assert_eq!(
            BundlePromotion::new("Bundle", "VOUCHER", 0, 1),
            Err(PromotionError::ZeroBuy("Bundle".to_string()))
        );

        assert_eq!(
            BundlePromotion::new("Bundle", "VOUCHER", 2, 0),
            Err(PromotionError::ZeroPay("Bundle".to_string()))
        );
    }

    #[test]
    fn new_rejects_paying_more_than_bought() {
        assert_eq!(
            BundlePromotion::new("Bundle", "VOUCHER", 2, 3),
            Err(PromotionError::PayExceedsBuy("Bundle".to_string(), 2, 3))
        );
    }

    #[test]
    fn chargeable_units_counts_bundles_and_remainder() -> TestResult {
        let promo = BundlePromotion::new("3x2", "MUG", 3, 2)?;

        assert_eq!(promo.chargeable_units(0), 0);
        assert_eq!(promo.chargeable_units(2), 2);
        assert_eq!(promo.chargeable_units(3), 2);
        assert_eq!(promo.chargeable_units(7), 5);

        Ok(())
    }

    #[test]
    fn exact_bundle() -> TestResult {
        let subtotal = voucher_two_for_one()?.subtotal(&voucher_count(2), &catalog()?)?;

        assert_eq!(subtotal, 500);

        Ok(())
    }

    #[test]
    fn bundle_and_remainder() -> TestResult {
        let subtotal = voucher_two_for_one()?.subtotal(&voucher_count(3), &catalog()?)?;

        assert_eq!(subtotal, 1000);

        Ok(())
    }

    #[test]
    fn no_affected_items() -> TestResult {
        let items: ItemCounts = [("MUG".to_string(), 2), ("TSHIRT".to_string(), 1)]
            .into_iter()
            .collect();

        assert_eq!(voucher_two_for_one()?.subtotal(&items, &catalog()?)?, 0);

        Ok(())
    }

    #[test]
    fn buy_equal_to_pay_charges_full_price() -> TestResult {
        let promo = BundlePromotion::new("1x1", "VOUCHER", 1, 1)?;

        assert_eq!(promo.subtotal(&voucher_count(4), &catalog()?)?, 2000);

        Ok(())
    }
}
