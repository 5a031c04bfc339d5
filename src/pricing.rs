//! Pricing
//!
//! Exact decimal arithmetic for rule subtotals and the single conversion into
//! integer minor units that every rule goes through.

use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use thiserror::Error;

/// Minor units per major unit (cents per euro).
const MINOR_UNITS_PER_MAJOR: Decimal = Decimal::ONE_HUNDRED;

/// Errors that can occur while calculating a price.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PricingError {
    /// A subtotal could not be represented, either as a decimal or in `i64` minor units.
    #[error("price calculation overflowed")]
    Overflow,
}

/// Price `quantity` units at `unit_price`, without rounding.
///
/// # Errors
///
/// Returns [`PricingError::Overflow`] if the product does not fit in a [`Decimal`].
pub fn line_price(unit_price: Decimal, quantity: u32) -> Result<Decimal, PricingError> {
    unit_price
        .checked_mul(Decimal::from(quantity))
        .ok_or(PricingError::Overflow)
}

/// Apply a whole-number percentage discount to an amount, without rounding.
///
/// # Errors
///
/// Returns [`PricingError::Overflow`] if the discounted amount does not fit in a [`Decimal`].
pub fn apply_percent_off(amount: Decimal, percent: u8) -> Result<Decimal, PricingError> {
    let remaining = (Decimal::ONE_HUNDRED - Decimal::from(percent)) / Decimal::ONE_HUNDRED;

    amount.checked_mul(remaining).ok_or(PricingError::Overflow)
}

/// Convert a major-unit amount into minor units, rounding to the nearest minor unit
/// with midpoints rounded away from zero.
///
/// # Errors
///
/// Returns [`PricingError::Overflow`] if the result does not fit in an `i64`.
pub fn to_minor_units(amount: Decimal) -> Result<i64, PricingError> {
    amount
        .checked_mul(MINOR_UNITS_PER_MAJOR)
        .ok_or(PricingError::Overflow)?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .ok_or(PricingError::Overflow)
}
