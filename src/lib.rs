//! Checkout
//!
//! Checkout is a basket pricing engine: a concurrent store of open baskets and a set of
//! promotion rules (bulk percentage discounts, buy-N-pay-M bundles) that price them
//! against a catalog.
//!
//! ```
//! use checkout::prelude::*;
//! use rust_decimal::Decimal;
//! use rusty_money::iso::EUR;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let catalog = Catalog::with_entries(
//!     [CatalogEntry::new("VOUCHER", "Company Voucher", Decimal::new(500, 2))?],
//!     EUR,
//! );
//!
//! let promotions = Promotions::new(
//!     vec![],
//!     vec![BundlePromotion::new("2x1 VOUCHER", "VOUCHER", 2, 1)?],
//! );
//!
//! let pricer = Pricer::with_promotions(catalog, promotions)?;
//! let basket = pricer.create_basket();
//!
//! pricer.scan_item("VOUCHER", basket)?;
//! pricer.scan_item("VOUCHER", basket)?;
//!
//! assert_eq!(pricer.total(basket)?, 500);
//! # Ok(())
//! # }
//! ```

pub mod basket;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod prelude;
pub mod pricer;
pub mod pricing;
pub mod promotions;
pub mod receipt;
pub mod rules;
