//! Command line front end
//!
//! Drives the [`Pricer`] in-process: load the configuration, then price a basket or
//! list the catalog.

use std::{io, path::PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use rusty_money::Money;
use tabled::{
    builder::Builder,
    settings::{Alignment, Style, object::Columns},
};
use tracing::info;

use crate::{
    config,
    pricer::{Pricer, PricerError},
};

/// Checkout basket pricing
#[derive(Debug, Parser)]
#[command(name = "checkout", about = "Checkout basket pricing", long_about = None)]
pub struct CheckoutArgs {
    /// Items file
    #[arg(long, env = "CHECKOUT_ITEMS_PATH", default_value = "fixtures/items.yml")]
    pub items: PathBuf,

    /// Rules file
    #[arg(long, env = "CHECKOUT_RULES_PATH", default_value = "fixtures/rules.yml")]
    pub rules: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "RUST_LOG", default_value = "warn")]
    pub log_level: String,

    /// What to do
    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Scan items into a new basket and print the receipt
    Total {
        /// Item ids, one per scanned unit
        #[arg(required = true)]
        items: Vec<String>,
    },

    /// Print the catalog
    Catalog,
}

impl CheckoutArgs {
    /// Load arguments from `.env`, the environment and the command line.
    ///
    /// # Errors
    ///
    /// Returns an error if the arguments can't be parsed
    pub fn load() -> Result<Self, clap::Error> {
        // Load .env file if present (ignore if missing)
        _ = dotenvy::dotenv();

        Self::try_parse()
    }

    /// Build a pricer from the configured items and rules files.
    ///
    /// # Errors
    ///
    /// Returns an error if either file can't be loaded, or the promotions conflict.
    pub fn pricer(&self) -> anyhow::Result<Pricer> {
        let catalog = config::load_catalog(&self.items)
            .with_context(|| format!("loading items from {}", self.items.display()))?;

        let promotions = config::load_promotions(&self.rules, &catalog)
            .with_context(|| format!("loading rules from {}", self.rules.display()))?;

        info!(
            items = catalog.len(),
            promotions = promotions.len(),
            "loaded configuration"
        );

        Ok(Pricer::with_promotions(catalog, promotions)?)
    }
}

/// Run a command against the pricer, writing its output to `out`.
///
/// # Errors
///
/// Returns an error if pricing fails or the output can't be written.
pub fn run(pricer: &Pricer, command: &Command, mut out: impl io::Write) -> anyhow::Result<()> {
    match command {
        Command::Total { items } => {
            let basket = pricer.create_basket();

            for item in items {
                match pricer.scan_item(item, basket) {
                    Ok(()) => {}
                    Err(PricerError::ItemNotConfigured(item)) => {
                        writeln!(out, "Skipped unknown item: {item}")?;
                    }
                    Err(err) => return Err(err.into()),
                }
            }

            let receipt = pricer.receipt(basket);

            pricer.remove_basket(basket);

            receipt?.write_to(&mut out)?;
        }
        Command::Catalog => {
            let catalog = pricer.catalog();
            let mut builder = Builder::default();

            builder.push_record(["Item", "Name", "Unit Price"]);

            for entry in catalog.iter() {
                builder.push_record([
                    entry.id().to_string(),
                    entry.name().to_string(),
                    Money::from_decimal(entry.unit_price(), catalog.currency()).to_string(),
                ]);
            }

            let mut table = builder.build();

            table.with(Style::modern_rounded());
            table.modify(Columns::new(2..3), Alignment::right());

            writeln!(out, "{table}")?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use rusty_money::iso::EUR;
    use testresult::TestResult;

    use crate::{
        catalog::{Catalog, CatalogEntry},
        promotions::{BundlePromotion, Promotions},
    };

    use super::*;

    fn pricer() -> TestResult<Pricer> {
        let catalog = Catalog::with_entries(
            [
                CatalogEntry::new("VOUCHER", "Company Voucher", Decimal::new(500, 2))?,
                CatalogEntry::new("MUG", "Company Coffee Mug", Decimal::new(750, 2))?,
            ],
            EUR,
        );

        Ok(Pricer::with_promotions(
            catalog,
            Promotions::new(
                vec![],
                vec![BundlePromotion::new("2x1 VOUCHER", "VOUCHER", 2, 1)?],
            ),
        )?)
    }

    #[test]
    fn parses_total_command() -> TestResult {
        let args = CheckoutArgs::try_parse_from([
            "checkout",
            "--items",
            "items.yml",
            "total",
            "VOUCHER",
            "MUG",
        ])?;

        assert_eq!(args.items, PathBuf::from("items.yml"));
        assert!(
            matches!(args.command, Command::Total { ref items } if items == &["VOUCHER", "MUG"])
        );

        Ok(())
    }

    #[test]
    fn total_requires_items() {
        assert!(CheckoutArgs::try_parse_from(["checkout", "total"]).is_err());
    }

    #[test]
    fn total_prints_receipt_and_removes_basket() -> TestResult {
        let pricer = pricer()?;
        let command = Command::Total {
            items: vec!["VOUCHER".to_string(), "HAT".to_string(), "VOUCHER".to_string()],
        };
        let mut out = Vec::new();

        run(&pricer, &command, &mut out)?;

        let output = String::from_utf8(out)?;

        assert!(output.contains("Skipped unknown item: HAT"));
        assert!(output.contains("2x1 VOUCHER"));
        assert!(output.contains("Total:"));
        assert_eq!(pricer.basket_count(), 0);

        Ok(())
    }

    #[test]
    fn catalog_lists_every_item() -> TestResult {
        let mut out = Vec::new();

        run(&pricer()?, &Command::Catalog, &mut out)?;

        let output = String::from_utf8(out)?;

        assert!(output.contains("Company Voucher"));
        assert!(output.contains("Company Coffee Mug"));

        Ok(())
    }
}
