//! Receipt
//!
//! Itemised breakdown of a priced basket: what was scanned, what each pricing rule
//! contributed and the total.

use std::{io, ops::Range};

use rust_decimal::Decimal;
use rusty_money::{Money, iso::Currency};
use smallvec::SmallVec;
use tabled::{
    builder::Builder,
    grid::config::HorizontalLine,
    settings::{
        Alignment, Color, Style, Theme,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::{basket::ItemCounts, catalog::Catalog, rules::RuleContribution};

/// Errors that can occur when writing a receipt.
#[derive(Debug, Error)]
pub enum ReceiptError {
    /// The receipt couldn't be written.
    #[error("failed to write receipt")]
    Io(#[from] io::Error),
}

/// One scanned item on a receipt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiptLine {
    /// Item identifier
    pub item: String,

    /// Display name from the catalog
    pub name: String,

    /// Units scanned
    pub quantity: u32,

    /// Catalog price of one unit
    pub unit_price: Decimal,
}

/// Breakdown of a basket total.
#[derive(Debug, Clone)]
pub struct Receipt {
    lines: Vec<ReceiptLine>,
    contributions: SmallVec<[RuleContribution; 4]>,
    subtotal: i64,
    total: i64,
    currency: &'static Currency,
}

impl Receipt {
    /// Build a receipt from a basket snapshot and the rule contributions for it.
    ///
    /// `subtotal` is the basket priced without promotions, in minor units. Items missing
    /// from the catalog are left off the item lines.
    pub fn new(
        items: &ItemCounts,
        catalog: &Catalog,
        contributions: SmallVec<[RuleContribution; 4]>,
        subtotal: i64,
    ) -> Self {
        let mut lines: Vec<ReceiptLine> = items
            .iter()
            .filter(|(_, quantity)| **quantity > 0)
            .filter_map(|(item, quantity)| {
                catalog.get(item).map(|entry| ReceiptLine {
                    item: item.clone(),
                    name: entry.name().to_string(),
                    quantity: *quantity,
                    unit_price: entry.unit_price(),
                })
            })
            .collect();

        lines.sort_by(|a, b| a.item.cmp(&b.item));

        let total = contributions
            .iter()
            .fold(0_i64, |total, contribution| total.saturating_add(contribution.subtotal));

        Self {
            lines,
            contributions,
            subtotal,
            total,
            currency: catalog.currency(),
        }
    }

    /// Scanned items, sorted by item id.
    pub fn lines(&self) -> &[ReceiptLine] {
        &self.lines
    }

    /// What each rule contributed, in evaluation order.
    pub fn contributions(&self) -> &[RuleContribution] {
        &self.contributions
    }

    /// Basket price before promotions, in minor units.
    pub fn subtotal(&self) -> i64 {
        self.subtotal
    }

    /// Amount payable, in minor units.
    pub fn total(&self) -> i64 {
        self.total
    }

    /// Amount saved by promotions, in minor units.
    pub fn savings(&self) -> i64 {
        self.subtotal.saturating_sub(self.total)
    }

    /// Savings as a percentage of the subtotal, to two decimal places.
    pub fn savings_percent(&self) -> Decimal {
        if self.subtotal == 0 {
            return Decimal::ZERO;
        }

        (Decimal::from(self.savings()) * Decimal::ONE_HUNDRED / Decimal::from(self.subtotal))
            .round_dp(2)
    }

    /// Currency the amounts are in.
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// Write the receipt as tables.
    ///
    /// # Errors
    ///
    /// Returns [`ReceiptError::Io`] if writing fails.
    pub fn write_to(&self, mut out: impl io::Write) -> Result<(), ReceiptError> {
        let mut items = Builder::default();

        items.push_record(["Item", "Name", "Qty", "Unit Price"]);

        for line in &self.lines {
            items.push_record([
                line.item.clone(),
                line.name.clone(),
                line.quantity.to_string(),
                Money::from_decimal(line.unit_price, self.currency).to_string(),
            ]);
        }

        let mut rules = Builder::default();

        rules.push_record(["Rule", "Units", "Subtotal"]);

        for contribution in &self.contributions {
            rules.push_record([
                contribution.rule.clone(),
                contribution.units.to_string(),
                self.money(contribution.subtotal),
            ]);
        }

        writeln!(out, "\n{}", render_table(items, 2..4))?;
        writeln!(out, "{}", render_table(rules, 1..3))?;

        self.write_summary(&mut out)
    }

    fn write_summary(&self, out: &mut impl io::Write) -> Result<(), ReceiptError> {
        let rows = [
            (" Subtotal:", self.money(self.subtotal)),
            (
                " Savings:",
                format!("({}%) {}", self.savings_percent(), self.money(self.savings())),
            ),
            (" Total:", self.money(self.total)),
        ];

        let label_width = rows.iter().map(|(label, _)| label.len()).max().unwrap_or(0);
        let value_width = rows.iter().map(|(_, value)| value.len()).max().unwrap_or(0);

        for (label, value) in rows {
            writeln!(out, "{label:<label_width$} {value:>value_width$}")?;
        }

        writeln!(out)?;

        Ok(())
    }

    fn money(&self, minor: i64) -> String {
        Money::from_minor(minor, self.currency).to_string()
    }
}

fn render_table(builder: Builder, amount_columns: Range<usize>) -> String {
    let mut table = builder.build();
    let mut theme = Theme::from(Style::modern_rounded());

    theme.remove_horizontal_lines();
    theme.insert_horizontal_line(
        1,
        HorizontalLine::new(Some('─'), Some('┼'), Some('├'), Some('┤')),
    );

    table.with(theme);
    table.modify(Rows::first(), Color::BOLD);
    table.modify(Columns::new(amount_columns), Alignment::right());

    table.to_string()
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::EUR;
    use smallvec::smallvec;
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

    fn contribution(rule: &str, units: u32, subtotal: i64) -> RuleContribution {
        RuleContribution {
            rule: rule.to_string(),
            units,
            subtotal,
        }
    }

    fn receipt() -> TestResult<Receipt> {
        let items: ItemCounts = [
            ("VOUCHER".to_string(), 2),
            ("TSHIRT".to_string(), 1),
            ("HAT".to_string(), 1),
        ]
        .into_iter()
        .collect();

        Ok(Receipt::new(
            &items,
            &catalog()?,
            smallvec![
                contribution("2x1 VOUCHER", 2, 500),
                contribution("Full price", 2, 2000),
            ],
            3000,
        ))
    }

    #[test]
    fn lines_are_sorted_and_skip_unstocked_items() -> TestResult {
        let receipt = receipt()?;

        let items: Vec<&str> = receipt.lines().iter().map(|line| line.item.as_str()).collect();

        assert_eq!(items, ["TSHIRT", "VOUCHER"]);
        assert_eq!(receipt.lines().get(1).map(|line| line.quantity), Some(2));
        assert_eq!(
            receipt.lines().get(1).map(|line| line.name.as_str()),
            Some("Company Voucher")
        );

        Ok(())
    }

    #[test]
    fn total_is_sum_of_contributions() -> TestResult {
        let receipt = receipt()?;

        assert_eq!(receipt.total(), 2500);
        assert_eq!(receipt.subtotal(), 3000);
        assert_eq!(receipt.savings(), 500);
        assert_eq!(receipt.savings_percent(), Decimal::new(1667, 2));

        Ok(())
    }

    #[test]
    fn savings_percent_of_empty_receipt_is_zero() -> TestResult {
        let receipt = Receipt::new(&ItemCounts::default(), &catalog()?, smallvec![], 0);

        assert_eq!(receipt.savings_percent(), Decimal::ZERO);
        assert_eq!(receipt.total(), 0);

        Ok(())
    }

    #[test]
    fn write_to_renders_items_rules_and_summary() -> TestResult {
        let mut out = Vec::new();

        receipt()?.write_to(&mut out)?;

        let output = String::from_utf8(out)?;

        assert!(output.contains("Company Voucher"));
        assert!(output.contains("Company T-Shirt"));
        assert!(output.contains("2x1 VOUCHER"));
        assert!(output.contains("Full price"));
        assert!(output.contains("Subtotal:"));
        assert!(output.contains("Total:"));
        assert!(!output.contains("HAT"));

        Ok(())
    }
}
