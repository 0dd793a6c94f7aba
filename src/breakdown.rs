//! Breakdown
//!
//! Tabular report of a rule pass: one block per item listing each applied rule's breakdown
//! entry, the item's final discount and the address's discount description.

use std::io;

use rusty_money::{Money, MoneyError, iso::Currency};
use tabled::{
    builder::Builder,
    settings::{
        Alignment, Color, Style,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::{addresses::Address, applicator::AppliedRuleIds, items::Item};

/// Errors that can occur when writing a breakdown report.
#[derive(Debug, Error)]
pub enum BreakdownError {
    /// Writing the report failed
    #[error("Failed to write breakdown: {0}")]
    Io(#[from] io::Error),

    /// Discount totals could not be summed
    #[error(transparent)]
    Money(#[from] MoneyError),

    /// An item's row total does not fit in a decimal
    #[error("Row total overflowed for `{0}`")]
    Overflow(String),
}

/// Items after a rule pass, with the rules applied to each.
#[derive(Debug, Default)]
pub struct BreakdownReport<'r, 'a> {
    lines: Vec<(&'r Item<'a>, &'r AppliedRuleIds)>,
}

impl<'r, 'a> BreakdownReport<'r, 'a> {
    /// Create an empty report.
    #[must_use]
    pub fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Add an item and the rules applied to it.
    pub fn push(&mut self, item: &'r Item<'a>, applied: &'r AppliedRuleIds) {
        self.lines.push((item, applied));
    }

    /// Number of items in the report.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether the report has no items.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Sum of the items' final discount amounts, `None` when the report is empty.
    ///
    /// # Errors
    ///
    /// Returns an error if the items' currencies differ.
    pub fn total_discount(&self) -> Result<Option<Money<'a, Currency>>, MoneyError> {
        let mut amounts = self.lines.iter().map(|(item, _)| item.discount().amount);

        let Some(first) = amounts.next() else {
            return Ok(None);
        };

        amounts
            .try_fold(first, |total, amount| total.add(amount))
            .map(Some)
    }

    /// Write the report.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails or the discount total cannot be computed.
    pub fn write_to(
        &self,
        mut out: impl io::Write,
        address: &Address<'_>,
    ) -> Result<(), BreakdownError> {
        let mut builder = Builder::default();

        builder.push_record(["SKU", "Qty", "Row Total", "Rule", "Label", "Discount"]);

        for (item, applied) in &self.lines {
            push_item_rows(&mut builder, item, applied)?;
        }

        let mut table = builder.build();

        table.with(Style::modern_rounded());
        table.modify(Rows::first(), Color::BOLD);
        table.modify(Columns::new(1..3), Alignment::right());
        table.modify(Columns::last(), Alignment::right());

        writeln!(out, "\n{table}")?;

        if let Some(total) = self.total_discount()? {
            writeln!(out, " Total discount: {total}")?;
        }

        let description = address.discount_description();

        if !description.is_empty() {
            writeln!(out, " Description: {description}")?;
        }

        if let Some(code) = address.coupon_code() {
            writeln!(out, " Coupon: {code}")?;
        }

        Ok(())
    }
}

fn push_item_rows(
    builder: &mut Builder,
    item: &Item<'_>,
    applied: &AppliedRuleIds,
) -> Result<(), BreakdownError> {
    let sku = item.sku().to_string();
    let qty = item.quantity().normalize().to_string();

    let Some(row_total) = item.price_for(item.quantity()) else {
        return Err(BreakdownError::Overflow(sku));
    };

    let row_total = row_total.to_string();

    let entries = item.discounts().unwrap_or_default();

    if entries.is_empty() {
        let rules = applied
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");

        builder.push_record([
            sku,
            qty,
            row_total,
            rules,
            String::new(),
            item.discount().amount.to_string(),
        ]);

        return Ok(());
    }

    for (idx, entry) in entries.iter().enumerate() {
        let (sku, qty, row_total) = if idx == 0 {
            (sku.clone(), qty.clone(), row_total.clone())
        } else {
            (String::new(), String::new(), String::new())
        };

        builder.push_record([
            sku,
            qty,
            row_total,
            entry.rule_id.to_string(),
            entry.label.clone(),
            entry.discount.amount.to_string(),
        ]);
    }

    builder.push_record([
        String::new(),
        String::new(),
        String::new(),
        String::new(),
        "Applied".to_string(),
        item.discount().amount.to_string(),
    ]);

    Ok(())
}
