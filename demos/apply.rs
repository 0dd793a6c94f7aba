//! Rule Application Example
//!
//! Loads a fixture set, applies its rules to every item on one address and prints the
//! per-rule discount breakdown.
//!
//! Use `-f` to load a fixture set by name
//! Use `-c` to enter a coupon code
//! Use `--in-order` to apply rules in fixture order instead of most saving first
//!
//! Run with: `cargo run --example apply -- -c SPRING`

use std::{io, io::Write, time::Instant};

use anyhow::Result;
use clap::Parser;
use humanize_duration::{Truncate, prelude::DurationExt};
use rust_decimal::Decimal;
use rusty_money::Money;

use promo_ranker::{prelude::*, utils::ExampleApplyArgs};

#[derive(Debug)]
struct ByPercent;

impl Calculator for ByPercent {
    fn calculate<'a>(
        &self,
        rule: &Rule,
        item: &Item<'a>,
        qty: Decimal,
    ) -> Result<DiscountData<'a>, CalculatorError> {
        let rate = rule.discount_amount.min(Decimal::ONE_HUNDRED) / Decimal::ONE_HUNDRED;
        let (row, base_row) = row_totals(item, qty)?;

        let amount = Money::from_decimal(*row.amount() * rate, row.currency());
        let base_amount = Money::from_decimal(*base_row.amount() * rate, base_row.currency());

        Ok(DiscountData::new(amount, base_amount, row, base_row))
    }
}

#[derive(Debug)]
struct ByFixed;

impl Calculator for ByFixed {
    fn calculate<'a>(
        &self,
        rule: &Rule,
        item: &Item<'a>,
        qty: Decimal,
    ) -> Result<DiscountData<'a>, CalculatorError> {
        let per_unit = rule.discount_amount.min(*item.price().amount());
        let base_per_unit = rule.discount_amount.min(*item.base_price().amount());

        let (row, base_row) = row_totals(item, qty)?;

        let (Some(amount), Some(base_amount)) =
            (per_unit.checked_mul(qty), base_per_unit.checked_mul(qty))
        else {
            return Err(CalculatorError::Overflow {
                sku: item.sku().to_string(),
                qty,
            });
        };

        let amount = Money::from_decimal(amount, item.price().currency());
        let base_amount = Money::from_decimal(base_amount, item.base_price().currency());

        Ok(DiscountData::new(amount, base_amount, row, base_row))
    }
}

/// Rule Application Example
pub fn main() -> Result<()> {
    let args = ExampleApplyArgs::parse();

    let fixture = Fixture::from_set(&args.fixture)?;
    let rules = fixture.rules();

    let config = if args.in_order {
        SortingConfig::disabled()
    } else {
        fixture.config()
    };

    let calculators = CalculatorRegistry::new()
        .with(SimpleAction::ByPercent, ByPercent)
        .with(SimpleAction::ByFixed, ByFixed);

    let mut applier = RulesApplier::new(config, calculators);

    let quote = args.quote();
    let mut address = Address::new(&quote);
    let mut results = Vec::new();

    let start = Instant::now();

    for item in fixture.items() {
        let mut item = item.clone();

        let applied = applier.apply_rules(
            &mut item,
            &mut address,
            &rules,
            false,
            args.coupon.as_deref(),
            &mut AddressRecorder,
        )?;

        results.push((item, applied));
    }

    let elapsed = start.elapsed();

    let mut report = BreakdownReport::new();

    for (item, applied) in &results {
        report.push(item, applied);
    }

    let stdout = io::stdout();
    let mut handle = stdout.lock();

    report.write_to(&mut handle, &address)?;

    writeln!(
        handle,
        " {} ({}s)",
        elapsed.human(Truncate::Nano),
        elapsed.as_secs_f32()
    )?;

    Ok(())
}
