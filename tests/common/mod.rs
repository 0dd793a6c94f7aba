//! Calculators and quote shared by every integration test.

use jiff::civil::Date;
use rust_decimal::Decimal;
use rusty_money::Money;

use promo_ranker::prelude::*;

/// Percent of the row total off.
#[derive(Debug)]
pub struct ByPercent;

impl Calculator for ByPercent {
    fn calculate<'a>(
        &self,
        rule: &Rule,
        item: &Item<'a>,
        qty: Decimal,
    ) -> Result<DiscountData<'a>, CalculatorError> {
        let rate = rule.discount_amount.min(Decimal::ONE_HUNDRED) / Decimal::ONE_HUNDRED;
        let (amount, base_amount) = row_totals(item, qty)?;

        let amount = Money::from_decimal(*amount.amount() * rate, amount.currency());
        let base_amount = Money::from_decimal(*base_amount.amount() * rate, base_amount.currency());

        Ok(DiscountData::new(amount, base_amount, amount, base_amount))
    }
}

/// Fixed amount off each unit, never more than the unit price.
#[derive(Debug)]
pub struct ByFixed;

impl Calculator for ByFixed {
    fn calculate<'a>(
        &self,
        rule: &Rule,
        item: &Item<'a>,
        qty: Decimal,
    ) -> Result<DiscountData<'a>, CalculatorError> {
        let per_unit = rule.discount_amount.min(*item.price().amount());
        let base_per_unit = rule.discount_amount.min(*item.base_price().amount());

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

        Ok(DiscountData::new(amount, base_amount, amount, base_amount))
    }
}

/// Registry with the two test calculators.
pub fn calculators() -> CalculatorRegistry {
    CalculatorRegistry::new()
        .with(SimpleAction::ByPercent, ByPercent)
        .with(SimpleAction::ByFixed, ByFixed)
}

/// Quote on website 1, store 1, customer group 0.
pub fn quote() -> Quote {
    Quote {
        store: StoreId(1),
        website: WebsiteId(1),
        customer_group: CustomerGroupId(0),
        date: Date::constant(2026, 4, 15),
    }
}
