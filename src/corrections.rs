//! Corrections
//!
//! Post-calculation fixes applied to a rule's discount before it is written to the item:
//! a minimum fix capping the discount at the discounted units' price and a delta rounding
//! fix carrying sub-minor-unit remainders between items.

use std::fmt;

use rust_decimal::{Decimal, RoundingStrategy};
use rustc_hash::FxHashMap;
use rusty_money::{Money, MoneyError, iso::Currency};
use thiserror::Error;

use crate::{discounts::DiscountData, items::Item};

/// Errors raised by a correction pass.
#[derive(Debug, Error)]
pub enum CorrectionError {
    /// Money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),

    /// Price multiplied by the discounted quantity does not fit in a decimal.
    #[error("row total overflowed for {qty} units of `{sku}`")]
    Overflow {
        /// SKU of the item being corrected
        sku: String,

        /// Quantity the rule discounts
        qty: Decimal,
    },
}

/// Corrections run, in order, on every applied rule's discount.
pub trait Corrections: fmt::Debug {
    /// Cap the discount so the item is never discounted below zero for `qty` units.
    ///
    /// # Errors
    ///
    /// Returns a [`CorrectionError`] on money arithmetic failures.
    fn min_fix<'a>(
        &mut self,
        data: &mut DiscountData<'a>,
        item: &Item<'a>,
        qty: Decimal,
    ) -> Result<(), CorrectionError>;

    /// Round the discount, distributing rounding remainders across items.
    ///
    /// # Errors
    ///
    /// Returns a [`CorrectionError`] on money arithmetic failures.
    fn delta_rounding_fix<'a>(
        &mut self,
        data: &mut DiscountData<'a>,
        item: &Item<'a>,
    ) -> Result<(), CorrectionError>;
}

/// Default corrections.
///
/// The minimum fix folds the discount already written on the item into the rule's amount
/// before capping, so overwriting the item's figures with the result keeps earlier rules'
/// discounts. Rounding remainders are carried between items sharing a discount percent for
/// the lifetime of the instance.
#[derive(Debug, Clone, Default)]
pub struct DiscountCorrections {
    rounding_deltas: FxHashMap<Decimal, Decimal>,
    base_rounding_deltas: FxHashMap<Decimal, Decimal>,
}

impl DiscountCorrections {
    /// Create corrections with no carried remainders.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget carried remainders, e.g. between totals collections.
    pub fn reset(&mut self) {
        self.rounding_deltas.clear();
        self.base_rounding_deltas.clear();
    }
}

impl Corrections for DiscountCorrections {
    fn min_fix<'a>(
        &mut self,
        data: &mut DiscountData<'a>,
        item: &Item<'a>,
        qty: Decimal,
    ) -> Result<(), CorrectionError> {
        let amount = item.discount().amount.add(data.amount)?;
        let base_amount = item.discount().base_amount.add(data.base_amount)?;

        let (Some(row_total), Some(base_row_total)) =
            (item.price_for(qty), item.base_price_for(qty))
        else {
            return Err(CorrectionError::Overflow {
                sku: item.sku().to_string(),
                qty,
            });
        };

        data.amount = capped(amount, row_total)?;
        data.base_amount = capped(base_amount, base_row_total)?;

        Ok(())
    }

    fn delta_rounding_fix<'a>(
        &mut self,
        data: &mut DiscountData<'a>,
        item: &Item<'a>,
    ) -> Result<(), CorrectionError> {
        let Some(percent) = item.discount_percent() else {
            data.amount = round(data.amount);
            data.base_amount = round(data.base_amount);

            return Ok(());
        };

        data.amount = carry(&mut self.rounding_deltas, percent, data.amount);
        data.base_amount = carry(&mut self.base_rounding_deltas, percent, data.base_amount);

        Ok(())
    }
}

/// The smaller of `amount` and `cap`, erroring on a currency mismatch.
fn capped<'a>(
    amount: Money<'a, Currency>,
    cap: Money<'a, Currency>,
) -> Result<Money<'a, Currency>, MoneyError> {
    if amount.currency() != cap.currency() {
        return Err(MoneyError::CurrencyMismatch {
            expected: cap.currency().iso_alpha_code,
            actual: amount.currency().iso_alpha_code,
        });
    }

    Ok(if amount.amount() > cap.amount() {
        cap
    } else {
        amount
    })
}

/// Add the remainder carried for `key`, round, and carry the new remainder.
fn carry<'a>(
    deltas: &mut FxHashMap<Decimal, Decimal>,
    key: Decimal,
    money: Money<'a, Currency>,
) -> Money<'a, Currency> {
    let delta = deltas.get(&key).copied().unwrap_or(Decimal::ZERO);
    let adjusted = *money.amount() + delta;
    let rounded = round_amount(adjusted, money.currency());

    deltas.insert(key, adjusted - rounded);

    Money::from_decimal(rounded, money.currency())
}

fn round(money: Money<'_, Currency>) -> Money<'_, Currency> {
    Money::from_decimal(
        round_amount(*money.amount(), money.currency()),
        money.currency(),
    )
}

fn round_amount(amount: Decimal, currency: &Currency) -> Decimal {
    amount.round_dp_with_strategy(currency.exponent, RoundingStrategy::MidpointAwayFromZero)
}
