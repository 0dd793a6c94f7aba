//! Calculators
//!
//! Pluggable per-action discount calculators, registered once against the [`SimpleAction`]
//! they handle and resolved for every rule application.

use std::fmt;

use rust_decimal::Decimal;
use rustc_hash::FxHashMap;
use rusty_money::{Money, MoneyError, iso::Currency};
use thiserror::Error;

use crate::{
    discounts::DiscountData,
    items::Item,
    rules::{Rule, SimpleAction},
};

/// Errors raised while resolving or running a calculator.
#[derive(Debug, Error)]
pub enum CalculatorError {
    /// No calculator is registered for the rule's action.
    #[error("no discount calculator registered for action `{0}`")]
    UnknownAction(SimpleAction),

    /// Money arithmetic or currency mismatch inside a calculator.
    #[error(transparent)]
    Money(#[from] MoneyError),

    /// Discount figures do not fit in a decimal.
    #[error("discount overflowed for {qty} units of `{sku}`")]
    Overflow {
        /// SKU of the item being discounted
        sku: String,

        /// Quantity the rule discounts
        qty: Decimal,
    },

    /// Calculator-specific failure.
    #[error("discount calculation failed: {0}")]
    Calculation(String),
}

/// Discount calculator for one simple action.
pub trait Calculator: fmt::Debug {
    /// Adjust the quantity the rule applies to.
    fn fix_quantity(&self, qty: Decimal, _rule: &Rule) -> Decimal {
        qty
    }

    /// Compute the four discount figures for `qty` units of `item`.
    ///
    /// # Errors
    ///
    /// Returns a [`CalculatorError`] if the figures cannot be computed.
    fn calculate<'a>(
        &self,
        rule: &Rule,
        item: &Item<'a>,
        qty: Decimal,
    ) -> Result<DiscountData<'a>, CalculatorError>;
}

/// Calculators keyed by the action they handle.
#[derive(Debug, Default)]
pub struct CalculatorRegistry {
    calculators: FxHashMap<SimpleAction, Box<dyn Calculator>>,
}

impl CalculatorRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `calculator` for `action`, replacing any previous registration.
    pub fn register(&mut self, action: SimpleAction, calculator: impl Calculator + 'static) {
        self.calculators.insert(action, Box::new(calculator));
    }

    /// Builder form of [`CalculatorRegistry::register`].
    #[must_use]
    pub fn with(mut self, action: SimpleAction, calculator: impl Calculator + 'static) -> Self {
        self.register(action, calculator);
        self
    }

    /// Resolve the calculator for an action.
    ///
    /// # Errors
    ///
    /// Returns [`CalculatorError::UnknownAction`] if nothing is registered for `action`.
    pub fn resolve(&self, action: SimpleAction) -> Result<&dyn Calculator, CalculatorError> {
        self.calculators
            .get(&action)
            .map(|calculator| &**calculator)
            .ok_or(CalculatorError::UnknownAction(action))
    }

    /// Whether a calculator is registered for `action`.
    #[must_use]
    pub fn contains(&self, action: SimpleAction) -> bool {
        self.calculators.contains_key(&action)
    }
}

/// Quantity of `item` the rule may discount: the item quantity, capped by the rule's
/// `discount_qty` when that is set and positive.
#[must_use]
pub fn item_qty(item: &Item<'_>, rule: &Rule) -> Decimal {
    let qty = item.quantity();

    match rule.discount_qty {
        Some(limit) if limit > Decimal::ZERO => qty.min(limit),
        _ => qty,
    }
}

/// Row totals of `qty` units of `item` in the quote and base currencies.
///
/// # Errors
///
/// Returns [`CalculatorError::Overflow`] if either total does not fit in a decimal.
pub fn row_totals<'a>(
    item: &Item<'a>,
    qty: Decimal,
) -> Result<(Money<'a, Currency>, Money<'a, Currency>), CalculatorError> {
    let (Some(row), Some(base_row)) = (item.price_for(qty), item.base_price_for(qty)) else {
        return Err(CalculatorError::Overflow {
            sku: item.sku().to_string(),
            qty,
        });
    };

    Ok((row, base_row))
}

/// Resolve the rule's calculator and fix the quantity for `item`.
///
/// # Errors
///
/// Returns [`CalculatorError::UnknownAction`] if the rule's action has no calculator.
pub fn fixed_quantity<'r>(
    registry: &'r CalculatorRegistry,
    item: &Item<'_>,
    rule: &Rule,
) -> Result<(&'r dyn Calculator, Decimal), CalculatorError> {
    let calculator = registry.resolve(rule.simple_action)?;
    let qty = calculator.fix_quantity(item_qty(item, rule), rule);

    Ok((calculator, qty))
}

/// Compute the rule's discount for `item` with a freshly fixed quantity.
///
/// # Errors
///
/// Returns a [`CalculatorError`] if the calculator is missing or fails.
pub fn discount_data<'a>(
    registry: &CalculatorRegistry,
    item: &Item<'a>,
    rule: &Rule,
) -> Result<DiscountData<'a>, CalculatorError> {
    let (calculator, qty) = fixed_quantity(registry, item, rule)?;

    calculator.calculate(rule, item, qty)
}
