//! Discounts
//!
//! Per-rule discount figures and the breakdown trail recorded against an item.

use rusty_money::{Money, iso::Currency};

use crate::rules::RuleId;

/// Discount figures produced for one rule against one item.
///
/// `amount` and `original_amount` are in the quote currency, the `base_*` figures in the
/// store's base currency.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiscountData<'a> {
    /// Discount in the quote currency
    pub amount: Money<'a, Currency>,

    /// Discount in the base currency
    pub base_amount: Money<'a, Currency>,

    /// Discount calculated from the original (pre-catalog-rule) price
    pub original_amount: Money<'a, Currency>,

    /// Original discount in the base currency
    pub base_original_amount: Money<'a, Currency>,
}

impl<'a> DiscountData<'a> {
    /// Create discount data from its four figures.
    #[must_use]
    pub fn new(
        amount: Money<'a, Currency>,
        base_amount: Money<'a, Currency>,
        original_amount: Money<'a, Currency>,
        base_original_amount: Money<'a, Currency>,
    ) -> Self {
        Self {
            amount,
            base_amount,
            original_amount,
            base_original_amount,
        }
    }

    /// A zero discount in the given quote and base currencies.
    #[must_use]
    pub fn zero(currency: &'a Currency, base_currency: &'a Currency) -> Self {
        Self {
            amount: Money::from_minor(0, currency),
            base_amount: Money::from_minor(0, base_currency),
            original_amount: Money::from_minor(0, currency),
            base_original_amount: Money::from_minor(0, base_currency),
        }
    }

    /// Whether the quote-currency discount is strictly positive.
    pub fn is_positive(&self) -> bool {
        self.amount.is_positive()
    }
}

/// One entry of an item's discount breakdown.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleDiscount<'a> {
    /// Snapshot of the figures as they were when the rule was applied
    pub discount: DiscountData<'a>,

    /// Store-scoped label shown to the customer
    pub label: String,

    /// Rule that produced the discount
    pub rule_id: RuleId,
}

/// Append-only list of breakdown entries built during one item's application pass.
#[derive(Debug, Default, Clone)]
pub struct DiscountAggregator<'a> {
    entries: Vec<RuleDiscount<'a>>,
}

impl<'a> DiscountAggregator<'a> {
    /// Create an empty aggregator for a new pass.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Append an entry.
    pub fn push(&mut self, entry: RuleDiscount<'a>) {
        self.entries.push(entry);
    }

    /// Entries in application order.
    pub fn entries(&self) -> &[RuleDiscount<'a>] {
        &self.entries
    }

    /// Number of entries recorded so far.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been recorded yet.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::{EUR, GBP};

    use super::*;

    #[test]
    fn zero_uses_quote_and_base_currencies() {
        let data = DiscountData::zero(GBP, EUR);

        assert!(!data.is_positive());
        assert_eq!(data.amount.currency(), GBP);
        assert_eq!(data.base_amount.currency(), EUR);
        assert_eq!(data.original_amount.currency(), GBP);
        assert_eq!(data.base_original_amount.currency(), EUR);
    }

    #[test]
    fn aggregator_keeps_application_order() {
        let mut aggregator = DiscountAggregator::new();
        let data = DiscountData::new(
            Money::from_minor(200, GBP),
            Money::from_minor(200, GBP),
            Money::from_minor(250, GBP),
            Money::from_minor(250, GBP),
        );

        aggregator.push(RuleDiscount {
            discount: data,
            label: "Summer".to_string(),
            rule_id: RuleId(7),
        });
        aggregator.push(RuleDiscount {
            discount: data,
            label: "Members".to_string(),
            rule_id: RuleId(3),
        });

        let ids: Vec<RuleId> = aggregator.entries().iter().map(|e| e.rule_id).collect();

        assert_eq!(ids, vec![RuleId(7), RuleId(3)]);
        assert_eq!(aggregator.len(), 2);
        assert!(data.is_positive());
    }
}
