//! Rule Applicator
//!
//! Applies rules to an item one after another, recomputing each rule's discount at
//! application time, recording the breakdown and honoring stop-processing.

use std::slice;

use smallvec::SmallVec;
use thiserror::Error;
use tracing::{debug, trace};

use crate::{
    addresses::Address,
    calculators::{CalculatorError, CalculatorRegistry, fixed_quantity},
    corrections::{CorrectionError, Corrections},
    discounts::{DiscountAggregator, RuleDiscount},
    events::{EventDispatcher, ValidatorProcessEvent},
    host::RulesHost,
    items::Item,
    ranking::RankingCandidate,
    rules::{Rule, RuleId},
};

/// Errors that abort a rule application pass.
#[derive(Debug, Error)]
pub enum ApplyError {
    /// Calculator missing or failing.
    #[error(transparent)]
    Calculator(#[from] CalculatorError),

    /// Correction pass failure.
    #[error(transparent)]
    Correction(#[from] CorrectionError),
}

/// Identifiers of applied rules in application order. Re-applying an id keeps its first
/// position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppliedRuleIds(SmallVec<[RuleId; 4]>);

impl AppliedRuleIds {
    /// Create an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an applied rule.
    pub fn insert(&mut self, id: RuleId) {
        if !self.contains(id) {
            self.0.push(id);
        }
    }

    /// Whether `id` was applied.
    pub fn contains(&self, id: RuleId) -> bool {
        self.0.contains(&id)
    }

    /// Applied ids in order.
    pub fn as_slice(&self) -> &[RuleId] {
        &self.0
    }

    /// Iterate the applied ids in order.
    pub fn iter(&self) -> slice::Iter<'_, RuleId> {
        self.0.iter()
    }

    /// Number of distinct applied rules.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether nothing was applied.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<RuleId> for AppliedRuleIds {
    fn from_iter<I: IntoIterator<Item = RuleId>>(iter: I) -> Self {
        let mut ids = Self::new();

        for id in iter {
            ids.insert(id);
        }

        ids
    }
}

impl<'i> IntoIterator for &'i AppliedRuleIds {
    type Item = &'i RuleId;
    type IntoIter = slice::Iter<'i, RuleId>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Sequential rule application against one item.
#[derive(Debug)]
pub struct RuleApplicator<'c> {
    calculators: &'c CalculatorRegistry,
    events: &'c mut EventDispatcher,
    corrections: &'c mut dyn Corrections,
    host: &'c mut dyn RulesHost,
}

impl<'c> RuleApplicator<'c> {
    /// Create an applicator over the pass's collaborators.
    pub fn new(
        calculators: &'c CalculatorRegistry,
        events: &'c mut EventDispatcher,
        corrections: &'c mut dyn Corrections,
        host: &'c mut dyn RulesHost,
    ) -> Self {
        Self {
            calculators,
            events,
            corrections,
            host,
        }
    }

    /// Apply ranked candidates in order.
    ///
    /// # Errors
    ///
    /// Returns an [`ApplyError`] if a calculator or correction fails; rules applied before
    /// the failure stay applied.
    #[tracing::instrument(
        name = "rules.applicator.apply_ranked",
        skip_all,
        fields(sku = %item.sku(), candidates = ranked.len())
    )]
    pub fn apply_ranked<'a>(
        &mut self,
        item: &mut Item<'a>,
        address: &mut Address<'_>,
        ranked: &[RankingCandidate<'_, 'a>],
    ) -> Result<AppliedRuleIds, ApplyError> {
        self.apply_in_order(
            item,
            address,
            ranked
                .iter()
                .map(|candidate| (candidate.rule, candidate.coupon_code)),
        )
    }

    /// Apply rules in the order given, stopping after the first applied rule flagged
    /// stop-processing.
    ///
    /// # Errors
    ///
    /// Returns an [`ApplyError`] if a calculator or correction fails.
    pub fn apply_in_order<'r, 'a>(
        &mut self,
        item: &mut Item<'a>,
        address: &mut Address<'_>,
        rules: impl IntoIterator<Item = (&'r Rule, Option<&'r str>)>,
    ) -> Result<AppliedRuleIds, ApplyError> {
        let mut aggregator = DiscountAggregator::new();
        let mut applied = AppliedRuleIds::new();

        for (rule, coupon_code) in rules {
            self.apply_rule(item, address, rule, coupon_code, &mut aggregator)?;

            applied.insert(rule.id);

            if rule.stop_rules_processing {
                debug!(rule_id = %rule.id, "rule stops further rule processing");
                break;
            }
        }

        Ok(applied)
    }

    fn apply_rule<'a>(
        &mut self,
        item: &mut Item<'a>,
        address: &mut Address<'_>,
        rule: &Rule,
        coupon_code: Option<&str>,
        aggregator: &mut DiscountAggregator<'a>,
    ) -> Result<(), ApplyError> {
        let (calculator, qty) = fixed_quantity(self.calculators, item, rule)?;
        let mut discount = calculator.calculate(rule, item, qty)?;

        self.events.dispatch(&mut ValidatorProcessEvent {
            rule,
            item: &*item,
            address: &*address,
            quote: address.quote(),
            qty,
            result: &mut discount,
        });

        if discount.is_positive() && item.supports_breakdown() {
            aggregator.push(RuleDiscount {
                discount,
                label: rule.breakdown_label(address.store()).to_string(),
                rule_id: rule.id,
            });

            item.set_discounts(aggregator.entries());
        }

        self.corrections.min_fix(&mut discount, item, qty)?;
        self.corrections.delta_rounding_fix(&mut discount, item)?;

        trace!(
            rule_id = %rule.id,
            %qty,
            amount = %discount.amount.amount(),
            "applying rule discount"
        );

        item.set_discount(discount);

        self.host
            .maintain_address_coupon_code(address, rule, coupon_code);
        self.host.add_discount_description(address, rule);

        Ok(())
    }
}
