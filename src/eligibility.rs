//! Eligibility
//!
//! Decides whether a rule may be evaluated for an address and whether an item (or one of
//! its children) passes the rule's action conditions.

use std::fmt;

use rustc_hash::FxHashMap;

use crate::{
    addresses::Address,
    items::{Item, ProductType},
    rules::Rule,
};

/// Scoping check run before any condition is evaluated.
pub trait RuleScope: fmt::Debug {
    /// Whether `rule` may be processed for `address`.
    fn can_process_rule(&self, rule: &Rule, address: &Address<'_>) -> bool;
}

/// Whether a failing item should be retried against its children.
pub trait ChildValidationPolicy: fmt::Debug {
    /// Whether children must be validated when the item itself fails.
    fn is_required(&self, item: &Item<'_>) -> bool;
}

/// Scopes rules by active flag, website, customer group and date window.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScopeEligibility;

impl RuleScope for ScopeEligibility {
    fn can_process_rule(&self, rule: &Rule, address: &Address<'_>) -> bool {
        let quote = address.quote();

        if !rule.is_active {
            return false;
        }

        if !rule.websites.is_empty() && !rule.websites.contains(&quote.website) {
            return false;
        }

        if !rule.customer_groups.is_empty() && !rule.customer_groups.contains(&quote.customer_group)
        {
            return false;
        }

        let started = rule.from_date.is_none_or(|from| from <= quote.date);
        let not_ended = rule.to_date.is_none_or(|to| quote.date <= to);

        started && not_ended
    }
}

/// Child validation keyed by product type; required unless overridden.
///
/// No type is preconfigured, bundles included: a bundle failing a rule's conditions is
/// still eligible through a passing child until `with(ProductType::Bundle, false)` is set.
#[derive(Debug, Clone, Default)]
pub struct ProductTypeChildValidation {
    overrides: FxHashMap<ProductType, bool>,
}

impl ProductTypeChildValidation {
    /// Require child validation for every product type.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the requirement for one product type.
    #[must_use]
    pub fn with(mut self, product_type: ProductType, required: bool) -> Self {
        self.overrides.insert(product_type, required);
        self
    }
}

impl ChildValidationPolicy for ProductTypeChildValidation {
    fn is_required(&self, item: &Item<'_>) -> bool {
        self.overrides
            .get(&item.product_type())
            .copied()
            .unwrap_or(true)
    }
}

/// Combines rule scoping with condition validation.
#[derive(Debug)]
pub struct EligibilityChecker {
    scope: Box<dyn RuleScope>,
    children: Box<dyn ChildValidationPolicy>,
}

impl EligibilityChecker {
    /// Create a checker from its two collaborators.
    pub fn new(
        scope: impl RuleScope + 'static,
        children: impl ChildValidationPolicy + 'static,
    ) -> Self {
        Self {
            scope: Box::new(scope),
            children: Box::new(children),
        }
    }

    /// Whether `rule` applies to `item` at `address`.
    ///
    /// With `skip_validation` only scoping is checked. Otherwise an item failing the
    /// rule's conditions stays eligible when child validation is required for it and at
    /// least one child passes.
    pub fn is_eligible(
        &self,
        rule: &Rule,
        item: &Item<'_>,
        address: &Address<'_>,
        skip_validation: bool,
    ) -> bool {
        if !self.scope.can_process_rule(rule, address) {
            return false;
        }

        if skip_validation || rule.actions.validate(item) {
            return true;
        }

        if !self.children.is_required(item) {
            return false;
        }

        item.children()
            .iter()
            .any(|child| rule.actions.validate(child))
    }
}

impl Default for EligibilityChecker {
    fn default() -> Self {
        Self::new(ScopeEligibility, ProductTypeChildValidation::new())
    }
}
