//! Baseline
//!
//! Rule application in the order rules are supplied, used when most-saving sort is off.

use std::fmt;

use crate::{
    addresses::Address,
    applicator::{AppliedRuleIds, ApplyError, RuleApplicator},
    eligibility::EligibilityChecker,
    items::Item,
    rules::Rule,
};

/// Applies rules without ranking them.
pub trait BaselineApplier: fmt::Debug {
    /// Apply `rules` to `item` in the given order.
    ///
    /// # Errors
    ///
    /// Returns an [`ApplyError`] if a rule cannot be applied.
    #[expect(
        clippy::too_many_arguments,
        reason = "mirrors the ranked entry point plus its collaborators"
    )]
    fn apply_rules<'a>(
        &mut self,
        eligibility: &EligibilityChecker,
        applicator: &mut RuleApplicator<'_>,
        item: &mut Item<'a>,
        address: &mut Address<'_>,
        rules: &[Rule],
        skip_validation: bool,
        coupon_code: Option<&str>,
    ) -> Result<AppliedRuleIds, ApplyError>;
}

/// Applies every eligible rule in the order given, honoring stop-processing.
#[derive(Debug, Clone, Copy, Default)]
pub struct InOrderApplier;

impl BaselineApplier for InOrderApplier {
    fn apply_rules<'a>(
        &mut self,
        eligibility: &EligibilityChecker,
        applicator: &mut RuleApplicator<'_>,
        item: &mut Item<'a>,
        address: &mut Address<'_>,
        rules: &[Rule],
        skip_validation: bool,
        coupon_code: Option<&str>,
    ) -> Result<AppliedRuleIds, ApplyError> {
        // Conditions only read catalog attributes, which application never changes.
        let eligible: Vec<&Rule> = rules
            .iter()
            .filter(|rule| eligibility.is_eligible(rule, item, address, skip_validation))
            .collect();

        applicator.apply_in_order(
            item,
            address,
            eligible.into_iter().map(|rule| (rule, coupon_code)),
        )
    }
}
