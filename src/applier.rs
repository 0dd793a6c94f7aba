//! Rules Applier
//!
//! Entry point for one item's rule pass: filters eligible rules, computes each one's
//! discount, ranks them most-saving first (coupon rules ahead of automatic ones) and applies
//! them in that order. When most-saving sort is disabled for the website the baseline
//! applier runs instead.

use tracing::{debug, trace};

use crate::{
    addresses::Address,
    applicator::{AppliedRuleIds, ApplyError, RuleApplicator},
    baseline::{BaselineApplier, InOrderApplier},
    calculators::{CalculatorRegistry, discount_data},
    config::SortingConfig,
    corrections::{Corrections, DiscountCorrections},
    eligibility::EligibilityChecker,
    events::{DiscountObserver, EventDispatcher},
    host::RulesHost,
    items::Item,
    ranking::{Partitions, RankingCandidate},
    rules::{Rule, RuleId},
};

/// Applies cart price rules to items.
///
/// One applier serves one totals collection: correction state such as carried rounding
/// remainders lives for as long as the applier does.
#[derive(Debug)]
pub struct RulesApplier {
    config: SortingConfig,
    eligibility: EligibilityChecker,
    calculators: CalculatorRegistry,
    events: EventDispatcher,
    corrections: Box<dyn Corrections>,
    baseline: Box<dyn BaselineApplier>,
}

impl RulesApplier {
    /// Create an applier with default eligibility, corrections and baseline.
    pub fn new(config: SortingConfig, calculators: CalculatorRegistry) -> Self {
        Self {
            config,
            eligibility: EligibilityChecker::default(),
            calculators,
            events: EventDispatcher::new(),
            corrections: Box::new(DiscountCorrections::new()),
            baseline: Box::new(InOrderApplier),
        }
    }

    /// Replace the eligibility checker.
    #[must_use]
    pub fn with_eligibility(mut self, eligibility: EligibilityChecker) -> Self {
        self.eligibility = eligibility;
        self
    }

    /// Replace the corrections.
    #[must_use]
    pub fn with_corrections(mut self, corrections: impl Corrections + 'static) -> Self {
        self.corrections = Box::new(corrections);
        self
    }

    /// Replace the baseline applier.
    #[must_use]
    pub fn with_baseline(mut self, baseline: impl BaselineApplier + 'static) -> Self {
        self.baseline = Box::new(baseline);
        self
    }

    /// Subscribe an observer to rule processing events.
    #[must_use]
    pub fn with_observer(mut self, observer: impl DiscountObserver + 'static) -> Self {
        self.events.subscribe(observer);
        self
    }

    /// Sorting configuration
    pub fn config(&self) -> &SortingConfig {
        &self.config
    }

    /// Apply `rules` to `item`, returning the ids of the rules applied.
    ///
    /// # Errors
    ///
    /// Returns an [`ApplyError`] if a rule's action has no calculator or a calculation or
    /// correction fails. Nothing is retried.
    #[tracing::instrument(
        name = "rules.applier.apply_rules",
        skip_all,
        fields(sku = %item.sku(), rules = rules.len(), skip_validation)
    )]
    pub fn apply_rules<'a>(
        &mut self,
        item: &mut Item<'a>,
        address: &mut Address<'_>,
        rules: &[Rule],
        skip_validation: bool,
        coupon_code: Option<&str>,
        host: &mut dyn RulesHost,
    ) -> Result<AppliedRuleIds, ApplyError> {
        let Self {
            config,
            eligibility,
            calculators,
            events,
            corrections,
            baseline,
        } = self;

        if !config.use_most_saving_sort(address.quote().website) {
            debug!("most saving sort disabled, applying rules in given order");

            let mut applicator =
                RuleApplicator::new(calculators, events, corrections.as_mut(), host);

            return baseline.apply_rules(
                eligibility,
                &mut applicator,
                item,
                address,
                rules,
                skip_validation,
                coupon_code,
            );
        }

        let mut partitions = Partitions::new();

        for rule in rules {
            if !eligibility.is_eligible(rule, item, address, skip_validation) {
                trace!(rule_id = %rule.id, "rule not eligible");
                continue;
            }

            let discount = discount_data(calculators, item, rule)?;

            partitions.push(RankingCandidate::new(rule, coupon_code, discount));
        }

        let ranked = partitions.into_ranked();

        debug!(
            order = ?ranked.iter().map(|c| c.rule.id).collect::<Vec<RuleId>>(),
            "ranked rules by most saving"
        );

        RuleApplicator::new(calculators, events, corrections.as_mut(), host).apply_ranked(
            item,
            address,
            &ranked,
        )
    }
}
