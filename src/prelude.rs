//! Promo Ranker prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    addresses::{Address, CustomerGroupId, Quote, StoreId, WebsiteId},
    applicator::{AppliedRuleIds, ApplyError, RuleApplicator},
    applier::RulesApplier,
    baseline::{BaselineApplier, InOrderApplier},
    breakdown::{BreakdownError, BreakdownReport},
    calculators::{Calculator, CalculatorError, CalculatorRegistry, row_totals},
    config::{ConfigError, SortingConfig},
    corrections::{CorrectionError, Corrections, DiscountCorrections},
    discounts::{DiscountAggregator, DiscountData, RuleDiscount},
    eligibility::{
        ChildValidationPolicy, EligibilityChecker, ProductTypeChildValidation, RuleScope,
        ScopeEligibility,
    },
    events::{DiscountObserver, EventDispatcher, ValidatorProcessEvent},
    fixtures::{Fixture, FixtureError},
    host::{AddressRecorder, RulesHost},
    items::{Item, ProductType},
    ranking::{Partitions, RankingCandidate, rank},
    rules::{
        CouponType, Rule, RuleId, SimpleAction,
        conditions::{BoolOp, Condition, ConditionTree},
    },
    tags::Tags,
};
