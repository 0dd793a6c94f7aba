//! Integration tests for the in-order baseline used when most-saving sort is disabled.

mod common;

use rust_decimal::Decimal;
use rusty_money::{Money, iso::GBP};
use testresult::TestResult;

use promo_ranker::prelude::*;

use common::{calculators, quote};

/// A single GBP item with the given tags.
fn item(sku: &str, minor: i64, tags: &[&str]) -> Item<'static> {
    Item::new(sku, Decimal::ONE, Money::from_minor(minor, GBP)).tagged(Tags::from_strs(tags))
}

/// Automatic fixed-amount rule.
fn fixed(id: u32, pounds: i64) -> Rule {
    Rule::new(RuleId(id), format!("£{pounds} off"), SimpleAction::ByFixed)
        .with_discount_amount(Decimal::from(pounds))
}

/// Coupon fixed-amount rule.
fn coupon_fixed(id: u32, pounds: i64) -> Rule {
    fixed(id, pounds).with_coupon_type(CouponType::SpecificCoupon)
}

/// Rule ids of the item's breakdown entries, in order.
fn breakdown_ids(item: &Item<'_>) -> Vec<RuleId> {
    item.discounts()
        .unwrap_or_default()
        .iter()
        .map(|entry| entry.rule_id)
        .collect()
}

fn rules() -> Vec<Rule> {
    vec![fixed(1, 5), coupon_fixed(2, 3), fixed(3, 10), fixed(4, 1)]
}

fn apply(
    config: SortingConfig,
    rules: &[Rule],
) -> Result<(AppliedRuleIds, Vec<RuleId>), ApplyError> {
    let quote = quote();
    let mut address = Address::new(&quote);
    let mut shoes = item("SHOE", 10_000, &["shoes"]);

    let applied = RulesApplier::new(config, calculators()).apply_rules(
        &mut shoes,
        &mut address,
        rules,
        false,
        Some("CODE"),
        &mut AddressRecorder,
    )?;

    Ok((applied, breakdown_ids(&shoes)))
}

#[test]
fn disabled_sort_applies_rules_in_given_order() -> TestResult {
    let (applied, breakdown) = apply(SortingConfig::disabled(), &rules())?;

    let expected = vec![RuleId(1), RuleId(2), RuleId(3), RuleId(4)];

    assert_eq!(applied.as_slice(), expected.as_slice());
    assert_eq!(breakdown, expected);

    Ok(())
}

#[test]
fn unset_flag_behaves_like_disabled() -> TestResult {
    let (unset, _) = apply(SortingConfig::default(), &rules())?;
    let (disabled, _) = apply(SortingConfig::disabled(), &rules())?;

    assert_eq!(unset, disabled);

    Ok(())
}

#[test]
fn enabled_sort_reorders_the_same_rules() -> TestResult {
    let (applied, _) = apply(SortingConfig::enabled(), &rules())?;

    assert_eq!(
        applied.as_slice(),
        &[RuleId(2), RuleId(3), RuleId(1), RuleId(4)]
    );

    Ok(())
}

#[test]
fn website_override_selects_baseline() -> TestResult {
    let config = SortingConfig::enabled().with_website(WebsiteId(1), false);
    let (applied, _) = apply(config, &rules())?;

    assert_eq!(
        applied.as_slice(),
        &[RuleId(1), RuleId(2), RuleId(3), RuleId(4)]
    );

    Ok(())
}

#[test]
fn baseline_honors_stop_processing_and_eligibility() -> TestResult {
    let mut inactive = fixed(5, 50);
    inactive.is_active = false;

    let rules = vec![inactive, fixed(1, 5), fixed(2, 10).stopping(true), fixed(3, 20)];

    let (applied, breakdown) = apply(SortingConfig::disabled(), &rules)?;

    assert_eq!(applied.as_slice(), &[RuleId(1), RuleId(2)]);
    assert_eq!(breakdown, vec![RuleId(1), RuleId(2)]);

    Ok(())
}

#[derive(Debug, Default)]
struct Reversed;

impl BaselineApplier for Reversed {
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
        let eligible: Vec<&Rule> = rules
            .iter()
            .rev()
            .filter(|rule| eligibility.is_eligible(rule, item, address, skip_validation))
            .collect();

        applicator.apply_in_order(
            item,
            address,
            eligible.into_iter().map(|rule| (rule, coupon_code)),
        )
    }
}

#[test]
fn custom_baseline_replaces_in_order_applier() -> TestResult {
    let quote = quote();
    let mut address = Address::new(&quote);
    let mut shoes = item("SHOE", 10_000, &["shoes"]);

    let applied = RulesApplier::new(SortingConfig::disabled(), calculators())
        .with_baseline(Reversed)
        .apply_rules(
            &mut shoes,
            &mut address,
            &[fixed(1, 5), fixed(2, 10)],
            false,
            None,
            &mut AddressRecorder,
        )?;

    assert_eq!(applied.as_slice(), &[RuleId(2), RuleId(1)]);

    Ok(())
}
