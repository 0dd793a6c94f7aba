//! Rule Fixtures

use jiff::civil::Date;
use rust_decimal::Decimal;
use rustc_hash::FxHashMap;
use serde::Deserialize;
use smallvec::SmallVec;

use crate::{
    addresses::{CustomerGroupId, StoreId, WebsiteId},
    rules::{CouponType, Rule, RuleId, SimpleAction, conditions::ConditionTree},
};

/// Wrapper for rules in YAML
#[derive(Debug, Deserialize)]
pub struct RulesFixture {
    /// Rules in their configured order
    pub rules: Vec<RuleFixture>,
}

/// Rule Fixture
#[derive(Debug, Deserialize)]
pub struct RuleFixture {
    /// Lookup key
    pub key: String,

    /// Rule id
    pub id: RuleId,

    /// Admin name
    pub name: String,

    /// Description
    #[serde(default)]
    pub description: Option<String>,

    /// Whether the rule is enabled
    #[serde(default = "active")]
    pub is_active: bool,

    /// Coupon classification
    #[serde(default)]
    pub coupon_type: CouponType,

    /// Action key, e.g. `by_percent`
    pub simple_action: SimpleAction,

    /// Action parameter
    #[serde(default)]
    pub discount_amount: Decimal,

    /// Maximum discounted quantity
    #[serde(default)]
    pub discount_qty: Option<Decimal>,

    /// Buy X get Y step
    #[serde(default)]
    pub discount_step: u32,

    /// Stop processing lower-ranked rules
    #[serde(default)]
    pub stop_rules_processing: bool,

    /// Labels keyed by store id
    #[serde(default)]
    pub labels: FxHashMap<StoreId, String>,

    /// Websites the rule runs on
    #[serde(default)]
    pub websites: SmallVec<[WebsiteId; 4]>,

    /// Customer groups the rule runs for
    #[serde(default)]
    pub customer_groups: SmallVec<[CustomerGroupId; 4]>,

    /// First active day
    #[serde(default)]
    pub from_date: Option<Date>,

    /// Last active day
    #[serde(default)]
    pub to_date: Option<Date>,

    /// Action conditions
    #[serde(default)]
    pub actions: ConditionTree,
}

fn active() -> bool {
    true
}

impl From<RuleFixture> for Rule {
    fn from(fixture: RuleFixture) -> Self {
        let mut rule = Rule::new(fixture.id, fixture.name, fixture.simple_action)
            .with_coupon_type(fixture.coupon_type)
            .with_discount_amount(fixture.discount_amount)
            .stopping(fixture.stop_rules_processing)
            .with_actions(fixture.actions);

        rule.description = fixture.description;
        rule.is_active = fixture.is_active;
        rule.discount_qty = fixture.discount_qty;
        rule.discount_step = fixture.discount_step;
        rule.store_labels = fixture.labels;
        rule.websites = fixture.websites;
        rule.customer_groups = fixture.customer_groups;
        rule.from_date = fixture.from_date;
        rule.to_date = fixture.to_date;

        rule
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn rule_fixture_maps_every_field() -> TestResult {
        let fixture: RuleFixture = serde_norway::from_str(
            r#"
key: summer
id: 7
name: Summer Sale
description: Summer coupon
coupon_type: specific_coupon
simple_action: by_percent
discount_amount: "15"
discount_qty: 3
stop_rules_processing: true
labels:
  0: Summer
  1: Summer (UK)
websites: [1, 2]
customer_groups: [0]
from_date: 2026-06-01
to_date: 2026-08-31
actions:
  conditions:
    - has_any: [summer, outdoor]
"#,
        )?;

        let rule = Rule::from(fixture);

        assert_eq!(rule.id, RuleId(7));
        assert!(rule.has_coupon());
        assert!(rule.stop_rules_processing);
        assert_eq!(rule.simple_action, SimpleAction::ByPercent);
        assert_eq!(rule.discount_amount, Decimal::from(15));
        assert_eq!(rule.discount_qty, Some(Decimal::from(3)));
        assert_eq!(rule.store_label(StoreId(1)), Some("Summer (UK)"));
        assert_eq!(rule.store_label(StoreId(4)), Some("Summer"));
        assert_eq!(rule.websites.as_slice(), &[WebsiteId(1), WebsiteId(2)]);
        assert_eq!(rule.from_date, Some(Date::constant(2026, 6, 1)));
        assert_eq!(rule.actions.conditions.len(), 1);

        Ok(())
    }

    #[test]
    fn rule_fixture_defaults_to_active_automatic_rule() -> TestResult {
        let fixture: RuleFixture = serde_norway::from_str(
            "key: plain\nid: 1\nname: Plain\nsimple_action: by_fixed\n",
        )?;

        let rule = Rule::from(fixture);

        assert!(rule.is_active);
        assert!(!rule.has_coupon());
        assert!(rule.actions.conditions.is_empty());
        assert_eq!(rule.discount_qty, None);

        Ok(())
    }
}
