//! Rules
//!
//! Cart price rule definitions: coupon classification, the simple action selecting a
//! calculator, scoping and the condition tree the rule's actions validate items against.

use std::fmt;

use jiff::civil::Date;
use rust_decimal::Decimal;
use rustc_hash::FxHashMap;
use serde::Deserialize;
use smallvec::SmallVec;

use crate::addresses::{CustomerGroupId, StoreId, WebsiteId};

pub mod conditions;

use conditions::ConditionTree;

/// Label used when a rule has no store label.
pub const DEFAULT_LABEL: &str = "Discount";

/// Rule identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(transparent)]
pub struct RuleId(pub u32);

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Whether a rule needs a customer-entered code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CouponType {
    /// Applied automatically when conditions match
    #[default]
    NoCoupon,

    /// One specific code
    SpecificCoupon,

    /// Generated code pool
    Auto,
}

impl CouponType {
    /// Whether the rule is coupon-bearing.
    pub fn has_coupon(self) -> bool {
        !matches!(self, Self::NoCoupon)
    }
}

/// Discount strategy, used to resolve a calculator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SimpleAction {
    /// Percent of the price off
    ByPercent,

    /// Fixed amount off each unit
    ByFixed,

    /// Fixed amount off the whole cart
    CartFixed,

    /// Buy X, get Y free
    BuyXGetY,

    /// Discount the price to a percent of itself
    ToPercent,

    /// Discount the price to a fixed amount
    ToFixed,
}

impl fmt::Display for SimpleAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::ByPercent => "by_percent",
            Self::ByFixed => "by_fixed",
            Self::CartFixed => "cart_fixed",
            Self::BuyXGetY => "buy_x_get_y",
            Self::ToPercent => "to_percent",
            Self::ToFixed => "to_fixed",
        };

        f.write_str(name)
    }
}

/// A cart price rule.
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    /// Identifier
    pub id: RuleId,

    /// Admin name
    pub name: String,

    /// Optional description, used as a discount description fallback for coupon rules
    pub description: Option<String>,

    /// Whether the rule is enabled
    pub is_active: bool,

    /// Coupon classification
    pub coupon_type: CouponType,

    /// Action selecting the calculator
    pub simple_action: SimpleAction,

    /// Action parameter (percent or amount, depending on the action)
    pub discount_amount: Decimal,

    /// Maximum quantity the discount applies to; `None` means unlimited
    pub discount_qty: Option<Decimal>,

    /// Step for buy X get Y style actions
    pub discount_step: u32,

    /// Halt processing of lower-ranked rules once applied
    pub stop_rules_processing: bool,

    /// Store-scoped labels; `StoreId(0)` is the admin default
    pub store_labels: FxHashMap<StoreId, String>,

    /// Websites the rule runs on; empty means all
    pub websites: SmallVec<[WebsiteId; 4]>,

    /// Customer groups the rule runs for; empty means all
    pub customer_groups: SmallVec<[CustomerGroupId; 4]>,

    /// First day the rule is active (inclusive)
    pub from_date: Option<Date>,

    /// Last day the rule is active (inclusive)
    pub to_date: Option<Date>,

    /// Conditions items must satisfy for the action to apply
    pub actions: ConditionTree,
}

impl Rule {
    /// Create an active, unscoped, automatic rule matching every item.
    pub fn new(id: RuleId, name: impl Into<String>, simple_action: SimpleAction) -> Self {
        Self {
            id,
            name: name.into(),
            description: None,
            is_active: true,
            coupon_type: CouponType::NoCoupon,
            simple_action,
            discount_amount: Decimal::ZERO,
            discount_qty: None,
            discount_step: 0,
            stop_rules_processing: false,
            store_labels: FxHashMap::default(),
            websites: SmallVec::new(),
            customer_groups: SmallVec::new(),
            from_date: None,
            to_date: None,
            actions: ConditionTree::match_all(),
        }
    }

    /// Set the coupon type.
    #[must_use]
    pub fn with_coupon_type(mut self, coupon_type: CouponType) -> Self {
        self.coupon_type = coupon_type;
        self
    }

    /// Set the action parameter.
    #[must_use]
    pub fn with_discount_amount(mut self, amount: Decimal) -> Self {
        self.discount_amount = amount;
        self
    }

    /// Set the stop-processing flag.
    #[must_use]
    pub fn stopping(mut self, stop: bool) -> Self {
        self.stop_rules_processing = stop;
        self
    }

    /// Set the action conditions.
    #[must_use]
    pub fn with_actions(mut self, actions: ConditionTree) -> Self {
        self.actions = actions;
        self
    }

    /// Add a store label.
    #[must_use]
    pub fn with_label(mut self, store: StoreId, label: impl Into<String>) -> Self {
        self.store_labels.insert(store, label.into());
        self
    }

    /// Whether the rule requires a coupon.
    pub fn has_coupon(&self) -> bool {
        self.coupon_type.has_coupon()
    }

    /// Label for `store`, falling back to the admin default label. Blank labels count as
    /// missing.
    pub fn store_label(&self, store: StoreId) -> Option<&str> {
        [store, StoreId(0)]
            .iter()
            .filter_map(|id| self.store_labels.get(id))
            .map(String::as_str)
            .find(|label| !label.trim().is_empty())
    }

    /// Label shown in the discount breakdown.
    pub fn breakdown_label(&self, store: StoreId) -> &str {
        self.store_label(store).unwrap_or(DEFAULT_LABEL)
    }
}
