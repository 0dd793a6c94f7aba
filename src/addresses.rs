//! Addresses

use jiff::civil::Date;
use rustc_hash::FxHashMap;
use serde::Deserialize;

use crate::rules::RuleId;

/// Store view identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(transparent)]
pub struct StoreId(pub u32);

/// Website identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(transparent)]
pub struct WebsiteId(pub u32);

/// Customer group identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(transparent)]
pub struct CustomerGroupId(pub u32);

/// The cart an address belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quote {
    /// Store view the cart is placed in
    pub store: StoreId,

    /// Website owning the store view
    pub website: WebsiteId,

    /// Customer group of the shopper
    pub customer_group: CustomerGroupId,

    /// Store-local date the totals are collected for
    pub date: Date,
}

/// Shipping or billing address the item totals are collected against.
#[derive(Debug, Clone)]
pub struct Address<'q> {
    quote: &'q Quote,
    coupon_code: Option<String>,
    discount_descriptions: FxHashMap<RuleId, String>,
    description_order: Vec<RuleId>,
}

impl<'q> Address<'q> {
    /// Create an address for the quote.
    pub fn new(quote: &'q Quote) -> Self {
        Self {
            quote,
            coupon_code: None,
            discount_descriptions: FxHashMap::default(),
            description_order: Vec::new(),
        }
    }

    /// The owning quote
    pub fn quote(&self) -> &'q Quote {
        self.quote
    }

    /// Store of the owning quote
    pub fn store(&self) -> StoreId {
        self.quote.store
    }

    /// Coupon code recorded against the address, if any.
    pub fn coupon_code(&self) -> Option<&str> {
        self.coupon_code.as_deref()
    }

    /// Record the coupon code used by a rule.
    pub fn set_coupon_code(&mut self, code: impl Into<String>) {
        self.coupon_code = Some(code.into());
    }

    /// Record a rule's discount description. A rule keeps its first position when re-added.
    pub fn add_discount_description(&mut self, rule_id: RuleId, description: impl Into<String>) {
        if self
            .discount_descriptions
            .insert(rule_id, description.into())
            .is_none()
        {
            self.description_order.push(rule_id);
        }
    }

    /// Descriptions in the order the rules were first recorded.
    pub fn discount_descriptions(&self) -> impl Iterator<Item = (RuleId, &str)> {
        self.description_order.iter().filter_map(|id| {
            self.discount_descriptions
                .get(id)
                .map(|description| (*id, description.as_str()))
        })
    }

    /// Descriptions joined for display, e.g. `"Summer Sale, Members"`.
    pub fn discount_description(&self) -> String {
        self.discount_descriptions()
            .map(|(_, description)| description)
            .collect::<Vec<_>>()
            .join(", ")
    }
}
