//! Rule Conditions
//!
//! Nested boolean condition trees a rule's actions validate items against.

use rust_decimal::Decimal;
use serde::Deserialize;
use smallvec::{SmallVec, smallvec};

use crate::{
    items::{Item, ProductType},
    tags::Tags,
};

/// How the conditions of a tree combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoolOp {
    /// Every condition must hold.
    #[default]
    And,

    /// At least one condition must hold.
    Or,
}

/// A single condition over an item.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    /// Item carries every listed tag.
    HasAll(Tags),

    /// Item carries at least one listed tag.
    HasAny(Tags),

    /// Item carries none of the listed tags.
    HasNone(Tags),

    /// Item quantity is at least this much.
    MinQuantity(Decimal),

    /// Item unit price (quote currency) is at least this amount.
    MinPrice(Decimal),

    /// Item is one of these product types.
    ProductType(SmallVec<[ProductType; 2]>),

    /// Nested tree.
    Group(Box<ConditionTree>),
}

/// Condition tree. An empty tree matches every item.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct ConditionTree {
    /// How `conditions` combine
    #[serde(default)]
    pub op: BoolOp,

    /// Child conditions
    #[serde(default)]
    pub conditions: SmallVec<[Condition; 2]>,
}

impl ConditionTree {
    /// Create a tree from an operator and conditions.
    #[must_use]
    pub fn new(op: BoolOp, conditions: SmallVec<[Condition; 2]>) -> Self {
        Self { op, conditions }
    }

    /// A tree that matches every item.
    #[must_use]
    pub fn match_all() -> Self {
        Self::default()
    }

    /// A tree that matches items carrying any of `tags`.
    #[must_use]
    pub fn any_tag(tags: Tags) -> Self {
        if tags.is_empty() {
            return Self::match_all();
        }

        Self::new(BoolOp::And, smallvec![Condition::HasAny(tags)])
    }

    /// Validate an item against the tree.
    pub fn validate(&self, item: &Item<'_>) -> bool {
        if self.conditions.is_empty() {
            return true;
        }

        match self.op {
            BoolOp::And => self.conditions.iter().all(|c| c.validate(item)),
            BoolOp::Or => self.conditions.iter().any(|c| c.validate(item)),
        }
    }
}

impl Condition {
    fn validate(&self, item: &Item<'_>) -> bool {
        match self {
            Self::HasAll(tags) => item.tags().contains_all(tags),
            Self::HasAny(tags) => !tags.is_empty() && item.tags().intersects(tags),
            Self::HasNone(tags) => !item.tags().intersects(tags),
            Self::MinQuantity(qty) => item.quantity() >= *qty,
            Self::MinPrice(amount) => item.price().amount() >= amount,
            Self::ProductType(types) => types.contains(&item.product_type()),
            Self::Group(tree) => tree.validate(item),
        }
    }
}
