//! Items

use rust_decimal::Decimal;
use rusty_money::{Money, iso::Currency};
use serde::Deserialize;

use crate::{
    discounts::{DiscountData, RuleDiscount},
    tags::Tags,
};

/// Catalog product type of a cart line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductType {
    /// Plain product
    #[default]
    Simple,

    /// Parent of a chosen variant
    Configurable,

    /// Bundle of child products priced together
    Bundle,

    /// Product without shipping
    Virtual,

    /// Downloadable product
    Downloadable,
}

/// A cart line item.
///
/// Holds the discount figures written by the last applied rule and, when the item supports
/// it, the ordered breakdown of every rule applied in the current pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Item<'a> {
    sku: String,
    product_type: ProductType,
    quantity: Decimal,
    price: Money<'a, Currency>,
    base_price: Money<'a, Currency>,
    tags: Tags,
    discount_percent: Option<Decimal>,
    children: Vec<Item<'a>>,
    discount: DiscountData<'a>,
    discounts: Option<Vec<RuleDiscount<'a>>>,
}

impl<'a> Item<'a> {
    /// Creates an item whose base price equals its price.
    pub fn new(sku: impl Into<String>, quantity: Decimal, price: Money<'a, Currency>) -> Self {
        Self::with_base_price(sku, quantity, price, price)
    }

    /// Creates an item with separate quote and base currency prices.
    pub fn with_base_price(
        sku: impl Into<String>,
        quantity: Decimal,
        price: Money<'a, Currency>,
        base_price: Money<'a, Currency>,
    ) -> Self {
        Self {
            sku: sku.into(),
            product_type: ProductType::Simple,
            quantity,
            price,
            base_price,
            tags: Tags::empty(),
            discount_percent: None,
            children: Vec::new(),
            discount: DiscountData::zero(price.currency(), base_price.currency()),
            discounts: Some(Vec::new()),
        }
    }

    /// Set the product type.
    #[must_use]
    pub fn product_type_of(mut self, product_type: ProductType) -> Self {
        self.product_type = product_type;
        self
    }

    /// Set the item's tags.
    #[must_use]
    pub fn tagged(mut self, tags: Tags) -> Self {
        self.tags = tags;
        self
    }

    /// Set the discount percent used to group rounding remainders.
    #[must_use]
    pub fn with_discount_percent(mut self, percent: Decimal) -> Self {
        self.discount_percent = Some(percent);
        self
    }

    /// Attach child items.
    #[must_use]
    pub fn with_children(mut self, children: Vec<Item<'a>>) -> Self {
        self.children = children;
        self
    }

    /// Mark the item as unable to carry a discount breakdown.
    #[must_use]
    pub fn without_breakdown(mut self) -> Self {
        self.discounts = None;
        self
    }

    /// SKU of the line
    pub fn sku(&self) -> &str {
        &self.sku
    }

    /// Product type of the line
    pub fn product_type(&self) -> ProductType {
        self.product_type
    }

    /// Quantity on the line
    pub fn quantity(&self) -> Decimal {
        self.quantity
    }

    /// Unit price in the quote currency
    pub fn price(&self) -> &Money<'a, Currency> {
        &self.price
    }

    /// Unit price in the base currency
    pub fn base_price(&self) -> &Money<'a, Currency> {
        &self.base_price
    }

    /// Tags matched by rule conditions
    pub fn tags(&self) -> &Tags {
        &self.tags
    }

    /// Discount percent, if a percentage rule set one
    pub fn discount_percent(&self) -> Option<Decimal> {
        self.discount_percent
    }

    /// Child items (bundle options, configurable variants)
    pub fn children(&self) -> &[Item<'a>] {
        &self.children
    }

    /// Whether the item has any children.
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Discount figures currently written on the item.
    pub fn discount(&self) -> &DiscountData<'a> {
        &self.discount
    }

    /// Overwrite the item's discount figures.
    pub fn set_discount(&mut self, discount: DiscountData<'a>) {
        self.discount = discount;
    }

    /// Whether a discount breakdown can be attached.
    pub fn supports_breakdown(&self) -> bool {
        self.discounts.is_some()
    }

    /// The attached discount breakdown, if supported.
    pub fn discounts(&self) -> Option<&[RuleDiscount<'a>]> {
        self.discounts.as_deref()
    }

    /// Replace the attached breakdown. Does nothing when breakdowns are unsupported.
    pub fn set_discounts(&mut self, entries: &[RuleDiscount<'a>]) {
        if let Some(discounts) = self.discounts.as_mut() {
            discounts.clear();
            discounts.extend_from_slice(entries);
        }
    }

    /// Unit price multiplied by `qty`, in the quote currency. `None` on overflow.
    pub fn price_for(&self, qty: Decimal) -> Option<Money<'a, Currency>> {
        times(self.price, qty)
    }

    /// Unit base price multiplied by `qty`, in the base currency. `None` on overflow.
    pub fn base_price_for(&self, qty: Decimal) -> Option<Money<'a, Currency>> {
        times(self.base_price, qty)
    }
}

fn times<'a>(unit: Money<'a, Currency>, qty: Decimal) -> Option<Money<'a, Currency>> {
    let amount = unit.amount().checked_mul(qty)?;

    Some(Money::from_decimal(amount, unit.currency()))
}
