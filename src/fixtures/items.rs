//! Item Fixtures

use rust_decimal::{Decimal, prelude::ToPrimitive};
use rusty_money::{
    Money,
    iso::{Currency, EUR, GBP, USD},
};
use serde::Deserialize;

use crate::{
    fixtures::FixtureError,
    items::{Item, ProductType},
    tags::Tags,
};

/// Wrapper for items in YAML
#[derive(Debug, Deserialize)]
pub struct ItemsFixture {
    /// Items in cart order
    pub items: Vec<ItemFixture>,
}

/// Item Fixture
#[derive(Debug, Deserialize)]
pub struct ItemFixture {
    /// Lookup key
    pub key: String,

    /// Product SKU
    pub sku: String,

    /// Quantity in the cart
    #[serde(default = "one")]
    pub quantity: Decimal,

    /// Unit price (e.g., "49.99 GBP")
    pub price: String,

    /// Unit price in base currency; defaults to `price`
    #[serde(default)]
    pub base_price: Option<String>,

    /// Product type
    #[serde(default)]
    pub product_type: ProductType,

    /// Product tags
    #[serde(default)]
    pub tags: Vec<String>,

    /// Discount percent grouping rounding remainders
    #[serde(default)]
    pub discount_percent: Option<Decimal>,

    /// Whether the item records a per-rule breakdown
    #[serde(default = "yes")]
    pub breakdown: bool,

    /// Child items
    #[serde(default)]
    pub children: Vec<ItemFixture>,
}

fn one() -> Decimal {
    Decimal::ONE
}

fn yes() -> bool {
    true
}

impl ItemFixture {
    /// Currency of the item's price.
    ///
    /// # Errors
    ///
    /// Returns an error if the price cannot be parsed.
    pub fn currency(&self) -> Result<&'static Currency, FixtureError> {
        Ok(parse_price(&self.price)?.currency())
    }
}

impl TryFrom<ItemFixture> for Item<'static> {
    type Error = FixtureError;

    fn try_from(fixture: ItemFixture) -> Result<Self, Self::Error> {
        let price = parse_price(&fixture.price)?;
        let base_price = fixture
            .base_price
            .as_deref()
            .map_or(Ok(price), parse_price)?;

        let children = fixture
            .children
            .into_iter()
            .map(Item::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        let mut item = Item::with_base_price(fixture.sku, fixture.quantity, price, base_price)
            .product_type_of(fixture.product_type)
            .tagged(Tags::from(fixture.tags))
            .with_children(children);

        if let Some(percent) = fixture.discount_percent {
            item = item.with_discount_percent(percent);
        }

        if !fixture.breakdown {
            item = item.without_breakdown();
        }

        Ok(item)
    }
}

/// Parse price string (e.g., "2.99 GBP") into money
///
/// # Errors
///
/// Returns an error if the string is not in the format "AMOUNT CURRENCY", if the amount is
/// not a decimal with at most the currency's precision, or if the currency code is not
/// recognized.
pub fn parse_price(s: &str) -> Result<Money<'static, Currency>, FixtureError> {
    let mut parts = s.split_whitespace();

    let (Some(amount), Some(code), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(FixtureError::InvalidPrice(format!(
            "Expected format 'AMOUNT CURRENCY', got: {s}"
        )));
    };

    let amount = amount
        .parse::<Decimal>()
        .map_err(|_err| FixtureError::InvalidPrice(s.to_string()))?;

    let currency = match code {
        "GBP" => GBP,
        "USD" => USD,
        "EUR" => EUR,
        _ => return Err(FixtureError::UnknownCurrency(code.to_string())),
    };

    if amount.scale() > currency.exponent || amount.to_i64().is_none() {
        return Err(FixtureError::InvalidPrice(s.to_string()));
    }

    Ok(Money::from_decimal(amount, currency))
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn parse_price_reads_amount_and_currency() -> TestResult {
        let price = parse_price("2.99 GBP")?;

        assert_eq!(price.to_minor_units(), 299);
        assert_eq!(price.currency(), GBP);
        assert_eq!(parse_price("10 EUR")?.to_minor_units(), 1000);

        Ok(())
    }

    #[test]
    fn parse_price_rejects_bad_input() {
        assert!(matches!(
            parse_price("2.99"),
            Err(FixtureError::InvalidPrice(_))
        ));
        assert!(matches!(
            parse_price("abc GBP"),
            Err(FixtureError::InvalidPrice(_))
        ));
        assert!(matches!(
            parse_price("1.999 GBP"),
            Err(FixtureError::InvalidPrice(_))
        ));
        assert!(matches!(
            parse_price("1.00 XYZ"),
            Err(FixtureError::UnknownCurrency(code)) if code == "XYZ"
        ));
    }

    #[test]
    fn item_fixture_builds_nested_item() -> TestResult {
        let fixture: ItemFixture = serde_norway::from_str(
            r#"
key: bundle
sku: BUNDLE-1
quantity: 2
price: "30.00 GBP"
product_type: bundle
tags: [gift]
breakdown: false
children:
  - key: mug
    sku: MUG-1
    price: "10.00 GBP"
    tags: [kitchen]
"#,
        )?;

        let item = Item::try_from(fixture)?;

        assert_eq!(item.sku(), "BUNDLE-1");
        assert_eq!(item.quantity(), Decimal::from(2));
        assert_eq!(item.product_type(), ProductType::Bundle);
        assert!(!item.supports_breakdown());
        assert_eq!(item.children().len(), 1);
        assert!(
            item.children()
                .iter()
                .all(|child| child.tags().contains("kitchen"))
        );

        Ok(())
    }
}
