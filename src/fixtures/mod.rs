//! Fixtures

use std::{fs, path::PathBuf};

use rustc_hash::FxHashMap;
use rusty_money::iso::Currency;
use serde::de::DeserializeOwned;
use slotmap::{SlotMap, new_key_type};
use thiserror::Error;

use crate::{
    config::{ConfigError, SortingConfig},
    fixtures::{items::ItemsFixture, rules::RulesFixture},
    items::Item,
    rules::Rule,
};

pub mod items;
pub mod rules;

new_key_type! {
    /// Fixture item key
    pub struct ItemKey;

    /// Fixture rule key
    pub struct RuleKey;
}

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("Failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Configuration error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Invalid price format
    #[error("Invalid price format: {0}")]
    InvalidPrice(String),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// Item not found
    #[error("Item not found: {0}")]
    ItemNotFound(String),

    /// Rule not found
    #[error("Rule not found: {0}")]
    RuleNotFound(String),

    /// Key defined twice
    #[error("Duplicate fixture key: {0}")]
    DuplicateKey(String),

    /// Currency mismatch between items
    #[error("Currency mismatch: expected {0}, found {1}")]
    CurrencyMismatch(String, String),

    /// No items loaded yet
    #[error("No items loaded yet; currency unknown")]
    NoCurrency,
}

/// Fixture
///
/// Items, rules and sorting configuration loaded from `<base>/{items,rules,config}/<name>.yml`.
#[derive(Debug)]
pub struct Fixture {
    /// Base path for fixture files
    base_path: PathBuf,

    items: SlotMap<ItemKey, Item<'static>>,
    rules: SlotMap<RuleKey, Rule>,

    /// String key -> `SlotMap` key mappings for lookups
    item_keys: FxHashMap<String, ItemKey>,
    rule_keys: FxHashMap<String, RuleKey>,

    /// Load order, which is cart order for items and configured order for rules
    item_order: Vec<ItemKey>,
    rule_order: Vec<RuleKey>,

    config: Option<SortingConfig>,

    /// Currency for the fixture set
    currency: Option<&'static Currency>,
}

impl Fixture {
    /// Create a new empty fixture with default base path
    pub fn new() -> Self {
        Self::with_base_path("./fixtures")
    }

    /// Create a new empty fixture with custom base path
    pub fn with_base_path(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            items: SlotMap::with_key(),
            rules: SlotMap::with_key(),
            item_keys: FxHashMap::default(),
            rule_keys: FxHashMap::default(),
            item_order: Vec::new(),
            rule_order: Vec::new(),
            config: None,
            currency: None,
        }
    }

    fn read<T: DeserializeOwned>(&self, category: &str, name: &str) -> Result<T, FixtureError> {
        let file_path = self.base_path.join(category).join(format!("{name}.yml"));
        let contents = fs::read_to_string(&file_path)?;

        Ok(serde_norway::from_str(&contents)?)
    }

    /// Load items from a YAML fixture file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, a key repeats, or item
    /// currencies differ.
    pub fn load_items(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let fixture: ItemsFixture = self.read("items", name)?;

        for item_fixture in fixture.items {
            if self.item_keys.contains_key(&item_fixture.key) {
                return Err(FixtureError::DuplicateKey(item_fixture.key));
            }

            let currency = item_fixture.currency()?;

            if let Some(existing_currency) = self.currency {
                if existing_currency != currency {
                    return Err(FixtureError::CurrencyMismatch(
                        existing_currency.iso_alpha_code.to_string(),
                        currency.iso_alpha_code.to_string(),
                    ));
                }
            } else {
                self.currency = Some(currency);
            }

            let key = item_fixture.key.clone();
            let item_key = self.items.insert(Item::try_from(item_fixture)?);

            self.item_keys.insert(key, item_key);
            self.item_order.push(item_key);
        }

        Ok(self)
    }

    /// Load rules from a YAML fixture file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed or a key repeats.
    pub fn load_rules(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let fixture: RulesFixture = self.read("rules", name)?;

        for rule_fixture in fixture.rules {
            if self.rule_keys.contains_key(&rule_fixture.key) {
                return Err(FixtureError::DuplicateKey(rule_fixture.key));
            }

            let key = rule_fixture.key.clone();
            let rule_key = self.rules.insert(Rule::from(rule_fixture));

            self.rule_keys.insert(key, rule_key);
            self.rule_order.push(rule_key);
        }

        Ok(self)
    }

    /// Load sorting configuration from a YAML fixture file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_config(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let path = self.base_path.join("config").join(format!("{name}.yml"));

        self.config = Some(SortingConfig::load(path)?);

        Ok(self)
    }

    /// Load a complete fixture set (items, rules and config with the same name)
    ///
    /// # Errors
    ///
    /// Returns an error if any of the fixture files cannot be loaded.
    pub fn from_set(name: &str) -> Result<Self, FixtureError> {
        let mut fixture = Self::new();

        fixture
            .load_items(name)?
            .load_rules(name)?
            .load_config(name)?;

        Ok(fixture)
    }

    /// Get an item by its string key
    ///
    /// # Errors
    ///
    /// Returns an error if the item is not found.
    pub fn item(&self, key: &str) -> Result<&Item<'static>, FixtureError> {
        self.item_keys
            .get(key)
            .and_then(|item_key| self.items.get(*item_key))
            .ok_or_else(|| FixtureError::ItemNotFound(key.to_string()))
    }

    /// Get a rule by its string key
    ///
    /// # Errors
    ///
    /// Returns an error if the rule is not found.
    pub fn rule(&self, key: &str) -> Result<&Rule, FixtureError> {
        self.rule_keys
            .get(key)
            .and_then(|rule_key| self.rules.get(*rule_key))
            .ok_or_else(|| FixtureError::RuleNotFound(key.to_string()))
    }

    /// Items in cart order
    pub fn items(&self) -> impl Iterator<Item = &Item<'static>> {
        self.item_order
            .iter()
            .filter_map(|item_key| self.items.get(*item_key))
    }

    /// Rules in configured order
    pub fn rules(&self) -> Vec<Rule> {
        self.rule_order
            .iter()
            .filter_map(|rule_key| self.rules.get(*rule_key))
            .cloned()
            .collect()
    }

    /// Rules for the given keys, in the order given
    ///
    /// # Errors
    ///
    /// Returns an error if any key is not found.
    pub fn rules_by_keys(&self, keys: &[&str]) -> Result<Vec<Rule>, FixtureError> {
        keys.iter().map(|key| self.rule(key).cloned()).collect()
    }

    /// Sorting configuration; defaults (disabled) when none was loaded
    pub fn config(&self) -> SortingConfig {
        self.config.clone().unwrap_or_default()
    }

    /// Get the currency
    ///
    /// # Errors
    ///
    /// Returns an error if no items have been loaded yet.
    pub fn currency(&self) -> Result<&'static Currency, FixtureError> {
        self.currency.ok_or(FixtureError::NoCurrency)
    }
}

impl Default for Fixture {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::{fs, path::Path};

    use rust_decimal::Decimal;
    use rusty_money::iso::GBP;
    use tempfile::TempDir;
    use testresult::TestResult;

    use crate::{addresses::WebsiteId, rules::RuleId};

    use super::*;

    fn write_fixture(base: &Path, category: &str, name: &str, contents: &str) -> TestResult {
        let dir = base.join(category);

        fs::create_dir_all(&dir)?;
        fs::write(dir.join(format!("{name}.yml")), contents)?;

        Ok(())
    }

    #[test]
    fn fixture_from_set_loads_items_rules_and_config() -> TestResult {
        let fixture = Fixture::from_set("most_saving")?;

        assert_eq!(fixture.items().count(), 3);
        assert_eq!(fixture.rules().len(), 4);
        assert_eq!(fixture.currency()?, GBP);
        assert!(fixture.config().use_most_saving_sort(WebsiteId(1)));

        let shoes = fixture.item("shoes")?;

        assert_eq!(shoes.price().to_minor_units(), 10000);

        Ok(())
    }

    #[test]
    fn rules_keep_file_order() -> TestResult {
        let dir = TempDir::new()?;

        write_fixture(
            dir.path(),
            "rules",
            "ordered",
            r"
rules:
  - { key: c, id: 3, name: C, simple_action: by_fixed }
  - { key: a, id: 1, name: A, simple_action: by_fixed }
  - { key: b, id: 2, name: B, simple_action: by_percent }
",
        )?;

        let mut fixture = Fixture::with_base_path(dir.path());
        fixture.load_rules("ordered")?;

        let ids: Vec<RuleId> = fixture.rules().iter().map(|rule| rule.id).collect();

        assert_eq!(ids, vec![RuleId(3), RuleId(1), RuleId(2)]);

        let picked: Vec<RuleId> = fixture
            .rules_by_keys(&["b", "c"])?
            .iter()
            .map(|rule| rule.id)
            .collect();

        assert_eq!(picked, vec![RuleId(2), RuleId(3)]);

        Ok(())
    }

    #[test]
    fn mixed_currencies_are_rejected() -> TestResult {
        let dir = TempDir::new()?;

        write_fixture(
            dir.path(),
            "items",
            "mixed",
            r#"
items:
  - { key: a, sku: A, price: "1.00 GBP" }
  - { key: b, sku: B, price: "1.00 USD" }
"#,
        )?;

        let mut fixture = Fixture::with_base_path(dir.path());
        let result = fixture.load_items("mixed");

        assert!(matches!(
            result,
            Err(FixtureError::CurrencyMismatch(expected, found)) if expected == "GBP" && found == "USD"
        ));

        Ok(())
    }

    #[test]
    fn duplicate_keys_are_rejected() -> TestResult {
        let dir = TempDir::new()?;

        write_fixture(
            dir.path(),
            "items",
            "dupes",
            r#"
items:
  - { key: a, sku: A, price: "1.00 GBP" }
  - { key: a, sku: B, price: "2.00 GBP", quantity: 3 }
"#,
        )?;

        let mut fixture = Fixture::with_base_path(dir.path());

        assert!(matches!(
            fixture.load_items("dupes"),
            Err(FixtureError::DuplicateKey(key)) if key == "a"
        ));
        assert_eq!(
            fixture.item("a")?.quantity(),
            Decimal::ONE,
            "first definition is kept"
        );

        Ok(())
    }

    #[test]
    fn missing_lookups_return_errors() {
        let fixture = Fixture::new();

        assert!(matches!(
            fixture.item("nope"),
            Err(FixtureError::ItemNotFound(_))
        ));
        assert!(matches!(
            fixture.rule("nope"),
            Err(FixtureError::RuleNotFound(_))
        ));
        assert!(matches!(fixture.currency(), Err(FixtureError::NoCurrency)));
        assert!(!fixture.config().use_most_saving_sort(WebsiteId(1)));
    }

    #[test]
    fn missing_file_is_io_error() {
        let mut fixture = Fixture::with_base_path("./does/not/exist");

        assert!(matches!(
            fixture.load_rules("missing"),
            Err(FixtureError::Io(_))
        ));
        assert!(matches!(
            fixture.load_config("missing"),
            Err(FixtureError::Config(ConfigError::Io(_)))
        ));
    }
}
