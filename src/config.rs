//! Configuration
//!
//! Website-scoped `sales_rule_enhanced/general/enable_most_saving` flag, loaded from YAML
//! with a `default` scope and per-website overrides:
//!
//! ```yaml
//! default:
//!   sales_rule_enhanced:
//!     general:
//!       enable_most_saving: true
//! websites:
//!   2:
//!     sales_rule_enhanced:
//!       general:
//!         enable_most_saving: false
//! ```

use std::{fs, path::Path};

use rustc_hash::FxHashMap;
use serde::Deserialize;
use thiserror::Error;

use crate::addresses::WebsiteId;

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// IO error reading the configuration file
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),
}

/// Values set in one configuration scope.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScopeConfig {
    /// `sales_rule_enhanced` section
    #[serde(default)]
    pub sales_rule_enhanced: SalesRuleEnhancedConfig,
}

/// `sales_rule_enhanced` section
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SalesRuleEnhancedConfig {
    /// `general` group
    #[serde(default)]
    pub general: GeneralConfig,
}

/// `sales_rule_enhanced/general` group
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GeneralConfig {
    /// Rank rules by most saving; unset inherits from the parent scope
    #[serde(default)]
    pub enable_most_saving: Option<bool>,
}

impl ScopeConfig {
    fn enable_most_saving(&self) -> Option<bool> {
        self.sales_rule_enhanced.general.enable_most_saving
    }

    fn with_most_saving(enabled: bool) -> Self {
        Self {
            sales_rule_enhanced: SalesRuleEnhancedConfig {
                general: GeneralConfig {
                    enable_most_saving: Some(enabled),
                },
            },
        }
    }
}

/// Most-saving sort configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SortingConfig {
    /// Default scope
    #[serde(default)]
    pub default: ScopeConfig,

    /// Website scope overrides
    #[serde(default)]
    pub websites: FxHashMap<WebsiteId, ScopeConfig>,
}

impl SortingConfig {
    /// Most-saving sort enabled everywhere.
    #[must_use]
    pub fn enabled() -> Self {
        Self {
            default: ScopeConfig::with_most_saving(true),
            websites: FxHashMap::default(),
        }
    }

    /// Most-saving sort disabled everywhere.
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            default: ScopeConfig::with_most_saving(false),
            websites: FxHashMap::default(),
        }
    }

    /// Override the flag for one website.
    #[must_use]
    pub fn with_website(mut self, website: WebsiteId, enabled: bool) -> Self {
        self.websites
            .insert(website, ScopeConfig::with_most_saving(enabled));
        self
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the YAML is invalid.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_norway::from_str(yaml)?)
    }

    /// Load configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;

        Self::from_yaml_str(&contents)
    }

    /// Whether rules should be ranked by most saving on `website`. Unset means disabled.
    pub fn use_most_saving_sort(&self, website: WebsiteId) -> bool {
        self.websites
            .get(&website)
            .and_then(ScopeConfig::enable_most_saving)
            .or_else(|| self.default.enable_most_saving())
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn unset_flag_is_disabled() {
        let config = SortingConfig::default();

        assert!(!config.use_most_saving_sort(WebsiteId(1)));
    }

    #[test]
    fn website_overrides_default() {
        let config = SortingConfig::enabled().with_website(WebsiteId(2), false);

        assert!(config.use_most_saving_sort(WebsiteId(1)));
        assert!(!config.use_most_saving_sort(WebsiteId(2)));
        assert!(
            SortingConfig::disabled()
                .with_website(WebsiteId(3), true)
                .use_most_saving_sort(WebsiteId(3))
        );
    }

    #[test]
    fn parses_scoped_yaml() -> TestResult {
        let config = SortingConfig::from_yaml_str(
            r"
default:
  sales_rule_enhanced:
    general:
      enable_most_saving: true
websites:
  2:
    sales_rule_enhanced:
      general:
        enable_most_saving: false
  3:
    sales_rule_enhanced:
      general: {}
",
        )?;

        assert!(config.use_most_saving_sort(WebsiteId(1)));
        assert!(!config.use_most_saving_sort(WebsiteId(2)));
        assert!(config.use_most_saving_sort(WebsiteId(3)));

        Ok(())
    }

    #[test]
    fn load_reads_file() -> TestResult {
        let mut file = NamedTempFile::new()?;
        writeln!(
            file,
            "websites:\n  5:\n    sales_rule_enhanced:\n      general:\n        enable_most_saving: true"
        )?;

        let config = SortingConfig::load(file.path())?;

        assert!(config.use_most_saving_sort(WebsiteId(5)));
        assert!(!config.use_most_saving_sort(WebsiteId(1)));

        Ok(())
    }

    #[test]
    fn invalid_yaml_is_reported() {
        let result = SortingConfig::from_yaml_str("default: [unclosed");

        assert!(matches!(result, Err(ConfigError::Yaml(_))));
    }

    #[test]
    fn missing_file_is_io_error() {
        let result = SortingConfig::load("./does/not/exist.yml");

        assert!(matches!(result, Err(ConfigError::Io(_))));
    }
}
