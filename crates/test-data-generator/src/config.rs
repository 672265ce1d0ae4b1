//! Generation configuration.
//!
//! A [`GenerationConfig`] is immutable once built. It is created through
//! [`GenerationConfig::builder`] or deserialized from YAML; both paths run the same
//! validation.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

const DEFAULT_MIN_ITEMS: usize = 1;
const DEFAULT_MAX_ITEMS: usize = 5;
const DEFAULT_MAX_DEPTH: usize = 8;

/// Error type for invalid configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Collection bounds are inverted
    #[error("Min items number for collection ({min}) shouldn't be greater than max items number ({max})")]
    MinGreaterThanMax { min: usize, max: usize },

    /// Model nesting must allow at least the top-level model
    #[error("Max depth should be at least 1")]
    ZeroDepth,

    /// Error reading config file
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    /// Error parsing YAML
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Settings shared by every generator during one generation call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "GenerationConfigBuilder", into = "GenerationConfigBuilder")]
pub struct GenerationConfig {
    min_items: usize,
    max_items: usize,
    prefix: String,
    postfix: String,
    max_depth: usize,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            min_items: DEFAULT_MIN_ITEMS,
            max_items: DEFAULT_MAX_ITEMS,
            prefix: String::new(),
            postfix: String::new(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl GenerationConfig {
    /// Start building a configuration from the defaults.
    pub fn builder() -> GenerationConfigBuilder {
        GenerationConfigBuilder::default()
    }

    /// Load configuration from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let builder: GenerationConfigBuilder = serde_yaml::from_str(yaml)?;
        builder.build()
    }

    /// Minimum number of items in generated arrays and collections (inclusive).
    pub fn min_items(&self) -> usize {
        self.min_items
    }

    /// Maximum number of items in generated arrays and collections (inclusive).
    pub fn max_items(&self) -> usize {
        self.max_items
    }

    /// Prepended to every generated string.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Appended to every generated string.
    pub fn postfix(&self) -> &str {
        &self.postfix
    }

    /// Maximum nesting of model instances; deeper model slots are left empty.
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }
}

/// Builder for [`GenerationConfig`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GenerationConfigBuilder {
    min_items: usize,
    max_items: usize,
    prefix: String,
    postfix: String,
    max_depth: usize,
}

impl Default for GenerationConfigBuilder {
    fn default() -> Self {
        GenerationConfig::default().into()
    }
}

impl GenerationConfigBuilder {
    pub fn min_items(mut self, min_items: usize) -> Self {
        self.min_items = min_items;
        self
    }

    pub fn max_items(mut self, max_items: usize) -> Self {
        self.max_items = max_items;
        self
    }

    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn postfix(mut self, postfix: impl Into<String>) -> Self {
        self.postfix = postfix.into();
        self
    }

    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Validate and build the configuration.
    pub fn build(self) -> Result<GenerationConfig, ConfigError> {
        if self.min_items > self.max_items {
            return Err(ConfigError::MinGreaterThanMax {
                min: self.min_items,
                max: self.max_items,
            });
        }
        if self.max_depth == 0 {
            return Err(ConfigError::ZeroDepth);
        }
        Ok(GenerationConfig {
            min_items: self.min_items,
            max_items: self.max_items,
            prefix: self.prefix,
            postfix: self.postfix,
            max_depth: self.max_depth,
        })
    }
}

impl From<GenerationConfig> for GenerationConfigBuilder {
    fn from(config: GenerationConfig) -> Self {
        Self {
            min_items: config.min_items,
            max_items: config.max_items,
            prefix: config.prefix,
            postfix: config.postfix,
            max_depth: config.max_depth,
        }
    }
}

impl TryFrom<GenerationConfigBuilder> for GenerationConfig {
    type Error = ConfigError;

    fn try_from(builder: GenerationConfigBuilder) -> Result<Self, Self::Error> {
        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = GenerationConfig::default();
        assert_eq!(config.min_items(), 1);
        assert_eq!(config.max_items(), 5);
        assert_eq!(config.prefix(), "");
        assert_eq!(config.postfix(), "");
        assert_eq!(config.max_depth(), 8);
        assert_eq!(GenerationConfig::builder().build().unwrap(), config);
    }

    #[test]
    fn test_builder_overrides() {
        let config = GenerationConfig::builder()
            .min_items(0)
            .max_items(0)
            .prefix("pre-")
            .postfix("-post")
            .max_depth(3)
            .build()
            .unwrap();
        assert_eq!(config.min_items(), 0);
        assert_eq!(config.max_items(), 0);
        assert_eq!(config.prefix(), "pre-");
        assert_eq!(config.postfix(), "-post");
        assert_eq!(config.max_depth(), 3);
    }

    #[test]
    fn test_min_greater_than_max_rejected() {
        let result = GenerationConfig::builder().min_items(6).max_items(5).build();
        assert!(matches!(
            result,
            Err(ConfigError::MinGreaterThanMax { min: 6, max: 5 })
        ));
    }

    #[test]
    fn test_zero_depth_rejected() {
        let result = GenerationConfig::builder().max_depth(0).build();
        assert!(matches!(result, Err(ConfigError::ZeroDepth)));
    }

    #[test]
    fn test_yaml_partial_config() {
        let config = GenerationConfig::from_yaml("max_items: 2\nprefix: \"x-\"\n").unwrap();
        assert_eq!(config.min_items(), 1);
        assert_eq!(config.max_items(), 2);
        assert_eq!(config.prefix(), "x-");
    }

    #[test]
    fn test_yaml_validation() {
        assert!(matches!(
            GenerationConfig::from_yaml("min_items: 3\nmax_items: 1\n"),
            Err(ConfigError::MinGreaterThanMax { .. })
        ));
        assert!(matches!(
            GenerationConfig::from_yaml("min_items: -1\n"),
            Err(ConfigError::Yaml(_))
        ));
        assert!(matches!(
            GenerationConfig::from_yaml("unknown: 1\n"),
            Err(ConfigError::Yaml(_))
        ));
    }

    #[test]
    fn test_serde_deserialize_validates() {
        let result: Result<GenerationConfig, _> = serde_yaml::from_str("min_items: 9\n");
        assert!(result.is_err());
        let config: GenerationConfig = serde_yaml::from_str("postfix: end\n").unwrap();
        assert_eq!(config.postfix(), "end");
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "min_items: 2\nmax_items: 2").unwrap();
        let config = GenerationConfig::from_file(file.path()).unwrap();
        assert_eq!(config.min_items(), 2);
        assert_eq!(config.max_items(), 2);
    }
}
