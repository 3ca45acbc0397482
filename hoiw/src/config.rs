use crate::error::ConfigError;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_MIN_WEIGHTED_SUPPORT: f64 = 0.01;

/// How per-transaction occupancy is normalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum OccupancyDefinition {
    /// `|t| / Σ|t'|`
    #[default]
    Cardinality,
    /// `Σ w(i∈t) / Σ_t' Σ w(i∈t')`
    WeightedMass,
}

/// Which quantity the pre-filter compares against `min_weighted_support`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum PrefilterPolicy {
    /// `Σ occupancy(t) × max_{j∈t} w(j)` over transactions containing the item.
    /// Bounds the occupancy of every itemset containing the item.
    #[default]
    TransactionMaxWeight,
    /// `Σ occupancy(t) × w(item)`. Only bounds the singleton, so it can drop
    /// light items that reach the threshold together with heavier ones.
    WeightedSupport,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum ExecutionMode {
    #[default]
    Sequential,
    /// First-level branches are mined on the rayon pool.
    Parallel,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MiningConfig {
    pub min_occupancy: f64,
    pub min_weighted_support: f64,
    pub max_itemset_length: Option<usize>,
    pub occupancy_definition: OccupancyDefinition,
    pub prefilter: PrefilterPolicy,
    pub execution: ExecutionMode,
    pub threads: Option<usize>,
    pub time_limit_secs: Option<f64>,
}

impl Default for MiningConfig {
    fn default() -> Self {
        Self {
            min_occupancy: f64::NAN,
            min_weighted_support: DEFAULT_MIN_WEIGHTED_SUPPORT,
            max_itemset_length: None,
            occupancy_definition: OccupancyDefinition::default(),
            prefilter: PrefilterPolicy::default(),
            execution: ExecutionMode::default(),
            threads: None,
            time_limit_secs: None,
        }
    }
}

impl MiningConfig {
    pub fn new(min_occupancy: f64) -> Self {
        Self { min_occupancy, ..Self::default() }
    }

    pub fn with_min_weighted_support(mut self, min_weighted_support: f64) -> Self {
        self.min_weighted_support = min_weighted_support;
        self
    }

    pub fn with_max_itemset_length(mut self, max_itemset_length: usize) -> Self {
        self.max_itemset_length = Some(max_itemset_length);
        self
    }

    pub fn with_occupancy_definition(mut self, definition: OccupancyDefinition) -> Self {
        self.occupancy_definition = definition;
        self
    }

    pub fn with_prefilter(mut self, prefilter: PrefilterPolicy) -> Self {
        self.prefilter = prefilter;
        self
    }

    pub fn with_execution(mut self, execution: ExecutionMode) -> Self {
        self.execution = execution;
        self
    }

    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(source)?)
    }

    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    pub fn time_limit(&self) -> Option<Duration> {
        self.time_limit_secs.map(Duration::from_secs_f64)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.min_occupancy.is_finite() || self.min_occupancy < 0.0 {
            return Err(ConfigError::Invalid {
                key: "min_occupancy",
                reason: format!("expected a finite value >= 0, got {}", self.min_occupancy),
            });
        }
        if !self.min_weighted_support.is_finite() || self.min_weighted_support < 0.0 {
            return Err(ConfigError::Invalid {
                key: "min_weighted_support",
                reason: format!(
                    "expected a finite value >= 0, got {}",
                    self.min_weighted_support
                ),
            });
        }
        if self.max_itemset_length == Some(0) {
            return Err(ConfigError::Invalid {
                key: "max_itemset_length",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.threads == Some(0) {
            return Err(ConfigError::Invalid {
                key: "threads",
                reason: "must be at least 1".to_string(),
            });
        }
        if let Some(secs) = self.time_limit_secs {
            if !secs.is_finite() || secs <= 0.0 {
                return Err(ConfigError::Invalid {
                    key: "time_limit_secs",
                    reason: format!("expected a positive number of seconds, got {secs}"),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_fill_missing_keys() {
        let config = MiningConfig::from_toml_str("min_occupancy = 0.3").unwrap();
        assert_eq!(config.min_occupancy, 0.3);
        assert_eq!(config.min_weighted_support, DEFAULT_MIN_WEIGHTED_SUPPORT);
        assert_eq!(config.occupancy_definition, OccupancyDefinition::Cardinality);
        assert_eq!(config.prefilter, PrefilterPolicy::TransactionMaxWeight);
        assert_eq!(config.execution, ExecutionMode::Sequential);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_kebab_case_variants() {
        let config = MiningConfig::from_toml_str(
            r#"
            min_occupancy = 0.1
            occupancy_definition = "weighted-mass"
            prefilter = "weighted-support"
            execution = "parallel"
            max_itemset_length = 3
            "#,
        )
        .unwrap();
        assert_eq!(config.occupancy_definition, OccupancyDefinition::WeightedMass);
        assert_eq!(config.prefilter, PrefilterPolicy::WeightedSupport);
        assert_eq!(config.execution, ExecutionMode::Parallel);
        assert_eq!(config.max_itemset_length, Some(3));
    }

    #[test]
    fn test_missing_threshold_is_invalid() {
        let config = MiningConfig::from_toml_str("min_weighted_support = 0.2").unwrap();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { key: "min_occupancy", .. })
        ));
    }

    #[test]
    fn test_unknown_key_rejected() {
        assert!(MiningConfig::from_toml_str("min_occupancy = 0.1\nbogus = 1").is_err());
    }

    #[test]
    fn test_zero_length_cap_rejected() {
        let config = MiningConfig::new(0.1).with_max_itemset_length(0);
        assert!(config.validate().is_err());
    }
}
