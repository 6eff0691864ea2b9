//! Engine configuration with YAML schema and validation.
//!
//! Mistakes are caught in two passes:
//! - Schema: serde with `deny_unknown_fields`, then `validator` ranges
//! - Semantics: cross-field checks `validator` cannot express

use serde::{Deserialize, Serialize};
use std::path::Path;
use validator::Validate;

use crate::engine::SimTime;
use crate::error::{TourError, TourResult};
use crate::heuristics::DEFAULT_IMPROVEMENT_THRESHOLD;
use crate::tour::DEFAULT_HISTORY_CAPACITY;

/// Top-level engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct EngineConfig {
    /// Undo steps retained; the oldest is dropped beyond this.
    #[validate(range(min = 1))]
    #[serde(default = "default_history_capacity")]
    pub history_capacity: usize,

    /// Minimum length saved for a 2-opt move to count as improving.
    ///
    /// Must be positive so near-zero gains from rounding cannot cycle.
    #[validate(range(exclusive_min = 0.0))]
    #[serde(default = "default_improvement_threshold")]
    pub improvement_threshold: f64,

    /// Seed for random completion.
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Virtual-time pacing of the heuristics.
    #[validate(nested)]
    #[serde(default)]
    pub timing: TimingConfig,
}

const fn default_history_capacity() -> usize {
    DEFAULT_HISTORY_CAPACITY
}

const fn default_improvement_threshold() -> f64 {
    DEFAULT_IMPROVEMENT_THRESHOLD
}

const fn default_seed() -> u64 {
    42
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            history_capacity: default_history_capacity(),
            improvement_threshold: default_improvement_threshold(),
            seed: default_seed(),
            timing: TimingConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Load configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - File cannot be read
    /// - YAML parsing fails
    /// - Validation fails
    pub fn load<P: AsRef<Path>>(path: P) -> TourResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns error if parsing or validation fails.
    pub fn from_yaml(yaml: &str) -> TourResult<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.check()?;
        Ok(config)
    }

    /// Run schema and semantic validation.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for range violations, `Config` for semantic ones.
    pub fn check(&self) -> TourResult<()> {
        self.validate()?;
        self.validate_semantic()
    }

    /// Create a builder for configuration.
    #[must_use]
    pub fn builder() -> EngineConfigBuilder {
        EngineConfigBuilder::default()
    }

    fn validate_semantic(&self) -> TourResult<()> {
        if !self.improvement_threshold.is_finite() {
            return Err(TourError::config(format!(
                "improvement_threshold must be finite, got {}",
                self.improvement_threshold
            )));
        }
        Ok(())
    }
}

/// Configuration builder for programmatic construction.
#[derive(Debug, Default)]
pub struct EngineConfigBuilder {
    history_capacity: Option<usize>,
    improvement_threshold: Option<f64>,
    seed: Option<u64>,
    timing: Option<TimingConfig>,
}

impl EngineConfigBuilder {
    #[must_use]
    pub const fn history_capacity(mut self, capacity: usize) -> Self {
        self.history_capacity = Some(capacity);
        self
    }

    #[must_use]
    pub const fn improvement_threshold(mut self, threshold: f64) -> Self {
        self.improvement_threshold = Some(threshold);
        self
    }

    #[must_use]
    pub const fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    #[must_use]
    pub const fn timing(mut self, timing: TimingConfig) -> Self {
        self.timing = Some(timing);
        self
    }

    /// Every delay set to zero; handy for tests and batch runs.
    #[must_use]
    pub const fn instant(self) -> Self {
        self.timing(TimingConfig::instant())
    }

    /// Build the configuration.
    #[must_use]
    pub fn build(self) -> EngineConfig {
        let mut config = EngineConfig::default();

        if let Some(capacity) = self.history_capacity {
            config.history_capacity = capacity;
        }
        if let Some(threshold) = self.improvement_threshold {
            config.improvement_threshold = threshold;
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if let Some(timing) = self.timing {
            config.timing = timing;
        }

        config
    }
}

/// Delays between heuristic steps, in milliseconds of virtual time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct TimingConfig {
    /// Pause after each nearest-neighbor append.
    #[validate(range(max = 60_000))]
    #[serde(default = "default_nearest_step_ms")]
    pub nearest_step_ms: u64,
    /// Pause after each random append.
    #[validate(range(max = 60_000))]
    #[serde(default = "default_random_step_ms")]
    pub random_step_ms: u64,
    /// How long a 2-opt swap is previewed before it is applied.
    #[validate(range(max = 60_000))]
    #[serde(default = "default_swap_ms")]
    pub swap_preview_ms: u64,
    /// Pause after an applied 2-opt swap.
    #[validate(range(max = 60_000))]
    #[serde(default = "default_swap_ms")]
    pub swap_settle_ms: u64,
}

const fn default_nearest_step_ms() -> u64 {
    500
}

const fn default_random_step_ms() -> u64 {
    250
}

const fn default_swap_ms() -> u64 {
    1000
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            nearest_step_ms: default_nearest_step_ms(),
            random_step_ms: default_random_step_ms(),
            swap_preview_ms: default_swap_ms(),
            swap_settle_ms: default_swap_ms(),
        }
    }
}

impl TimingConfig {
    /// No pacing at all.
    #[must_use]
    pub const fn instant() -> Self {
        Self {
            nearest_step_ms: 0,
            random_step_ms: 0,
            swap_preview_ms: 0,
            swap_settle_ms: 0,
        }
    }

    #[must_use]
    pub const fn nearest_step(&self) -> SimTime {
        SimTime::from_millis(self.nearest_step_ms)
    }

    #[must_use]
    pub const fn random_step(&self) -> SimTime {
        SimTime::from_millis(self.random_step_ms)
    }

    #[must_use]
    pub const fn swap_preview(&self) -> SimTime {
        SimTime::from_millis(self.swap_preview_ms)
    }

    #[must_use]
    pub const fn swap_settle(&self) -> SimTime {
        SimTime::from_millis(self.swap_settle_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = EngineConfig::default();

        assert_eq!(config.history_capacity, 100);
        assert!((config.improvement_threshold - 0.1).abs() < f64::EPSILON);
        assert_eq!(config.seed, 42);
        assert_eq!(config.timing.nearest_step(), SimTime::from_millis(500));
        assert_eq!(config.timing.random_step(), SimTime::from_millis(250));
        assert_eq!(config.timing.swap_preview(), SimTime::from_millis(1000));
        assert_eq!(config.timing.swap_settle(), SimTime::from_millis(1000));
        assert!(config.check().is_ok());
    }

    #[test]
    fn test_config_builder() {
        let config = EngineConfig::builder()
            .seed(12345)
            .history_capacity(10)
            .improvement_threshold(0.5)
            .instant()
            .build();

        assert_eq!(config.seed, 12345);
        assert_eq!(config.history_capacity, 10);
        assert!((config.improvement_threshold - 0.5).abs() < f64::EPSILON);
        assert_eq!(config.timing, TimingConfig::instant());
    }

    #[test]
    fn test_config_yaml_parse() {
        let yaml = r"
seed: 7
timing:
  nearest_step_ms: 100
";
        let config = EngineConfig::from_yaml(yaml).ok();
        assert_eq!(config.as_ref().map(|c| c.seed), Some(7));
        assert_eq!(
            config.as_ref().map(|c| c.timing.nearest_step_ms),
            Some(100)
        );
        // Unspecified fields keep their defaults.
        assert_eq!(config.as_ref().map(|c| c.timing.random_step_ms), Some(250));
        assert_eq!(config.map(|c| c.history_capacity), Some(100));
    }

    #[test]
    fn test_config_empty_yaml_is_default() {
        let config = EngineConfig::from_yaml("{}").ok();
        assert_eq!(config, Some(EngineConfig::default()));
    }

    #[test]
    fn test_config_rejects_unknown_fields() {
        let result = EngineConfig::from_yaml("seed: 1\nspeed: 3\n");
        assert!(matches!(result, Err(TourError::YamlParse(_))));
    }

    #[test]
    fn test_config_rejects_zero_capacity() {
        let result = EngineConfig::from_yaml("history_capacity: 0\n");
        assert!(matches!(result, Err(TourError::Validation(_))));
    }

    #[test]
    fn test_config_rejects_negative_threshold() {
        let result = EngineConfig::from_yaml("improvement_threshold: -1.0\n");
        assert!(matches!(result, Err(TourError::Validation(_))));
    }

    #[test]
    fn test_config_rejects_zero_threshold() {
        let result = EngineConfig::from_yaml("improvement_threshold: 0.0\n");
        assert!(matches!(result, Err(TourError::Validation(_))));

        let config = EngineConfig::builder().improvement_threshold(0.0).build();
        assert!(matches!(config.check(), Err(TourError::Validation(_))));
        assert!(
            crate::session::TourSession::new(vec![crate::geometry::Point::new(0.0, 0.0)], config)
                .is_err()
        );
    }

    #[test]
    fn test_config_rejects_non_finite_threshold() {
        let config = EngineConfig::builder()
            .improvement_threshold(f64::INFINITY)
            .build();
        assert!(matches!(config.check(), Err(TourError::Config { .. })));
    }

    #[test]
    fn test_config_rejects_excessive_delay() {
        let result = EngineConfig::from_yaml("timing:\n  swap_settle_ms: 3600000\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_config_load_missing_file() {
        let result = EngineConfig::load("/nonexistent/tourcraft.yaml");
        assert!(matches!(result, Err(TourError::Io(_))));
    }

    #[test]
    fn test_config_yaml_round_trip() {
        let config = EngineConfig::builder().seed(99).build();
        let yaml = serde_yaml::to_string(&config).expect("serialize");
        let parsed = EngineConfig::from_yaml(&yaml).expect("parse");
        assert_eq!(parsed, config);
    }
}
