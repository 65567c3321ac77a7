//! Configuration loading for the simulation.
//!
//! All tunable settings are loaded from a TOML configuration file; every
//! section is optional and falls back to its defaults.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use city_events::{CapacityOverride, Metric};

use crate::state::{ACTIVITY_HISTORY_LEN, ACTIVITY_WINDOW};

/// Valid range for any capacity setting.
pub const CAPACITY_MIN: f64 = 0.6;
pub const CAPACITY_MAX: f64 = 1.4;

/// Complete simulation configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SimConfig {
    /// Random source settings
    #[serde(default)]
    pub rng: RngConfig,
    /// Transit, venue and road capacity
    #[serde(default)]
    pub capacity: CapacityConfig,
    /// Momentum smoothing factors
    #[serde(default)]
    pub momentum: MomentumConfig,
    /// Aggregator tuning
    #[serde(default)]
    pub dynamics: DynamicsConfig,
}

impl SimConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Parses and validates configuration from a TOML string.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let config: SimConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Returns this configuration as a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Rejects values outside their documented ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.capacity.validate()?;
        self.momentum.validate()?;
        self.dynamics.validate()?;
        Ok(())
    }
}

/// Random source configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct RngConfig {
    /// Base seed; per-cycle input seeds take precedence
    pub seed: Option<u32>,
}

/// Capacity of the city's shared infrastructure.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CapacityConfig {
    pub transit_capacity: f64,
    pub venue_capacity: f64,
    pub road_capacity: f64,
}

impl Default for CapacityConfig {
    fn default() -> Self {
        Self {
            transit_capacity: 1.0,
            venue_capacity: 1.0,
            road_capacity: 1.0,
        }
    }
}

impl CapacityConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("transit_capacity", self.transit_capacity),
            ("venue_capacity", self.venue_capacity),
            ("road_capacity", self.road_capacity),
        ] {
            if !(CAPACITY_MIN..=CAPACITY_MAX).contains(&value) {
                return Err(ConfigError::Invalid(format!(
                    "capacity.{} = {} outside [{}, {}]",
                    name, value, CAPACITY_MIN, CAPACITY_MAX
                )));
            }
        }
        Ok(())
    }

    /// Applies a per-cycle override; every value is clamped into range.
    pub fn resolve(&self, overrides: Option<&CapacityOverride>) -> CapacityConfig {
        let pick = |over: Option<f64>, base: f64| {
            let value = over.filter(|v| v.is_finite()).unwrap_or(base);
            let clamped = value.clamp(CAPACITY_MIN, CAPACITY_MAX);
            if clamped != value {
                tracing::warn!("Capacity {} outside range, clamped to {}", value, clamped);
            }
            clamped
        };
        let o = overrides.copied().unwrap_or_default();
        CapacityConfig {
            transit_capacity: pick(o.transit_capacity, self.transit_capacity),
            venue_capacity: pick(o.venue_capacity, self.venue_capacity),
            road_capacity: pick(o.road_capacity, self.road_capacity),
        }
    }
}

/// Per-metric momentum factors: the share of last cycle's published value
/// that carries into this cycle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MomentumConfig {
    pub sentiment: f64,
    pub nightlife: f64,
    pub public_spaces: f64,
    pub traffic: f64,
    pub retail: f64,
    pub cultural_activity: f64,
    pub community_engagement: f64,
    pub tourism: f64,
    /// Subtracted from every factor while a shock is active
    pub shock_reduction: f64,
    /// Lowest factor a shock can reduce to
    pub shock_floor: f64,
}

impl Default for MomentumConfig {
    fn default() -> Self {
        Self {
            sentiment: 0.50,
            nightlife: 0.60,
            public_spaces: 0.65,
            traffic: 0.70,
            retail: 0.72,
            cultural_activity: 0.70,
            community_engagement: 0.73,
            tourism: 0.78,
            shock_reduction: 0.15,
            shock_floor: 0.40,
        }
    }
}

impl MomentumConfig {
    /// Base factor for a metric.
    pub fn factor(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Traffic => self.traffic,
            Metric::Retail => self.retail,
            Metric::Tourism => self.tourism,
            Metric::Nightlife => self.nightlife,
            Metric::PublicSpaces => self.public_spaces,
            Metric::CulturalActivity => self.cultural_activity,
            Metric::CommunityEngagement => self.community_engagement,
            Metric::Sentiment => self.sentiment,
        }
    }

    /// Factor after the shock reduction, if any.
    pub fn effective_factor(&self, metric: Metric, shock_active: bool) -> f64 {
        let base = self.factor(metric);
        if shock_active {
            (base - self.shock_reduction).max(self.shock_floor)
        } else {
            base
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        for metric in Metric::ALL {
            let f = self.factor(metric);
            if !(0.0..=1.0).contains(&f) {
                return Err(ConfigError::Invalid(format!(
                    "momentum.{} = {} outside [0, 1]",
                    metric, f
                )));
            }
        }
        if !(0.0..=1.0).contains(&self.shock_floor) || self.shock_reduction < 0.0 {
            return Err(ConfigError::Invalid(
                "momentum shock settings must be non-negative and the floor within [0, 1]"
                    .to_string(),
            ));
        }
        Ok(())
    }
}

/// Aggregator tuning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DynamicsConfig {
    /// Share of the gap to neighbor sentiment closed each cycle
    pub bleed_factor: f64,
    /// Entries averaged for activity feedback
    pub activity_window: usize,
    /// Entries retained in the activity ring buffer
    pub activity_capacity: usize,
}

impl Default for DynamicsConfig {
    fn default() -> Self {
        Self {
            bleed_factor: 0.12,
            activity_window: ACTIVITY_WINDOW,
            activity_capacity: ACTIVITY_HISTORY_LEN,
        }
    }
}

impl DynamicsConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.bleed_factor) {
            return Err(ConfigError::Invalid(format!(
                "dynamics.bleed_factor = {} outside [0, 1]",
                self.bleed_factor
            )));
        }
        if self.activity_window == 0 || self.activity_window > self.activity_capacity {
            return Err(ConfigError::Invalid(format!(
                "dynamics.activity_window = {} must be within 1..={}",
                self.activity_window, self.activity_capacity
            )));
        }
        Ok(())
    }
}

/// Errors that can occur during configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Generates a default configuration file content.
pub fn default_config_toml() -> String {
    r#"# City Simulation Configuration

[rng]
# seed = 42

[capacity]
transit_capacity = 1.0
venue_capacity = 1.0
road_capacity = 1.0

[momentum]
sentiment = 0.50
nightlife = 0.60
public_spaces = 0.65
traffic = 0.70
retail = 0.72
cultural_activity = 0.70
community_engagement = 0.73
tourism = 0.78
shock_reduction = 0.15
shock_floor = 0.40

[dynamics]
bleed_factor = 0.12
activity_window = 6
activity_capacity = 12
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = SimConfig::default();

        assert_eq!(config.capacity.transit_capacity, 1.0);
        assert_eq!(config.momentum.tourism, 0.78);
        assert_eq!(config.dynamics.bleed_factor, 0.12);
        assert!(config.rng.seed.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let toml = r#"
            [capacity]
            road_capacity = 0.8
        "#;

        let config = SimConfig::from_str(toml).unwrap();

        assert_eq!(config.capacity.road_capacity, 0.8);
        assert_eq!(config.capacity.transit_capacity, 1.0);
        assert_eq!(config.momentum.sentiment, 0.50);
    }

    #[test]
    fn test_default_config_toml_parses() {
        let config = SimConfig::from_str(&default_config_toml()).unwrap();
        assert_eq!(config, SimConfig::default());
    }

    #[test]
    fn test_config_to_toml() {
        let toml = SimConfig::default().to_toml().unwrap();
        assert!(toml.contains("[capacity]"));
        assert!(toml.contains("[momentum]"));
    }

    #[test]
    fn test_out_of_range_capacity_rejected() {
        let err = SimConfig::from_str("[capacity]\nvenue_capacity = 2.0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_bad_window_rejected() {
        let err = SimConfig::from_str("[dynamics]\nactivity_window = 20\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_parse_error_reported() {
        let err = SimConfig::from_str("[capacity\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[rng]\nseed = 7").unwrap();
        let config = SimConfig::from_file(file.path()).unwrap();
        assert_eq!(config.rng.seed, Some(7));
    }

    #[test]
    fn test_capacity_resolve_override_and_clamp() {
        let base = CapacityConfig::default();
        let over = CapacityOverride {
            transit_capacity: Some(0.8),
            venue_capacity: Some(3.0),
            road_capacity: None,
        };
        let resolved = base.resolve(Some(&over));
        assert_eq!(resolved.transit_capacity, 0.8);
        assert_eq!(resolved.venue_capacity, CAPACITY_MAX);
        assert_eq!(resolved.road_capacity, 1.0);
    }

    #[test]
    fn test_shock_reduces_factor_with_floor() {
        let m = MomentumConfig::default();
        assert!((m.effective_factor(Metric::Tourism, true) - 0.63).abs() < 1e-12);
        assert_eq!(m.effective_factor(Metric::Sentiment, true), 0.40);
        assert_eq!(m.effective_factor(Metric::Sentiment, false), 0.50);
    }
}
