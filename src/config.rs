//! Service configuration.
//!
//! All policy numbers live here rather than as scattered constants, and the
//! enabled feature set is an explicit value threaded into the repositories
//! that need it. There is no process-wide mutable flag registry.

use std::collections::HashSet;
use std::path::Path;

use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use thiserror::Error;

/// Optional capabilities that shape read-side responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    /// Expose protein/carb/fat fields on catalog responses.
    NutritionTracking,
}

/// The set of enabled features, carried by [`ServiceConfig`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct FeatureSet(HashSet<Feature>);

impl FeatureSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, feature: Feature) -> Self {
        self.0.insert(feature);
        self
    }

    pub fn enable(&mut self, feature: Feature) {
        self.0.insert(feature);
    }

    pub fn disable(&mut self, feature: Feature) {
        self.0.remove(&feature);
    }

    pub fn is_enabled(&self, feature: Feature) -> bool {
        self.0.contains(&feature)
    }
}

/// Tunable policy for the nutrition core.
///
/// Defaults carry the reference policy; deployments override via a TOML file.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Maximum number of entries returned by a feed read.
    pub feed_page_size: usize,
    /// Upper bound on a single logged quantity, in grams.
    pub max_log_grams: f64,
    /// Upper bound on plausible calorie density for catalog entries.
    pub max_calories_per_100g: f64,
    /// Age threshold for the retention purge, in days.
    pub retention_days: i64,
    /// Rows deleted per purge batch; each batch commits independently.
    pub purge_batch_size: usize,
    /// Enabled features.
    pub features: FeatureSet,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            feed_page_size: 50,
            max_log_grams: 5000.0,
            max_calories_per_100g: 1000.0,
            retention_days: 30,
            purge_batch_size: 100,
            features: FeatureSet::new(),
        }
    }
}

impl ServiceConfig {
    /// Parse a configuration from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Load a configuration file from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// The purge cutoff implied by the retention policy, relative to now.
    pub fn retention_cutoff(&self) -> DateTime<Utc> {
        Utc::now() - Duration::days(self.retention_days)
    }
}

/// Errors raised while loading a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}
