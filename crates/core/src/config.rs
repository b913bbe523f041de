use serde::Deserialize;

use crate::types::Centroid;

/// Root application configuration. Loaded from environment variables
/// with the prefix `RETENTION_PULSE__` and an optional TOML config file.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub datasets: DatasetFilesConfig,
    #[serde(default)]
    pub scoring: ScoringConfig,
    #[serde(default)]
    pub tiers: TierConfig,
}

/// Record-file locations consumed by the CLI's acquisition adapter.
/// Each file holds a JSON array of field-name → text-value rows.
#[derive(Debug, Clone, Deserialize)]
pub struct DatasetFilesConfig {
    #[serde(default = "default_loyalty_path")]
    pub loyalty_path: String,
    #[serde(default = "default_outreach_path")]
    pub outreach_path: String,
    #[serde(default = "default_churn_path")]
    pub churn_path: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScoringConfig {
    /// Bin count for the churn-risk distribution over [0,1].
    #[serde(default = "default_histogram_bins")]
    pub histogram_bins: usize,
    /// Pre-computed segment centroids in normalized feature space.
    /// Empty means cluster assignment is skipped.
    #[serde(default)]
    pub centroids: Vec<Centroid>,
}

/// Health-score boundaries for the intervention tiers. Both boundaries
/// belong to the lower tier (closed intervals, observed behavior).
#[derive(Debug, Clone, Deserialize)]
pub struct TierConfig {
    #[serde(default = "default_at_risk_max")]
    pub at_risk_max: f64,
    #[serde(default = "default_neutral_max")]
    pub neutral_max: f64,
}

// Default functions
fn default_loyalty_path() -> String {
    "data/loyalty.json".to_string()
}
fn default_outreach_path() -> String {
    "data/outreach.json".to_string()
}
fn default_churn_path() -> String {
    "data/churn.json".to_string()
}
fn default_histogram_bins() -> usize {
    10
}
fn default_at_risk_max() -> f64 {
    33.0
}
fn default_neutral_max() -> f64 {
    66.0
}

impl Default for DatasetFilesConfig {
    fn default() -> Self {
        Self {
            loyalty_path: default_loyalty_path(),
            outreach_path: default_outreach_path(),
            churn_path: default_churn_path(),
        }
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            histogram_bins: default_histogram_bins(),
            centroids: Vec::new(),
        }
    }
}

impl Default for TierConfig {
    fn default() -> Self {
        Self {
            at_risk_max: default_at_risk_max(),
            neutral_max: default_neutral_max(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            datasets: DatasetFilesConfig::default(),
            scoring: ScoringConfig::default(),
            tiers: TierConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables and an optional
    /// `retention-pulse.toml` in the working directory.
    pub fn load() -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder()
            .add_source(config::File::with_name("retention-pulse").required(false))
            .add_source(
                config::Environment::with_prefix("RETENTION_PULSE")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(","),
            );

        let config = builder.build()?;
        config.try_deserialize()
    }
}
