//! Simulator configuration. Risk cutoffs and derivation thresholds are fixed and not configurable.

use crate::error::ConfigError;
use crate::impact::ImpactInput;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScorerConfig {
    /// Path to the fitted pipeline artifact
    pub model_path: PathBuf,
    /// Defaults for the business impact simulation
    pub impact: ImpactConfig,
    /// Logging
    pub log: LogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ImpactConfig {
    pub at_risk_customers: f64,
    pub avg_customer_value: f64,
    /// Share of at-risk customers retained (10–50 %)
    pub retention_effectiveness_pct: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
    pub json: bool,
}

impl Default for ScorerConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from("models/bank_churn_pipeline.json"),
            impact: ImpactConfig::default(),
            log: LogConfig::default(),
        }
    }
}

impl Default for ImpactConfig {
    fn default() -> Self {
        Self {
            at_risk_customers: 1000.0,
            avg_customer_value: 5000.0,
            retention_effectiveness_pct: 20.0,
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl From<&ImpactConfig> for ImpactInput {
    fn from(c: &ImpactConfig) -> Self {
        Self {
            at_risk_customers: c.at_risk_customers,
            avg_customer_value: c.avg_customer_value,
            retention_effectiveness_pct: c.retention_effectiveness_pct,
        }
    }
}

impl ScorerConfig {
    /// Load from JSON file if present; a missing file yields the defaults.
    /// A file that exists but cannot be read or parsed is an error.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        serde_json::from_str::<ScorerConfig>(&data).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }
}
