//! Maps a churn probability to a fixed three-level risk label and its presentation values.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Probability strictly above this is High.
pub const HIGH_CUTOFF: f64 = 0.70;
/// Probability strictly above this (and not High) is Medium.
pub const MEDIUM_CUTOFF: f64 = 0.30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn from_probability(probability: f64) -> Self {
        if probability > HIGH_CUTOFF {
            RiskLevel::High
        } else if probability > MEDIUM_CUTOFF {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Low risk.",
            RiskLevel::Medium => "Medium risk.",
            RiskLevel::High => "High risk!",
        }
    }
}

/// Pure probability → label mapping.
pub fn classify(probability: f64) -> RiskLevel {
    RiskLevel::from_probability(probability)
}

/// Probability as a percentage with two decimals, e.g. `83.12%`.
pub fn format_percent(probability: f64) -> String {
    format!("{:.2}%", probability * 100.0)
}

/// Outcome of one scoring call. Not persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub request_id: String,
    pub probability: f64,
    pub level: RiskLevel,
    /// Probability clamped to [0, 1] for a progress indicator
    pub progress: f64,
    pub headline: String,
    pub assessed_at: DateTime<Utc>,
}

impl RiskAssessment {
    pub fn new(probability: f64) -> Self {
        let level = classify(probability);
        Self {
            request_id: Uuid::new_v4().to_string(),
            probability,
            level,
            progress: probability.clamp(0.0, 1.0),
            headline: format!("{} Churn probability: {}", level.label(), format_percent(probability)),
            assessed_at: Utc::now(),
        }
    }

    pub fn percent(&self) -> String {
        format_percent(self.probability)
    }
}
