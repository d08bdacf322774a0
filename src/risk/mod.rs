//! Risk labelling of churn probabilities.

mod engine;

pub use engine::{classify, format_percent, RiskAssessment, RiskLevel, HIGH_CUTOFF, MEDIUM_CUTOFF};
