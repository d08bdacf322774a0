//! Business impact simulation: revenue kept by retaining part of the at-risk customers.

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const MIN_EFFECTIVENESS_PCT: f64 = 10.0;
pub const MAX_EFFECTIVENESS_PCT: f64 = 50.0;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ImpactError {
    #[error("{field} must be a non-negative number, got {value}")]
    Negative { field: &'static str, value: f64 },

    #[error("retention effectiveness {0}% is outside [10, 50]")]
    Effectiveness(f64),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImpactInput {
    pub at_risk_customers: f64,
    pub avg_customer_value: f64,
    pub retention_effectiveness_pct: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImpactEstimate {
    #[serde(flatten)]
    pub input: ImpactInput,
    pub saved_revenue: f64,
}

impl ImpactInput {
    pub fn estimate(&self) -> Result<ImpactEstimate, ImpactError> {
        for (field, value) in [
            ("at_risk_customers", self.at_risk_customers),
            ("avg_customer_value", self.avg_customer_value),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ImpactError::Negative { field, value });
            }
        }
        let pct = self.retention_effectiveness_pct;
        if !(MIN_EFFECTIVENESS_PCT..=MAX_EFFECTIVENESS_PCT).contains(&pct) {
            return Err(ImpactError::Effectiveness(pct));
        }
        Ok(ImpactEstimate {
            input: *self,
            saved_revenue: self.at_risk_customers * self.avg_customer_value * (pct / 100.0),
        })
    }
}
