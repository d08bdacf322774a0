//! Portable JSON export of a fitted pipeline: numeric columns are standardised,
//! categorical columns one-hot encoded, and a logistic model combines both.
//!
//! ```json
//! {
//!   "format": "linear-logistic/v1",
//!   "numeric": [{ "column": "total_trans_ct", "mean": 64.8, "scale": 23.5, "coefficient": -1.9 }],
//!   "categorical": [{ "column": "gender", "levels": { "F": 0.08, "M": -0.08 } }],
//!   "intercept": -1.7
//! }
//! ```

use super::ChurnClassifier;
use crate::error::PipelineError;
use crate::features::{FeatureRow, FeatureValue};
use ndarray::Array1;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

pub const FORMAT_TAG: &str = "linear-logistic/v1";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NumericColumn {
    pub column: String,
    pub mean: f64,
    pub scale: f64,
    pub coefficient: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CategoricalColumn {
    pub column: String,
    /// Weight of each known level's indicator column
    pub levels: BTreeMap<String, f64>,
}

/// On-disk layout of the artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LinearSpec {
    pub format: String,
    #[serde(default)]
    pub name: Option<String>,
    pub numeric: Vec<NumericColumn>,
    pub categorical: Vec<CategoricalColumn>,
    pub intercept: f64,
}

#[derive(Debug, Clone)]
pub struct LinearPipeline {
    spec: LinearSpec,
    means: Array1<f64>,
    scales: Array1<f64>,
    coefficients: Array1<f64>,
}

impl LinearPipeline {
    pub fn from_slice(bytes: &[u8]) -> Result<Self, PipelineError> {
        let spec: LinearSpec = serde_json::from_slice(bytes)
            .map_err(|e| PipelineError::new(format!("malformed artifact: {}", e)))?;
        Self::new(spec)
    }

    pub fn new(spec: LinearSpec) -> Result<Self, PipelineError> {
        if spec.format != FORMAT_TAG {
            return Err(PipelineError::new(format!(
                "unsupported artifact format {:?}, expected {:?}",
                spec.format, FORMAT_TAG
            )));
        }
        if spec.numeric.is_empty() && spec.categorical.is_empty() {
            return Err(PipelineError::new("artifact declares no input columns"));
        }
        if !spec.intercept.is_finite() {
            return Err(PipelineError::new("intercept is not finite"));
        }

        {
            let mut seen = HashSet::new();
            let names = spec
                .numeric
                .iter()
                .map(|c| &c.column)
                .chain(spec.categorical.iter().map(|c| &c.column));
            for name in names {
                if !seen.insert(name.as_str()) {
                    return Err(PipelineError::new(format!("column {} declared twice", name)));
                }
            }
        }

        for c in &spec.numeric {
            if !(c.scale.is_finite() && c.scale > 0.0) {
                return Err(PipelineError::new(format!(
                    "column {} has non-positive scale {}",
                    c.column, c.scale
                )));
            }
            if !c.mean.is_finite() || !c.coefficient.is_finite() {
                return Err(PipelineError::new(format!(
                    "column {} has non-finite parameters",
                    c.column
                )));
            }
        }
        for c in &spec.categorical {
            if c.levels.is_empty() {
                return Err(PipelineError::new(format!("column {} has no levels", c.column)));
            }
            if c.levels.values().any(|w| !w.is_finite()) {
                return Err(PipelineError::new(format!(
                    "column {} has non-finite level weights",
                    c.column
                )));
            }
        }

        let means = spec.numeric.iter().map(|c| c.mean).collect();
        let scales = spec.numeric.iter().map(|c| c.scale).collect();
        let coefficients = spec.numeric.iter().map(|c| c.coefficient).collect();
        Ok(Self {
            spec,
            means,
            scales,
            coefficients,
        })
    }

    pub fn spec(&self) -> &LinearSpec {
        &self.spec
    }

    /// Columns the pipeline reads, numeric first.
    pub fn input_columns(&self) -> impl Iterator<Item = &str> {
        self.spec
            .numeric
            .iter()
            .map(|c| c.column.as_str())
            .chain(self.spec.categorical.iter().map(|c| c.column.as_str()))
    }

    fn decision(&self, row: &FeatureRow) -> Result<f64, PipelineError> {
        let mut x = Array1::<f64>::zeros(self.spec.numeric.len());
        for (slot, c) in x.iter_mut().zip(&self.spec.numeric) {
            *slot = match row.get(&c.column) {
                Some(FeatureValue::Numeric(v)) if v.is_finite() => *v,
                Some(FeatureValue::Numeric(v)) => {
                    return Err(PipelineError::new(format!(
                        "column {} holds non-finite value {}",
                        c.column, v
                    )))
                }
                Some(FeatureValue::Categorical(_)) => {
                    return Err(PipelineError::new(format!(
                        "column {} expected a number, got text",
                        c.column
                    )))
                }
                None => return Err(missing(&c.column)),
            };
        }
        let mut z = self.spec.intercept + ((&x - &self.means) / &self.scales).dot(&self.coefficients);

        for c in &self.spec.categorical {
            let level = match row.get(&c.column) {
                Some(FeatureValue::Categorical(s)) => s,
                Some(FeatureValue::Numeric(_)) => {
                    return Err(PipelineError::new(format!(
                        "column {} expected a category, got a number",
                        c.column
                    )))
                }
                None => return Err(missing(&c.column)),
            };
            z += c.levels.get(level).ok_or_else(|| {
                PipelineError::new(format!(
                    "found unknown category {:?} in column {}",
                    level, c.column
                ))
            })?;
        }
        Ok(z)
    }
}

fn missing(column: &str) -> PipelineError {
    PipelineError::new(format!("input is missing column {}", column))
}

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

impl ChurnClassifier for LinearPipeline {
    fn predict_proba(&self, rows: &[FeatureRow]) -> Result<Vec<[f64; 2]>, PipelineError> {
        rows.iter()
            .map(|row| {
                let p = sigmoid(self.decision(row)?);
                Ok([1.0 - p, p])
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec() -> LinearSpec {
        LinearSpec {
            format: FORMAT_TAG.to_string(),
            name: None,
            numeric: vec![NumericColumn {
                column: "x".into(),
                mean: 1.0,
                scale: 2.0,
                coefficient: 1.0,
            }],
            categorical: vec![CategoricalColumn {
                column: "c".into(),
                levels: BTreeMap::from([("a".to_string(), 0.0), ("b".to_string(), 1.0)]),
            }],
            intercept: 0.0,
        }
    }

    fn row(x: f64, c: &str) -> FeatureRow {
        let mut r = FeatureRow::default();
        r.push("x", FeatureValue::Numeric(x));
        r.push("c", FeatureValue::Categorical(c.to_string()));
        r
    }

    #[test]
    fn zero_decision_is_even_odds() {
        let p = LinearPipeline::new(spec()).unwrap();
        let out = p.predict_proba(&[row(1.0, "a")]).unwrap();
        assert_eq!(out, vec![[0.5, 0.5]]);
    }

    #[test]
    fn standardises_and_adds_level_weight() {
        let p = LinearPipeline::new(spec()).unwrap();
        // (3 - 1) / 2 * 1 + 1 = 2
        let out = p.predict_proba(&[row(3.0, "b")]).unwrap();
        assert!((out[0][1] - sigmoid(2.0)).abs() < 1e-12);
        assert!((out[0][0] + out[0][1] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn unknown_category_is_rejected() {
        let p = LinearPipeline::new(spec()).unwrap();
        let err = p.predict_proba(&[row(1.0, "")]).unwrap_err();
        assert!(err.message.contains("unknown category"));
    }

    #[test]
    fn missing_column_is_rejected() {
        let p = LinearPipeline::new(spec()).unwrap();
        let mut r = FeatureRow::default();
        r.push("x", FeatureValue::Numeric(0.0));
        let err = p.predict_proba(&[r]).unwrap_err();
        assert!(err.message.contains("missing column c"));
    }

    #[test]
    fn rejects_bad_specs() {
        let mut s = spec();
        s.numeric[0].scale = 0.0;
        assert!(LinearPipeline::new(s).is_err());

        let mut s = spec();
        s.format = "pickle".into();
        assert!(LinearPipeline::new(s).is_err());

        let mut s = spec();
        s.categorical[0].column = "x".into();
        assert!(LinearPipeline::new(s).is_err());

        assert!(LinearPipeline::from_slice(b"not json").is_err());
    }
}
