//! ONNX Runtime backend for pipelines exported column-per-input (skl2onnx style):
//! every input is a `[N, 1]` tensor named after its column, the probability output
//! is a `[N, 2]` float tensor (export with ZipMap disabled).

use super::ChurnClassifier;
use crate::error::PipelineError;
use crate::features::{FeatureRow, FeatureValue};
use ort::session::{builder::GraphOptimizationLevel, Session};
use ort::tensor::TensorElementType;
use ort::value::{DynValue, Tensor, ValueType};
use std::path::Path;
use std::sync::Mutex;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InputKind {
    Float32,
    Float64,
    Int64,
    Text,
}

#[derive(Debug, Clone)]
struct InputColumn {
    name: String,
    kind: InputKind,
}

pub struct OnnxPipeline {
    // `Session::run` needs `&mut`; one request at a time per session
    session: Mutex<Session>,
    inputs: Vec<InputColumn>,
    output_name: String,
}

fn ort_err(e: ort::Error) -> PipelineError {
    PipelineError::new(e.to_string())
}

impl OnnxPipeline {
    pub fn load(path: &Path) -> Result<Self, PipelineError> {
        let session = Session::builder()
            .and_then(|b| b.with_optimization_level(GraphOptimizationLevel::Level3))
            .and_then(|b| b.with_intra_threads(1))
            .and_then(|b| b.commit_from_file(path))
            .map_err(ort_err)?;

        let mut inputs = Vec::with_capacity(session.inputs.len());
        for input in &session.inputs {
            let kind = match &input.input_type {
                ValueType::Tensor { ty, .. } => match ty {
                    TensorElementType::Float32 => InputKind::Float32,
                    TensorElementType::Float64 => InputKind::Float64,
                    TensorElementType::Int64 => InputKind::Int64,
                    TensorElementType::String => InputKind::Text,
                    other => {
                        return Err(PipelineError::new(format!(
                            "input {} has unsupported element type {:?}",
                            input.name, other
                        )))
                    }
                },
                other => {
                    return Err(PipelineError::new(format!(
                        "input {} is not a tensor: {:?}",
                        input.name, other
                    )))
                }
            };
            inputs.push(InputColumn {
                name: input.name.clone(),
                kind,
            });
        }

        let output_name = session
            .outputs
            .iter()
            .find(|o| o.name.contains("prob"))
            .or_else(|| session.outputs.last())
            .map(|o| o.name.clone())
            .ok_or_else(|| PipelineError::new("model declares no outputs"))?;

        info!(
            inputs = inputs.len(),
            output = %output_name,
            "ONNX session ready"
        );

        Ok(Self {
            session: Mutex::new(session),
            inputs,
            output_name,
        })
    }

    fn column_tensor(&self, input: &InputColumn, row: &FeatureRow) -> Result<DynValue, PipelineError> {
        let value = row
            .get(&input.name)
            .ok_or_else(|| PipelineError::new(format!("input is missing column {}", input.name)))?;
        let shape = vec![1_i64, 1];
        let tensor = match (input.kind, value) {
            (InputKind::Float32, FeatureValue::Numeric(v)) => {
                Tensor::from_array((shape, vec![*v as f32])).map(|t| t.into_dyn())
            }
            (InputKind::Float64, FeatureValue::Numeric(v)) => {
                Tensor::from_array((shape, vec![*v])).map(|t| t.into_dyn())
            }
            (InputKind::Int64, FeatureValue::Numeric(v)) => {
                Tensor::from_array((shape, vec![*v as i64])).map(|t| t.into_dyn())
            }
            (InputKind::Text, FeatureValue::Categorical(s)) => {
                Tensor::from_string_array((shape, vec![s.clone()].as_slice())).map(|t| t.into_dyn())
            }
            (kind, _) => {
                return Err(PipelineError::new(format!(
                    "column {} does not match model input type {:?}",
                    input.name, kind
                )))
            }
        };
        tensor.map_err(ort_err)
    }

    fn predict_one(&self, row: &FeatureRow) -> Result<[f64; 2], PipelineError> {
        let mut feed: Vec<(String, DynValue)> = Vec::with_capacity(self.inputs.len());
        for input in &self.inputs {
            feed.push((input.name.clone(), self.column_tensor(input, row)?));
        }

        let mut session = self
            .session
            .lock()
            .map_err(|e| PipelineError::new(format!("session lock poisoned: {}", e)))?;
        let outputs = session.run(feed).map_err(ort_err)?;
        let output = outputs
            .get(self.output_name.as_str())
            .ok_or_else(|| PipelineError::new(format!("output {} missing", self.output_name)))?;
        let (shape, data) = output.try_extract_tensor::<f32>().map_err(ort_err)?;

        let dims: Vec<i64> = shape.iter().copied().collect();
        let classes = dims.last().copied().unwrap_or(0);
        if classes != 2 || data.len() < 2 {
            return Err(PipelineError::new(format!(
                "expected a [1, 2] probability tensor, got shape {:?}",
                dims
            )));
        }
        Ok([data[0] as f64, data[1] as f64])
    }
}

impl ChurnClassifier for OnnxPipeline {
    fn predict_proba(&self, rows: &[FeatureRow]) -> Result<Vec<[f64; 2]>, PipelineError> {
        rows.iter().map(|row| self.predict_one(row)).collect()
    }
}
