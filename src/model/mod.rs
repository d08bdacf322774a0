//! Fitted churn pipeline consumed as an opaque classifier.
//!
//! - [`linear`] — JSON export of a standardise + one-hot + logistic pipeline
//! - `onnx` — ONNX Runtime sessions (cargo feature `onnx`)

pub mod linear;
#[cfg(feature = "onnx")]
pub mod onnx;

pub use linear::LinearPipeline;
#[cfg(feature = "onnx")]
pub use onnx::OnnxPipeline;

use crate::error::{LoadError, PipelineError};
use crate::features::FeatureRow;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Class index of "churned" in a predicted distribution.
pub const CHURN_CLASS: usize = 1;

/// Anything that maps a table of derived records to per-row `[retained, churned]`
/// probabilities. Inference must not mutate observable state, so one instance
/// can serve concurrent requests.
pub trait ChurnClassifier: Send + Sync {
    fn predict_proba(&self, rows: &[FeatureRow]) -> Result<Vec<[f64; 2]>, PipelineError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactFormat {
    LinearJson,
    Onnx,
}

impl ArtifactFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Some(ArtifactFormat::LinearJson),
            Some(ext) if ext.eq_ignore_ascii_case("onnx") => Some(ArtifactFormat::Onnx),
            _ => None,
        }
    }
}

/// Where the loaded pipeline came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactInfo {
    pub path: PathBuf,
    pub format: ArtifactFormat,
    pub sha256: String,
    pub size_bytes: u64,
}

/// Read and deserialize the artifact at `path`. The format is picked from the file extension.
pub fn load_artifact(path: &Path) -> Result<(Box<dyn ChurnClassifier>, ArtifactInfo), LoadError> {
    let format = ArtifactFormat::from_path(path).ok_or_else(|| LoadError::UnsupportedFormat {
        path: path.to_path_buf(),
    })?;
    if format == ArtifactFormat::Onnx && !cfg!(feature = "onnx") {
        warn!(path = %path.display(), "ONNX artifact given but built without the `onnx` feature");
        return Err(LoadError::UnsupportedFormat {
            path: path.to_path_buf(),
        });
    }
    let bytes = std::fs::read(path).map_err(|e| LoadError::from_io(path, &e))?;

    let info = ArtifactInfo {
        path: path.to_path_buf(),
        format,
        sha256: format!("{:x}", Sha256::digest(&bytes)),
        size_bytes: bytes.len() as u64,
    };

    let classifier: Box<dyn ChurnClassifier> = match format {
        ArtifactFormat::LinearJson => Box::new(
            LinearPipeline::from_slice(&bytes).map_err(|e| LoadError::incompatible(path, e))?,
        ),
        #[cfg(feature = "onnx")]
        ArtifactFormat::Onnx => OnnxPipeline::load(path)
            .map(|p| Box::new(p) as Box<dyn ChurnClassifier>)
            .map_err(|e| LoadError::incompatible(path, e))?,
        #[cfg(not(feature = "onnx"))]
        ArtifactFormat::Onnx => {
            return Err(LoadError::UnsupportedFormat {
                path: path.to_path_buf(),
            })
        }
    };

    info!(
        path = %info.path.display(),
        format = ?info.format,
        sha256 = %info.sha256,
        size_bytes = info.size_bytes,
        "pipeline artifact loaded"
    );
    Ok((classifier, info))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_from_extension() {
        assert_eq!(
            ArtifactFormat::from_path(Path::new("models/p.json")),
            Some(ArtifactFormat::LinearJson)
        );
        assert_eq!(
            ArtifactFormat::from_path(Path::new("p.ONNX")),
            Some(ArtifactFormat::Onnx)
        );
        assert_eq!(ArtifactFormat::from_path(Path::new("bank_churn_pipeline.pkl")), None);
        assert_eq!(ArtifactFormat::from_path(Path::new("model")), None);
    }

    #[test]
    fn pickle_is_unsupported() {
        let err = load_artifact(Path::new("models/bank_churn_pipeline.pkl"))
            .err()
            .unwrap();
        assert!(matches!(err, LoadError::UnsupportedFormat { .. }));
    }

    #[cfg(not(feature = "onnx"))]
    #[test]
    fn onnx_without_feature_is_rejected_before_read() {
        // missing file: a read attempt would surface as NotFound
        let err = load_artifact(Path::new("does/not/exist/pipeline.onnx"))
            .err()
            .unwrap();
        assert!(matches!(err, LoadError::UnsupportedFormat { .. }));
    }
}
