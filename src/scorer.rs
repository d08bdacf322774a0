//! Scorer: owns the loaded pipeline, derives features for a record and turns the
//! pipeline's output into a [`RiskAssessment`].
//!
//! The pipeline is loaded at most once per [`ScorerCell`]; [`shared`] is the
//! process-wide cell used by the simulator host. A failed load is cached too, so the
//! scoring path stays disabled until the process restarts.

use crate::error::{LoadError, ScoringError};
use crate::features::{derive_features, CustomerRecord, ScoringRequest};
use crate::model::{load_artifact, ArtifactInfo, ChurnClassifier, CHURN_CLASS};
use crate::risk::RiskAssessment;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};
use tracing::{debug, info, warn};

pub struct Scorer {
    classifier: Box<dyn ChurnClassifier>,
    artifact: Option<ArtifactInfo>,
}

impl Scorer {
    /// Deserialize the artifact at `path`.
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        match load_artifact(path) {
            Ok((classifier, info)) => Ok(Self {
                classifier,
                artifact: Some(info),
            }),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "pipeline load failed");
                Err(e)
            }
        }
    }

    /// Wrap an already-built classifier (no artifact on disk).
    pub fn from_classifier(classifier: Box<dyn ChurnClassifier>) -> Self {
        Self {
            classifier,
            artifact: None,
        }
    }

    pub fn artifact(&self) -> Option<&ArtifactInfo> {
        self.artifact.as_ref()
    }

    /// Churn probability for one record.
    pub fn score(&self, record: &CustomerRecord) -> Result<f64, ScoringError> {
        let row = derive_features(record).to_row();
        let mut dist = self.classifier.predict_proba(std::slice::from_ref(&row))?;
        if dist.len() != 1 {
            return Err(ScoringError::InvalidOutput(format!(
                "expected 1 row, got {}",
                dist.len()
            )));
        }
        let probs = dist.remove(0);
        let p = probs[CHURN_CLASS];
        if !(0.0..=1.0).contains(&p) {
            return Err(ScoringError::InvalidOutput(format!(
                "churn probability {} is outside [0, 1]",
                p
            )));
        }
        debug!(probability = p, "record scored");
        Ok(p)
    }

    /// Validate a raw request, then [`Scorer::score`] it.
    pub fn score_request(&self, request: &ScoringRequest) -> Result<f64, ScoringError> {
        let record = CustomerRecord::try_from(request)?;
        self.score(&record)
    }

    /// Score and label in one step.
    pub fn assess(&self, record: &CustomerRecord) -> Result<RiskAssessment, ScoringError> {
        self.score(record).map(RiskAssessment::new)
    }

    pub fn assess_request(&self, request: &ScoringRequest) -> Result<RiskAssessment, ScoringError> {
        self.score_request(request).map(RiskAssessment::new)
    }
}

/// Lazily loaded, never-unloaded scorer for one artifact path.
pub struct ScorerCell {
    path: PathBuf,
    cell: OnceLock<Result<Arc<Scorer>, LoadError>>,
}

impl ScorerCell {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cell: OnceLock::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load on first call; later calls return the same handle (or the same failure).
    pub fn get(&self) -> Result<Arc<Scorer>, LoadError> {
        self.cell
            .get_or_init(|| Scorer::load(&self.path).map(Arc::new))
            .clone()
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self.cell.get(), Some(Ok(_)))
    }
}

static SHARED: OnceLock<ScorerCell> = OnceLock::new();

/// Process-wide cell. The first caller's `path` decides which artifact is loaded;
/// the path of later calls is ignored.
pub fn shared_cell(path: &Path) -> &'static ScorerCell {
    SHARED.get_or_init(|| {
        info!(path = %path.display(), "initialising shared scorer");
        ScorerCell::new(path)
    })
}

/// Process-wide scorer, loaded through [`shared_cell`].
pub fn shared(path: &Path) -> Result<Arc<Scorer>, LoadError> {
    shared_cell(path).get()
}
