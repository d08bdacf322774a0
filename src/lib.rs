//! Churn Scorer — what-if scoring of bank customers against a pre-fitted churn pipeline.
//!
//! Modular structure:
//! - [`features`] — Customer records, request schema, fixed feature derivation
//! - [`model`] — Pipeline artifact loading behind the [`model::ChurnClassifier`] trait
//! - [`scorer`] — Once-per-process pipeline handle and scoring
//! - [`risk`] — Probability to Low / Medium / High
//! - [`impact`] — Business impact simulation
//! - [`simulator`] — JSON request/response envelope
//! - [`logging`] — Structured logging

pub mod config;
pub mod error;
pub mod features;
pub mod impact;
pub mod logging;
pub mod model;
pub mod risk;
pub mod scorer;
pub mod simulator;

pub use config::ScorerConfig;
pub use error::{ConfigError, LoadError, PipelineError, ScoringError, SessionError};
pub use features::{derive_batch, derive_features, CustomerRecord, DerivedRecord, ScoringRequest};
pub use model::ChurnClassifier;
pub use risk::{classify, RiskAssessment, RiskLevel};
pub use scorer::{Scorer, ScorerCell};
pub use simulator::{run_session, Simulator};
pub use logging::StructuredLogger;
