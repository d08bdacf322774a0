//! What-if simulator: one JSON request in, one JSON response out.
//!
//! Requests are tagged by `kind`:
//! - `{"kind":"score", <eighteen request fields>}` → `{"status":"assessment", ...}`
//! - `{"kind":"impact", "at_risk_customers": 500}` → `{"status":"impact", ...}`; omitted fields use the configured defaults
//!
//! Failures come back as `{"status":"error","message":...}` and never stop the session.

use crate::error::SessionError;
use crate::features::ScoringRequest;
use crate::impact::{ImpactEstimate, ImpactInput};
use crate::risk::{RiskAssessment, RiskLevel};
use crate::scorer::{Scorer, ScorerCell};
use serde::{Deserialize, Serialize};
use std::io::{BufRead, Write};
use std::sync::Arc;
use tracing::{error, info, warn};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ImpactOverrides {
    pub at_risk_customers: Option<f64>,
    pub avg_customer_value: Option<f64>,
    pub retention_effectiveness_pct: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SimulatorRequest {
    Score(ScoringRequest),
    Impact(ImpactOverrides),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SimulatorResponse {
    Assessment(RiskAssessment),
    Impact(ImpactEstimate),
    Error { message: String },
}

impl SimulatorResponse {
    fn error(message: impl ToString) -> Self {
        SimulatorResponse::Error {
            message: message.to_string(),
        }
    }
}

pub struct Simulator {
    scorer: Arc<Scorer>,
    impact_defaults: ImpactInput,
}

impl Simulator {
    pub fn new(scorer: Arc<Scorer>, impact_defaults: ImpactInput) -> Self {
        Self {
            scorer,
            impact_defaults,
        }
    }

    pub fn handle(&self, request: &SimulatorRequest) -> SimulatorResponse {
        match request {
            SimulatorRequest::Score(req) => match self.scorer.assess_request(req) {
                Ok(assessment) => {
                    if assessment.level != RiskLevel::Low {
                        info!(
                            request_id = %assessment.request_id,
                            probability = assessment.probability,
                            level = ?assessment.level,
                            "risk result"
                        );
                    }
                    SimulatorResponse::Assessment(assessment)
                }
                Err(e) => {
                    warn!(error = %e, "scoring request failed");
                    SimulatorResponse::error(e)
                }
            },
            SimulatorRequest::Impact(o) => {
                let d = &self.impact_defaults;
                let input = ImpactInput {
                    at_risk_customers: o.at_risk_customers.unwrap_or(d.at_risk_customers),
                    avg_customer_value: o.avg_customer_value.unwrap_or(d.avg_customer_value),
                    retention_effectiveness_pct: o
                        .retention_effectiveness_pct
                        .unwrap_or(d.retention_effectiveness_pct),
                };
                match input.estimate() {
                    Ok(est) => SimulatorResponse::Impact(est),
                    Err(e) => SimulatorResponse::error(e),
                }
            }
        }
    }

    /// Parse and handle one line of input. Blank lines yield `None`.
    pub fn handle_line(&self, line: &str) -> Option<SimulatorResponse> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }
        Some(match serde_json::from_str::<SimulatorRequest>(line) {
            Ok(req) => self.handle(&req),
            Err(e) => {
                warn!(error = %e, "malformed request");
                SimulatorResponse::error(format!("malformed request: {}", e))
            }
        })
    }
}

/// Run one host session: load the pipeline from `cell`, then answer every line of
/// `input` on `output`. Returns the number of responses written.
///
/// When the pipeline cannot be loaded nothing is read from `input`.
pub fn run_session<R: BufRead, W: Write>(
    cell: &ScorerCell,
    impact_defaults: ImpactInput,
    input: R,
    mut output: W,
) -> Result<u64, SessionError> {
    let scorer = cell.get().map_err(|e| {
        error!(path = %cell.path().display(), error = %e, "failed to load model; simulator disabled");
        e
    })?;
    let simulator = Simulator::new(scorer, impact_defaults);

    let mut handled: u64 = 0;
    for line in input.lines() {
        let line = line?;
        if let Some(response) = simulator.handle_line(&line) {
            serde_json::to_writer(&mut output, &response)?;
            writeln!(output)?;
            output.flush()?;
            handled += 1;
        }
    }
    Ok(handled)
}
