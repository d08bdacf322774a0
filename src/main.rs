//! Churn simulator entrypoint: loads the pipeline once, then answers newline-delimited
//! JSON requests from stdin with one JSON response per line on stdout.
//! If the pipeline cannot be loaded, no request is read.

use churn_scorer::{
    config::ScorerConfig, impact::ImpactInput, logging::StructuredLogger, scorer,
    simulator::run_session,
};
use tracing::info;

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let config_path = std::env::var("CHURN_CONFIG_PATH")
        .map(std::path::PathBuf::from)
        .unwrap_or_else(|_| std::path::PathBuf::from("config.json"));
    let config = ScorerConfig::load(&config_path)?;

    StructuredLogger::init(config.log.json, &config.log.level);

    info!(model_path = ?config.model_path, "churn simulator starting");

    let cell = scorer::shared_cell(&config.model_path);
    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    let handled = run_session(
        cell,
        ImpactInput::from(&config.impact),
        stdin.lock(),
        stdout.lock(),
    )?;

    info!(handled, "churn simulator stopping");
    Ok(())
}
