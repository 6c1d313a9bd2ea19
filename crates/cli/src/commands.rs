//! Subcommand bodies. Each returns whether the process should exit successfully.

use std::io::{Read, Write};
use std::path::Path;

use chrono::NaiveDate;
use common::{ForecastError, Result, SchemaVersion};
use predictor::{render_error, ForecastService};
use tracing::{error, info};
use trainer::{print_report, synthetic_history, DemandTrainer, SalesHistory};

use crate::Config;

/// Serve a single request: `input` → one JSON line on `output`.
///
/// An artifact that fails to load still produces an error object, never silence.
pub fn predict(config: &Config, mut input: impl Read, mut output: impl Write) -> bool {
    let service = ForecastService::start(Path::new(&config.app.model.path), &config.app.history);

    let mut payload = String::new();
    let (body, success) = match input.read_to_string(&mut payload) {
        Ok(_) => {
            let reply = service.respond(&payload);
            (reply.body, reply.success)
        }
        Err(e) => {
            let err = ForecastError::Input(format!("failed to read request: {e}"));
            (render_error(&err), false)
        }
    };

    if let Err(e) = writeln!(output, "{body}") {
        error!(error = %e, "Failed to write response");
        return false;
    }
    success
}

/// Fit an artifact from `history_path` and save it to the configured model path.
pub fn train(
    config: &Config,
    history_path: &Path,
    schema: Option<SchemaVersion>,
    ridge: Option<f64>,
) -> Result<()> {
    let mut train_config = config.train.clone();
    if let Some(schema) = schema {
        train_config.schema_version = schema;
    }
    if let Some(ridge) = ridge {
        train_config.ridge = ridge;
    }

    let history = SalesHistory::load(history_path)?;
    let outcome = DemandTrainer::new(train_config).train(&history)?;

    let model_path = Path::new(&config.app.model.path);
    outcome.artifact.save(model_path)?;

    print_report(&outcome);
    println!("Model saved to {}", model_path.display());
    Ok(())
}

pub fn generate(out: &Path, days: usize, start: NaiveDate, seed: u64) -> Result<()> {
    if days < 2 {
        return Err(ForecastError::Training(format!(
            "a usable history needs at least 2 days, got {days}"
        )));
    }
    let history = synthetic_history(days, start, seed);
    history.save(out)?;
    info!(path = %out.display(), days = days, seed = seed, "Synthetic history written");
    Ok(())
}
