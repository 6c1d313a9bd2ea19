use std::time::Instant;

use artifact::ArtifactFile;
use common::{metrics, round_to, Regressor, Result, SchemaVersion};
use indexmap::IndexMap;
use models::{LinearRegressor, RegressorSpec};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, info, warn};

use crate::{build_training_set, fit_ridge, restaurant_hourly_profile, SalesHistory, TrainingSet};

/// Decimal places kept in the stored accuracy summary.
const ACCURACY_PLACES: i32 = 4;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainerConfig {
    /// Feature layout to fit.
    #[serde(default = "default_schema_version")]
    pub schema_version: SchemaVersion,
    /// L2 penalty on the coefficients (never on the intercept).
    #[serde(default = "default_ridge")]
    pub ridge: f64,
    /// Leading share of the history used for fitting; the rest is held out.
    #[serde(default = "default_train_fraction")]
    pub train_fraction: f64,
}

fn default_schema_version() -> SchemaVersion {
    SchemaVersion::V1
}
fn default_ridge() -> f64 {
    1.0
}
fn default_train_fraction() -> f64 {
    0.8
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            ridge: default_ridge(),
            train_fraction: default_train_fraction(),
        }
    }
}

/// Hold-out accuracy of one item's daily predictions.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemEvaluation {
    pub item: String,
    pub mae: f64,
    pub rmse: f64,
    pub r2: f64,
    /// MAE as a percentage of mean test sales; 0 when nothing sold.
    pub mape: f64,
    pub avg_sales: f64,
    /// Residual standard deviation on the training days.
    pub uncertainty: f64,
}

#[derive(Debug, Clone)]
pub struct TrainingOutcome {
    pub artifact: ArtifactFile,
    pub evaluation: Vec<ItemEvaluation>,
    pub train_days: usize,
    pub test_days: usize,
}

impl TrainingOutcome {
    pub fn avg_r2(&self) -> f64 {
        metrics::mean(&self.evaluation.iter().map(|e| e.r2).collect::<Vec<_>>())
    }
}

/// Fits a daily demand artifact from sales history.
#[derive(Debug, Clone, Default)]
pub struct DemandTrainer {
    config: TrainerConfig,
}

impl DemandTrainer {
    pub fn new(config: TrainerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TrainerConfig {
        &self.config
    }

    /// Main training entry point.
    ///
    /// Pipeline: engineer features → time split → ridge fit → residual
    /// uncertainty → hold-out evaluation → artifact.
    pub fn train(&self, history: &SalesHistory) -> Result<TrainingOutcome> {
        let start = Instant::now();
        let schema = self.config.schema_version;
        let items = history.item_names();

        info!(
            days = history.len(),
            items = items.len(),
            schema_version = %schema,
            ridge = self.config.ridge,
            "Starting training"
        );

        // Step 1: Features in the layout the server will rebuild
        let set = build_training_set(history, schema, &items)?;

        // Step 2: Time-based split
        let (train, test) = set.split(self.config.train_fraction)?;
        info!(
            train_days = train.len(),
            test_days = test.len(),
            features = set.feature_names.len(),
            "Split history"
        );

        // Step 3: Fit
        let model = fit_ridge(&train.rows, &train.targets, self.config.ridge)?;

        // Step 4: Daily uncertainty from training residuals
        let train_pred = predict_all(&model, &train)?;
        let daily_uncertainty: IndexMap<String, f64> = items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                let residuals: Vec<f64> = train
                    .targets
                    .iter()
                    .zip(&train_pred)
                    .map(|(y, p)| y[i] - p[i])
                    .collect();
                (item.clone(), metrics::std_dev(&residuals))
            })
            .collect();

        // Step 5: Hold-out evaluation
        let test_pred = predict_all(&model, &test)?;
        let evaluation: Vec<ItemEvaluation> = items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                let actual = test.target_column(i);
                let forecast: Vec<f64> = test_pred.iter().map(|p| p[i]).collect();
                let uncertainty = daily_uncertainty.get(item).copied().unwrap_or(0.0);
                evaluate(item, &forecast, &actual, uncertainty)
            })
            .collect();

        for e in &evaluation {
            debug!(item = %e.item, mae = e.mae, rmse = e.rmse, r2 = e.r2, "Item evaluated");
            if e.r2 < 0.0 {
                warn!(item = %e.item, r2 = e.r2, "Model does worse than the test mean");
            }
        }

        let artifact = ArtifactFile {
            schema_version: schema.to_string(),
            feature_names: set.feature_names.clone(),
            item_names: items,
            daily_uncertainty,
            hourly_weights: restaurant_hourly_profile(),
            accuracy: Some(accuracy_summary(&evaluation)),
            regressor: RegressorSpec::Linear(model),
        };

        let outcome = TrainingOutcome {
            artifact,
            evaluation,
            train_days: train.len(),
            test_days: test.len(),
        };
        info!(
            avg_r2 = outcome.avg_r2(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Training complete"
        );
        Ok(outcome)
    }
}

fn predict_all(model: &LinearRegressor, set: &TrainingSet) -> Result<Vec<Vec<f64>>> {
    set.rows.iter().map(|row| model.predict(row)).collect()
}

fn evaluate(item: &str, forecast: &[f64], actual: &[f64], uncertainty: f64) -> ItemEvaluation {
    let mae = metrics::mae(forecast, actual);
    let avg_sales = metrics::mean(actual);
    ItemEvaluation {
        item: item.to_string(),
        mae,
        rmse: metrics::rmse(forecast, actual),
        r2: metrics::r_squared(forecast, actual),
        mape: if avg_sales > 0.0 { mae / avg_sales * 100.0 } else { 0.0 },
        avg_sales,
        uncertainty,
    }
}

/// `{avg_r2, per_item_r2, per_item_mae, per_item_rmse}`, as stored in the artifact.
fn accuracy_summary(evaluation: &[ItemEvaluation]) -> serde_json::Value {
    let per_item = |value: fn(&ItemEvaluation) -> f64| -> IndexMap<String, f64> {
        evaluation
            .iter()
            .map(|e| (e.item.clone(), round_to(value(e), ACCURACY_PLACES)))
            .collect()
    };
    let avg_r2 = metrics::mean(&evaluation.iter().map(|e| e.r2).collect::<Vec<_>>());

    json!({
        "avg_r2": round_to(avg_r2, ACCURACY_PLACES),
        "per_item_r2": per_item(|e| e.r2),
        "per_item_mae": per_item(|e| e.mae),
        "per_item_rmse": per_item(|e| e.rmse),
    })
}
