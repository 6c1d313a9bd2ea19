use common::{ForecastError, Regressor, Result};
use features::FeatureRow;
use tracing::debug;

/// Run the regressor on an already reindexed row.
///
/// Returns one daily value per item, in `items` order. Values are not
/// clamped; negatives are the caller's concern.
pub fn predict_daily(regressor: &dyn Regressor, row: &FeatureRow, items: &[String]) -> Result<Vec<f64>> {
    if row.len() != regressor.n_features() {
        return Err(ForecastError::Prediction(format!(
            "feature row has {} columns but {} expects {}",
            row.len(),
            regressor.name(),
            regressor.n_features()
        )));
    }

    let predictions = regressor.predict(&row.values())?;

    if predictions.len() != items.len() {
        return Err(ForecastError::Prediction(format!(
            "{} returned {} outputs for {} items",
            regressor.name(),
            predictions.len(),
            items.len()
        )));
    }
    if let Some(i) = predictions.iter().position(|v| !v.is_finite()) {
        return Err(ForecastError::Prediction(format!(
            "{} produced a non-finite daily prediction for '{}'",
            regressor.name(),
            items[i]
        )));
    }

    debug!(regressor = regressor.name(), daily = ?predictions, "Daily predictions");
    Ok(predictions)
}
