use artifact::ModelArtifact;
use chrono::{Local, NaiveDate};
use common::{round_to, HistoricalStats, InferenceRequest, Result, SchemaVersion};
use features::FeatureBuilder;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    aggregate_curve, hourly_share, hourly_uncertainty, interval_95, non_negative, predict_daily,
    Weather,
};

/// Forecast for one menu item at the requested hour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemForecast {
    pub item: String,
    /// Weather-adjusted hourly point estimate.
    pub hourly: f64,
    /// Hourly standard deviation.
    pub uncertainty: f64,
    pub lower_bound: f64,
    pub upper_bound: f64,
    /// Clamped daily point estimate.
    pub daily: f64,
    /// Daily residual standard deviation, as stored in the artifact.
    pub daily_uncertainty: f64,
}

/// Full result of a forecast request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastResult {
    pub hour: i64,
    /// One entry per artifact item, in artifact order.
    pub items: Vec<ItemForecast>,
    /// Weather-adjusted total demand for hours 0..24.
    pub hourly_curve: Vec<f64>,
    pub weather_factor: f64,
    pub schema_version: SchemaVersion,
    pub accuracy: Option<serde_json::Value>,
    /// Number of model features that had to be zero-filled.
    pub filled_features: usize,
}

/// A loaded artifact plus the feature builder matching its schema.
#[derive(Debug)]
pub struct ForecastPipeline {
    artifact: ModelArtifact,
    features: FeatureBuilder,
}

impl ForecastPipeline {
    pub fn new(artifact: ModelArtifact, history: &HistoricalStats) -> Self {
        let features =
            FeatureBuilder::for_schema(artifact.schema_version(), artifact.item_names(), history);
        Self { artifact, features }
    }

    pub fn artifact(&self) -> &ModelArtifact {
        &self.artifact
    }

    /// Forecast with calendar features taken from today's local date.
    pub fn forecast(&self, request: &InferenceRequest) -> Result<ForecastResult> {
        self.forecast_on(request, Local::now().date_naive())
    }

    /// Main forecast entry point.
    ///
    /// Pipeline: build features → reindex → daily predict → per-item hourly
    /// split, weather and interval → aggregate curve.
    pub fn forecast_on(&self, request: &InferenceRequest, today: NaiveDate) -> Result<ForecastResult> {
        let artifact = &self.artifact;

        info!(
            hour = request.hour,
            weekday = request.weekday,
            temperature = request.temperature,
            rainfall = request.rainfall,
            event = request.event_flag,
            schema_version = %artifact.schema_version(),
            "Starting forecast"
        );

        // Step 1: Features, laid out in trained column order
        let row = self
            .features
            .build_features(request, today)
            .reindex(artifact.feature_names());

        // Step 2: Daily demand per item
        let daily = predict_daily(artifact.regressor(), &row, artifact.item_names())?;

        // Step 3: Per-item hourly value, weather, uncertainty
        let weights = artifact.hourly_weights();
        let weight = weights.weight(request.hour);
        let weather = Weather::from(request);

        let items: Vec<ItemForecast> = artifact
            .item_names()
            .iter()
            .zip(&daily)
            .map(|(item, &daily_pred)| {
                let hourly = non_negative(weather.adjust(hourly_share(daily_pred, weight)));
                // Bounds are derived from the reported (rounded) sigma.
                let uncertainty =
                    round_to(hourly_uncertainty(artifact.daily_uncertainty(item), weight), 2);
                let interval = interval_95(hourly, uncertainty);
                ItemForecast {
                    item: item.clone(),
                    hourly,
                    uncertainty,
                    lower_bound: interval.lower,
                    upper_bound: interval.upper,
                    daily: non_negative(daily_pred),
                    daily_uncertainty: artifact.daily_uncertainty(item),
                }
            })
            .collect();

        // Step 4: Aggregate curve from the pre-summed daily total
        let hourly_curve = aggregate_curve(&daily, weights, &weather);

        info!(
            items = items.len(),
            weight = weight,
            weather_factor = weather.factor(),
            filled_features = row.filled_columns().len(),
            "Forecast complete"
        );

        Ok(ForecastResult {
            hour: request.hour,
            items,
            hourly_curve,
            weather_factor: weather.factor(),
            schema_version: artifact.schema_version(),
            accuracy: artifact.accuracy().cloned(),
            filled_features: row.filled_columns().len(),
        })
    }
}
