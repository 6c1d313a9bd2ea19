use std::collections::BTreeMap;

use common::{round_to, SchemaVersion};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::{ForecastResult, ItemForecast};

/// Wire shape of a successful forecast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastResponse {
    pub predictions: IndexMap<String, f64>,
    pub uncertainty: IndexMap<String, f64>,
    pub lower_bound: IndexMap<String, f64>,
    pub upper_bound: IndexMap<String, f64>,
    /// Present for v2 artifacts only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub daily_predictions: Option<IndexMap<String, f64>>,
    /// Present for v2 artifacts only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub daily_uncertainty: Option<IndexMap<String, f64>>,
    /// Hour → aggregate demand; serialized with string keys "0".."23".
    pub hourly_forecast: BTreeMap<u32, f64>,
    pub model_version: String,
    pub model_accuracy: serde_json::Value,
}

/// Wire shape of any failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl ToString) -> Self {
        Self {
            error: error.to_string(),
        }
    }
}

impl From<&ForecastResult> for ForecastResponse {
    fn from(result: &ForecastResult) -> Self {
        let with_daily = result.schema_version == SchemaVersion::V2;

        Self {
            predictions: item_map(&result.items, |i| round_to(i.hourly, 1)),
            uncertainty: item_map(&result.items, |i| round_to(i.uncertainty, 2)),
            lower_bound: item_map(&result.items, |i| round_to(i.lower_bound, 1)),
            upper_bound: item_map(&result.items, |i| round_to(i.upper_bound, 1)),
            daily_predictions: with_daily.then(|| item_map(&result.items, |i| round_to(i.daily, 1))),
            daily_uncertainty: with_daily.then(|| item_map(&result.items, |i| i.daily_uncertainty)),
            hourly_forecast: result
                .hourly_curve
                .iter()
                .enumerate()
                .map(|(h, v)| (h as u32, round_to(*v, 1)))
                .collect(),
            model_version: result.schema_version.to_string(),
            model_accuracy: result
                .accuracy
                .clone()
                .unwrap_or_else(|| serde_json::Value::Object(Default::default())),
        }
    }
}

fn item_map(items: &[ItemForecast], value: impl Fn(&ItemForecast) -> f64) -> IndexMap<String, f64> {
    items.iter().map(|i| (i.item.clone(), value(i))).collect()
}
