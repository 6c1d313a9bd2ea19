use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::ForecastError;

/// Number of slots in the hourly profile.
pub const HOURS_PER_DAY: u32 = 24;

/// Weight used for an hour the profile does not define.
pub const FALLBACK_HOURLY_WEIGHT: f64 = 0.04;

/// The menu the bundled models are trained on.
pub const DEFAULT_ITEMS: [&str; 5] = ["burger", "fries", "wrap", "bucket", "drink"];

/// Feature layout an artifact was trained with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaVersion {
    /// weekday, month, promo
    V1,
    /// calendar fields plus per-item lag/rolling/price columns
    V2,
}

impl SchemaVersion {
    pub fn as_str(&self) -> &'static str {
        match self {
            SchemaVersion::V1 => "v1",
            SchemaVersion::V2 => "v2",
        }
    }
}

impl fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SchemaVersion {
    type Err = ForecastError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "v1" => Ok(SchemaVersion::V1),
            "v2" => Ok(SchemaVersion::V2),
            other => Err(ForecastError::Configuration(format!(
                "unknown schema version '{other}'"
            ))),
        }
    }
}

/// One inference request, as read from the request channel.
///
/// Missing fields take their defaults and unknown fields are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InferenceRequest {
    #[serde(deserialize_with = "deserialize_whole")]
    pub hour: i64,
    #[serde(rename = "day_of_week", deserialize_with = "deserialize_whole")]
    pub weekday: i64,
    /// Degrees Celsius.
    pub temperature: f64,
    /// Millimetres.
    pub rainfall: f64,
    #[serde(deserialize_with = "deserialize_flag")]
    pub event_flag: bool,
}

impl Default for InferenceRequest {
    fn default() -> Self {
        Self {
            hour: 12,
            weekday: 0,
            temperature: 25.0,
            rainfall: 0.0,
            event_flag: false,
        }
    }
}

impl InferenceRequest {
    /// The event flag as the 0/1 promotion indicator the models expect.
    pub fn promo(&self) -> f64 {
        if self.event_flag {
            1.0
        } else {
            0.0
        }
    }
}

/// Accepts `true`/`false` as well as numeric flags; any non-zero number is set.
fn deserialize_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Number(f64),
    }

    Ok(match Flag::deserialize(deserializer)? {
        Flag::Bool(b) => b,
        Flag::Number(n) => n != 0.0,
    })
}

/// Accepts integers and integral floats (`13.0`); fractional values are rejected.
fn deserialize_whole<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Whole {
        Int(i64),
        Float(f64),
    }

    match Whole::deserialize(deserializer)? {
        Whole::Int(n) => Ok(n),
        Whole::Float(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < 9.0e15 => Ok(f as i64),
        Whole::Float(f) => Err(serde::de::Error::custom(format!(
            "expected a whole number, got {f}"
        ))),
    }
}

/// Hour-of-day → share of daily demand.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HourlyWeights(BTreeMap<u32, f64>);

impl HourlyWeights {
    pub fn new(weights: BTreeMap<u32, f64>) -> Self {
        Self(weights)
    }

    /// Weight for `hour`, or [`FALLBACK_HOURLY_WEIGHT`] when the profile has no entry.
    pub fn weight(&self, hour: i64) -> f64 {
        u32::try_from(hour)
            .ok()
            .and_then(|h| self.0.get(&h).copied())
            .unwrap_or(FALLBACK_HOURLY_WEIGHT)
    }

    pub fn sum(&self) -> f64 {
        self.0.values().sum()
    }

    /// Rescale so the weights sum to 1. A zero profile is left untouched.
    pub fn normalized(&self) -> Self {
        let total = self.sum();
        if total <= 0.0 {
            return self.clone();
        }
        Self(self.0.iter().map(|(h, w)| (*h, w / total)).collect())
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, f64)> + '_ {
        self.0.iter().map(|(h, w)| (*h, *w))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(u32, f64)> for HourlyWeights {
    fn from_iter<I: IntoIterator<Item = (u32, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// A fitted multi-output regressor.
///
/// Inputs are read positionally: `features[i]` must be the value of the
/// i-th trained feature. Outputs come back in trained target order.
pub trait Regressor: Send + Sync + fmt::Debug {
    /// Returns the regressor's name.
    fn name(&self) -> &str;

    /// Width of the input vector the regressor was fitted on.
    fn n_features(&self) -> usize;

    /// Number of targets produced per prediction.
    fn n_outputs(&self) -> usize;

    /// Predict all targets for a single feature row.
    fn predict(&self, features: &[f64]) -> crate::Result<Vec<f64>>;
}

/// Round to `places` decimal places, ties to even.
///
/// Ties are decided on the exact binary value: `2.25` is a tie and becomes
/// `2.2`, while `2.675` is stored just below the midpoint and becomes `2.67`.
pub fn round_to(value: f64, places: i32) -> f64 {
    let scale = 10f64.powi(places);
    let scaled = value * scale;
    let floor = scaled.floor();

    let rounded = if scaled - floor == 0.5 {
        // The product may have been rounded onto the midpoint; its exact residual decides.
        let residual = value.mul_add(scale, -scaled);
        if residual > 0.0 {
            floor + 1.0
        } else if residual < 0.0 {
            floor
        } else {
            scaled.round_ties_even()
        }
    } else {
        scaled.round()
    };
    rounded / scale
}
