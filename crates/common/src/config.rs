use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Application-level configuration, mirrors demand-forecast.yaml.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub model: ModelConfig,

    #[serde(default)]
    pub history: HistoricalStats,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Path of the model artifact read at startup.
    #[serde(default = "default_model_path")]
    pub path: String,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            path: default_model_path(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
        }
    }
}

/// Per-item sales statistics summarised from the training data.
///
/// v2 models expect lag and rolling-window columns that a single request
/// cannot supply; these values stand in for them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalStats {
    #[serde(default = "default_means")]
    pub means: IndexMap<String, f64>,
    #[serde(default = "default_stds")]
    pub stds: IndexMap<String, f64>,
    #[serde(default = "default_prices")]
    pub prices: IndexMap<String, f64>,

    #[serde(default = "default_mean")]
    pub default_mean: f64,
    #[serde(default = "default_std")]
    pub default_std: f64,
    #[serde(default = "default_price")]
    pub default_price: f64,
}

impl Default for HistoricalStats {
    fn default() -> Self {
        Self {
            means: default_means(),
            stds: default_stds(),
            prices: default_prices(),
            default_mean: default_mean(),
            default_std: default_std(),
            default_price: default_price(),
        }
    }
}

impl HistoricalStats {
    pub fn mean(&self, item: &str) -> f64 {
        self.means.get(item).copied().unwrap_or(self.default_mean)
    }

    pub fn std(&self, item: &str) -> f64 {
        self.stds.get(item).copied().unwrap_or(self.default_std)
    }

    pub fn price(&self, item: &str) -> f64 {
        self.prices.get(item).copied().unwrap_or(self.default_price)
    }
}

fn default_model_path() -> String {
    "model/demand_model.json".into()
}
fn default_log_filter() -> String {
    "warn".into()
}
fn default_means() -> IndexMap<String, f64> {
    table(&[
        ("burger", 37.0),
        ("fries", 32.0),
        ("wrap", 36.0),
        ("bucket", 35.0),
        ("drink", 27.0),
    ])
}
fn default_stds() -> IndexMap<String, f64> {
    table(&[
        ("burger", 5.0),
        ("fries", 4.5),
        ("wrap", 5.0),
        ("bucket", 4.8),
        ("drink", 3.5),
    ])
}
fn default_prices() -> IndexMap<String, f64> {
    table(&[
        ("burger", 21.3),
        ("fries", 14.2),
        ("wrap", 18.4),
        ("bucket", 32.5),
        ("drink", 8.7),
    ])
}
fn default_mean() -> f64 {
    30.0
}
fn default_std() -> f64 {
    5.0
}
fn default_price() -> f64 {
    15.0
}

fn table(entries: &[(&str, f64)]) -> IndexMap<String, f64> {
    entries.iter().map(|(k, v)| (k.to_string(), *v)).collect()
}
