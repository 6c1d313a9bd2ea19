//! Hourly demand inference.
//!
//! request → features → daily regressor → hourly split + uncertainty →
//! weather adjustment → response.

mod daily;
mod disaggregate;
mod pipeline;
mod response;
mod service;
mod uncertainty;
mod weather;

pub use daily::predict_daily;
pub use disaggregate::{aggregate_curve, hourly_share, non_negative};
pub use pipeline::{ForecastPipeline, ForecastResult, ItemForecast};
pub use response::{ErrorResponse, ForecastResponse};
pub use service::{parse_request, render_error, ForecastService, Reply, ServiceState};
pub use uncertainty::{hourly_uncertainty, interval_95, Interval};
pub use weather::Weather;
