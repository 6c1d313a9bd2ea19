use chrono::{Datelike, NaiveDate};
use common::{round_to, HistoricalStats, InferenceRequest, SchemaVersion};
use tracing::debug;

use crate::columns::{item_column, v2_base_features};
use crate::FeatureRow;

/// Builds the raw feature row for one request, per artifact schema.
#[derive(Debug, Clone)]
pub enum FeatureBuilder {
    /// weekday, month, promo.
    V1,
    /// Calendar fields plus per-item history columns backfilled from `stats`.
    V2 {
        items: Vec<String>,
        stats: HistoricalStats,
    },
}

impl FeatureBuilder {
    pub fn for_schema(version: SchemaVersion, items: &[String], stats: &HistoricalStats) -> Self {
        match version {
            SchemaVersion::V1 => FeatureBuilder::V1,
            SchemaVersion::V2 => FeatureBuilder::V2 {
                items: items.to_vec(),
                stats: stats.clone(),
            },
        }
    }

    pub fn schema_version(&self) -> SchemaVersion {
        match self {
            FeatureBuilder::V1 => SchemaVersion::V1,
            FeatureBuilder::V2 { .. } => SchemaVersion::V2,
        }
    }

    /// Build the row for `request`, with calendar fields taken from `today`
    /// (the request carries no date).
    ///
    /// The row is in construction order; reindex it against the artifact's
    /// feature names before prediction.
    pub fn build_features(&self, request: &InferenceRequest, today: NaiveDate) -> FeatureRow {
        let weekday = request.weekday as f64;
        let row = match self {
            FeatureBuilder::V1 => build_v1(weekday, request.promo(), today),
            FeatureBuilder::V2 { items, stats } => {
                build_v2(weekday, request.promo(), today, items, stats)
            }
        };

        debug!(
            schema_version = %self.schema_version(),
            columns = row.len(),
            "Built feature row"
        );
        row
    }
}

fn build_v1(weekday: f64, promo: f64, today: NaiveDate) -> FeatureRow {
    let mut row = FeatureRow::new();
    row.insert("weekday", weekday);
    row.insert("month", today.month() as f64);
    row.insert("promo", promo);
    row
}

fn build_v2(
    weekday: f64,
    promo: f64,
    today: NaiveDate,
    items: &[String],
    stats: &HistoricalStats,
) -> FeatureRow {
    let mut row: FeatureRow = v2_base_features(weekday, promo, today).into_iter().collect();

    // Small weekday-dependent tilt so lag_1 is not a copy of lag_7.
    let weekday_tilt = 1.0 + (weekday - 3.0) * 0.02;

    for item in items {
        let mean = stats.mean(item);
        let std = stats.std(item);

        row.insert(item_column("lag_1", item), round_to(mean * weekday_tilt, 1));
        row.insert(item_column("lag_7", item), round_to(mean, 1));
        row.insert(item_column("lag_14", item), round_to(mean * 0.98, 1));
        row.insert(item_column("price", item), stats.price(item));
        row.insert(item_column("rolling_mean_7", item), round_to(mean, 1));
        row.insert(item_column("rolling_std_7", item), round_to(std, 2));
        row.insert(item_column("rolling_mean_30", item), round_to(mean * 0.98, 1));
    }
    row
}
