//! Feature rows for the daily demand regressor.
//!
//! Two layouts exist. v1 carries weekday, month and promo only. v2 adds
//! calendar fields plus seven history-derived columns per menu item, which
//! are backfilled from [`common::HistoricalStats`] at inference time.

mod builder;
mod columns;
mod row;

pub use builder::FeatureBuilder;
pub use columns::{item_column, v2_base_features, ITEM_FEATURES, V1_FEATURES};
pub use row::FeatureRow;
