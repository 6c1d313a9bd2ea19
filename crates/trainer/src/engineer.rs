use chrono::Datelike;
use common::{metrics, ForecastError, Result, SchemaVersion};
use features::{item_column, v2_base_features, ITEM_FEATURES, V1_FEATURES};
use tracing::debug;

use crate::SalesHistory;

/// Design matrix and targets, one row per history day.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingSet {
    pub feature_names: Vec<String>,
    pub item_names: Vec<String>,
    /// `rows[day][feature]`
    pub rows: Vec<Vec<f64>>,
    /// `targets[day][item]`
    pub targets: Vec<Vec<f64>>,
}

impl TrainingSet {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Time-ordered split: the first `floor(len * fraction)` days train, the rest test.
    pub fn split(&self, train_fraction: f64) -> Result<(TrainingSet, TrainingSet)> {
        let cut = (self.len() as f64 * train_fraction).floor() as usize;
        if cut == 0 || cut >= self.len() {
            return Err(ForecastError::Training(format!(
                "{} days cannot be split {:.0}/{:.0} into non-empty train and test sets",
                self.len(),
                train_fraction * 100.0,
                (1.0 - train_fraction) * 100.0
            )));
        }
        Ok((self.slice(0, cut), self.slice(cut, self.len())))
    }

    fn slice(&self, from: usize, to: usize) -> TrainingSet {
        TrainingSet {
            feature_names: self.feature_names.clone(),
            item_names: self.item_names.clone(),
            rows: self.rows[from..to].to_vec(),
            targets: self.targets[from..to].to_vec(),
        }
    }

    /// Target column for item `index`.
    pub fn target_column(&self, index: usize) -> Vec<f64> {
        self.targets.iter().map(|t| t[index]).collect()
    }
}

/// Turn a sales history into the feature layout of `schema`.
///
/// Column names agree with what the inference-time feature builder produces,
/// so a model fitted here can be served as is.
pub fn build_training_set(
    history: &SalesHistory,
    schema: SchemaVersion,
    items: &[String],
) -> Result<TrainingSet> {
    if items.is_empty() {
        return Err(ForecastError::Training("no items to train on".into()));
    }

    let mut feature_names: Vec<String> = Vec::new();
    let mut rows: Vec<Vec<f64>> = vec![Vec::new(); history.len()];

    match schema {
        SchemaVersion::V1 => {
            feature_names.extend(V1_FEATURES.iter().map(|f| f.to_string()));
            for (row, record) in rows.iter_mut().zip(history.records()) {
                row.push(record.date.weekday().num_days_from_monday() as f64);
                row.push(record.date.month() as f64);
                row.push(record.promo);
            }
        }
        SchemaVersion::V2 => {
            for (day, record) in history.records().iter().enumerate() {
                let weekday = record.date.weekday().num_days_from_monday() as f64;
                let base = v2_base_features(weekday, record.promo, record.date);
                if day == 0 {
                    feature_names.extend(base.iter().map(|(name, _)| name.clone()));
                }
                rows[day].extend(base.into_iter().map(|(_, v)| v));
            }

            let columns: Vec<ItemColumns> = items
                .iter()
                .map(|item| ItemColumns::compute(history, item))
                .collect();
            for feature in ITEM_FEATURES {
                for (item, cols) in items.iter().zip(&columns) {
                    feature_names.push(item_column(feature, item));
                    let values = cols.get(feature);
                    for (row, v) in rows.iter_mut().zip(values) {
                        row.push(*v);
                    }
                }
            }
        }
    }

    let targets: Vec<Vec<f64>> = history
        .records()
        .iter()
        .map(|r| items.iter().map(|item| r.sales_of(item)).collect())
        .collect();

    debug!(
        schema_version = %schema,
        days = rows.len(),
        features = feature_names.len(),
        items = items.len(),
        "Built training set"
    );

    Ok(TrainingSet {
        feature_names,
        item_names: items.to_vec(),
        rows,
        targets,
    })
}

/// The seven history-derived v2 columns for one item, per day.
struct ItemColumns {
    lag_1: Vec<f64>,
    lag_7: Vec<f64>,
    lag_14: Vec<f64>,
    price: Vec<f64>,
    rolling_mean_7: Vec<f64>,
    rolling_std_7: Vec<f64>,
    rolling_mean_30: Vec<f64>,
}

impl ItemColumns {
    fn compute(history: &SalesHistory, item: &str) -> Self {
        let sales = history.series(item);

        let rolling_mean_7: Vec<f64> = (0..sales.len())
            .map(|t| metrics::mean(window(&sales, t, 7)))
            .collect();
        let rolling_std_7: Vec<f64> = (0..sales.len())
            .map(|t| metrics::sample_std_dev(window(&sales, t, 7)).unwrap_or(0.0))
            .collect();
        let rolling_mean_30: Vec<f64> = (0..sales.len())
            .map(|t| metrics::mean(window(&sales, t, 30)))
            .collect();

        Self {
            lag_1: lagged(&sales, 1, &rolling_mean_7),
            lag_7: lagged(&sales, 7, &rolling_mean_7),
            lag_14: lagged(&sales, 14, &rolling_mean_30),
            price: history.records().iter().map(|r| r.price_of(item)).collect(),
            rolling_mean_7,
            rolling_std_7,
            rolling_mean_30,
        }
    }

    fn get(&self, feature: &str) -> &[f64] {
        match feature {
            "lag_1" => &self.lag_1,
            "lag_7" => &self.lag_7,
            "lag_14" => &self.lag_14,
            "price" => &self.price,
            "rolling_mean_7" => &self.rolling_mean_7,
            "rolling_std_7" => &self.rolling_std_7,
            "rolling_mean_30" => &self.rolling_mean_30,
            _ => &[],
        }
    }
}

/// Trailing window of up to `size` values ending at `t` (inclusive).
fn window(values: &[f64], t: usize, size: usize) -> &[f64] {
    let start = (t + 1).saturating_sub(size);
    &values[start..=t]
}

/// `values` shifted by `lag` days; days without history take `fallback`.
fn lagged(values: &[f64], lag: usize, fallback: &[f64]) -> Vec<f64> {
    (0..values.len())
        .map(|t| if t >= lag { values[t - lag] } else { fallback[t] })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DailyRecord;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    fn history(days: usize) -> SalesHistory {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let records = (0..days)
            .map(|d| DailyRecord {
                date: start + chrono::Duration::days(d as i64),
                promo: if d % 5 == 0 { 1.0 } else { 0.0 },
                sales: [("burger".to_string(), 10.0 + d as f64)].into_iter().collect(),
                prices: [("burger".to_string(), 21.3)].into_iter().collect(),
            })
            .collect();
        SalesHistory::new(records).unwrap()
    }

    fn column(set: &TrainingSet, name: &str) -> Vec<f64> {
        let idx = set.feature_names.iter().position(|n| n == name).unwrap();
        set.rows.iter().map(|r| r[idx]).collect()
    }

    fn items() -> Vec<String> {
        vec!["burger".to_string()]
    }

    #[test]
    fn test_v1_layout() {
        let set = build_training_set(&history(3), SchemaVersion::V1, &items()).unwrap();
        assert_eq!(set.feature_names, vec!["weekday", "month", "promo"]);
        // 2024-01-01 is a Monday
        assert_eq!(set.rows[0], vec![0.0, 1.0, 1.0]);
        assert_eq!(set.rows[2], vec![2.0, 1.0, 0.0]);
        assert_eq!(set.targets[1], vec![11.0]);
    }

    #[test]
    fn test_v2_column_names_match_inference() {
        let set = build_training_set(&history(3), SchemaVersion::V2, &items()).unwrap();
        assert_eq!(set.feature_names.len(), 9 + ITEM_FEATURES.len());
        assert_eq!(set.feature_names[0], "weekday");
        assert!(set.feature_names.contains(&"rolling_mean_30_burger".to_string()));
        assert!(set.rows.iter().all(|r| r.len() == set.feature_names.len()));
    }

    #[test]
    fn test_lags_fall_back_to_rolling_means() {
        let set = build_training_set(&history(20), SchemaVersion::V2, &items()).unwrap();
        let lag_1 = column(&set, "lag_1_burger");
        let lag_7 = column(&set, "lag_7_burger");
        let lag_14 = column(&set, "lag_14_burger");
        let mean_7 = column(&set, "rolling_mean_7_burger");
        let mean_30 = column(&set, "rolling_mean_30_burger");

        assert_eq!(lag_1[0], mean_7[0]);
        assert_eq!(lag_1[5], 14.0);
        assert_eq!(lag_7[6], mean_7[6]);
        assert_eq!(lag_7[7], 10.0);
        assert_eq!(lag_14[13], mean_30[13]);
        assert_eq!(lag_14[14], 10.0);
    }

    #[test]
    fn test_rolling_windows() {
        let set = build_training_set(&history(10), SchemaVersion::V2, &items()).unwrap();
        let mean_7 = column(&set, "rolling_mean_7_burger");
        let std_7 = column(&set, "rolling_std_7_burger");

        assert_eq!(std_7[0], 0.0);
        // days 3..=9 → 13..=19
        assert_relative_eq!(mean_7[9], 16.0);
        assert_relative_eq!(std_7[9], (28.0f64 / 6.0).sqrt(), epsilon = 1e-12);
        assert_eq!(column(&set, "price_burger"), vec![21.3; 10]);
    }

    #[test]
    fn test_split_keeps_time_order() {
        let set = build_training_set(&history(10), SchemaVersion::V1, &items()).unwrap();
        let (train, test) = set.split(0.8).unwrap();
        assert_eq!(train.len(), 8);
        assert_eq!(test.len(), 2);
        assert_eq!(test.targets[0], vec![18.0]);
    }

    #[test]
    fn test_split_needs_two_days() {
        let set = build_training_set(&history(1), SchemaVersion::V1, &items()).unwrap();
        assert!(matches!(set.split(0.8).unwrap_err(), ForecastError::Training(_)));
    }
}
