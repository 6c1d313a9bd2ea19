use chrono::{Datelike, NaiveDate};

/// Column names of a v1 row, in trained order.
pub const V1_FEATURES: [&str; 3] = ["weekday", "month", "promo"];

/// Per-item v2 columns. Each is suffixed with `_<item>`.
pub const ITEM_FEATURES: [&str; 7] = [
    "lag_1",
    "lag_7",
    "lag_14",
    "price",
    "rolling_mean_7",
    "rolling_std_7",
    "rolling_mean_30",
];

/// `lag_1` + `burger` → `lag_1_burger`
pub fn item_column(feature: &str, item: &str) -> String {
    format!("{feature}_{item}")
}

/// The nine v2 base columns for `date`.
///
/// `weekday` and `promo` are passed in rather than derived from `date`:
/// at inference time they come from the request, during training from the record.
pub fn v2_base_features(weekday: f64, promo: f64, date: NaiveDate) -> Vec<(String, f64)> {
    let month = date.month();
    let day = date.day();
    vec![
        ("weekday".into(), weekday),
        ("month".into(), month as f64),
        ("promo".into(), promo),
        ("day_of_month".into(), day as f64),
        ("year".into(), date.year() as f64),
        ("is_weekend".into(), flag(weekday >= 5.0)),
        ("is_month_start".into(), flag(day <= 3)),
        ("is_month_end".into(), flag(day >= 28)),
        ("quarter".into(), ((month - 1) / 3 + 1) as f64),
    ]
}

fn flag(b: bool) -> f64 {
    if b {
        1.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn value(cols: &[(String, f64)], name: &str) -> f64 {
        cols.iter().find(|(n, _)| n == name).unwrap().1
    }

    #[test]
    fn test_quarter_boundaries() {
        for (month, quarter) in [(1, 1.0), (3, 1.0), (4, 2.0), (9, 3.0), (10, 4.0), (12, 4.0)] {
            let date = NaiveDate::from_ymd_opt(2025, month, 15).unwrap();
            assert_eq!(value(&v2_base_features(0.0, 0.0, date), "quarter"), quarter);
        }
    }

    #[test]
    fn test_month_edges() {
        let start = NaiveDate::from_ymd_opt(2025, 2, 3).unwrap();
        let end = NaiveDate::from_ymd_opt(2025, 2, 28).unwrap();
        let mid = NaiveDate::from_ymd_opt(2025, 2, 14).unwrap();

        assert_eq!(value(&v2_base_features(0.0, 0.0, start), "is_month_start"), 1.0);
        assert_eq!(value(&v2_base_features(0.0, 0.0, end), "is_month_end"), 1.0);
        let m = v2_base_features(0.0, 0.0, mid);
        assert_eq!(value(&m, "is_month_start"), 0.0);
        assert_eq!(value(&m, "is_month_end"), 0.0);
    }

    #[test]
    fn test_weekend_from_weekday_argument() {
        let date = NaiveDate::from_ymd_opt(2025, 6, 11).unwrap(); // a Wednesday
        assert_eq!(value(&v2_base_features(5.0, 0.0, date), "is_weekend"), 1.0);
        assert_eq!(value(&v2_base_features(4.0, 0.0, date), "is_weekend"), 0.0);
    }

    #[test]
    fn test_item_column_name() {
        assert_eq!(item_column("rolling_std_7", "drink"), "rolling_std_7_drink");
    }
}
