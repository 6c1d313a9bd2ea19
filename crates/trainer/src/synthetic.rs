use chrono::{Datelike, NaiveDate};
use common::{HistoricalStats, DEFAULT_ITEMS};
use indexmap::IndexMap;

use crate::{DailyRecord, SalesHistory};

/// Weekend lift on daily demand.
const WEEKEND_MULTIPLIER: f64 = 1.25;
/// Lift on promotion days.
const PROMO_MULTIPLIER: f64 = 1.3;
/// Roughly one day in seven runs a promotion.
const PROMO_PROBABILITY: f64 = 0.15;

/// Deterministic LCG stream of values in `[0, 1)`.
struct Lcg(u64);

impl Lcg {
    fn next(&mut self) -> f64 {
        // LCG parameters (Numerical Recipes)
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1);
        ((self.0 >> 33) as f64) / ((1u64 << 31) as f64)
    }

    /// Symmetric noise in `[-amplitude, amplitude)`.
    fn noise(&mut self, amplitude: f64) -> f64 {
        (self.next() * 2.0 - 1.0) * amplitude
    }
}

/// A reproducible daily history for the default menu.
///
/// Each item sells around its historical mean, lifted on weekends and promotion
/// days, with uniform noise of one standard deviation.
pub fn synthetic_history(days: usize, start: NaiveDate, seed: u64) -> SalesHistory {
    let stats = HistoricalStats::default();
    let mut rng = Lcg(seed);

    let records: Vec<DailyRecord> = start
        .iter_days()
        .take(days.max(1))
        .map(|date| {
            let promo = if rng.next() < PROMO_PROBABILITY { 1.0 } else { 0.0 };
            let weekend = date.weekday().num_days_from_monday() >= 5;

            let mut lift = 1.0;
            if weekend {
                lift *= WEEKEND_MULTIPLIER;
            }
            if promo > 0.0 {
                lift *= PROMO_MULTIPLIER;
            }

            let sales: IndexMap<String, f64> = DEFAULT_ITEMS
                .iter()
                .map(|item| {
                    let units = stats.mean(item) * lift + rng.noise(stats.std(item));
                    (item.to_string(), units.max(0.0).round())
                })
                .collect();
            let prices: IndexMap<String, f64> = DEFAULT_ITEMS
                .iter()
                .map(|item| (item.to_string(), stats.price(item)))
                .collect();

            DailyRecord {
                date,
                promo,
                sales,
                prices,
            }
        })
        .collect();

    // Dates are consecutive and the list is non-empty.
    SalesHistory::from_sorted(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }

    #[test]
    fn test_reproducible() {
        let a = synthetic_history(30, start(), 42);
        let b = synthetic_history(30, start(), 42);
        let c = synthetic_history(30, start(), 7);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_shape() {
        let history = synthetic_history(60, start(), 42);
        assert_eq!(history.len(), 60);
        assert_eq!(history.item_names(), DEFAULT_ITEMS.to_vec());
        assert_eq!(history.records()[59].date, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
        assert!(history.records().iter().any(|r| r.promo > 0.0));
        for record in history.records() {
            assert!(record.sales.values().all(|v| *v >= 0.0));
            assert_eq!(record.price_of("burger"), 21.3);
        }
    }

    #[test]
    fn test_weekend_lift_visible() {
        let history = synthetic_history(140, start(), 3);
        let (mut weekend, mut weekday) = (Vec::new(), Vec::new());
        for r in history.records() {
            if r.promo > 0.0 {
                continue;
            }
            if r.date.weekday().num_days_from_monday() >= 5 {
                weekend.push(r.sales_of("burger"));
            } else {
                weekday.push(r.sales_of("burger"));
            }
        }
        let avg = |v: &[f64]| v.iter().sum::<f64>() / v.len() as f64;
        assert!(avg(&weekend) > avg(&weekday) + 5.0);
    }
}
