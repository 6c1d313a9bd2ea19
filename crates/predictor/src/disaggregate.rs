use common::{HourlyWeights, HOURS_PER_DAY};
use tracing::debug;

use crate::Weather;

/// Clamp a daily prediction to a usable demand figure.
pub fn non_negative(value: f64) -> f64 {
    value.max(0.0)
}

/// Share of a (clamped) daily prediction falling in an hour with `weight`.
pub fn hourly_share(daily: f64, weight: f64) -> f64 {
    non_negative(daily) * weight
}

/// Weather-adjusted 24-hour curve of total demand across all items.
///
/// The daily predictions are clamped and summed first, then split and
/// adjusted once per hour. This is computed independently of the per-item
/// hourly values and is not reconciled with their sum.
pub fn aggregate_curve(daily: &[f64], weights: &HourlyWeights, weather: &Weather) -> Vec<f64> {
    let total_daily: f64 = daily.iter().copied().map(non_negative).sum();

    let curve: Vec<f64> = (0..HOURS_PER_DAY)
        .map(|h| weather.adjust(total_daily * weights.weight(h as i64)))
        .collect();

    debug!(
        total_daily = total_daily,
        curve_total = curve.iter().sum::<f64>(),
        "Built aggregate hourly curve"
    );
    curve
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use common::FALLBACK_HOURLY_WEIGHT;

    fn uniform() -> HourlyWeights {
        (0..24).map(|h| (h, 1.0 / 24.0)).collect()
    }

    #[test]
    fn test_negative_daily_clamped() {
        assert_eq!(hourly_share(-12.0, 0.1), 0.0);
        assert_relative_eq!(hourly_share(40.0, 0.12), 4.8, epsilon = 1e-12);
    }

    #[test]
    fn test_curve_sums_to_adjusted_total() {
        let daily = [37.0, 32.0, 36.0, 35.0, 27.0];
        let weather = Weather::new(20.0, 8.0);
        let curve = aggregate_curve(&daily, &uniform(), &weather);

        assert_eq!(curve.len(), 24);
        assert_relative_eq!(curve.iter().sum::<f64>(), 167.0 * 0.85, epsilon = 1e-9);
    }

    #[test]
    fn test_curve_ignores_negative_items() {
        let weather = Weather::new(20.0, 0.0);
        let with_negative = aggregate_curve(&[10.0, -50.0], &uniform(), &weather);
        let without = aggregate_curve(&[10.0, 0.0], &uniform(), &weather);
        assert_eq!(with_negative, without);
        assert!(with_negative.iter().all(|v| *v >= 0.0));
    }

    #[test]
    fn test_curve_uses_fallback_for_missing_hours() {
        let weights: HourlyWeights = (0..23).map(|h| (h, 0.0)).collect();
        let curve = aggregate_curve(&[100.0], &weights, &Weather::new(20.0, 0.0));
        assert_eq!(curve[22], 0.0);
        assert_relative_eq!(curve[23], 100.0 * FALLBACK_HOURLY_WEIGHT);
    }
}
