/// Floor on hourly uncertainty, so quiet hours still get a usable interval.
const MIN_HOURLY_UNCERTAINTY: f64 = 0.5;

/// Hourly demand varies more, relative to its mean, than the daily residual implies.
const HOURLY_VARIANCE_MULTIPLIER: f64 = 1.5;

/// Two-sided 95% normal quantile.
const Z_95: f64 = 1.96;

/// Scale an item's daily residual std-dev down to the hour with `weight`.
pub fn hourly_uncertainty(daily_uncertainty: f64, weight: f64) -> f64 {
    (daily_uncertainty * weight * HOURLY_VARIANCE_MULTIPLIER).max(MIN_HOURLY_UNCERTAINTY)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub lower: f64,
    pub upper: f64,
}

/// Normal-approximation 95% interval around `value`. Only the lower end is floored at 0.
pub fn interval_95(value: f64, uncertainty: f64) -> Interval {
    let half_width = Z_95 * uncertainty;
    Interval {
        lower: (value - half_width).max(0.0),
        upper: value + half_width,
    }
}
