use common::HourlyWeights;

/// Raw restaurant day shape: closed overnight, lunch peak at 13, dinner at 19–20.
const RESTAURANT_PROFILE: [(u32, f64); 24] = [
    (0, 0.0),
    (1, 0.0),
    (2, 0.0),
    (3, 0.0),
    (4, 0.0),
    (5, 0.0),
    (6, 0.0),
    (7, 0.0),
    (8, 0.01),
    (9, 0.02),
    (10, 0.04),
    (11, 0.06),
    (12, 0.10),
    (13, 0.12),
    (14, 0.10),
    (15, 0.06),
    (16, 0.05),
    (17, 0.06),
    (18, 0.08),
    (19, 0.10),
    (20, 0.10),
    (21, 0.08),
    (22, 0.04),
    (23, 0.02),
];

/// Share of daily demand per hour, normalised to sum to 1.
pub fn restaurant_hourly_profile() -> HourlyWeights {
    RESTAURANT_PROFILE.iter().copied().collect::<HourlyWeights>().normalized()
}
