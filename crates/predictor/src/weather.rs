use common::InferenceRequest;

const HEAVY_RAIN_MM: f64 = 5.0;
const HEAVY_RAIN_FACTOR: f64 = 0.85;
const LIGHT_RAIN_FACTOR: f64 = 0.95;
const HOT_ABOVE_C: f64 = 35.0;
const COLD_BELOW_C: f64 = 5.0;
const EXTREME_TEMPERATURE_FACTOR: f64 = 0.90;

/// Conditions for the forecast hour. Demand is only ever damped, never boosted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Weather {
    /// Degrees Celsius.
    pub temperature: f64,
    /// Millimetres.
    pub rainfall: f64,
}

impl Weather {
    pub fn new(temperature: f64, rainfall: f64) -> Self {
        Self {
            temperature,
            rainfall,
        }
    }

    /// Multiplicative demand factor. Rain and temperature penalties compose.
    pub fn factor(&self) -> f64 {
        let mut factor = 1.0;

        if self.rainfall > HEAVY_RAIN_MM {
            factor *= HEAVY_RAIN_FACTOR;
        } else if self.rainfall > 0.0 {
            factor *= LIGHT_RAIN_FACTOR;
        }

        if self.temperature > HOT_ABOVE_C || self.temperature < COLD_BELOW_C {
            factor *= EXTREME_TEMPERATURE_FACTOR;
        }

        factor
    }

    pub fn adjust(&self, value: f64) -> f64 {
        value * self.factor()
    }
}

impl From<&InferenceRequest> for Weather {
    fn from(request: &InferenceRequest) -> Self {
        Self::new(request.temperature, request.rainfall)
    }
}
