use common::{ForecastError, Regressor, Result};
use serde::{Deserialize, Serialize};

/// Multi-output linear model: `y[o] = intercepts[o] + Σ coefficients[o][f] * x[f]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearRegressor {
    /// One coefficient row per output, each as wide as the feature vector.
    pub coefficients: Vec<Vec<f64>>,
    pub intercepts: Vec<f64>,
}

impl LinearRegressor {
    pub fn new(coefficients: Vec<Vec<f64>>, intercepts: Vec<f64>) -> Result<Self> {
        let model = Self {
            coefficients,
            intercepts,
        };
        model.validate()?;
        Ok(model)
    }

    /// Structural checks run when a model is loaded from disk.
    pub fn validate(&self) -> Result<()> {
        if self.coefficients.is_empty() {
            return Err(ForecastError::Load(
                "linear regressor has no outputs".into(),
            ));
        }
        if self.coefficients.len() != self.intercepts.len() {
            return Err(ForecastError::Load(format!(
                "linear regressor has {} coefficient rows but {} intercepts",
                self.coefficients.len(),
                self.intercepts.len()
            )));
        }
        let width = self.coefficients[0].len();
        if let Some(i) = self.coefficients.iter().position(|row| row.len() != width) {
            return Err(ForecastError::Load(format!(
                "linear regressor coefficient row {i} has {} entries, expected {width}",
                self.coefficients[i].len()
            )));
        }
        let all_finite = self
            .coefficients
            .iter()
            .flatten()
            .chain(self.intercepts.iter())
            .all(|v| v.is_finite());
        if !all_finite {
            return Err(ForecastError::Load(
                "linear regressor contains non-finite parameters".into(),
            ));
        }
        Ok(())
    }
}

impl Regressor for LinearRegressor {
    fn name(&self) -> &str {
        "Linear"
    }

    fn n_features(&self) -> usize {
        self.coefficients.first().map_or(0, Vec::len)
    }

    fn n_outputs(&self) -> usize {
        self.intercepts.len()
    }

    fn predict(&self, features: &[f64]) -> Result<Vec<f64>> {
        if features.len() != self.n_features() {
            return Err(ForecastError::Prediction(format!(
                "linear regressor expects {} features, got {}",
                self.n_features(),
                features.len()
            )));
        }

        Ok(self
            .coefficients
            .iter()
            .zip(&self.intercepts)
            .map(|(row, b)| b + row.iter().zip(features).map(|(w, x)| w * x).sum::<f64>())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_predict_two_outputs() {
        let model = LinearRegressor::new(
            vec![vec![1.0, 2.0, 0.0], vec![0.5, 0.0, -1.0]],
            vec![10.0, 3.0],
        )
        .unwrap();

        let out = model.predict(&[1.0, 2.0, 4.0]).unwrap();
        assert_eq!(out.len(), 2);
        assert_relative_eq!(out[0], 15.0);
        assert_relative_eq!(out[1], -0.5);
    }

    #[test]
    fn test_width_mismatch_is_prediction_error() {
        let model = LinearRegressor::new(vec![vec![1.0, 1.0]], vec![0.0]).unwrap();
        let err = model.predict(&[1.0, 2.0, 3.0]).unwrap_err();
        assert!(matches!(err, ForecastError::Prediction(_)));
    }

    #[test]
    fn test_ragged_rows_rejected() {
        let result = LinearRegressor::new(vec![vec![1.0, 1.0], vec![1.0]], vec![0.0, 0.0]);
        assert!(matches!(result, Err(ForecastError::Load(_))));
    }

    #[test]
    fn test_intercept_count_mismatch_rejected() {
        let result = LinearRegressor::new(vec![vec![1.0]], vec![0.0, 1.0]);
        assert!(result.is_err());
    }

    #[test]
    fn test_non_finite_rejected() {
        let result = LinearRegressor::new(vec![vec![f64::NAN]], vec![0.0]);
        assert!(result.is_err());
    }
}
