use std::collections::HashSet;
use std::path::Path;

use common::{ForecastError, HourlyWeights, Regressor, Result, SchemaVersion, HOURS_PER_DAY};
use indexmap::IndexMap;
use tracing::{info, warn};

use crate::ArtifactFile;

/// Tolerance on the hourly profile summing to one.
const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// Everything in an artifact except the regressor itself.
#[derive(Debug, Clone)]
pub struct ArtifactMetadata {
    /// Input column order the regressor was fitted with.
    pub feature_names: Vec<String>,
    /// Output order of the regressor.
    pub item_names: Vec<String>,
    /// Residual standard deviation per item at daily granularity.
    pub daily_uncertainty: IndexMap<String, f64>,
    pub hourly_weights: HourlyWeights,
    pub schema_version: SchemaVersion,
    pub accuracy: Option<serde_json::Value>,
}

/// A loaded, validated model artifact. Read-only for the life of the process.
#[derive(Debug)]
pub struct ModelArtifact {
    regressor: Box<dyn Regressor>,
    metadata: ArtifactMetadata,
}

impl ModelArtifact {
    /// Build an artifact, rejecting metadata that could never serve a request.
    ///
    /// The regressor's input width is deliberately not compared with
    /// `feature_names` here: that mismatch is reported per request.
    pub fn new(regressor: Box<dyn Regressor>, metadata: ArtifactMetadata) -> Result<Self> {
        validate_metadata(&metadata)?;

        let weight_sum = metadata.hourly_weights.sum();
        if (weight_sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            warn!(
                weight_sum = weight_sum,
                "Hourly weights do not sum to 1; hourly values will not add up to the daily total"
            );
        }

        // Keep uncertainty keyed in item order.
        let daily_uncertainty = metadata
            .item_names
            .iter()
            .filter_map(|item| {
                metadata
                    .daily_uncertainty
                    .get(item)
                    .map(|u| (item.clone(), *u))
            })
            .collect();

        Ok(Self {
            regressor,
            metadata: ArtifactMetadata {
                daily_uncertainty,
                ..metadata
            },
        })
    }

    /// Load and validate the artifact at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let artifact = ArtifactFile::read(path)?.into_artifact()?;
        info!(
            path = %path.display(),
            schema_version = %artifact.schema_version(),
            regressor = artifact.regressor().name(),
            features = artifact.feature_names().len(),
            items = artifact.item_names().len(),
            "Model artifact loaded"
        );
        Ok(artifact)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        ArtifactFile::from_json(json)?.into_artifact()
    }

    pub fn regressor(&self) -> &dyn Regressor {
        self.regressor.as_ref()
    }

    pub fn feature_names(&self) -> &[String] {
        &self.metadata.feature_names
    }

    pub fn item_names(&self) -> &[String] {
        &self.metadata.item_names
    }

    pub fn daily_uncertainty(&self, item: &str) -> f64 {
        self.metadata
            .daily_uncertainty
            .get(item)
            .copied()
            .unwrap_or(0.0)
    }

    pub fn hourly_weights(&self) -> &HourlyWeights {
        &self.metadata.hourly_weights
    }

    pub fn schema_version(&self) -> SchemaVersion {
        self.metadata.schema_version
    }

    pub fn accuracy(&self) -> Option<&serde_json::Value> {
        self.metadata.accuracy.as_ref()
    }
}

fn validate_metadata(meta: &ArtifactMetadata) -> Result<()> {
    if meta.item_names.is_empty() {
        return Err(ForecastError::Load("artifact lists no items".into()));
    }
    if let Some(dup) = first_duplicate(&meta.item_names) {
        return Err(ForecastError::Load(format!("duplicate item '{dup}'")));
    }
    if let Some(dup) = first_duplicate(&meta.feature_names) {
        return Err(ForecastError::Load(format!("duplicate feature '{dup}'")));
    }

    for item in &meta.item_names {
        match meta.daily_uncertainty.get(item) {
            None => {
                return Err(ForecastError::Load(format!(
                    "no daily uncertainty for item '{item}'"
                )))
            }
            Some(u) if !u.is_finite() || *u < 0.0 => {
                return Err(ForecastError::Load(format!(
                    "daily uncertainty for item '{item}' must be a non-negative number, got {u}"
                )))
            }
            Some(_) => {}
        }
    }

    for (hour, weight) in meta.hourly_weights.iter() {
        if hour >= HOURS_PER_DAY {
            return Err(ForecastError::Load(format!(
                "hourly weight defined for hour {hour}, expected 0-{}",
                HOURS_PER_DAY - 1
            )));
        }
        if !weight.is_finite() || weight < 0.0 {
            return Err(ForecastError::Load(format!(
                "hourly weight for hour {hour} must be a non-negative number, got {weight}"
            )));
        }
    }
    Ok(())
}

fn first_duplicate(names: &[String]) -> Option<&str> {
    let mut seen = HashSet::new();
    names
        .iter()
        .find(|n| !seen.insert(n.as_str()))
        .map(String::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;
    use models::LinearRegressor;

    fn metadata() -> ArtifactMetadata {
        ArtifactMetadata {
            feature_names: vec!["weekday".into(), "month".into(), "promo".into()],
            item_names: vec!["burger".into(), "fries".into()],
            daily_uncertainty: [("fries".to_string(), 2.0), ("burger".to_string(), 4.0)]
                .into_iter()
                .collect(),
            hourly_weights: (0..24).map(|h| (h, 1.0 / 24.0)).collect(),
            schema_version: SchemaVersion::V1,
            accuracy: None,
        }
    }

    fn regressor() -> Box<dyn Regressor> {
        Box::new(LinearRegressor {
            coefficients: vec![vec![0.0; 3]; 2],
            intercepts: vec![10.0, 20.0],
        })
    }

    #[test]
    fn test_uncertainty_reordered_to_items() {
        let artifact = ModelArtifact::new(regressor(), metadata()).unwrap();
        let keys: Vec<_> = artifact.metadata.daily_uncertainty.keys().cloned().collect();
        assert_eq!(keys, vec!["burger", "fries"]);
        assert_eq!(artifact.daily_uncertainty("fries"), 2.0);
    }

    #[test]
    fn test_missing_uncertainty_rejected() {
        let mut meta = metadata();
        meta.daily_uncertainty.shift_remove("fries");
        let err = ModelArtifact::new(regressor(), meta).unwrap_err();
        assert!(matches!(err, ForecastError::Load(_)));
    }

    #[test]
    fn test_negative_uncertainty_rejected() {
        let mut meta = metadata();
        meta.daily_uncertainty.insert("burger".into(), -1.0);
        assert!(ModelArtifact::new(regressor(), meta).is_err());
    }

    #[test]
    fn test_hour_out_of_range_rejected() {
        let mut meta = metadata();
        meta.hourly_weights = [(24, 1.0)].into_iter().collect();
        assert!(ModelArtifact::new(regressor(), meta).is_err());
    }

    #[test]
    fn test_negative_weight_rejected() {
        let mut meta = metadata();
        meta.hourly_weights = [(3, -0.1), (4, 1.1)].into_iter().collect();
        assert!(ModelArtifact::new(regressor(), meta).is_err());
    }

    #[test]
    fn test_unnormalized_weights_accepted() {
        let mut meta = metadata();
        meta.hourly_weights = [(12, 0.5)].into_iter().collect();
        assert!(ModelArtifact::new(regressor(), meta).is_ok());
    }

    #[test]
    fn test_empty_items_rejected() {
        let mut meta = metadata();
        meta.item_names.clear();
        assert!(ModelArtifact::new(regressor(), meta).is_err());
    }

    #[test]
    fn test_duplicate_feature_rejected() {
        let mut meta = metadata();
        meta.feature_names.push("month".into());
        assert!(ModelArtifact::new(regressor(), meta).is_err());
    }

    #[test]
    fn test_width_mismatch_not_checked_at_load() {
        let mut meta = metadata();
        meta.feature_names.push("extra".into());
        assert!(ModelArtifact::new(regressor(), meta).is_ok());
    }
}
