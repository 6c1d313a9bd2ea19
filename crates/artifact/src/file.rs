use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use common::{ForecastError, HourlyWeights, Result, SchemaVersion};
use indexmap::IndexMap;
use models::RegressorSpec;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::model::{ArtifactMetadata, ModelArtifact};

/// Serialized artifact layout, exactly as written by the trainer.
///
/// `schema_version` stays a string here so that an unknown version surfaces
/// as a configuration error rather than a parse failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactFile {
    #[serde(default = "default_schema_version")]
    pub schema_version: String,
    pub feature_names: Vec<String>,
    pub item_names: Vec<String>,
    pub daily_uncertainty: IndexMap<String, f64>,
    pub hourly_weights: HourlyWeights,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accuracy: Option<serde_json::Value>,
    pub regressor: RegressorSpec,
}

fn default_schema_version() -> String {
    SchemaVersion::V1.as_str().into()
}

impl ArtifactFile {
    pub fn read(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| {
            ForecastError::Load(format!("cannot open artifact {}: {e}", path.display()))
        })?;
        serde_json::from_reader(BufReader::new(file)).map_err(|e| {
            ForecastError::Load(format!("corrupt artifact {}: {e}", path.display()))
        })
    }

    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| ForecastError::Load(format!("corrupt artifact: {e}")))
    }

    /// Write the artifact as pretty JSON, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.flush()?;

        info!(
            path = %path.display(),
            schema_version = %self.schema_version,
            features = self.feature_names.len(),
            items = self.item_names.len(),
            "Model artifact saved"
        );
        Ok(())
    }

    /// Validate and turn into the runtime artifact.
    pub fn into_artifact(self) -> Result<ModelArtifact> {
        let schema_version: SchemaVersion = self.schema_version.parse()?;
        self.regressor.validate()?;

        ModelArtifact::new(
            self.regressor.into_regressor(),
            ArtifactMetadata {
                feature_names: self.feature_names,
                item_names: self.item_names,
                daily_uncertainty: self.daily_uncertainty,
                hourly_weights: self.hourly_weights,
                schema_version,
                accuracy: self.accuracy,
            },
        )
    }
}
