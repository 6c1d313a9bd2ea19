use common::{Regressor, Result};
use serde::{Deserialize, Serialize};

use crate::{LinearRegressor, TreeEnsembleRegressor};

/// On-disk form of a fitted regressor, tagged by `kind`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RegressorSpec {
    Linear(LinearRegressor),
    TreeEnsemble(TreeEnsembleRegressor),
}

impl RegressorSpec {
    pub fn validate(&self) -> Result<()> {
        match self {
            RegressorSpec::Linear(m) => m.validate(),
            RegressorSpec::TreeEnsemble(m) => m.validate(),
        }
    }

    pub fn into_regressor(self) -> Box<dyn Regressor> {
        match self {
            RegressorSpec::Linear(m) => Box::new(m),
            RegressorSpec::TreeEnsemble(m) => Box::new(m),
        }
    }
}

impl From<LinearRegressor> for RegressorSpec {
    fn from(model: LinearRegressor) -> Self {
        RegressorSpec::Linear(model)
    }
}

impl From<TreeEnsembleRegressor> for RegressorSpec {
    fn from(model: TreeEnsembleRegressor) -> Self {
        RegressorSpec::TreeEnsemble(model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_tagged_json() {
        let json = r#"{"kind": "linear", "coefficients": [[1.0, 0.0]], "intercepts": [2.0]}"#;
        let spec: RegressorSpec = serde_json::from_str(json).unwrap();
        spec.validate().unwrap();
        let model = spec.into_regressor();
        assert_eq!(model.name(), "Linear");
        assert_eq!(model.n_features(), 2);
        assert_eq!(model.predict(&[3.0, 9.0]).unwrap(), vec![5.0]);
    }

    #[test]
    fn test_unknown_kind_fails() {
        let json = r#"{"kind": "neural_net", "layers": []}"#;
        assert!(serde_json::from_str::<RegressorSpec>(json).is_err());
    }

    #[test]
    fn test_serialize_roundtrip_keeps_kind() {
        let spec = RegressorSpec::from(LinearRegressor {
            coefficients: vec![vec![0.5]],
            intercepts: vec![1.0],
        });
        let json = serde_json::to_value(&spec).unwrap();
        assert_eq!(json["kind"], "linear");
    }
}
