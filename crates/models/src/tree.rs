//! Gradient-boosted / bagged regression trees.
//!
//! Each output owns an independent ensemble. A prediction for output `o` is
//! `base_score + learning_rate * Σ tree(x)` over that output's trees, which
//! covers both boosting (shrinkage < 1) and forests (`learning_rate = 1/n_trees`,
//! `base_score = 0`).

use common::{ForecastError, Regressor, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A node of a flattened binary regression tree. Node 0 is the root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TreeNode {
    /// Go `left` when `x[feature] <= threshold`, otherwise `right`.
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        value: f64,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree {
    pub nodes: Vec<TreeNode>,
}

impl DecisionTree {
    /// Children must sit after their parent in `nodes`, which rules out
    /// cycles and guarantees `evaluate` terminates.
    fn validate(&self, n_features: usize) -> std::result::Result<(), String> {
        if self.nodes.is_empty() {
            return Err("tree has no nodes".into());
        }
        for (idx, node) in self.nodes.iter().enumerate() {
            match node {
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    if *feature >= n_features {
                        return Err(format!(
                            "node {idx} splits on feature {feature} but only {n_features} exist"
                        ));
                    }
                    if !threshold.is_finite() {
                        return Err(format!("node {idx} has a non-finite threshold"));
                    }
                    for child in [left, right] {
                        if *child <= idx || *child >= self.nodes.len() {
                            return Err(format!("node {idx} points to invalid child {child}"));
                        }
                    }
                }
                TreeNode::Leaf { value } => {
                    if !value.is_finite() {
                        return Err(format!("leaf {idx} has a non-finite value"));
                    }
                }
            }
        }
        Ok(())
    }

    fn evaluate(&self, features: &[f64]) -> f64 {
        let mut idx = 0;
        loop {
            match &self.nodes[idx] {
                TreeNode::Leaf { value } => return *value,
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    idx = if features[*feature] <= *threshold {
                        *left
                    } else {
                        *right
                    };
                }
            }
        }
    }
}

/// Trees contributing to a single output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputEnsemble {
    #[serde(default)]
    pub base_score: f64,
    #[serde(default = "default_learning_rate")]
    pub learning_rate: f64,
    pub trees: Vec<DecisionTree>,
}

fn default_learning_rate() -> f64 {
    1.0
}

impl OutputEnsemble {
    fn evaluate(&self, features: &[f64]) -> f64 {
        self.base_score
            + self.learning_rate * self.trees.iter().map(|t| t.evaluate(features)).sum::<f64>()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeEnsembleRegressor {
    pub n_features: usize,
    pub outputs: Vec<OutputEnsemble>,
}

impl TreeEnsembleRegressor {
    pub fn validate(&self) -> Result<()> {
        if self.outputs.is_empty() {
            return Err(ForecastError::Load("tree ensemble has no outputs".into()));
        }
        for (o, output) in self.outputs.iter().enumerate() {
            if !output.base_score.is_finite() || !output.learning_rate.is_finite() {
                return Err(ForecastError::Load(format!(
                    "tree ensemble output {o} has non-finite base score or learning rate"
                )));
            }
            for (t, tree) in output.trees.iter().enumerate() {
                tree.validate(self.n_features).map_err(|e| {
                    ForecastError::Load(format!("tree ensemble output {o}, tree {t}: {e}"))
                })?;
            }
        }
        Ok(())
    }
}

impl Regressor for TreeEnsembleRegressor {
    fn name(&self) -> &str {
        "TreeEnsemble"
    }

    fn n_features(&self) -> usize {
        self.n_features
    }

    fn n_outputs(&self) -> usize {
        self.outputs.len()
    }

    fn predict(&self, features: &[f64]) -> Result<Vec<f64>> {
        if features.len() != self.n_features {
            return Err(ForecastError::Prediction(format!(
                "tree ensemble expects {} features, got {}",
                self.n_features,
                features.len()
            )));
        }

        debug!(
            outputs = self.outputs.len(),
            trees = self.outputs.iter().map(|o| o.trees.len()).sum::<usize>(),
            "Evaluating tree ensemble"
        );

        Ok(self.outputs.iter().map(|o| o.evaluate(features)).collect())
    }
}

#[cfg(test)]
mod tests;
