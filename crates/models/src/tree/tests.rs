use super::*;
use approx::assert_relative_eq;

/// x[0] <= 10 → 1.0, else (x[1] <= 0.5 → 2.0, else 3.0)
fn stump() -> DecisionTree {
    DecisionTree {
        nodes: vec![
            TreeNode::Split {
                feature: 0,
                threshold: 10.0,
                left: 1,
                right: 2,
            },
            TreeNode::Leaf { value: 1.0 },
            TreeNode::Split {
                feature: 1,
                threshold: 0.5,
                left: 3,
                right: 4,
            },
            TreeNode::Leaf { value: 2.0 },
            TreeNode::Leaf { value: 3.0 },
        ],
    }
}

fn single_leaf(value: f64) -> DecisionTree {
    DecisionTree {
        nodes: vec![TreeNode::Leaf { value }],
    }
}

#[test]
fn test_tree_routing() {
    let tree = stump();
    assert_eq!(tree.evaluate(&[5.0, 0.0]), 1.0);
    assert_eq!(tree.evaluate(&[10.0, 9.0]), 1.0); // threshold is inclusive on the left
    assert_eq!(tree.evaluate(&[11.0, 0.0]), 2.0);
    assert_eq!(tree.evaluate(&[11.0, 1.0]), 3.0);
}

#[test]
fn test_boosted_output() {
    let model = TreeEnsembleRegressor {
        n_features: 2,
        outputs: vec![
            OutputEnsemble {
                base_score: 30.0,
                learning_rate: 0.1,
                trees: vec![stump(), single_leaf(10.0)],
            },
            OutputEnsemble {
                base_score: 0.0,
                learning_rate: 0.5,
                trees: vec![single_leaf(4.0), single_leaf(6.0)],
            },
        ],
    };
    model.validate().unwrap();

    let out = model.predict(&[20.0, 1.0]).unwrap();
    assert_relative_eq!(out[0], 30.0 + 0.1 * (3.0 + 10.0), epsilon = 1e-12);
    // forest-style averaging of two trees
    assert_relative_eq!(out[1], 5.0, epsilon = 1e-12);
}

#[test]
fn test_width_mismatch() {
    let model = TreeEnsembleRegressor {
        n_features: 2,
        outputs: vec![OutputEnsemble {
            base_score: 0.0,
            learning_rate: 1.0,
            trees: vec![stump()],
        }],
    };
    let err = model.predict(&[1.0]).unwrap_err();
    assert!(matches!(err, ForecastError::Prediction(_)));
}

#[test]
fn test_backward_child_rejected() {
    let tree = DecisionTree {
        nodes: vec![
            TreeNode::Split {
                feature: 0,
                threshold: 1.0,
                left: 0,
                right: 1,
            },
            TreeNode::Leaf { value: 1.0 },
        ],
    };
    let model = TreeEnsembleRegressor {
        n_features: 1,
        outputs: vec![OutputEnsemble {
            base_score: 0.0,
            learning_rate: 1.0,
            trees: vec![tree],
        }],
    };
    assert!(matches!(model.validate(), Err(ForecastError::Load(_))));
}

#[test]
fn test_split_on_unknown_feature_rejected() {
    let model = TreeEnsembleRegressor {
        n_features: 1,
        outputs: vec![OutputEnsemble {
            base_score: 0.0,
            learning_rate: 1.0,
            trees: vec![stump()],
        }],
    };
    assert!(model.validate().is_err());
}

#[test]
fn test_json_shape() {
    let json = r#"{
        "n_features": 1,
        "outputs": [{
            "trees": [{"nodes": [
                {"type": "split", "feature": 0, "threshold": 2.5, "left": 1, "right": 2},
                {"type": "leaf", "value": -1.0},
                {"type": "leaf", "value": 1.0}
            ]}]
        }]
    }"#;
    let model: TreeEnsembleRegressor = serde_json::from_str(json).unwrap();
    model.validate().unwrap();
    assert_eq!(model.outputs[0].learning_rate, 1.0);
    assert_eq!(model.predict(&[3.0]).unwrap(), vec![1.0]);
}
