mod linear;
mod spec;
mod tree;

pub use linear::LinearRegressor;
pub use spec::RegressorSpec;
pub use tree::{DecisionTree, OutputEnsemble, TreeEnsembleRegressor, TreeNode};
