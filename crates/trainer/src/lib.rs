//! Offline fitting of demand model artifacts from daily sales history.

mod engineer;
mod history;
mod profile;
mod report;
mod ridge;
mod synthetic;
mod trainer;

pub use engineer::{build_training_set, TrainingSet};
pub use history::{DailyRecord, SalesHistory};
pub use profile::restaurant_hourly_profile;
pub use report::{print_report, render_report};
pub use ridge::fit_ridge;
pub use synthetic::synthetic_history;
pub use trainer::{DemandTrainer, ItemEvaluation, TrainerConfig, TrainingOutcome};
