//! Per-request forecast benchmarks.
//!
//! Covers: full forecast_on() for v1/v2 linear artifacts and a tree ensemble.

use artifact::ModelArtifact;
use chrono::NaiveDate;
use common::{HistoricalStats, InferenceRequest, SchemaVersion};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use models::{DecisionTree, OutputEnsemble, RegressorSpec, TreeEnsembleRegressor, TreeNode};
use predictor::{ForecastPipeline, ForecastService};
use trainer::{synthetic_history, DemandTrainer, TrainerConfig};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 14).unwrap()
}

fn trained_pipeline(schema_version: SchemaVersion) -> ForecastPipeline {
    let history = synthetic_history(365, NaiveDate::from_ymd_opt(2023, 6, 1).unwrap(), 42);
    let outcome = DemandTrainer::new(TrainerConfig {
        schema_version,
        ..TrainerConfig::default()
    })
    .train(&history)
    .unwrap();
    let artifact = outcome.artifact.into_artifact().unwrap();
    ForecastPipeline::new(artifact, &HistoricalStats::default())
}

/// A stump per output on every feature, `depth` levels deep.
fn tree_pipeline(depth: usize) -> ForecastPipeline {
    let mut outcome = DemandTrainer::default()
        .train(&synthetic_history(120, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(), 42))
        .unwrap();
    let n_features = outcome.artifact.feature_names.len();

    let tree = |f: usize| {
        let mut nodes = Vec::new();
        for level in 0..depth {
            let base = 2 * level + 1;
            nodes.push(TreeNode::Split {
                feature: (f + level) % n_features,
                threshold: level as f64,
                left: base,
                right: base + 1,
            });
            nodes.push(TreeNode::Leaf { value: 1.0 });
        }
        nodes.push(TreeNode::Leaf { value: 2.0 });
        DecisionTree { nodes }
    };

    let outputs = outcome
        .artifact
        .item_names
        .iter()
        .enumerate()
        .map(|(o, _)| OutputEnsemble {
            base_score: 30.0,
            learning_rate: 0.1,
            trees: (0..50).map(|t| tree(o + t)).collect(),
        })
        .collect();
    outcome.artifact.regressor = RegressorSpec::TreeEnsemble(TreeEnsembleRegressor {
        n_features,
        outputs,
    });

    let artifact: ModelArtifact = outcome.artifact.into_artifact().unwrap();
    ForecastPipeline::new(artifact, &HistoricalStats::default())
}

fn bench_forecast_by_schema(c: &mut Criterion) {
    let mut group = c.benchmark_group("forecast_linear");
    let request = InferenceRequest {
        hour: 13,
        weekday: 5,
        temperature: 38.0,
        rainfall: 2.0,
        event_flag: true,
    };

    for schema in [SchemaVersion::V1, SchemaVersion::V2] {
        let pipeline = trained_pipeline(schema);
        group.bench_with_input(BenchmarkId::from_parameter(schema), &pipeline, |b, p| {
            b.iter(|| p.forecast_on(black_box(&request), today()))
        });
    }

    group.finish();
}

fn bench_forecast_tree_ensemble(c: &mut Criterion) {
    let mut group = c.benchmark_group("forecast_tree_ensemble");
    let request = InferenceRequest::default();

    for depth in [2, 6, 12] {
        let pipeline = tree_pipeline(depth);
        group.bench_with_input(BenchmarkId::from_parameter(depth), &pipeline, |b, p| {
            b.iter(|| p.forecast_on(black_box(&request), today()))
        });
    }

    group.finish();
}

fn bench_service_roundtrip(c: &mut Criterion) {
    let outcome = DemandTrainer::new(TrainerConfig {
        schema_version: SchemaVersion::V2,
        ..TrainerConfig::default()
    })
    .train(&synthetic_history(365, NaiveDate::from_ymd_opt(2023, 6, 1).unwrap(), 42))
    .unwrap();
    let artifact = outcome.artifact.into_artifact().unwrap();
    let service = ForecastService::with_artifact(artifact, &HistoricalStats::default());
    let payload = r#"{"hour": 19, "day_of_week": 6, "temperature": 22.5, "rainfall": 7, "event_flag": 1}"#;

    c.bench_function("service_respond_v2", |b| {
        b.iter(|| service.respond_on(black_box(payload), today()))
    });
}

criterion_group!(
    benches,
    bench_forecast_by_schema,
    bench_forecast_tree_ensemble,
    bench_service_roundtrip,
);
criterion_main!(benches);
