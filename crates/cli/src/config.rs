//! Command line and layered configuration.
//!
//! Precedence, lowest first: built-in defaults, `demand-forecast.yaml` (or
//! `-c <file>`), `DEMAND_*` environment variables (`__` separates nesting
//! levels, e.g. `DEMAND_MODEL__PATH`), then command line flags.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use common::{AppConfig, SchemaVersion};
use figment::{
    providers::{Env, Format, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};
use trainer::TrainerConfig;

#[derive(Parser, Debug)]
#[command(name = "demand-forecast", author, version, about, long_about = None)]
pub struct Args {
    /// Path to configuration file
    #[arg(
        short = 'c',
        long,
        env = "DEMAND_CONFIG",
        default_value = "demand-forecast.yaml"
    )]
    pub config: String,

    /// Model artifact path, overriding `model.path`
    #[arg(long, global = true)]
    pub model: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Args {
    /// The subcommand to run; `predict` when none was given.
    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Predict)
    }
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Read one JSON request from stdin and write one JSON response to stdout
    Predict,

    /// Fit a model artifact from daily sales history and write it to the model path
    Train {
        /// JSON array of daily records
        #[arg(long)]
        history: PathBuf,

        /// Feature layout to fit (v1 or v2)
        #[arg(long)]
        schema: Option<SchemaVersion>,

        /// L2 penalty on the coefficients
        #[arg(long)]
        ridge: Option<f64>,
    },

    /// Write a reproducible synthetic sales history
    Generate {
        #[arg(long)]
        out: PathBuf,

        #[arg(long, default_value_t = 365)]
        days: usize,

        #[arg(long, default_value = "2024-01-01")]
        start: NaiveDate,

        #[arg(long, default_value_t = 42)]
        seed: u64,
    },
}

/// Everything the binary reads from configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(flatten)]
    pub app: AppConfig,

    /// Defaults for `train`; flags on the subcommand override them.
    #[serde(default)]
    pub train: TrainerConfig,
}

impl Config {
    pub fn figment(args: &Args) -> Figment {
        Figment::new()
            .merge(Yaml::file(&args.config))
            .merge(Env::prefixed("DEMAND_").split("__"))
    }

    pub fn load(args: &Args) -> Result<Self, figment::Error> {
        let mut config: Self = Self::figment(args).extract()?;

        if let Some(path) = &args.model {
            config.app.model.path = path.clone();
        }
        Ok(config)
    }
}
