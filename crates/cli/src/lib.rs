//! `demand-forecast`: serve one hourly demand forecast per invocation, or fit a new model.

pub mod commands;
pub mod config;
pub mod telemetry;

pub use config::{Args, Command, Config};
