use std::process::ExitCode;

use clap::Parser;
use demand_forecast::{commands, telemetry, Args, Command, Config};

fn main() -> ExitCode {
    let args = Args::parse();

    let config = match Config::load(&args) {
        Ok(config) => config,
        Err(e) => {
            let err = common::ForecastError::Configuration(e.to_string());
            if args.command() == Command::Predict {
                println!("{}", predictor::render_error(&err));
            }
            eprintln!("{err}");
            return ExitCode::FAILURE;
        }
    };

    telemetry::init_logging(&config.app.logging.filter);
    tracing::debug!("{:?}", args);

    let ok = match args.command() {
        Command::Predict => {
            commands::predict(&config, std::io::stdin().lock(), std::io::stdout().lock())
        }
        Command::Train {
            history,
            schema,
            ridge,
        } => report(commands::train(&config, &history, schema, ridge)),
        Command::Generate {
            out,
            days,
            start,
            seed,
        } => report(commands::generate(&out, days, start, seed)),
    };

    if ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn report(result: common::Result<()>) -> bool {
    match result {
        Ok(()) => true,
        Err(e) => {
            tracing::error!(error = %e, "Command failed");
            eprintln!("error: {e}");
            false
        }
    }
}
