use asri::{
    config::{LoggingSettings, Settings},
    models::{MarketInputs, TransformedData},
    risk::{calculate_composite_index, CompositeRiskIndex},
    services::transform_all_data,
    AppError,
};
use serde::Serialize;
use std::{env, process};
use tracing::{error, info};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Serialize)]
struct ScoreReport<'a> {
    index: &'a CompositeRiskIndex,
    inputs: &'a TransformedData,
}

fn init_tracing(logging: &LoggingSettings) {
    // RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("asri={}", logging.level).into());
    let registry = tracing_subscriber::registry().with(filter);

    if logging.is_json() {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(fmt::layer().pretty().with_writer(std::io::stderr))
            .init();
    }
}

fn run(snapshot_path: &str, settings: &Settings) -> Result<(), AppError> {
    let market = MarketInputs::from_path(snapshot_path)?;
    let transformed = transform_all_data(&market)?;
    let index = calculate_composite_index(
        &transformed,
        &settings.risk.weights(),
        &settings.risk.blend(),
    );

    info!(
        composite = %index.composite,
        risk_level = %index.risk_level,
        "Composite risk index calculated"
    );

    let report = ScoreReport {
        index: &index,
        inputs: &transformed,
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn main() {
    let settings = match Settings::new() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("{}", e);
            process::exit(2);
        }
    };
    init_tracing(&settings.logging);

    let snapshot_path = match env::args().nth(1) {
        Some(path) => path,
        None => {
            eprintln!("usage: asri <market-snapshot.json>");
            process::exit(2);
        }
    };

    info!(snapshot = %snapshot_path, "Starting ASRI scoring run");
    if let Err(e) = run(&snapshot_path, &settings) {
        error!("Scoring run failed: {}", e);
        process::exit(1);
    }
}
