use std::env;
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

use dotenv::dotenv;
use tracing::{debug, info, span, warn, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::constant::{DEFAULT_CONFIG_PATH, CONFIG_PATH_ENV, SEED_ENV};
use crate::discretizer::{busiest_route, discretize_routes, discretize_routes_parallel};
use crate::domain::{
    ConfigError, FlowConfig, FlowError, HourlySummary, RouteMatrix, TickSchedule,
};
use crate::model::{allocate, demand_curve};
use crate::output::{print_hourly_chart, write_hourly_summary, write_matrix_csv, OutputPaths};
use crate::setup::load_config;
use crate::utils::{fresh_seed, seeded_rng};

/// Everything one generation run produces, fully built before any file is
/// written.
#[derive(Debug, Clone)]
pub struct FlowRun {
    pub seed: u64,
    pub schedule: TickSchedule,
    pub demand: Vec<f64>,
    pub rates: RouteMatrix<f64>,
    pub counts: RouteMatrix<u64>,
    pub summary: Option<HourlySummary>,
}

/// Initialize tracing and environment
fn init_tracing_and_env() -> Result<(), Box<dyn Error>> {
    // RUST_LOG may come from .env, so it has to be loaded before the filter.
    dotenv().ok();

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(
            fmt::layer()
                .with_span_events(fmt::format::FmtSpan::NEW | fmt::format::FmtSpan::CLOSE)
                .pretty(),
        )
        .init();

    Ok(())
}

/// First CLI argument, then `FLOW_CONFIG`, then `config.txt`.
fn resolve_config_path() -> PathBuf {
    env::args()
        .nth(1)
        .or_else(|| env::var(CONFIG_PATH_ENV).ok())
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string())
        .into()
}

/// `FLOW_SEED` overrides the file; without either a fresh seed is drawn.
fn resolve_seed(config: &FlowConfig, env_seed: Option<String>) -> Result<u64, ConfigError> {
    if let Some(value) = env_seed {
        let seed = value.trim().parse().map_err(|_| ConfigError::InvalidValue {
            key: SEED_ENV.to_string(),
            value: value.clone(),
        })?;
        info!("Using seed {} from {}", seed, SEED_ENV);
        return Ok(seed);
    }

    match config.seed {
        Some(seed) => {
            info!("Using configured seed {}", seed);
            Ok(seed)
        }
        None => {
            let seed = fresh_seed();
            info!("No seed configured, drew {} (set SEED to replay)", seed);
            Ok(seed)
        }
    }
}

/// Runs the three stages in memory. Any configuration problem surfaces here,
/// before a single row is written.
pub fn generate(config: &FlowConfig, seed: u64) -> Result<FlowRun, ConfigError> {
    let schedule = config.schedule()?;
    info!(
        "Generating {} ticks of {}s ({} per hour)",
        schedule.ticks_per_day, schedule.seconds_per_tick, schedule.ticks_per_hour
    );

    let demand = {
        let span = span!(Level::INFO, "rate_model");
        let _guard = span.enter();
        demand_curve(&config.coefficients, &schedule)?
    };

    let rates = {
        let span = span!(Level::INFO, "route_allocator");
        let _guard = span.enter();
        allocate(&demand, config)?
    };

    let counts = {
        let span = span!(Level::INFO, "discretizer", parallel = config.parallel);
        let _guard = span.enter();
        if config.parallel {
            info!("Seed {} drives one stream per route", seed);
            discretize_routes_parallel(&rates, config.start_tick, seed)?
        } else {
            info!("Seed {} drives one shared stream", seed);
            discretize_routes(&rates, config.start_tick, &mut seeded_rng(seed))?
        }
    };

    let summary = busiest_route(&counts);

    Ok(FlowRun {
        seed,
        schedule,
        demand,
        rates,
        counts,
        summary,
    })
}

fn write_all<'a>(
    run: &FlowRun,
    paths: &'a OutputPaths,
    written: &mut Vec<&'a Path>,
) -> Result<(), FlowError> {
    write_matrix_csv(&run.counts, &paths.counts)?;
    written.push(&paths.counts);
    write_matrix_csv(&run.rates, &paths.raw_rates)?;
    written.push(&paths.raw_rates);
    if let Some(summary) = &run.summary {
        write_hourly_summary(summary, run.seed, &paths.hourly)?;
    }
    Ok(())
}

/// Writes counts, raw rates and the hourly summary. If any write fails the
/// files already written are removed again.
pub fn write_outputs(run: &FlowRun, paths: &OutputPaths) -> Result<(), FlowError> {
    let mut written = Vec::new();
    let result = write_all(run, paths, &mut written);
    if result.is_err() {
        for path in written {
            if let Err(e) = fs::remove_file(path) {
                warn!("Could not remove partial output {}: {}", path.display(), e);
            }
        }
    }
    result
}

/// Generates from an already loaded configuration and writes every output.
pub fn run_with_config(config: &FlowConfig, seed: u64, base_dir: &Path) -> Result<FlowRun, FlowError> {
    let flow_run = generate(config, seed)?;
    let paths = OutputPaths::for_output(&base_dir.join(&config.output_file));
    debug!("Output paths: {:?}", paths);
    write_outputs(&flow_run, &paths)?;
    Ok(flow_run)
}

fn report_run(run: &FlowRun) {
    let emitted: u64 = run.counts.routes().map(|(_, seq)| seq.iter().sum::<u64>()).sum();
    let expected: f64 = run.rates.routes().map(|(_, seq)| seq.iter().sum::<f64>()).sum();
    info!(
        "Seed {}: {} vehicles released for {:.1} expected",
        run.seed, emitted, expected
    );

    println!("Seed {}", run.seed);
    if let Some(summary) = &run.summary {
        print_hourly_chart(summary);
    }
}

pub fn run() -> Result<(), Box<dyn Error>> {
    init_tracing_and_env()?;

    let config_path = resolve_config_path();
    let config = load_config(&config_path)?;
    let seed = resolve_seed(&config, env::var(SEED_ENV).ok())?;

    let flow_run = run_with_config(&config, seed, Path::new(""))?;
    report_run(&flow_run);

    Ok(())
}
