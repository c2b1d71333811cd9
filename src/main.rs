//! Debris sweep CLI
//!
//! Usage:
//!   debris-sweep --dataset iridium_cosmos_result.csv --target-fraction 0.8 \
//!                --output output/removal_series.csv

use anyhow::{Context, Result};
use clap::Parser;
use debris_sweep::catalog::load_catalog;
use debris_sweep::config::ScenarioConfig;
use debris_sweep::physics::KeplerSolver;
use debris_sweep::simulation::{DebrisSweep, SweepReport};
use debris_sweep::SweepError;
use std::path::{Path, PathBuf};
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(
    name = "debris-sweep",
    about = "Estimate how fast a sweeper spacecraft clears a collision fragment cloud"
)]
struct Args {
    /// Fragment dataset (CSV)
    #[arg(short, long, default_value = "iridium_cosmos_result.csv")]
    dataset: PathBuf,

    /// Scenario file (TOML); command-line options override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Removed fraction at which the sweep stops (required without --config)
    #[arg(short, long)]
    target_fraction: Option<f64>,

    /// Fragment family name
    #[arg(long)]
    family: Option<String>,

    /// Number of fragments to sweep
    #[arg(short = 'n', long)]
    count: Option<usize>,

    /// Time step in seconds
    #[arg(long)]
    step: Option<f64>,

    /// Capture distance in metres
    #[arg(long)]
    threshold: Option<f64>,

    /// Maximum number of ticks
    #[arg(long)]
    max_ticks: Option<u64>,

    /// Output CSV for the removal time series
    #[arg(short, long, default_value = "output/removal_series.csv")]
    output: PathBuf,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn scenario(&self) -> Result<ScenarioConfig> {
        let mut config = match (&self.config, self.target_fraction) {
            (Some(path), _) => ScenarioConfig::load(path)?,
            (None, Some(target)) => ScenarioConfig::new(target),
            (None, None) => anyhow::bail!("either --config or --target-fraction is required"),
        };

        if let Some(target) = self.target_fraction {
            config.target_fraction = target;
        }
        if let Some(family) = &self.family {
            config.family = family.clone();
        }
        if let Some(count) = self.count {
            config.catalog_size = count;
        }
        if let Some(step) = self.step {
            config.step_s = step;
        }
        if let Some(threshold) = self.threshold {
            config.capture_threshold_m = threshold;
        }
        if let Some(max_ticks) = self.max_ticks {
            config.max_ticks = max_ticks;
        }

        config.validate()?;
        Ok(config)
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let level = if args.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = args.scenario()?;
    let catalog = load_catalog(&args.dataset, &config.catalog_filter())
        .with_context(|| format!("loading {:?}", args.dataset))?;
    let mut sweep = DebrisSweep::from_config(&config, catalog)?;

    let sc = sweep.context().spacecraft();
    info!(
        "Spacecraft: altitude {:.1} km, inclination {:.3} deg, RAAN {:.3} deg, period {:.1} min",
        sc.altitude() / 1000.0,
        sc.elements().i.to_degrees(),
        sc.elements().raan.to_degrees(),
        KeplerSolver::orbital_period(sc.elements().a) / 60.0
    );
    info!(
        "Sweeping {} fragments, dt = {} s, capture radius {:.1} km, target {:.2}%",
        config.catalog_size,
        config.step_s,
        config.capture_threshold_m / 1000.0,
        config.target_fraction * 100.0
    );

    let outcome = sweep.run();

    // The partial series is still worth keeping when the run failed.
    let saved = sweep.time_series().save_csv(&args.output);
    if saved.is_ok() {
        info!(
            "Removal time series ({} samples) written to {:?}",
            sweep.time_series().len(),
            args.output
        );
    }
    let report = finish(outcome, saved, &args.output)?;
    info!("{}", report);

    Ok(())
}

/// Combines the run outcome with the series export. A failed run is reported over a failed
/// export, which is only logged.
fn finish(
    outcome: Result<SweepReport, SweepError>,
    saved: Result<(), SweepError>,
    output: &Path,
) -> Result<SweepReport> {
    match (outcome, saved) {
        (Ok(report), Ok(())) => Ok(report),
        (Ok(_), Err(e)) => Err(e).with_context(|| format!("writing {:?}", output)),
        (Err(sweep_error), saved) => {
            if let Err(e) = saved {
                warn!("Could not write partial series to {:?}: {}", output, e);
            }
            Err(sweep_error).context("sweep aborted")
        }
    }
}
