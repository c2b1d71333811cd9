use debris_sweep::catalog::{load_catalog, DebrisCatalog, FragmentId, FragmentRecord};
use debris_sweep::config::ScenarioConfig;
use debris_sweep::constants::{H_COLLISION, KOSMOS_FAMILY, PI, R_EARTH};
use debris_sweep::errors::{ConfigurationError, DataLoadError};
use debris_sweep::fsm::{SweepState, TerminationReason};
use debris_sweep::models::{OrbitalElements, SpacecraftElements};
use debris_sweep::simulation::{CancelToken, DebrisSweep};
use debris_sweep::SweepError;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::io::Write;
use tempfile::NamedTempFile;

const A_SC: f64 = R_EARTH + H_COLLISION + 40_000.0;

fn sweeper() -> SpacecraftElements {
    SpacecraftElements::new(OrbitalElements::circular(A_SC, 1.29, 0.35))
}

fn catalog(elements: &[OrbitalElements]) -> DebrisCatalog {
    DebrisCatalog::new(
        elements
            .iter()
            .enumerate()
            .map(|(k, el)| FragmentRecord::new(FragmentId(k), KOSMOS_FAMILY, *el))
            .collect(),
    )
}

fn scenario(n: usize, target: f64, max_ticks: u64) -> ScenarioConfig {
    let mut config = ScenarioConfig::new(target);
    config.catalog_size = n;
    config.max_ticks = max_ticks;
    config
}

fn assert_monotonic(sweep: &DebrisSweep) {
    let fractions: Vec<f64> = sweep
        .time_series()
        .iter()
        .map(|s| s.removed_fraction)
        .collect();
    for pair in fractions.windows(2) {
        assert!(pair[1] >= pair[0], "removed fraction regressed: {:?}", pair);
    }
}

// One fragment flying the spacecraft's own orbit is captured on the first tick.
#[test]
fn single_co_located_fragment() -> Result<(), Box<dyn std::error::Error>> {
    let cat = catalog(&[*sweeper().elements()]);
    let mut sweep = DebrisSweep::with_spacecraft(&scenario(1, 1.0, 10), cat, sweeper())?;

    let report = sweep.run()?;

    assert_eq!(report.reason, TerminationReason::TargetReached);
    assert_eq!(report.ticks, 1);
    assert_eq!(report.removed_fraction, 1.0);
    assert_eq!(sweep.time_series().len(), 1);
    assert_eq!(sweep.time_series().last().unwrap().removed_fraction, 1.0);
    assert_eq!(
        sweep.state(),
        SweepState::Terminated(TerminationReason::TargetReached)
    );
    Ok(())
}

// One fragment is captured immediately, the other orbits far above forever.
#[test]
fn half_the_catalog_out_of_reach() -> Result<(), Box<dyn std::error::Error>> {
    let unreachable = OrbitalElements::circular(2.0e7, 1.29, 0.35);
    let cat = catalog(&[*sweeper().elements(), unreachable]);
    let mut sweep = DebrisSweep::with_spacecraft(&scenario(2, 1.0, 300), cat, sweeper())?;

    let report = sweep.run()?;

    assert_eq!(report.reason, TerminationReason::TickLimit);
    assert_eq!(report.ticks, 300);
    assert_eq!(report.removed, 1);
    assert_eq!(sweep.removed_fraction(), 0.5);
    assert_eq!(sweep.time_series().len(), 300);
    assert!(sweep
        .time_series()
        .iter()
        .all(|s| s.removed_fraction == 0.5));
    assert!(sweep.catalog().get(0).unwrap().is_removed());
    assert!(!sweep.catalog().get(1).unwrap().is_removed());
    Ok(())
}

#[test]
fn partial_target_stops_early() -> Result<(), Box<dyn std::error::Error>> {
    let unreachable = OrbitalElements::circular(2.0e7, 0.1, 2.0);
    let cat = catalog(&[*sweeper().elements(), unreachable, unreachable, unreachable]);
    let mut sweep = DebrisSweep::with_spacecraft(&scenario(4, 0.25, 1_000), cat, sweeper())?;

    let report = sweep.run()?;
    assert_eq!(report.reason, TerminationReason::TargetReached);
    assert_eq!(report.ticks, 1);
    assert_eq!(report.removed_fraction, 0.25);
    Ok(())
}

#[test]
fn removed_fraction_never_decreases() -> Result<(), Box<dyn std::error::Error>> {
    let mut rng = StdRng::seed_from_u64(2009);
    let fragments: Vec<OrbitalElements> = (0..40)
        .map(|_| {
            OrbitalElements::new(
                A_SC + rng.gen_range(-20_000.0..60_000.0),
                rng.gen_range(0.0..0.01),
                1.29 + rng.gen_range(-0.02..0.02),
                0.35 + rng.gen_range(-0.05..0.05),
                rng.gen_range(0.0..2.0 * PI),
                rng.gen_range(0.0..2.0 * PI),
            )
        })
        .collect();
    let mut config = scenario(fragments.len(), 1.0, 2_000);
    config.capture_threshold_m = 300_000.0;
    let mut sweep = DebrisSweep::from_config(&config, catalog(&fragments))?;

    let report = sweep.run()?;

    assert_eq!(sweep.time_series().len() as u64, report.ticks);
    assert_monotonic(&sweep);
    assert_eq!(
        sweep.time_series().last().unwrap().removed,
        sweep.catalog().iter().filter(|f| f.is_removed()).count()
    );
    Ok(())
}

#[test]
fn target_above_one_is_rejected_before_any_tick() {
    let cat = catalog(&[*sweeper().elements()]);
    match DebrisSweep::from_config(&scenario(1, 1.2, 10), cat) {
        Err(SweepError::Configuration(ConfigurationError::UnreachableTarget(t))) => {
            assert_eq!(t, 1.2)
        }
        Err(e) => panic!("unexpected error {}", e),
        Ok(_) => panic!("target above one accepted"),
    }
}

#[test]
fn more_fragments_than_dataset_holds() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "Name,Semi-Major-Axis [m],Eccentricity,Inclination [rad],Longitude of the ascending node [rad],Argument of periapsis [rad],Mean Anomaly [rad]").unwrap();
    writeln!(file, "{},7250000,0.01,1.29,0.35,0.1,0.2", KOSMOS_FAMILY).unwrap();

    let config = scenario(5, 0.5, 10);
    assert!(matches!(
        load_catalog(file.path(), &config.catalog_filter()),
        Err(DataLoadError::InsufficientRecords {
            requested: 5,
            available: 1,
            ..
        })
    ));
}

#[test]
fn dataset_to_series_csv() -> Result<(), Box<dyn std::error::Error>> {
    let mut file = NamedTempFile::new()?;
    writeln!(file, "Name,Semi-Major-Axis [m],Eccentricity,Inclination [rad],Longitude of the ascending node [rad],Argument of periapsis [rad],Mean Anomaly [rad]")?;
    writeln!(file, "{},7210000,0.001,1.28,0.30,0.0,0.1", KOSMOS_FAMILY)?;
    writeln!(file, "Iridium 33-Collision-Fragment,7250000,0.002,1.50,0.10,0.0,0.2")?;
    writeln!(file, "{},7150000,0.001,1.30,0.40,0.0,0.3", KOSMOS_FAMILY)?;
    writeln!(file, "{},7230000,0.003,1.30,0.40,1.0,2.3", KOSMOS_FAMILY)?;
    file.flush()?;

    let config = scenario(2, 1.0, 500);
    let catalog = load_catalog(file.path(), &config.catalog_filter())?;
    let ids: Vec<usize> = catalog.iter().map(|f| f.id.0).collect();
    assert_eq!(ids, vec![0, 3]);

    let mut sweep = DebrisSweep::from_config(&config, catalog)?;
    let sc = sweep.context().spacecraft().elements();
    assert!((sc.i - 1.29).abs() < 1e-12);
    assert!((sc.raan - 0.35).abs() < 1e-12);

    let report = sweep.run()?;
    assert_monotonic(&sweep);

    let dir = tempfile::tempdir()?;
    let out = dir.path().join("output").join("removal_series.csv");
    sweep.time_series().save_csv(&out)?;
    let written = std::fs::read_to_string(&out)?;
    assert_eq!(written.lines().count() as u64, report.ticks + 1);
    Ok(())
}

#[test]
fn cancellation_from_another_handle() -> Result<(), Box<dyn std::error::Error>> {
    let token = CancelToken::new();
    let unreachable = OrbitalElements::circular(2.0e7, 1.29, 0.35);
    let mut sweep = DebrisSweep::with_spacecraft(&scenario(1, 1.0, 1_000), catalog(&[unreachable]), sweeper())?
        .with_cancel_token(token.clone());

    for _ in 0..5 {
        assert_eq!(sweep.step()?, SweepState::Running);
    }
    token.cancel();

    let report = sweep.run()?;
    assert_eq!(report.reason, TerminationReason::Cancelled);
    assert_eq!(report.ticks, 5);
    assert_eq!(sweep.time_series().len(), 5);
    Ok(())
}
