use super::cancel::CancelToken;
use super::context::SimulationContext;
use super::time_series::{RemovalSample, RemovalTimeSeries};
use crate::catalog::{DebrisCatalog, FragmentRecord};
use crate::config::ScenarioConfig;
use crate::coordinates::{batch_to_cartesian, elements_to_cartesian};
use crate::detection::EncounterDetector;
use crate::errors::{Body, Result, SweepError};
use crate::fsm::{SweepFsm, SweepState, TerminationReason};
use crate::models::{OrbitalElements, SpacecraftElements};
use crate::physics::orbital::KeplerSolver;
use hifitime::Duration;
use nalgebra as na;
use rayon::prelude::*;
use std::fmt;
use std::time::Instant;
use tracing::{debug, info};

/// Outcome of a sweep that stopped without a fatal error.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepReport {
    pub reason: TerminationReason,
    pub ticks: u64,
    pub elapsed: Duration,
    pub removed: usize,
    pub catalog_size: usize,
    pub removed_fraction: f64,
}

impl fmt::Display for SweepReport {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}: {}/{} fragments removed ({:.2}%) after {} ticks, {:.2} h simulated",
            self.reason,
            self.removed,
            self.catalog_size,
            self.removed_fraction * 100.0,
            self.ticks,
            self.elapsed.to_seconds() / 3600.0
        )
    }
}

/// The time-stepping loop: propagate everyone, capture what is close, record, repeat.
///
/// The sweep is the only writer of the catalog's removal flags. Propagation and detection run
/// in parallel over the active fragments and only read the catalog; captures are applied once
/// the whole batch has been evaluated.
pub struct DebrisSweep {
    context: SimulationContext,
    solver: KeplerSolver,
    detector: EncounterDetector,
    fsm: SweepFsm,
    series: RemovalTimeSeries,
    cancel: CancelToken,
    started: Option<Instant>,
}

impl DebrisSweep {
    pub fn new(
        context: SimulationContext,
        solver: KeplerSolver,
        detector: EncounterDetector,
        fsm: SweepFsm,
    ) -> Self {
        Self {
            context,
            solver,
            detector,
            fsm,
            series: RemovalTimeSeries::new(),
            cancel: CancelToken::new(),
            started: None,
        }
    }

    /// Reference sweep for `catalog`. Fails before any tick if the configuration is invalid or
    /// the catalog size differs from `config.catalog_size`.
    pub fn from_config(config: &ScenarioConfig, catalog: DebrisCatalog) -> Result<Self> {
        let context = SimulationContext::from_config(config, catalog)?;
        Ok(Self::with_context(config, context))
    }

    pub fn with_spacecraft(
        config: &ScenarioConfig,
        catalog: DebrisCatalog,
        spacecraft: SpacecraftElements,
    ) -> Result<Self> {
        let context = SimulationContext::with_spacecraft(config, catalog, spacecraft)?;
        Ok(Self::with_context(config, context))
    }

    fn with_context(config: &ScenarioConfig, context: SimulationContext) -> Self {
        Self::new(
            context,
            config.solver(),
            EncounterDetector::new(config.capture_threshold_m),
            SweepFsm::new(
                config.target_fraction,
                config.max_ticks,
                config.wall_clock_limit(),
            ),
        )
    }

    pub fn with_cancel_token(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    pub fn state(&self) -> SweepState {
        self.fsm.get_current_state()
    }

    pub fn context(&self) -> &SimulationContext {
        &self.context
    }

    pub fn catalog(&self) -> &DebrisCatalog {
        &self.context.catalog
    }

    pub fn time_series(&self) -> &RemovalTimeSeries {
        &self.series
    }

    pub fn removed_count(&self) -> usize {
        self.context.catalog.removed_count()
    }

    pub fn removed_fraction(&self) -> f64 {
        self.context.catalog.removed_fraction()
    }

    pub fn report(&self, reason: TerminationReason) -> SweepReport {
        SweepReport {
            reason,
            ticks: self.context.clock.ticks(),
            elapsed: self.context.clock.elapsed(),
            removed: self.removed_count(),
            catalog_size: self.context.catalog.len(),
            removed_fraction: self.removed_fraction(),
        }
    }

    /// Runs ticks until the sweep terminates. On a fatal error the samples recorded so far
    /// stay available through [`DebrisSweep::time_series`], and the sweep is left `Aborted`.
    pub fn run(&mut self) -> Result<SweepReport> {
        loop {
            match self.fsm.get_current_state() {
                SweepState::Running => {
                    self.step()?;
                }
                SweepState::Terminated(reason) => {
                    let report = self.report(reason);
                    info!("Sweep finished: {}", report);
                    return Ok(report);
                }
                state @ SweepState::Aborted => return Err(SweepError::NotRunning(state)),
            }
        }
    }

    /// Executes one tick and returns the resulting state.
    pub fn step(&mut self) -> Result<SweepState> {
        let state = self.fsm.get_current_state();
        if state != SweepState::Running {
            return Err(SweepError::NotRunning(state));
        }

        let started = *self.started.get_or_insert_with(Instant::now);
        let elapsed_s = self.context.clock.elapsed().to_seconds();
        if !self
            .fsm
            .check_interrupts(self.cancel.is_cancelled(), started.elapsed(), elapsed_s)
        {
            return Ok(self.fsm.get_current_state());
        }

        let t = self.context.clock.now_seconds();
        let captured = match self.detect_captures(t) {
            Ok(captured) => captured,
            Err(e) => {
                self.fsm.abort(elapsed_s);
                return Err(e);
            }
        };

        for &index in &captured {
            if self.context.catalog.mark_removed(index) {
                if let Some(fragment) = self.context.catalog.get(index) {
                    info!(
                        "Captured {} ({}) at t+{:.2}h",
                        fragment.id,
                        fragment.name,
                        elapsed_s / 3600.0
                    );
                }
            }
        }

        self.context.clock.advance();
        let sample = RemovalSample {
            elapsed: self.context.clock.elapsed(),
            removed: self.removed_count(),
            removed_fraction: self.removed_fraction(),
        };
        self.series.record(sample);
        debug!(
            "t+{:.2}h: {} removed ({:.2}%)",
            sample.elapsed_hours(),
            sample.removed,
            sample.removed_fraction * 100.0
        );

        self.fsm.evaluate_transition(
            self.context.clock.ticks(),
            sample.removed_fraction,
            sample.elapsed.to_seconds(),
        );
        Ok(self.fsm.get_current_state())
    }

    /// Propagates the spacecraft and every active fragment to `t` and returns the catalog
    /// indices of the fragments within capture range.
    fn detect_captures(&self, t: f64) -> Result<Vec<usize>> {
        let spacecraft = self.spacecraft_position(t)?;

        let active: Vec<(usize, &FragmentRecord)> = self.context.catalog.active().collect();
        let solver = self.solver;
        // If several fragments fail, which one is reported is unspecified.
        let anomalies = active
            .par_iter()
            .map(|(_, fragment)| {
                solver
                    .true_anomaly_of(&fragment.elements, t)
                    .map(|nu| (fragment.elements, nu))
                    .map_err(|source| SweepError::Convergence {
                        time_s: t,
                        body: Body::Fragment {
                            id: fragment.id,
                            name: fragment.name.clone(),
                        },
                        source,
                    })
            })
            .collect::<Result<Vec<(OrbitalElements, f64)>>>()?;

        let positions: Vec<(usize, na::Vector3<f64>)> = active
            .iter()
            .map(|(index, _)| *index)
            .zip(batch_to_cartesian(&anomalies))
            .collect();

        Ok(self.detector.detect(&spacecraft, &positions))
    }

    fn spacecraft_position(&self, t: f64) -> Result<na::Vector3<f64>> {
        let elements = self.context.spacecraft().elements();
        let nu = self
            .solver
            .true_anomaly_of(elements, t)
            .map_err(|source| SweepError::Convergence {
                time_s: t,
                body: Body::Spacecraft,
                source,
            })?;
        Ok(elements_to_cartesian(elements, nu))
    }
}
