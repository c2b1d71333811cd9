use super::sweep_states::{SweepState, TerminationReason};
use std::time::Duration;
use tracing::{info, warn};

/// Running/Terminated state machine of a sweep.
///
/// Interrupts (cancellation, wall-clock budget) are checked before a tick starts. The target
/// fraction and tick budget are checked after a tick's sample has been recorded.
pub struct SweepFsm {
    current_state: SweepState,
    target_fraction: f64,
    max_ticks: u64,
    wall_clock_limit: Option<Duration>,
    last_state_change: f64,
}

impl SweepFsm {
    pub fn new(target_fraction: f64, max_ticks: u64, wall_clock_limit: Option<Duration>) -> Self {
        Self {
            current_state: SweepState::Running,
            target_fraction,
            max_ticks,
            wall_clock_limit,
            last_state_change: 0.0,
        }
    }

    pub fn get_current_state(&self) -> SweepState {
        self.current_state
    }

    pub fn is_running(&self) -> bool {
        self.current_state == SweepState::Running
    }

    pub fn target_fraction(&self) -> f64 {
        self.target_fraction
    }

    /// Simulated elapsed time [s] of the last transition.
    pub fn get_last_state_change(&self) -> f64 {
        self.last_state_change
    }

    fn transition_to(&mut self, new_state: SweepState, time: f64) {
        if self.current_state != new_state {
            info!(
                "State transition at t+{:.2}h: {} -> {}",
                time / 3600.0,
                self.current_state,
                new_state
            );
            self.current_state = new_state;
            self.last_state_change = time;
        }
    }

    /// Top-of-tick check. Returns `false` if the sweep must not run another tick.
    pub fn check_interrupts(&mut self, cancelled: bool, wall_clock: Duration, time: f64) -> bool {
        if !self.is_running() {
            return false;
        }
        if cancelled {
            warn!("Sweep cancelled");
            self.transition_to(SweepState::Terminated(TerminationReason::Cancelled), time);
            return false;
        }
        if let Some(limit) = self.wall_clock_limit {
            if wall_clock >= limit {
                warn!("Wall-clock budget of {:?} exhausted", limit);
                self.transition_to(
                    SweepState::Terminated(TerminationReason::WallClockLimit),
                    time,
                );
                return false;
            }
        }
        true
    }

    /// End-of-tick check against the target fraction, then the tick budget.
    pub fn evaluate_transition(&mut self, ticks: u64, removed_fraction: f64, time: f64) {
        if !self.is_running() {
            return;
        }
        if removed_fraction >= self.target_fraction {
            self.transition_to(
                SweepState::Terminated(TerminationReason::TargetReached),
                time,
            );
        } else if ticks >= self.max_ticks {
            warn!(
                "Tick limit {} reached at {:.2}% removed (target {:.2}%)",
                self.max_ticks,
                removed_fraction * 100.0,
                self.target_fraction * 100.0
            );
            self.transition_to(SweepState::Terminated(TerminationReason::TickLimit), time);
        }
    }

    pub fn abort(&mut self, time: f64) {
        self.transition_to(SweepState::Aborted, time);
    }
}
