use std::fmt;

/// Why a sweep stopped without a fatal error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminationReason {
    TargetReached,
    TickLimit,
    WallClockLimit,
    Cancelled,
}

impl fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TerminationReason::TargetReached => write!(f, "target fraction reached"),
            TerminationReason::TickLimit => write!(f, "tick limit reached"),
            TerminationReason::WallClockLimit => write!(f, "wall-clock limit reached"),
            TerminationReason::Cancelled => write!(f, "cancelled"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepState {
    Running,
    Terminated(TerminationReason),
    /// A fatal error stopped the sweep; its results must not be reported as a completed run.
    Aborted,
}

impl fmt::Display for SweepState {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SweepState::Running => write!(f, "Running"),
            SweepState::Terminated(reason) => write!(f, "Terminated ({})", reason),
            SweepState::Aborted => write!(f, "Aborted"),
        }
    }
}
