pub mod state_machine;
pub mod sweep_states;

pub use state_machine::SweepFsm;
pub use sweep_states::{SweepState, TerminationReason};
