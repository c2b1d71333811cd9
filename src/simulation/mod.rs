pub mod cancel;
pub mod clock;
pub mod context;
pub mod sweep;
pub mod time_series;

pub use cancel::CancelToken;
pub use clock::SimulationClock;
pub use context::SimulationContext;
pub use sweep::{DebrisSweep, SweepReport};
pub use time_series::{RemovalSample, RemovalTimeSeries};
