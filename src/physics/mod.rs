pub mod orbital;

pub use orbital::KeplerSolver;
