pub mod encounter;

pub use encounter::EncounterDetector;
