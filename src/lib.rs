//! Debris sweep simulation.
//!
//! A spacecraft on a fixed circular orbit above the Iridium 33 / Kosmos 2251 collision altitude
//! sweeps a catalog of collision fragments. Every tick all bodies are propagated on their
//! Keplerian orbits and fragments that pass within the capture radius are removed. The output
//! is the removed fraction over time.

pub mod catalog;
pub mod config;
pub mod constants;
pub mod coordinates;
pub mod detection;
pub mod errors;
pub mod fsm;
pub mod models;
pub mod physics;
pub mod simulation;

pub use errors::{Result, SweepError};
