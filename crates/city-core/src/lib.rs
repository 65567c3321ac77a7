//! Core simulation logic: weather fronts and city dynamics.
//!
//! Each cycle the weather front simulator advances first and publishes the
//! day's observation; the city dynamics aggregator then turns it, along with
//! the calendar and neighborhood signals, into bounded metric vectors.

pub mod config;
pub mod cycle;
pub mod dynamics;
pub mod query;
pub mod rng;
pub mod schedule;
pub mod state;
pub mod weather;

pub use config::{ConfigError, SimConfig};
pub use cycle::Simulation;
pub use dynamics::{DynamicsInputs, NeighborhoodSignals};
pub use rng::{InjectedFn, Mulberry32, RngChoice, UnitSource};
pub use schedule::SyntheticCalendar;
pub use state::WorldState;
