//! Domain types for PriceWalk

pub mod observation;
pub mod state;

pub use observation::{LabeledObservation, Observation};
pub use state::State;
