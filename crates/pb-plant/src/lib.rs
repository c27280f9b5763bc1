//! pb-plant: batch sequencing for the paint plant.
//!
//! Builds the full plant out of pb-components leaves (three base-color lines
//! feeding one shared mixing tank) and runs the batch state machine over it:
//! pump base paints per recipe, mix for a fixed time, drain, return to idle.
//! Faults latched by individual pumps are surfaced here as per-color recovery
//! flags; a faulted transfer resumes where it left off once the latch clears.
//!
//! Everything is deterministic: time advances only through [`Plant::update`],
//! driven by an external caller.

pub mod config;
pub mod error;
pub mod events;
pub mod plant;
pub mod recipe;
pub mod sim;
pub mod status;

pub use config::PlantConfig;
pub use error::{PlantError, PlantResult};
pub use events::EventLog;
pub use plant::{Plant, ProcessState, StartCommand};
pub use recipe::{BaseColor, Recipe};
pub use sim::{RunOptions, run_ticks, run_until_idle};
pub use status::{BaseLineStatus, MixerStatus, PlantStatus, PumpStatus, TankStatus};
