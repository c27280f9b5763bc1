//! pb-components: physical component library for the paint-batch plant.
//!
//! Provides the leaf equipment models the batch controller is built from:
//! - Valves with binary open/closed state
//! - Typed sensors (flow switch, pressure transmitter, level transmitter)
//! - Bounded tanks with a level transmitter kept in sync
//! - Transfer pumps with pressure/flow physics and fault latching
//! - Timed mixer motors bound to a drain valve
//!
//! All components are deterministic functions of their state and the tick
//! sequence driven by the plant; none of them keeps an internal clock.

pub mod error;
pub mod mixer;
pub mod pump;
pub mod sensor;
pub mod tank;
pub mod valve;

// Re-exports
pub use error::{ComponentError, ComponentResult};
pub use mixer::Mixer;
pub use pump::{Pump, PumpState};
pub use sensor::{FlowStatus, Sensor, SensorKind};
pub use tank::{LevelStatus, Tank};
pub use valve::{Valve, ValveState};
