//! Agitator motor on the shared mixing tank, plus the tank's drain valve.
//!
//! The mixer does not model blend quality; it is a timer around the motor.
//! The batch sequencer watches `motor_on` to know when mixing has finished.

use crate::error::{ComponentError, ComponentResult};
use crate::valve::Valve;
use tracing::warn;

/// Mixing-tank agitator with an integral run timer.
#[derive(Debug, Clone)]
pub struct Mixer {
    name: String,
    motor_on: bool,
    target_s: f64,
    elapsed_s: f64,
    drain: Valve,
}

impl Mixer {
    pub fn new(name: impl Into<String>, drain: Valve) -> ComponentResult<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(ComponentError::InvalidArg {
                what: "mixer name must not be empty",
            });
        }
        Ok(Self {
            name,
            motor_on: false,
            target_s: 0.0,
            elapsed_s: 0.0,
            drain,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn motor_on(&self) -> bool {
        self.motor_on
    }

    pub fn target_s(&self) -> f64 {
        self.target_s
    }

    pub fn elapsed_s(&self) -> f64 {
        self.elapsed_s
    }

    pub fn drain_valve(&self) -> &Valve {
        &self.drain
    }

    pub fn drain_valve_mut(&mut self) -> &mut Valve {
        &mut self.drain
    }

    /// Set how long the next mix cycle runs. Non-positive or non-finite
    /// durations are rejected with a warning and leave the target unchanged.
    pub fn set_target_mixing_time(&mut self, seconds: f64) {
        if !seconds.is_finite() || seconds <= 0.0 {
            warn!(mixer = %self.name, seconds, "ignoring invalid mixing time");
            return;
        }
        self.target_s = seconds;
    }

    /// Start the agitator. Refused (with a warning) until a positive mixing
    /// time has been set. Restarting resets the elapsed timer.
    pub fn start_motor(&mut self) {
        if self.target_s <= 0.0 {
            warn!(mixer = %self.name, "cannot start motor without a mixing time");
            return;
        }
        self.motor_on = true;
        self.elapsed_s = 0.0;
    }

    /// Stop the agitator. Idempotent; the elapsed timer is retained so the
    /// sequencer can inspect how far the cycle got.
    pub fn stop_motor(&mut self) {
        self.motor_on = false;
    }

    /// Advance the run timer. The motor stops itself once the target is met.
    pub fn update(&mut self, dt_s: f64) {
        if !self.motor_on || !dt_s.is_finite() || dt_s <= 0.0 {
            return;
        }
        self.elapsed_s += dt_s;
        if self.elapsed_s >= self.target_s {
            self.motor_on = false;
        }
    }
}
