//! Typed transducers: flow switches, pressure transmitters, level transmitters.
//!
//! A sensor carries exactly one kind of reading, fixed at construction.
//! Calling an accessor for a different kind is a wiring defect and fails
//! with [`ComponentError::TypeMismatch`] rather than returning garbage.

use crate::error::{ComponentError, ComponentResult};
use core::fmt;
use serde::{Deserialize, Serialize};

/// What a sensor measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SensorKind {
    FlowSwitch,
    PressureTransmitter,
    LevelTransmitter,
}

impl fmt::Display for SensorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SensorKind::FlowSwitch => write!(f, "FLOW_SWITCH"),
            SensorKind::PressureTransmitter => write!(f, "PRESSURE_TRANSMITTER"),
            SensorKind::LevelTransmitter => write!(f, "LEVEL_TRANSMITTER"),
        }
    }
}

/// Binary flow-switch reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlowStatus {
    Normal,
    Alarm,
}

impl fmt::Display for FlowStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlowStatus::Normal => write!(f, "NORMAL"),
            FlowStatus::Alarm => write!(f, "ALARM"),
        }
    }
}

/// The type-tagged value a sensor holds. Variant is fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Reading {
    Flow(FlowStatus),
    PressurePsi(f64),
    LevelLiters(f64),
}

/// A single process transducer.
#[derive(Debug, Clone)]
pub struct Sensor {
    name: String,
    reading: Reading,
}

impl Sensor {
    pub fn new(name: impl Into<String>, kind: SensorKind) -> ComponentResult<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(ComponentError::InvalidArg {
                what: "sensor name must not be empty",
            });
        }
        let reading = match kind {
            SensorKind::FlowSwitch => Reading::Flow(FlowStatus::Normal),
            SensorKind::PressureTransmitter => Reading::PressurePsi(0.0),
            SensorKind::LevelTransmitter => Reading::LevelLiters(0.0),
        };
        Ok(Self { name, reading })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> SensorKind {
        match self.reading {
            Reading::Flow(_) => SensorKind::FlowSwitch,
            Reading::PressurePsi(_) => SensorKind::PressureTransmitter,
            Reading::LevelLiters(_) => SensorKind::LevelTransmitter,
        }
    }

    pub fn flow_status(&self) -> ComponentResult<FlowStatus> {
        match self.reading {
            Reading::Flow(status) => Ok(status),
            _ => Err(self.mismatch(SensorKind::FlowSwitch)),
        }
    }

    pub fn set_flow_status(&mut self, status: FlowStatus) -> ComponentResult<()> {
        match &mut self.reading {
            Reading::Flow(current) => {
                *current = status;
                Ok(())
            }
            _ => Err(self.mismatch(SensorKind::FlowSwitch)),
        }
    }

    pub fn pressure_psi(&self) -> ComponentResult<f64> {
        match self.reading {
            Reading::PressurePsi(psi) => Ok(psi),
            _ => Err(self.mismatch(SensorKind::PressureTransmitter)),
        }
    }

    pub fn set_pressure_psi(&mut self, psi: f64) -> ComponentResult<()> {
        match &mut self.reading {
            Reading::PressurePsi(current) => {
                *current = psi;
                Ok(())
            }
            _ => Err(self.mismatch(SensorKind::PressureTransmitter)),
        }
    }

    pub fn level_liters(&self) -> ComponentResult<f64> {
        match self.reading {
            Reading::LevelLiters(liters) => Ok(liters),
            _ => Err(self.mismatch(SensorKind::LevelTransmitter)),
        }
    }

    pub fn set_level_liters(&mut self, liters: f64) -> ComponentResult<()> {
        match &mut self.reading {
            Reading::LevelLiters(current) => {
                *current = liters;
                Ok(())
            }
            _ => Err(self.mismatch(SensorKind::LevelTransmitter)),
        }
    }

    /// Infallible sync for the owning component. The owner constructed the
    /// sensor with the matching kind, so the tag cannot be wrong here.
    pub(crate) fn force_flow(&mut self, status: FlowStatus) {
        debug_assert_eq!(self.kind(), SensorKind::FlowSwitch);
        if let Reading::Flow(current) = &mut self.reading {
            *current = status;
        }
    }

    pub(crate) fn force_pressure(&mut self, psi: f64) {
        debug_assert_eq!(self.kind(), SensorKind::PressureTransmitter);
        if let Reading::PressurePsi(current) = &mut self.reading {
            *current = psi;
        }
    }

    pub(crate) fn force_level(&mut self, liters: f64) {
        debug_assert_eq!(self.kind(), SensorKind::LevelTransmitter);
        if let Reading::LevelLiters(current) = &mut self.reading {
            *current = liters;
        }
    }

    fn mismatch(&self, expected: SensorKind) -> ComponentError {
        ComponentError::TypeMismatch {
            sensor: self.name.clone(),
            expected,
            actual: self.kind(),
        }
    }
}
