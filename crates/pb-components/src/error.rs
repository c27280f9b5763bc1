//! Error types for component operations.

use crate::sensor::SensorKind;
use pb_core::error::PbError;
use thiserror::Error;

/// Errors that can occur constructing or using plant components.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ComponentError {
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    /// A sensor accessor was called for a value the sensor does not carry.
    /// This is a wiring defect, not an operational fault.
    #[error("Sensor type mismatch on {sensor}: expected {expected}, found {actual}")]
    TypeMismatch {
        sensor: String,
        expected: SensorKind,
        actual: SensorKind,
    },
}

pub type ComponentResult<T> = Result<T, ComponentError>;

impl From<PbError> for ComponentError {
    fn from(e: PbError) -> Self {
        match e {
            PbError::NonFinite { what, .. } => ComponentError::InvalidArg { what },
            PbError::InvalidArg { what } => ComponentError::InvalidArg { what },
            PbError::Invariant { what } => ComponentError::InvalidArg { what },
        }
    }
}
