//! Error types for plant construction and driving.

use pb_components::ComponentError;
use pb_core::PbError;
use thiserror::Error;

/// Errors surfaced by the plant API. Operational faults (pump latches,
/// ERROR_STATE) are state, not errors; these cover construction defects,
/// bad commands, and a simulation that will not settle.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlantError {
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Unknown valve tag: {tag}")]
    UnknownValve { tag: String },

    #[error("Simulation did not settle within {ticks} ticks")]
    DidNotSettle { ticks: u32 },

    #[error(transparent)]
    Component(#[from] ComponentError),
}

pub type PlantResult<T> = Result<T, PlantError>;

impl From<PbError> for PlantError {
    fn from(e: PbError) -> Self {
        PlantError::Component(e.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_valve_names_the_tag() {
        let err = PlantError::UnknownValve {
            tag: "V999_X".into(),
        };
        assert!(err.to_string().contains("V999_X"));
    }
}
