//! Binary on/off process valve.

use crate::error::{ComponentError, ComponentResult};
use core::fmt;
use serde::{Deserialize, Serialize};

/// Valve position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValveState {
    Open,
    Closed,
}

impl fmt::Display for ValveState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValveState::Open => write!(f, "OPEN"),
            ValveState::Closed => write!(f, "CLOSED"),
        }
    }
}

/// Two-state shutoff valve addressed by its P&ID tag.
///
/// `open`/`close` are idempotent; there is no travel time. The plant may
/// actuate a valve automatically during sequencing or on operator command.
#[derive(Debug, Clone)]
pub struct Valve {
    name: String,
    state: ValveState,
}

impl Valve {
    pub fn new(name: impl Into<String>, state: ValveState) -> ComponentResult<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(ComponentError::InvalidArg {
                what: "valve name must not be empty",
            });
        }
        Ok(Self { name, state })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn state(&self) -> ValveState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state == ValveState::Open
    }

    pub fn open(&mut self) {
        self.state = ValveState::Open;
    }

    pub fn close(&mut self) {
        self.state = ValveState::Closed;
    }
}
