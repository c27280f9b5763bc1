//! Tick drivers over [`Plant::update`].
//!
//! The plant has no internal clock; these helpers advance it by a fixed
//! number of ticks or until the batch cycle has settled.

use crate::error::{PlantError, PlantResult};
use crate::plant::{Plant, ProcessState, StartCommand};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunOptions {
    /// Simulated seconds per tick.
    pub dt_s: f64,
    /// Upper bound for [`run_until_idle`].
    pub max_ticks: u32,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            dt_s: 1.0,
            max_ticks: 10_000,
        }
    }
}

/// Advance the plant a fixed number of ticks.
pub fn run_ticks(plant: &mut Plant, ticks: u32, dt_s: f64) -> PlantResult<()> {
    for _ in 0..ticks {
        plant.update(dt_s)?;
    }
    Ok(())
}

/// True when the plant has nothing left to do: idle with no batch and no
/// pending start command, or halted in ERROR_STATE.
pub fn is_settled(plant: &Plant) -> bool {
    match plant.state() {
        ProcessState::ErrorState => true,
        ProcessState::Idle => {
            !plant.batch_in_progress() && plant.start_command() == StartCommand::Off
        }
        _ => false,
    }
}

/// Tick until the plant settles, returning how many ticks that took.
/// Fails with [`PlantError::DidNotSettle`] past `max_ticks`.
pub fn run_until_idle(plant: &mut Plant, options: RunOptions) -> PlantResult<u32> {
    let mut ticks = 0;
    while !is_settled(plant) {
        if ticks >= options.max_ticks {
            return Err(PlantError::DidNotSettle { ticks });
        }
        plant.update(options.dt_s)?;
        ticks += 1;
    }
    Ok(ticks)
}
