//! Read-only status snapshots for the reporting layer.

use crate::plant::{ProcessState, StartCommand};
use crate::recipe::BaseColor;
use pb_components::sensor::FlowStatus;
use pb_components::tank::LevelStatus;
use pb_components::valve::ValveState;
use pb_components::PumpState;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct TankStatus {
    pub name: String,
    pub capacity_liters: f64,
    pub level_liters: f64,
    pub level_percent: f64,
    pub level_status: LevelStatus,
}

#[derive(Debug, Clone, Serialize)]
pub struct PumpStatus {
    pub name: String,
    pub state: PumpState,
    pub flow_rate_lpm: f64,
    pub pressure_psi: f64,
    pub suction_valve: ValveState,
    pub discharge_valve: ValveState,
}

/// One base-color line: source tank, pump, and batch progress.
#[derive(Debug, Clone, Serialize)]
pub struct BaseLineStatus {
    pub color: BaseColor,
    pub tank: TankStatus,
    pub pump: PumpStatus,
    pub target_liters: f64,
    pub pumped_liters: f64,
    pub run_time_s: f64,
    pub needs_recovery: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct MixerStatus {
    pub tank: TankStatus,
    pub motor_on: bool,
    pub elapsed_s: f64,
    pub target_s: f64,
    pub drain_valve: ValveState,
    /// ALARM means "empty enough to accept a new batch".
    pub low_level_switch: FlowStatus,
}

/// Full plant snapshot, serializable for machine consumers.
#[derive(Debug, Clone, Serialize)]
pub struct PlantStatus {
    pub process_state: ProcessState,
    pub batch_in_progress: bool,
    pub start_command: StartCommand,
    pub recipe_name: String,
    pub current_pumping: Option<BaseColor>,
    pub lines: Vec<BaseLineStatus>,
    pub mixer: MixerStatus,
}
