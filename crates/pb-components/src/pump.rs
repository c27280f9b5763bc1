//! Base-paint transfer pump: pressure/flow physics and fault latching.
//!
//! The pump owns its suction and discharge valves and its two transducers
//! (pressure transmitter, flow switch). Its state is a single tagged enum so
//! that contradictory latch combinations are unrepresentable.
//!
//! Physical model (one consistent variant, see DESIGN.md):
//! - Running with both valves open: rated flow, pressure settles at the
//!   operating point.
//! - Running deadheaded (discharge closed): zero flow, pressure builds by a
//!   fixed step per tick toward the overpressure trip.
//! - Running starved (suction closed): zero flow; the flow switch is driven
//!   to ALARM by the computed-flow deficit and latches the pump on the next
//!   tick.
//! - Any stopped pump expects zero flow, so its flow switch settles back to
//!   NORMAL at the end of the tick.
//!
//! Pressure dynamics are per-tick steps (the canonical driver ticks at 1 s);
//! liquid transfer integration is dt-scaled and lives in the plant.

use crate::error::{ComponentError, ComponentResult};
use crate::sensor::{FlowStatus, Sensor, SensorKind};
use crate::valve::Valve;
use core::fmt;
use serde::Serialize;

/// Delivered flow with both valves open and no latch held (L/min).
pub const RATED_FLOW_LPM: f64 = 100.0;
/// Steady operating pressure while delivering (psi).
pub const OPERATING_PRESSURE_PSI: f64 = 33.0;
/// Pressure above this trips the overpressure latch (psi).
pub const OVERPRESSURE_TRIP_PSI: f64 = 50.0;
/// Latches clear only once pressure is back below this (psi).
pub const PRESSURE_RESET_PSI: f64 = 20.0;
/// Pressure build per tick while deadheaded (psi).
pub const DEADHEAD_RISE_PSI: f64 = 5.0;
/// Simulated ceiling for deadhead pressure build (psi).
pub const DEADHEAD_CAP_PSI: f64 = 60.0;
/// Pressure decay per tick while stopped on overpressure with the
/// discharge open (psi).
pub const PRESSURE_DECAY_PSI: f64 = 10.0;

/// Pump state. Exactly one latch (or none) is held at a time; when the
/// low-flow and overpressure trips fire in the same tick, overpressure wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PumpState {
    /// Commanded on and able to deliver (subject to valve positions).
    Running,
    /// Off with no latch held; `start()` re-arms it.
    Stopped,
    /// Overpressure latch. Clears to `Stopped` once pressure has decayed
    /// below [`PRESSURE_RESET_PSI`].
    StoppedOverpressure,
    /// Low-flow latch. Clears to `Stopped` when the flow switch reads
    /// NORMAL with the discharge open and pressure below the reset
    /// threshold.
    StoppedLowFlow,
    /// Current task complete. Only `rearm()` (a fresh target) releases it.
    StoppedTargetReached,
}

impl fmt::Display for PumpState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PumpState::Running => write!(f, "RUNNING"),
            PumpState::Stopped => write!(f, "STOPPED"),
            PumpState::StoppedOverpressure => write!(f, "STOPPED_OVERPRESSURE"),
            PumpState::StoppedLowFlow => write!(f, "STOPPED_LOW_FLOW"),
            PumpState::StoppedTargetReached => write!(f, "STOPPED_TARGET_REACHED"),
        }
    }
}

impl PumpState {
    pub fn is_running(self) -> bool {
        matches!(self, PumpState::Running)
    }

    /// True while an operational latch blocks the pump.
    pub fn is_faulted(self) -> bool {
        matches!(
            self,
            PumpState::StoppedOverpressure | PumpState::StoppedLowFlow
        )
    }
}

/// Transfer pump bound to one base-color line.
#[derive(Debug, Clone)]
pub struct Pump {
    name: String,
    state: PumpState,
    flow_rate_lpm: f64,
    pressure_psi: f64,
    suction: Valve,
    discharge: Valve,
    pressure_tx: Sensor,
    flow_switch: Sensor,
}

impl Pump {
    /// Create a pump. The transducers must carry the matching kinds;
    /// a mismatch is a construction error, not a runtime fault.
    pub fn new(
        name: impl Into<String>,
        suction: Valve,
        discharge: Valve,
        pressure_tx: Sensor,
        flow_switch: Sensor,
    ) -> ComponentResult<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(ComponentError::InvalidArg {
                what: "pump name must not be empty",
            });
        }
        if pressure_tx.kind() != SensorKind::PressureTransmitter {
            return Err(ComponentError::InvalidArg {
                what: "pump pressure transmitter must be a PRESSURE_TRANSMITTER",
            });
        }
        if flow_switch.kind() != SensorKind::FlowSwitch {
            return Err(ComponentError::InvalidArg {
                what: "pump flow switch must be a FLOW_SWITCH",
            });
        }
        let mut pressure_tx = pressure_tx;
        pressure_tx.force_pressure(0.0);
        Ok(Self {
            name,
            state: PumpState::Stopped,
            flow_rate_lpm: 0.0,
            pressure_psi: 0.0,
            suction,
            discharge,
            pressure_tx,
            flow_switch,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn state(&self) -> PumpState {
        self.state
    }

    pub fn flow_rate_lpm(&self) -> f64 {
        self.flow_rate_lpm
    }

    pub fn pressure_psi(&self) -> f64 {
        self.pressure_psi
    }

    pub fn suction_valve(&self) -> &Valve {
        &self.suction
    }

    pub fn suction_valve_mut(&mut self) -> &mut Valve {
        &mut self.suction
    }

    pub fn discharge_valve(&self) -> &Valve {
        &self.discharge
    }

    pub fn discharge_valve_mut(&mut self) -> &mut Valve {
        &mut self.discharge
    }

    pub fn pressure_transmitter(&self) -> &Sensor {
        &self.pressure_tx
    }

    pub fn flow_switch(&self) -> &Sensor {
        &self.flow_switch
    }

    /// Inject a flow-switch reading between ticks. The physical model will
    /// overwrite it at the end of the next update, but a pending ALARM is
    /// honored by that update's trip check first.
    pub fn set_flow_switch(&mut self, status: FlowStatus) -> ComponentResult<()> {
        self.flow_switch.set_flow_status(status)
    }

    /// Command the pump on. Only an unlatched stopped pump arms; latched
    /// states refuse until their recovery condition clears them inside
    /// `update`, and a completed task stays down until `rearm`.
    pub fn start(&mut self) {
        if self.state == PumpState::Stopped {
            self.state = PumpState::Running;
        }
    }

    /// Command a running pump off. Latches are unaffected.
    pub fn stop(&mut self) {
        if self.state == PumpState::Running {
            self.state = PumpState::Stopped;
        }
        self.flow_rate_lpm = 0.0;
    }

    /// End the current transfer task; the pump will not restart until a new
    /// target re-arms it.
    pub fn mark_target_reached(&mut self) {
        self.state = PumpState::StoppedTargetReached;
        self.flow_rate_lpm = 0.0;
    }

    /// Release a completed pump for a fresh task assignment.
    pub fn rearm(&mut self) {
        if self.state == PumpState::StoppedTargetReached {
            self.state = PumpState::Stopped;
        }
    }

    /// Advance one tick. Order matters and is part of the contract:
    /// trip checks read last tick's sensor values before the physics
    /// recompute them.
    pub fn update(&mut self) {
        // 1. Immediate trips, evaluated only while running. Both conditions
        //    are checked every tick; overpressure wins if both fire.
        if self.state.is_running() {
            if self.flow_switch_reads_alarm() {
                self.state = PumpState::StoppedLowFlow;
                self.flow_rate_lpm = 0.0;
            }
            if self.pressure_psi > OVERPRESSURE_TRIP_PSI {
                self.state = PumpState::StoppedOverpressure;
                self.flow_rate_lpm = 0.0;
            }
        }

        match self.state {
            PumpState::Running => match (self.suction.is_open(), self.discharge.is_open()) {
                (true, true) => {
                    self.flow_rate_lpm = RATED_FLOW_LPM;
                    self.pressure_psi = OPERATING_PRESSURE_PSI;
                    self.flow_switch.force_flow(FlowStatus::Normal);
                }
                (_, false) => {
                    // Deadheaded: no delivery, pressure builds toward the trip.
                    self.flow_rate_lpm = 0.0;
                    self.pressure_psi =
                        (self.pressure_psi + DEADHEAD_RISE_PSI).min(DEADHEAD_CAP_PSI);
                }
                (false, true) => {
                    // Starved suction: the computed-flow deficit drives the
                    // switch to ALARM; the latch fires on the next tick.
                    self.flow_rate_lpm = 0.0;
                    self.flow_switch.force_flow(FlowStatus::Alarm);
                }
            },
            PumpState::StoppedOverpressure => {
                self.flow_rate_lpm = 0.0;
                if self.discharge.is_open() {
                    self.pressure_psi = (self.pressure_psi - PRESSURE_DECAY_PSI).max(0.0);
                }
                if self.pressure_psi < PRESSURE_RESET_PSI {
                    self.state = PumpState::Stopped;
                }
                self.flow_switch.force_flow(FlowStatus::Normal);
            }
            PumpState::StoppedLowFlow => {
                self.flow_rate_lpm = 0.0;
                if self.discharge.is_open() {
                    // Open discharge vents the line immediately.
                    self.pressure_psi = 0.0;
                }
                if !self.flow_switch_reads_alarm()
                    && self.discharge.is_open()
                    && self.pressure_psi < PRESSURE_RESET_PSI
                {
                    self.state = PumpState::Stopped;
                }
                // An idle pump expects no flow; the switch settles back.
                self.flow_switch.force_flow(FlowStatus::Normal);
            }
            PumpState::Stopped | PumpState::StoppedTargetReached => {
                self.flow_rate_lpm = 0.0;
                if self.discharge.is_open() {
                    self.pressure_psi = 0.0;
                }
            }
        }

        self.pressure_tx.force_pressure(self.pressure_psi);
    }

    fn flow_switch_reads_alarm(&self) -> bool {
        matches!(self.flow_switch.flow_status(), Ok(FlowStatus::Alarm))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::valve::ValveState;

    fn pump() -> Pump {
        Pump::new(
            "P-201",
            Valve::new("V201_S", ValveState::Open).unwrap(),
            Valve::new("V201_D", ValveState::Open).unwrap(),
            Sensor::new("PT-201", SensorKind::PressureTransmitter).unwrap(),
            Sensor::new("FS-201", SensorKind::FlowSwitch).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn construction_rejects_sensor_role_mismatch() {
        let result = Pump::new(
            "P-201",
            Valve::new("V201_S", ValveState::Open).unwrap(),
            Valve::new("V201_D", ValveState::Open).unwrap(),
            Sensor::new("FS-201", SensorKind::FlowSwitch).unwrap(),
            Sensor::new("PT-201", SensorKind::PressureTransmitter).unwrap(),
        );
        assert!(matches!(result, Err(ComponentError::InvalidArg { .. })));
    }

    #[test]
    fn flow_only_when_running_with_both_valves_open() {
        let mut pump = pump();
        pump.update();
        assert_eq!(pump.flow_rate_lpm(), 0.0);

        pump.start();
        pump.update();
        assert_eq!(pump.state(), PumpState::Running);
        assert_eq!(pump.flow_rate_lpm(), RATED_FLOW_LPM);
        assert_eq!(pump.pressure_psi(), OPERATING_PRESSURE_PSI);
        assert_eq!(
            pump.pressure_transmitter().pressure_psi().unwrap(),
            OPERATING_PRESSURE_PSI
        );

        pump.discharge_valve_mut().close();
        pump.update();
        assert_eq!(pump.flow_rate_lpm(), 0.0);
    }

    #[test]
    fn deadhead_builds_pressure_and_trips_overpressure() {
        let mut pump = pump();
        pump.start();
        pump.update(); // settles at 33 psi
        pump.discharge_valve_mut().close();

        let mut ticks = 0;
        while pump.state().is_running() && ticks < 20 {
            pump.update();
            ticks += 1;
        }
        assert_eq!(pump.state(), PumpState::StoppedOverpressure);
        assert!(pump.state().is_faulted());
        assert_eq!(pump.flow_rate_lpm(), 0.0);
        assert!(pump.pressure_psi() > OVERPRESSURE_TRIP_PSI);
        // 33 -> 38 -> 43 -> 48 -> 53, trip on the tick after crossing 50
        assert_eq!(ticks, 5);
    }

    #[test]
    fn overpressure_round_trip_recovers_through_decay() {
        let mut pump = pump();
        pump.start();
        pump.update();
        pump.discharge_valve_mut().close();
        for _ in 0..5 {
            pump.update();
        }
        assert_eq!(pump.state(), PumpState::StoppedOverpressure);

        // Discharge closed: pressure holds, latch stays.
        let held = pump.pressure_psi();
        pump.update();
        assert_eq!(pump.pressure_psi(), held);
        assert_eq!(pump.state(), PumpState::StoppedOverpressure);

        // Open the discharge: decay at 10 psi/tick clears below 20.
        pump.discharge_valve_mut().open();
        let mut ticks = 0;
        while pump.state() == PumpState::StoppedOverpressure && ticks < 20 {
            pump.update();
            ticks += 1;
        }
        assert_eq!(pump.state(), PumpState::Stopped);
        assert!(pump.pressure_psi() < PRESSURE_RESET_PSI);

        // And the pump resumes at rated flow once restarted.
        pump.start();
        pump.update();
        assert_eq!(pump.flow_rate_lpm(), RATED_FLOW_LPM);
    }

    #[test]
    fn starved_suction_trips_low_flow_on_next_tick() {
        let mut pump = pump();
        pump.start();
        pump.update();
        pump.suction_valve_mut().close();

        pump.update(); // switch driven to ALARM, still running
        assert_eq!(pump.state(), PumpState::Running);
        assert_eq!(pump.flow_rate_lpm(), 0.0);
        assert_eq!(
            pump.flow_switch().flow_status().unwrap(),
            FlowStatus::Alarm
        );

        pump.update(); // trip check reads the alarm
        assert_eq!(pump.state(), PumpState::StoppedLowFlow);
    }

    #[test]
    fn low_flow_latch_clears_with_discharge_open() {
        let mut pump = pump();
        pump.start();
        pump.update();
        pump.set_flow_switch(FlowStatus::Alarm).unwrap();

        pump.update();
        assert_eq!(pump.state(), PumpState::StoppedLowFlow);
        // Open discharge vented the line immediately.
        assert_eq!(pump.pressure_psi(), 0.0);

        pump.update();
        assert_eq!(pump.state(), PumpState::Stopped);

        pump.start();
        pump.update();
        assert_eq!(pump.flow_rate_lpm(), RATED_FLOW_LPM);
    }

    #[test]
    fn low_flow_latch_holds_pressure_with_discharge_closed() {
        let mut pump = pump();
        pump.start();
        pump.update();
        pump.discharge_valve_mut().close();
        pump.set_flow_switch(FlowStatus::Alarm).unwrap();

        pump.update();
        assert_eq!(pump.state(), PumpState::StoppedLowFlow);
        assert_eq!(pump.pressure_psi(), OPERATING_PRESSURE_PSI);

        // Stays latched while the discharge is closed.
        pump.update();
        pump.update();
        assert_eq!(pump.state(), PumpState::StoppedLowFlow);
    }

    #[test]
    fn latched_pump_ignores_start() {
        let mut pump = pump();
        pump.start();
        pump.update();
        pump.discharge_valve_mut().close();
        for _ in 0..5 {
            pump.update();
        }
        assert_eq!(pump.state(), PumpState::StoppedOverpressure);

        pump.start();
        assert_eq!(pump.state(), PumpState::StoppedOverpressure);
    }

    #[test]
    fn target_reached_requires_rearm() {
        let mut pump = pump();
        pump.start();
        pump.update();
        pump.mark_target_reached();
        assert_eq!(pump.state(), PumpState::StoppedTargetReached);

        pump.start();
        pump.update();
        assert_eq!(pump.state(), PumpState::StoppedTargetReached);
        assert_eq!(pump.flow_rate_lpm(), 0.0);

        pump.rearm();
        pump.start();
        pump.update();
        assert_eq!(pump.state(), PumpState::Running);
        assert_eq!(pump.flow_rate_lpm(), RATED_FLOW_LPM);
    }

    #[test]
    fn generic_stop_vents_pressure_through_open_discharge() {
        let mut pump = pump();
        pump.start();
        pump.update();
        assert_eq!(pump.pressure_psi(), OPERATING_PRESSURE_PSI);

        pump.stop();
        pump.update();
        assert_eq!(pump.pressure_psi(), 0.0);
    }

    #[test]
    fn generic_stop_holds_pressure_with_discharge_closed() {
        let mut pump = pump();
        pump.start();
        pump.update();
        pump.stop();
        pump.discharge_valve_mut().close();
        pump.update();
        assert_eq!(pump.pressure_psi(), OPERATING_PRESSURE_PSI);
    }
}
