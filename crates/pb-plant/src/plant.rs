//! The plant aggregate and its batch state machine.
//!
//! `Plant` owns every component by value: three base-color lines (source
//! tank plus pump), the shared mixing tank, and the mixer. One call to
//! [`Plant::update`] advances component physics and then runs exactly one
//! state-machine step; nothing else mutates the component graph.
//!
//! Batch lifecycle: IDLE takes a start command, validates the recipe and
//! inventory, and arms one transfer task per base color. PUMPING_BASE moves
//! liquid one color at a time in priority order, latching a per-color
//! recovery flag when its pump faults mid-transfer so the remaining liters
//! are delivered after the latch clears rather than restarted. MIXING and
//! EMPTYING are timed by the mixer motor and the drain rate. ERROR_STATE is
//! terminal until external intervention.

use crate::config::PlantConfig;
use crate::error::{PlantError, PlantResult};
use crate::events::EventLog;
use crate::recipe::{BaseColor, Recipe};
use crate::status::{BaseLineStatus, MixerStatus, PlantStatus, PumpStatus, TankStatus};
use core::fmt;
use pb_components::mixer::Mixer;
use pb_components::pump::{Pump, PumpState};
use pb_components::sensor::{FlowStatus, Sensor, SensorKind};
use pb_components::tank::{LevelStatus, Tank};
use pb_components::valve::{Valve, ValveState};
use pb_core::numeric::EPSILON_LITERS;
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

/// Overall batch sequencing state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ProcessState {
    Idle,
    PumpingBase,
    Mixing,
    Emptying,
    ErrorState,
    WaitingForRecovery,
}

impl fmt::Display for ProcessState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProcessState::Idle => write!(f, "IDLE"),
            ProcessState::PumpingBase => write!(f, "PUMPING_BASE"),
            ProcessState::Mixing => write!(f, "MIXING"),
            ProcessState::Emptying => write!(f, "EMPTYING"),
            ProcessState::ErrorState => write!(f, "ERROR_STATE"),
            ProcessState::WaitingForRecovery => write!(f, "WAITING_FOR_RECOVERY"),
        }
    }
}

/// Operator start command. Consumed (reset to `Off`) by a successful batch
/// start; turning it `Off` never aborts an in-flight batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StartCommand {
    On,
    Off,
}

impl fmt::Display for StartCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StartCommand::On => write!(f, "ON"),
            StartCommand::Off => write!(f, "OFF"),
        }
    }
}

/// Per-color transfer bookkeeping for the batch in progress.
#[derive(Debug, Clone, Default)]
struct ColorTask {
    target_liters: f64,
    pumped_liters: f64,
    run_time_s: f64,
    needs_recovery: bool,
}

impl ColorTask {
    fn remaining_liters(&self) -> f64 {
        (self.target_liters - self.pumped_liters).max(0.0)
    }

    /// This color participates in the current recipe.
    fn is_active(&self) -> bool {
        self.target_liters > EPSILON_LITERS
    }

    fn is_complete(&self) -> bool {
        self.remaining_liters() <= EPSILON_LITERS
    }
}

/// One base-color line: source tank plus its transfer pump.
#[derive(Debug, Clone)]
struct BaseLine {
    tank: Tank,
    pump: Pump,
    task: ColorTask,
}

impl BaseLine {
    fn new(color: BaseColor, config: &PlantConfig) -> PlantResult<Self> {
        let n = color.tag_number();
        let tank = Tank::new(
            format!("T-{n}"),
            config.base_tank_capacity_liters,
            config.base_tank_initial_liters,
        )?;
        let pump = Pump::new(
            format!("P-{n}"),
            Valve::new(format!("V{n}_S"), ValveState::Open)?,
            Valve::new(format!("V{n}_D"), ValveState::Open)?,
            Sensor::new(format!("PT-{n}"), SensorKind::PressureTransmitter)?,
            Sensor::new(format!("FS-{n}"), SensorKind::FlowSwitch)?,
        )?;
        Ok(Self {
            tank,
            pump,
            task: ColorTask::default(),
        })
    }
}

/// The whole plant. See the module docs for the batch lifecycle.
#[derive(Debug, Clone)]
pub struct Plant {
    config: PlantConfig,
    recipe: Recipe,
    state: ProcessState,
    start_command: StartCommand,
    batch_in_progress: bool,
    current_pumping: Option<BaseColor>,
    lines: [BaseLine; 3],
    mixer_tank: Tank,
    mixer: Mixer,
    log: EventLog,
}

impl Plant {
    /// Build the plant in its cold-start condition: source tanks at the
    /// configured initial fill, mixing tank empty, all valves open, pumps
    /// off, recipe defaulted to CELESTE.
    pub fn new(config: PlantConfig) -> PlantResult<Self> {
        config.validate()?;
        let lines = [
            BaseLine::new(BaseColor::White, &config)?,
            BaseLine::new(BaseColor::Blue, &config)?,
            BaseLine::new(BaseColor::Black, &config)?,
        ];
        let mixer_tank = Tank::new("T-401", config.mixer_tank_capacity_liters, 0.0)?;
        let mixer = Mixer::new("MX-401", Valve::new("V401_DRAIN", ValveState::Open)?)?;
        Ok(Self {
            config,
            recipe: Recipe::celeste(),
            state: ProcessState::Idle,
            start_command: StartCommand::Off,
            batch_in_progress: false,
            current_pumping: None,
            lines,
            mixer_tank,
            mixer,
            log: EventLog::new(),
        })
    }

    // ---- read-only queries ----

    pub fn config(&self) -> &PlantConfig {
        &self.config
    }

    pub fn state(&self) -> ProcessState {
        self.state
    }

    pub fn start_command(&self) -> StartCommand {
        self.start_command
    }

    pub fn batch_in_progress(&self) -> bool {
        self.batch_in_progress
    }

    pub fn recipe(&self) -> &Recipe {
        &self.recipe
    }

    pub fn current_pumping(&self) -> Option<BaseColor> {
        self.current_pumping
    }

    pub fn base_tank(&self, color: BaseColor) -> &Tank {
        &self.line(color).tank
    }

    pub fn pump(&self, color: BaseColor) -> &Pump {
        &self.line(color).pump
    }

    pub fn mixer_tank(&self) -> &Tank {
        &self.mixer_tank
    }

    pub fn mixer(&self) -> &Mixer {
        &self.mixer
    }

    pub fn target_liters(&self, color: BaseColor) -> f64 {
        self.line(color).task.target_liters
    }

    pub fn pumped_liters(&self, color: BaseColor) -> f64 {
        self.line(color).task.pumped_liters
    }

    /// Cumulative seconds this color's pump has spent delivering flow in
    /// the current batch.
    pub fn run_time_s(&self, color: BaseColor) -> f64 {
        self.line(color).task.run_time_s
    }

    pub fn needs_recovery(&self, color: BaseColor) -> bool {
        self.line(color).task.needs_recovery
    }

    /// Mixing-tank low-level switch: ALARM means "empty enough to accept a
    /// new batch".
    pub fn low_level_switch(&self) -> FlowStatus {
        match self.mixer_tank.level_status() {
            LevelStatus::Empty | LevelStatus::Low => FlowStatus::Alarm,
            LevelStatus::Normal => FlowStatus::Normal,
        }
    }

    pub fn events(&self) -> &[String] {
        self.log.entries()
    }

    /// Take all accumulated event-log entries.
    pub fn drain_events(&mut self) -> Vec<String> {
        self.log.drain()
    }

    /// Full serializable snapshot for the reporting layer.
    pub fn status(&self) -> PlantStatus {
        PlantStatus {
            process_state: self.state,
            batch_in_progress: self.batch_in_progress,
            start_command: self.start_command,
            recipe_name: self.recipe.name().to_string(),
            current_pumping: self.current_pumping,
            lines: BaseColor::ALL
                .into_iter()
                .map(|color| self.line_status(color))
                .collect(),
            mixer: MixerStatus {
                tank: tank_status(&self.mixer_tank),
                motor_on: self.mixer.motor_on(),
                elapsed_s: self.mixer.elapsed_s(),
                target_s: self.mixer.target_s(),
                drain_valve: self.mixer.drain_valve().state(),
                low_level_switch: self.low_level_switch(),
            },
        }
    }

    // ---- operator commands ----

    /// Select the recipe for the next batch. Rejected while a batch is in
    /// progress; the active targets are left untouched.
    pub fn select_recipe(&mut self, recipe: Recipe) {
        if self.batch_in_progress {
            warn!(recipe = recipe.name(), "recipe change rejected mid-batch");
            self.log.push(format!(
                "Recipe change to {} rejected: batch in progress",
                recipe.name()
            ));
            return;
        }
        self.log.push(format!("Recipe selected: {}", recipe.name()));
        self.recipe = recipe;
    }

    pub fn set_start_command(&mut self, command: StartCommand) {
        self.start_command = command;
    }

    /// Operator valve override by P&ID tag, e.g. `V201_D` or `V401_DRAIN`.
    pub fn set_valve(&mut self, tag: &str, state: ValveState) -> PlantResult<()> {
        let valve = self.valve_mut(tag).ok_or_else(|| PlantError::UnknownValve {
            tag: tag.to_string(),
        })?;
        match state {
            ValveState::Open => valve.open(),
            ValveState::Closed => valve.close(),
        }
        Ok(())
    }

    /// Look up a valve by tag (case-insensitive).
    pub fn valve_mut(&mut self, tag: &str) -> Option<&mut Valve> {
        let tag = tag.to_ascii_uppercase();
        if tag == "V401_DRAIN" {
            return Some(self.mixer.drain_valve_mut());
        }
        for color in BaseColor::ALL {
            let n = color.tag_number();
            if tag == format!("V{n}_S") {
                return Some(self.lines[color.index()].pump.suction_valve_mut());
            }
            if tag == format!("V{n}_D") {
                return Some(self.lines[color.index()].pump.discharge_valve_mut());
            }
        }
        None
    }

    /// Inject a flow-switch reading on one line, as a fault-injection hook
    /// for drills and tests.
    pub fn set_pump_flow_switch(
        &mut self,
        color: BaseColor,
        status: FlowStatus,
    ) -> PlantResult<()> {
        self.lines[color.index()].pump.set_flow_switch(status)?;
        Ok(())
    }

    // ---- simulation ----

    /// Advance the whole plant by one tick of `dt_s` seconds: pump physics,
    /// mixer timer, then one state-machine step.
    pub fn update(&mut self, dt_s: f64) -> PlantResult<()> {
        if !dt_s.is_finite() || dt_s <= 0.0 {
            return Err(PlantError::InvalidArg {
                what: "tick duration must be positive and finite",
            });
        }
        for line in &mut self.lines {
            line.pump.update();
        }
        self.mixer.update(dt_s);

        match self.state {
            ProcessState::Idle => self.step_idle(),
            ProcessState::PumpingBase => self.step_pumping(dt_s),
            ProcessState::Mixing => self.step_mixing(),
            ProcessState::Emptying => self.step_emptying(dt_s),
            ProcessState::WaitingForRecovery => self.step_waiting_for_recovery(),
            ProcessState::ErrorState => {}
        }
        Ok(())
    }

    fn line(&self, color: BaseColor) -> &BaseLine {
        &self.lines[color.index()]
    }

    fn step_idle(&mut self) {
        if self.start_command != StartCommand::On || self.batch_in_progress {
            return;
        }
        if !self.recipe.matches_batch_size(self.config.batch_size_liters) {
            let message = format!(
                "recipe {} totals {:.1} L but batch size is {:.1} L",
                self.recipe.name(),
                self.recipe.total_liters(),
                self.config.batch_size_liters
            );
            self.enter_error_state(message);
            return;
        }
        if let Some(reason) = self.start_blocked() {
            self.log.push(format!("Batch start blocked: {reason}"));
            return;
        }

        for color in BaseColor::ALL {
            let target = self.recipe.liters_for(color);
            let line = &mut self.lines[color.index()];
            line.task = ColorTask {
                target_liters: target,
                ..ColorTask::default()
            };
            line.pump.rearm();
        }
        self.current_pumping = None;
        self.batch_in_progress = true;
        // Consumed: the operator must re-toggle for the next batch.
        self.start_command = StartCommand::Off;
        self.log.push(format!(
            "Starting batch: recipe {} ({:.1} L)",
            self.recipe.name(),
            self.config.batch_size_liters
        ));
        self.state = ProcessState::PumpingBase;
    }

    /// Why a commanded batch cannot start right now, if anything.
    fn start_blocked(&self) -> Option<String> {
        if self.low_level_switch() != FlowStatus::Alarm {
            return Some("mixing tank is not empty".to_string());
        }
        for color in BaseColor::ALL {
            let needed = self.recipe.liters_for(color);
            if needed <= EPSILON_LITERS {
                continue;
            }
            let available = self.line(color).tank.level_liters();
            if available + EPSILON_LITERS < needed {
                return Some(format!(
                    "insufficient {color} inventory: need {needed:.1} L, have {available:.1} L"
                ));
            }
        }
        None
    }

    fn step_pumping(&mut self, dt_s: f64) {
        if self.note_pump_faults() {
            // A fault was just latched; do not advance further this tick.
            return;
        }
        self.clear_recovered_lines();

        let color = match self.current_pumping {
            Some(color) => color,
            None => match self.select_next_color() {
                Some(color) => {
                    self.current_pumping = Some(color);
                    self.log.push(format!("Pumping {color} base"));
                    color
                }
                None => {
                    self.evaluate_pumping_progress();
                    return;
                }
            },
        };
        self.pump_color(color, dt_s);
    }

    /// Latch recovery flags for pumps that faulted since the last tick.
    /// Returns true if any fault is new.
    fn note_pump_faults(&mut self) -> bool {
        let mut newly_faulted = false;
        for color in BaseColor::ALL {
            let line = &mut self.lines[color.index()];
            if !line.pump.state().is_faulted()
                || line.task.needs_recovery
                || !line.task.is_active()
                || line.task.is_complete()
            {
                continue;
            }
            line.task.needs_recovery = true;
            newly_faulted = true;
            let why = match line.pump.state() {
                PumpState::StoppedOverpressure => "overpressure",
                PumpState::StoppedLowFlow => "low flow",
                _ => "fault",
            };
            self.log.push(format!(
                "Pump {} stopped on {why} while pumping {color}; flagged for recovery",
                line.pump.name()
            ));
            if self.current_pumping == Some(color) {
                self.current_pumping = None;
            }
        }
        newly_faulted
    }

    /// Drop recovery flags for lines whose pump latch has cleared.
    fn clear_recovered_lines(&mut self) {
        for color in BaseColor::ALL {
            let line = &mut self.lines[color.index()];
            if line.task.needs_recovery && !line.pump.state().is_faulted() {
                line.task.needs_recovery = false;
                self.log.push(format!(
                    "Pump {} recovered; {color} transfer may resume",
                    line.pump.name()
                ));
            }
        }
    }

    /// Next color to transfer, in fixed priority order, skipping lines that
    /// still need recovery.
    fn select_next_color(&self) -> Option<BaseColor> {
        BaseColor::ALL.into_iter().find(|&color| {
            let task = &self.line(color).task;
            task.is_active() && !task.is_complete() && !task.needs_recovery
        })
    }

    /// No pumpable candidate: either everything is delivered (go mix) or
    /// the remaining colors are blocked on recovery (go wait).
    fn evaluate_pumping_progress(&mut self) {
        let all_done = self
            .lines
            .iter()
            .all(|line| !line.task.is_active() || line.task.is_complete());
        let any_recovery = self.lines.iter().any(|line| line.task.needs_recovery);

        if all_done && !any_recovery {
            for line in &mut self.lines {
                line.pump.stop();
            }
            self.mixer.set_target_mixing_time(self.config.mixing_time_s);
            self.mixer.start_motor();
            self.log.push(format!(
                "All base colors delivered; mixing for {:.0} s",
                self.config.mixing_time_s
            ));
            self.state = ProcessState::Mixing;
        } else if any_recovery {
            self.log
                .push("Pumping stalled on faulted pumps; waiting for recovery".to_string());
            self.state = ProcessState::WaitingForRecovery;
        }
    }

    fn pump_color(&mut self, color: BaseColor, dt_s: f64) {
        let mut fatal: Option<String> = None;
        let mut finished = false;
        {
            let line = &mut self.lines[color.index()];
            let remaining = line.task.remaining_liters();
            if remaining <= EPSILON_LITERS {
                line.pump.mark_target_reached();
                self.log.push(format!(
                    "{color} target reached: {:.1} L delivered",
                    line.task.pumped_liters
                ));
                finished = true;
            } else {
                if !line.pump.suction_valve().is_open() {
                    line.pump.suction_valve_mut().open();
                    self.log.push(format!(
                        "Automatically opened {} for pumping {color}",
                        line.pump.suction_valve().name()
                    ));
                }
                if !line.pump.discharge_valve().is_open() {
                    line.pump.discharge_valve_mut().open();
                    self.log.push(format!(
                        "Automatically opened {} for pumping {color}",
                        line.pump.discharge_valve().name()
                    ));
                }
                line.pump.start();

                // Liquid moves only once the pump physics report delivery.
                if line.pump.flow_rate_lpm() > 0.0 {
                    if line.tank.is_effectively_empty() {
                        fatal = Some(format!(
                            "source tank {} exhausted with {remaining:.1} L of {color} still required",
                            line.tank.name()
                        ));
                    } else if self.mixer_tank.free_space_liters() <= EPSILON_LITERS {
                        fatal = Some(format!(
                            "mixing tank full with {remaining:.1} L of {color} still required"
                        ));
                    } else {
                        let step = (line.pump.flow_rate_lpm() / 60.0 * dt_s)
                            .min(remaining)
                            .min(line.tank.level_liters())
                            .min(self.mixer_tank.free_space_liters());
                        line.tank.remove_liquid(step);
                        self.mixer_tank.add_liquid(step);
                        line.task.pumped_liters += step;
                        line.task.run_time_s += dt_s;
                        if line.task.is_complete() {
                            line.pump.mark_target_reached();
                            self.log.push(format!(
                                "{color} target reached: {:.1} L delivered in {:.1} s",
                                line.task.pumped_liters, line.task.run_time_s
                            ));
                            finished = true;
                        }
                    }
                }
            }
        }
        if let Some(message) = fatal {
            self.enter_error_state(message);
        } else if finished {
            self.current_pumping = None;
        }
    }

    fn step_mixing(&mut self) {
        // The mixer's own timer governs the motor; move on once it stops.
        if self.mixer.motor_on() {
            return;
        }
        self.log
            .push(format!("Mixing complete after {:.1} s", self.mixer.elapsed_s()));
        if !self.mixer.drain_valve().is_open() {
            self.mixer.drain_valve_mut().open();
            self.log.push(format!(
                "Automatically opened {} for draining",
                self.mixer.drain_valve().name()
            ));
        }
        self.state = ProcessState::Emptying;
    }

    fn step_emptying(&mut self, dt_s: f64) {
        if self.mixer_tank.is_effectively_empty() {
            self.mixer.drain_valve_mut().close();
            self.batch_in_progress = false;
            self.current_pumping = None;
            self.log.push("Mixing tank empty; batch complete".to_string());
            self.state = ProcessState::Idle;
            return;
        }
        // Emptying owns the drain valve: reopen it if something closed it.
        if !self.mixer.drain_valve().is_open() {
            self.mixer.drain_valve_mut().open();
            self.log.push(format!(
                "Automatically opened {} for draining",
                self.mixer.drain_valve().name()
            ));
        }
        let step = self.mixer_tank.capacity_liters() * self.config.drain_fraction_per_s * dt_s;
        self.mixer_tank.remove_liquid(step);
    }

    fn step_waiting_for_recovery(&mut self) {
        self.clear_recovered_lines();
        if self.lines.iter().any(|line| line.task.needs_recovery) {
            return;
        }
        if self.batch_in_progress {
            self.log
                .push("All pumps recovered; resuming batch".to_string());
            self.state = ProcessState::PumpingBase;
        } else {
            self.state = ProcessState::Idle;
        }
    }

    /// Unrecoverable process fault: stop everything and latch ERROR_STATE.
    fn enter_error_state(&mut self, message: String) {
        error!(%message, "plant entering ERROR_STATE");
        self.log
            .push(format!("ERROR: {message}; plant entering ERROR_STATE"));
        for line in &mut self.lines {
            line.pump.stop();
        }
        self.mixer.stop_motor();
        self.batch_in_progress = false;
        self.current_pumping = None;
        self.state = ProcessState::ErrorState;
    }

    fn line_status(&self, color: BaseColor) -> BaseLineStatus {
        let line = self.line(color);
        BaseLineStatus {
            color,
            tank: tank_status(&line.tank),
            pump: PumpStatus {
                name: line.pump.name().to_string(),
                state: line.pump.state(),
                flow_rate_lpm: line.pump.flow_rate_lpm(),
                pressure_psi: line.pump.pressure_psi(),
                suction_valve: line.pump.suction_valve().state(),
                discharge_valve: line.pump.discharge_valve().state(),
            },
            target_liters: line.task.target_liters,
            pumped_liters: line.task.pumped_liters,
            run_time_s: line.task.run_time_s,
            needs_recovery: line.task.needs_recovery,
        }
    }
}

fn tank_status(tank: &Tank) -> TankStatus {
    TankStatus {
        name: tank.name().to_string(),
        capacity_liters: tank.capacity_liters(),
        level_liters: tank.level_liters(),
        level_percent: tank.level_percent(),
        level_status: tank.level_status(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plant() -> Plant {
        Plant::new(PlantConfig::default()).unwrap()
    }

    #[test]
    fn cold_start_condition() {
        let plant = plant();
        assert_eq!(plant.state(), ProcessState::Idle);
        assert!(!plant.batch_in_progress());
        assert_eq!(plant.start_command(), StartCommand::Off);
        assert_eq!(plant.mixer_tank().level_liters(), 0.0);
        assert_eq!(plant.low_level_switch(), FlowStatus::Alarm);
        for color in BaseColor::ALL {
            assert_eq!(plant.base_tank(color).level_liters(), 250.0);
            assert_eq!(plant.pump(color).state(), PumpState::Stopped);
        }
    }

    #[test]
    fn idle_without_start_command_stays_idle() {
        let mut plant = plant();
        for _ in 0..5 {
            plant.update(1.0).unwrap();
        }
        assert_eq!(plant.state(), ProcessState::Idle);
        assert!(plant.events().is_empty());
    }

    #[test]
    fn start_command_is_consumed_on_batch_start() {
        let mut plant = plant();
        plant.set_start_command(StartCommand::On);
        plant.update(1.0).unwrap();
        assert_eq!(plant.state(), ProcessState::PumpingBase);
        assert!(plant.batch_in_progress());
        assert_eq!(plant.start_command(), StartCommand::Off);
        assert_eq!(plant.target_liters(BaseColor::White), 75.0);
        assert_eq!(plant.target_liters(BaseColor::Blue), 75.0);
        assert_eq!(plant.target_liters(BaseColor::Black), 0.0);
    }

    #[test]
    fn recipe_batch_size_mismatch_is_fatal() {
        let mut plant = plant();
        plant.select_recipe(Recipe::new("HALF", 25.0, 25.0, 25.0).unwrap());
        plant.set_start_command(StartCommand::On);
        plant.update(1.0).unwrap();
        assert_eq!(plant.state(), ProcessState::ErrorState);
        assert!(!plant.batch_in_progress());
        assert!(plant.events().iter().any(|e| e.contains("ERROR")));

        // ERROR_STATE has no automatic exit.
        plant.set_start_command(StartCommand::On);
        for _ in 0..5 {
            plant.update(1.0).unwrap();
        }
        assert_eq!(plant.state(), ProcessState::ErrorState);
    }

    #[test]
    fn start_blocked_by_insufficient_inventory() {
        let config = PlantConfig {
            base_tank_initial_liters: 50.0,
            ..PlantConfig::default()
        };
        let mut plant = Plant::new(config).unwrap();
        plant.set_start_command(StartCommand::On);
        plant.update(1.0).unwrap();
        assert_eq!(plant.state(), ProcessState::Idle);
        assert!(!plant.batch_in_progress());
        assert!(plant.events().iter().any(|e| e.contains("blocked")));
    }

    #[test]
    fn recipe_change_rejected_mid_batch() {
        let mut plant = plant();
        plant.set_start_command(StartCommand::On);
        plant.update(1.0).unwrap();
        assert!(plant.batch_in_progress());

        plant.select_recipe(Recipe::navy());
        assert_eq!(plant.recipe().name(), "CELESTE");
        assert_eq!(plant.target_liters(BaseColor::Black), 0.0);
        assert!(plant.events().iter().any(|e| e.contains("rejected")));
    }

    #[test]
    fn valve_lookup_by_tag() {
        let mut plant = plant();
        plant.set_valve("V202_D", ValveState::Closed).unwrap();
        assert!(!plant.pump(BaseColor::Blue).discharge_valve().is_open());
        plant.set_valve("v401_drain", ValveState::Closed).unwrap();
        assert!(!plant.mixer().drain_valve().is_open());

        let err = plant.set_valve("V999_X", ValveState::Open).unwrap_err();
        assert!(matches!(err, PlantError::UnknownValve { .. }));
    }

    #[test]
    fn update_rejects_bad_dt() {
        let mut plant = plant();
        assert!(plant.update(0.0).is_err());
        assert!(plant.update(-1.0).is_err());
        assert!(plant.update(f64::NAN).is_err());
    }

    #[test]
    fn source_exhaustion_mid_transfer_is_fatal() {
        let mut plant = plant();
        plant.set_start_command(StartCommand::On);
        plant.update(1.0).unwrap();
        plant.update(1.0).unwrap();
        assert_eq!(plant.current_pumping(), Some(BaseColor::White));

        // Liquid disappears under a delivering pump.
        plant.lines[BaseColor::White.index()].tank.remove_liquid(1000.0);
        plant.update(1.0).unwrap();

        assert_eq!(plant.state(), ProcessState::ErrorState);
        assert!(!plant.batch_in_progress());
        assert_eq!(plant.pump(BaseColor::White).state(), PumpState::Stopped);
        assert!(plant.events().iter().any(|e| e.contains("exhausted")));
    }

    #[test]
    fn mixer_overflow_mid_transfer_is_fatal() {
        let mut plant = plant();
        plant.set_start_command(StartCommand::On);
        plant.update(1.0).unwrap();
        plant.update(1.0).unwrap();

        // The mixing tank fills to capacity with liters still owed.
        plant.mixer_tank.add_liquid(1000.0);
        plant.update(1.0).unwrap();

        assert_eq!(plant.state(), ProcessState::ErrorState);
        assert!(!plant.batch_in_progress());
        assert!(!plant.mixer().motor_on());
        assert!(plant.events().iter().any(|e| e.contains("mixing tank full")));
    }

    #[test]
    fn pumping_selects_white_first() {
        let mut plant = plant();
        plant.set_start_command(StartCommand::On);
        plant.update(1.0).unwrap();
        plant.update(1.0).unwrap();
        assert_eq!(plant.current_pumping(), Some(BaseColor::White));
        assert_eq!(plant.pump(BaseColor::White).state(), PumpState::Running);
        assert_eq!(plant.pump(BaseColor::Blue).state(), PumpState::Stopped);
    }
}
