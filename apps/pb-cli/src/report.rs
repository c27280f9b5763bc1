//! Plain-text status report.

use pb_plant::{BaseLineStatus, PlantStatus, TankStatus};
use std::fmt::Write;

/// Render a full operator-facing status report, followed by the event log.
pub fn render_report(status: &PlantStatus, events: &[String]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "=== PAINT BATCH PLANT STATUS ===");
    let _ = writeln!(out, "Process state:     {}", status.process_state);
    let _ = writeln!(
        out,
        "Batch in progress: {}",
        if status.batch_in_progress { "yes" } else { "no" }
    );
    let _ = writeln!(out, "Start command:     {}", status.start_command);
    let _ = writeln!(out, "Recipe:            {}", status.recipe_name);
    match status.current_pumping {
        Some(color) => {
            let _ = writeln!(out, "Currently pumping: {color}");
        }
        None => {
            let _ = writeln!(out, "Currently pumping: -");
        }
    }

    let _ = writeln!(out, "\nBASE LINES");
    for line in &status.lines {
        render_line(&mut out, line);
    }

    let mixer = &status.mixer;
    let _ = writeln!(out, "\nMIXER");
    let _ = writeln!(out, "  {}", tank_summary(&mixer.tank));
    let _ = writeln!(
        out,
        "  motor {}  mixed {:.1}/{:.1} s  drain {}  low-level switch {}",
        if mixer.motor_on { "ON" } else { "OFF" },
        mixer.elapsed_s,
        mixer.target_s,
        mixer.drain_valve,
        mixer.low_level_switch
    );

    if !events.is_empty() {
        let _ = writeln!(out, "\nEVENTS");
        for event in events {
            let _ = writeln!(out, "  - {event}");
        }
    }
    out
}

fn render_line(out: &mut String, line: &BaseLineStatus) {
    let _ = writeln!(out, "  {}", line.color);
    let _ = writeln!(out, "    {}", tank_summary(&line.tank));
    let pump = &line.pump;
    let _ = writeln!(
        out,
        "    {} {}  flow {:.1} LPM  {:.1} psi  suction {}  discharge {}",
        pump.name,
        pump.state,
        pump.flow_rate_lpm,
        pump.pressure_psi,
        pump.suction_valve,
        pump.discharge_valve
    );
    let mut progress = format!(
        "    target {:.1} L  pumped {:.1} L  run {:.1} s",
        line.target_liters, line.pumped_liters, line.run_time_s
    );
    if line.needs_recovery {
        progress.push_str("  [NEEDS RECOVERY]");
    }
    let _ = writeln!(out, "{progress}");
}

fn tank_summary(tank: &TankStatus) -> String {
    format!(
        "{}  {:.1}/{:.1} L ({:.1}%)  {}",
        tank.name, tank.level_liters, tank.capacity_liters, tank.level_percent, tank.level_status
    )
}
