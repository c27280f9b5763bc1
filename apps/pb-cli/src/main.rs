use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use pb_plant::{Plant, PlantConfig, RunOptions, run_ticks, run_until_idle};

mod error;
mod report;
mod script;

use error::CliResult;
use script::ScriptCommand;

#[derive(Parser)]
#[command(name = "pb-cli")]
#[command(about = "Paint batch plant simulator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Execute an operator script against a fresh plant
    Run {
        /// Path to the script file
        script_path: PathBuf,
        /// Optional plant configuration YAML (defaults built in)
        #[arg(long)]
        config: Option<PathBuf>,
        /// Simulated seconds per tick
        #[arg(long, default_value_t = 1.0)]
        dt: f64,
        /// Tick budget for RUN_UNTIL_IDLE
        #[arg(long, default_value_t = 10_000)]
        max_ticks: u32,
        /// Emit the final plant status as JSON instead of a text report
        #[arg(long)]
        json: bool,
    },
    /// Parse a script and report syntax errors without running it
    Validate {
        /// Path to the script file
        script_path: PathBuf,
    },
}

fn main() -> CliResult<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            script_path,
            config,
            dt,
            max_ticks,
            json,
        } => cmd_run(&script_path, config.as_deref(), dt, max_ticks, json),
        Commands::Validate { script_path } => cmd_validate(&script_path),
    }
}

fn cmd_run(
    script_path: &Path,
    config_path: Option<&Path>,
    dt: f64,
    max_ticks: u32,
    json: bool,
) -> CliResult<()> {
    let config = load_config(config_path)?;
    let commands = script::parse_script(&std::fs::read_to_string(script_path)?)?;

    let mut plant = Plant::new(config)?;
    let options = RunOptions {
        dt_s: dt,
        max_ticks,
    };
    for command in commands {
        execute(&mut plant, command, options)?;
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&plant.status())?);
    } else {
        let events = plant.drain_events();
        print!("{}", report::render_report(&plant.status(), &events));
    }
    Ok(())
}

fn cmd_validate(script_path: &Path) -> CliResult<()> {
    println!("Validating script: {}", script_path.display());
    let commands = script::parse_script(&std::fs::read_to_string(script_path)?)?;
    println!("✓ Script is valid ({} commands)", commands.len());
    Ok(())
}

fn load_config(config_path: Option<&Path>) -> CliResult<PlantConfig> {
    match config_path {
        Some(path) => Ok(serde_yaml::from_str(&std::fs::read_to_string(path)?)?),
        None => Ok(PlantConfig::default()),
    }
}

fn execute(plant: &mut Plant, command: ScriptCommand, options: RunOptions) -> CliResult<()> {
    match command {
        ScriptCommand::SelectRecipe(recipe) => plant.select_recipe(recipe),
        ScriptCommand::SetStartCommand(start) => plant.set_start_command(start),
        ScriptCommand::SetValve { tag, state } => plant.set_valve(&tag, state)?,
        ScriptCommand::Run { ticks } => run_ticks(plant, ticks, options.dt_s)?,
        ScriptCommand::RunUntilIdle => {
            let ticks = run_until_idle(plant, options)?;
            println!("Settled after {ticks} ticks");
        }
    }
    Ok(())
}
