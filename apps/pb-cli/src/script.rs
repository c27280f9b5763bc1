//! Line-oriented operator script parser.
//!
//! Each non-empty line is one command, `#` starts a comment. Keywords and
//! values are case-insensitive; `KEY = VALUE` and `KEY VALUE` forms are
//! equivalent.
//!
//! ```text
//! RECIPE = CELESTE
//! START_COMMAND = ON
//! RUN 10
//! VALVE V201_D CLOSED
//! RUN_UNTIL_IDLE
//! ```

use crate::error::{CliError, CliResult};
use pb_components::valve::ValveState;
use pb_plant::{Recipe, StartCommand};

#[derive(Debug, Clone, PartialEq)]
pub enum ScriptCommand {
    SelectRecipe(Recipe),
    SetStartCommand(StartCommand),
    SetValve { tag: String, state: ValveState },
    Run { ticks: u32 },
    RunUntilIdle,
}

pub fn parse_script(text: &str) -> CliResult<Vec<ScriptCommand>> {
    let mut commands = Vec::new();
    for (index, raw_line) in text.lines().enumerate() {
        let line_no = index + 1;
        let line = raw_line.split('#').next().unwrap_or("").trim();
        if line.is_empty() {
            continue;
        }
        commands.push(parse_line(line, line_no)?);
    }
    Ok(commands)
}

fn parse_line(line: &str, line_no: usize) -> CliResult<ScriptCommand> {
    let tokens: Vec<String> = line
        .replace('=', " ")
        .split_whitespace()
        .map(|t| t.to_ascii_uppercase())
        .collect();
    let err = |message: String| CliError::Script {
        line: line_no,
        message,
    };

    let (keyword, args) = match tokens.split_first() {
        Some((keyword, args)) => (keyword.as_str(), args),
        None => return Err(err("empty command".to_string())),
    };

    match keyword {
        "RECIPE" | "COLOR" => {
            let [name] = args else {
                return Err(err("expected: RECIPE <CELESTE|NAVY>".to_string()));
            };
            let recipe = match name.as_str() {
                "CELESTE" => Recipe::celeste(),
                "NAVY" => Recipe::navy(),
                other => return Err(err(format!("unknown recipe: {other}"))),
            };
            Ok(ScriptCommand::SelectRecipe(recipe))
        }
        "START_COMMAND" | "START" => {
            let [value] = args else {
                return Err(err("expected: START_COMMAND <ON|OFF>".to_string()));
            };
            let command = match value.as_str() {
                "ON" => StartCommand::On,
                "OFF" => StartCommand::Off,
                other => return Err(err(format!("expected ON or OFF, got: {other}"))),
            };
            Ok(ScriptCommand::SetStartCommand(command))
        }
        "VALVE" => {
            let [tag, position] = args else {
                return Err(err("expected: VALVE <tag> <OPEN|CLOSED>".to_string()));
            };
            let state = match position.as_str() {
                "OPEN" => ValveState::Open,
                "CLOSED" => ValveState::Closed,
                other => return Err(err(format!("expected OPEN or CLOSED, got: {other}"))),
            };
            Ok(ScriptCommand::SetValve {
                tag: tag.clone(),
                state,
            })
        }
        "RUN" => {
            let [count] = args else {
                return Err(err("expected: RUN <ticks>".to_string()));
            };
            let ticks = count
                .parse::<u32>()
                .map_err(|_| err(format!("invalid tick count: {count}")))?;
            Ok(ScriptCommand::Run { ticks })
        }
        "RUN_UNTIL_IDLE" => {
            if !args.is_empty() {
                return Err(err("RUN_UNTIL_IDLE takes no arguments".to_string()));
            }
            Ok(ScriptCommand::RunUntilIdle)
        }
        other => Err(err(format!("unknown command: {other}"))),
    }
}
