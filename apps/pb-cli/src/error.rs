//! CLI-level errors.

use pb_plant::PlantError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config error: {0}")]
    Config(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Script error at line {line}: {message}")]
    Script { line: usize, message: String },

    #[error(transparent)]
    Plant(#[from] PlantError),
}

pub type CliResult<T> = Result<T, CliError>;
