use std::{io, result::Result as StdResult};

use thiserror::Error;
use tracker_config::ConfigError;
use tracker_core::CoreError;

/// Unified error type for the tracker application layer.
#[derive(Error, Debug)]
pub enum TrackerError {
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Not found: {0}")]
    NotFound(String),
}

pub type Result<T> = StdResult<T, TrackerError>;

/// Fatal shell error that ends the CLI session.
#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Tracker(#[from] TrackerError),
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Line editor error: {0}")]
    Readline(#[from] rustyline::error::ReadlineError),
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        CliError::Tracker(TrackerError::Config(err))
    }
}
