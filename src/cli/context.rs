//! Shell state, dispatch and error reporting.

use std::{io, sync::Arc};

use thiserror::Error;
use tracker_config::{Config, ConfigManager};
use tracker_core::CoreError;
use tracker_storage_csv::CsvStorage;

use crate::{
    app::Tracker,
    cli::{
        commands,
        output::{self, OutputPreferences},
        registry::CommandRegistry,
        system_clock::SystemClock,
    },
    errors::{CliError, TrackerError},
    utils,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

/// Recoverable failure of a single command. The shell reports it and keeps running.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("{0}")]
    InvalidArguments(String),
    #[error(transparent)]
    Tracker(#[from] TrackerError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("exit requested")]
    ExitRequested,
}

impl From<CoreError> for CommandError {
    fn from(err: CoreError) -> Self {
        CommandError::Tracker(TrackerError::Core(err))
    }
}

pub type CommandResult = Result<(), CommandError>;

pub struct ShellContext {
    pub mode: CliMode,
    pub(crate) registry: CommandRegistry,
    pub(crate) tracker: Tracker,
    pub(crate) running: bool,
}

impl ShellContext {
    /// Opens the tracker for the configured data directory.
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        let config_manager = ConfigManager::with_base_dir(utils::app_home_dir())?;
        let config = config_manager.load()?;
        output::set_preferences(OutputPreferences {
            color_enabled: config.ui_color_enabled && mode == CliMode::Interactive,
        });
        let storage = CsvStorage::new(utils::data_dir(&config));
        let tracker = Tracker::open(Arc::new(storage), Arc::new(SystemClock), config);
        Ok(Self::with_tracker(mode, tracker))
    }

    pub fn with_tracker(mode: CliMode, tracker: Tracker) -> Self {
        let mut registry = CommandRegistry::new();
        commands::register_all(&mut registry);
        Self {
            mode,
            registry,
            tracker,
            running: true,
        }
    }

    pub fn tracker(&self) -> &Tracker {
        &self.tracker
    }

    pub fn config(&self) -> &Config {
        self.tracker.config()
    }

    pub(crate) fn command_names(&self) -> Vec<&'static str> {
        self.registry.names().collect()
    }

    pub(crate) fn prompt(&self) -> String {
        let filtered = !self.tracker.view().criteria().is_empty();
        if filtered {
            "expenses (filtered)> ".to_string()
        } else {
            "expenses> ".to_string()
        }
    }

    /// Prints what happened while the tracker was opened.
    pub(crate) fn announce_startup(&self) {
        let startup = self.tracker.startup();
        if startup.defaults_created > 0 {
            output::info(format!(
                "Created {} default categories.",
                startup.defaults_created
            ));
        }
        if startup.generated > 0 {
            output::info(format!(
                "Generated {} recurring expense(s).",
                startup.generated
            ));
        }
        for message in &startup.errors {
            output::warning(message);
        }
    }

    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        if let Some(handler) = self.registry.handler(command) {
            match handler(self, args) {
                Ok(()) => Ok(LoopControl::Continue),
                Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
                Err(err) => Err(err),
            }
        } else {
            self.suggest_command(raw);
            Ok(LoopControl::Continue)
        }
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        output::warning(format!(
            "Unknown command `{}`. Type `help` to see available commands.",
            input
        ));
        if let Some(best) = self.registry.suggest(input) {
            output::info(format!("Suggestion: `{}`?", best));
        }
    }

    pub(crate) fn report_error(&self, err: CommandError) {
        match err {
            CommandError::ExitRequested => {}
            CommandError::InvalidArguments(message) => {
                output::error(message);
                output::hint("Use `help <command>` for usage details.");
            }
            other => output::error(other),
        }
    }

    #[cfg(test)]
    pub(crate) fn process_line(&mut self, line: &str) -> Result<LoopControl, CommandError> {
        crate::cli::shell::handle_line(self, line)
    }
}
