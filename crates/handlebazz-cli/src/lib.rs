//! # handlebazz-cli
//!
//! The `handlebazz` command-line tool: a small command framework plus the
//! built-in `cook` and `check` commands.
//!
//! ```rust
//! use handlebazz_cli::command::CommandRegistry;
//! use handlebazz_cli::commands::register_builtin_commands;
//!
//! let mut registry = CommandRegistry::new();
//! register_builtin_commands(&mut registry);
//! assert_eq!(registry.list_commands(), vec!["check", "cook"]);
//! ```

pub mod command;
pub mod commands;

use std::ffi::OsString;
use std::path::PathBuf;

use handlebazz_core::{settings_loader, HandlebazzError, Settings};

pub use command::{CliCommand, CommandRegistry};

/// A registry holding every built-in command.
pub fn default_registry() -> CommandRegistry {
    let mut registry = CommandRegistry::new();
    commands::register_builtin_commands(&mut registry);
    registry
}

/// Loads settings from `--settings` if given, otherwise from defaults.
/// Environment overrides apply either way.
///
/// # Errors
///
/// Returns an error if the settings file cannot be read or parsed.
pub fn load_settings(matches: &clap::ArgMatches) -> Result<Settings, HandlebazzError> {
    match matches.get_one::<PathBuf>("settings") {
        Some(path) => {
            tracing::debug!(path = %path.display(), "loading settings");
            settings_loader::from_path_with_env(path)
        }
        None => Ok(settings_loader::from_env()),
    }
}

/// Parses `args` (program name first) and runs the chosen command.
///
/// Does not install a logging subscriber.
///
/// # Errors
///
/// Returns `ConfigurationError` for bad arguments, or the command's error.
pub fn run_from<I, T>(args: I) -> Result<(), HandlebazzError>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let registry = default_registry();
    let matches = registry
        .build_cli()
        .try_get_matches_from(args)
        .map_err(|e| HandlebazzError::ConfigurationError(e.to_string()))?;
    let settings = load_settings(&matches)?;
    registry.execute(&matches, &settings)
}
