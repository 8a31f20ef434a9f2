//! Command framework for the `handlebazz` binary.
//!
//! [`CliCommand`] defines a subcommand; [`CommandRegistry`] collects them,
//! builds the clap parser and dispatches to the chosen one.
//!
//! ## Defining a Custom Command
//!
//! ```rust,no_run
//! use handlebazz_cli::command::CliCommand;
//! use handlebazz_core::{HandlebazzError, Settings};
//!
//! struct VersionCommand;
//!
//! impl CliCommand for VersionCommand {
//!     fn name(&self) -> &str { "version" }
//!     fn help(&self) -> &str { "Print the version" }
//!
//!     fn handle(
//!         &self,
//!         _matches: &clap::ArgMatches,
//!         _settings: &Settings,
//!     ) -> Result<(), HandlebazzError> {
//!         println!("{}", env!("CARGO_PKG_VERSION"));
//!         Ok(())
//!     }
//! }
//! ```

use std::collections::HashMap;
use std::path::PathBuf;

use handlebazz_core::{HandlebazzError, Settings};

/// A subcommand that can be registered and invoked through the CLI.
pub trait CliCommand: Send + Sync {
    /// The name the command is invoked by.
    fn name(&self) -> &str;

    /// A short help description.
    fn help(&self) -> &str;

    /// Adds the command's own arguments. The default adds none.
    fn add_arguments(&self, cmd: clap::Command) -> clap::Command {
        cmd
    }

    /// Runs the command.
    fn handle(&self, matches: &clap::ArgMatches, settings: &Settings)
        -> Result<(), HandlebazzError>;
}

/// A registry of subcommands, keyed by name.
pub struct CommandRegistry {
    commands: HashMap<String, Box<dyn CliCommand>>,
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandRegistry {
    /// Creates a new empty command registry.
    pub fn new() -> Self {
        Self {
            commands: HashMap::new(),
        }
    }

    /// Registers a command, replacing any command of the same name.
    pub fn register(&mut self, command: Box<dyn CliCommand>) {
        let name = command.name().to_string();
        self.commands.insert(name, command);
    }

    pub fn get(&self, name: &str) -> Option<&dyn CliCommand> {
        self.commands.get(name).map(AsRef::as_ref)
    }

    /// Registered command names, sorted.
    pub fn list_commands(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.commands.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Builds the top-level clap `Command` with every registered subcommand
    /// and the global `--settings` option.
    pub fn build_cli(&self) -> clap::Command {
        let mut app = clap::Command::new("handlebazz")
            .about("Cook and check handlebazz templates")
            .version(env!("CARGO_PKG_VERSION"))
            .subcommand_required(true)
            .arg_required_else_help(true)
            .arg(
                clap::Arg::new("settings")
                    .long("settings")
                    .global(true)
                    .value_name("FILE")
                    .value_parser(clap::value_parser!(PathBuf))
                    .help("Settings file (TOML, or JSON by extension)"),
            );

        let mut entries: Vec<_> = self.commands.iter().collect();
        entries.sort_by_key(|(name, _)| (*name).clone());

        for (name, cmd) in entries {
            let subcmd = clap::Command::new(name.clone()).about(cmd.help().to_string());
            app = app.subcommand(cmd.add_arguments(subcmd));
        }

        app
    }

    /// Dispatches to the subcommand named in `matches`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError` if no known subcommand was given, or
    /// whatever the command itself returns.
    pub fn execute(
        &self,
        matches: &clap::ArgMatches,
        settings: &Settings,
    ) -> Result<(), HandlebazzError> {
        let (name, sub_matches) = matches.subcommand().ok_or_else(|| {
            HandlebazzError::ConfigurationError("No subcommand specified".to_string())
        })?;

        let cmd = self.get(name).ok_or_else(|| {
            HandlebazzError::ConfigurationError(format!("Unknown command: {name}"))
        })?;

        tracing::debug!(command = name, "running command");
        cmd.handle(sub_matches, settings)
    }
}
