//! Built-in commands. Each implements
//! [`CliCommand`](crate::command::CliCommand).

pub mod check;
pub mod cook;

pub use check::CheckCommand;
pub use cook::CookCommand;

use crate::command::CommandRegistry;

/// Registers all built-in commands into the given registry.
pub fn register_builtin_commands(registry: &mut CommandRegistry) {
    registry.register(Box::new(CookCommand));
    registry.register(Box::new(CheckCommand));
}
