//! # handlebazz-core
//!
//! Core types shared by every handlebazz crate. Holds no template logic.
//!
//! ## Modules
//!
//! - [`error`] - The error taxonomy and result alias
//! - [`settings`] - Engine and tooling configuration
//! - [`settings_loader`] - Loading settings from TOML/JSON files and the environment
//! - [`logging`] - Tracing-based logging integration

pub mod error;
pub mod logging;
pub mod settings;
pub mod settings_loader;

// Re-export the most commonly used types at the crate root.
pub use error::{HandlebazzError, HandlebazzResult};
pub use settings::Settings;
