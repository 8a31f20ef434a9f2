//! # handlebazz
//!
//! A small Handlebars-style template engine that cooks text templates
//! against JSON data.
//!
//! This is the meta-crate that re-exports the sub-crates. Depend on it to get
//! everything, or on the individual crates for finer-grained control.
//!
//! ```
//! use handlebazz::Engine;
//!
//! let engine = Engine::new();
//! let cooked = engine
//!     .cook_str("It is {{#if !is_valid}}not {{/if}}valid", r#"{"is_valid": false}"#)
//!     .unwrap();
//! assert_eq!(cooked, "It is not valid");
//! ```

/// Errors, settings and logging.
pub use handlebazz_core as core;

/// The template engine: scanner, extractor, cooker and registry.
pub use handlebazz_template as template;

/// The command-line tool.
#[cfg(feature = "cli")]
pub use handlebazz_cli as cli;

pub use handlebazz_core::{HandlebazzError, HandlebazzResult, Settings};
pub use handlebazz_template::{Engine, Template, TemplateId};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reexports() {
        let settings = Settings::default();
        let mut engine = Engine::from_settings(&settings);
        let data = serde_json::json!({"items": ["a", "b"]}).to_string();
        let id = engine.add_template("{{#for items}}{{this}};{{/for}}", data);
        assert_eq!(engine.cook(id).unwrap(), "a;b;");
    }

    #[cfg(feature = "cli")]
    #[test]
    fn test_cli_reexport() {
        assert_eq!(cli::default_registry().len(), 2);
    }
}
