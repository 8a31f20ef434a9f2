//! # handlebazz-template
//!
//! A small Handlebars-style template engine. A template is literal text with
//! `{{ }}` tags, cooked against a JSON data context into a new string.
//!
//! Supported tags:
//!
//! - `{{key}}`, `{{this}}`, `{{this.key}}` - interpolation
//! - `{{#for items}}...{{/for}}` - iteration over an array
//! - `{{#if flag}}...{{/if}}`, `{{#if !flag}}...{{/if}}` - conditionals
//! - `{{> name}}` - a named partial, cooked with its own data
//!
//! ```
//! use handlebazz_template::Engine;
//!
//! let mut engine = Engine::new();
//! let partial = engine.add_template("my name is {{name}}", r#"{"name": "John Doe"}"#);
//! let page = engine.add_template("Hello {{person}}, {{> my_partial}}", r#"{"person": "James"}"#);
//! engine.add_partial(page, "my_partial", partial).unwrap();
//!
//! assert_eq!(engine.cook(page).unwrap(), "Hello James, my name is John Doe");
//! ```

pub mod check;
pub mod command;
mod cooker;
pub mod data;
pub mod engine;
pub mod extractor;
pub mod loaders;
pub mod scanner;

pub use check::CheckReport;
pub use data::{DataNode, JsonKind};
pub use engine::{Engine, Template, TemplateId};
pub use loaders::{FileSystemLoader, StringLoader, TemplateLoader};
