//! The `cook` command.
//!
//! Loads a template file, its JSON data and any partials, cooks it, and
//! writes the result to stdout or a file.

use std::io::Write;
use std::path::{Path, PathBuf};

use handlebazz_core::{HandlebazzError, Settings};
use handlebazz_template::Engine;

use crate::command::CliCommand;

/// Cooks one template file.
pub struct CookCommand;

/// A `--partial NAME=TEMPLATE[:DATA]` argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartialArg {
    pub name: String,
    pub template: String,
    pub data: Option<PathBuf>,
}

/// Parses `NAME=TEMPLATE` or `NAME=TEMPLATE:DATA`.
///
/// # Errors
///
/// Returns a message if the `=` is missing or the name or template is empty.
pub fn parse_partial(arg: &str) -> Result<PartialArg, String> {
    let (name, rest) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=TEMPLATE[:DATA], got `{arg}`"))?;
    let (template, data) = match rest.split_once(':') {
        Some((template, data)) if !data.is_empty() => (template, Some(PathBuf::from(data))),
        _ => (rest, None),
    };

    let name = name.trim();
    if name.is_empty() || template.is_empty() {
        return Err(format!("partial name and template must not be empty in `{arg}`"));
    }

    Ok(PartialArg {
        name: name.to_string(),
        template: template.to_string(),
        data,
    })
}

/// Builds an engine for file-driven commands. Without configured template
/// directories, relative names resolve against the working directory.
pub fn file_engine(settings: &Settings) -> Engine {
    let mut engine = Engine::from_settings(settings);
    if settings.template_dirs.is_empty() {
        engine.set_dirs(vec![PathBuf::from(".")]);
    }
    engine
}

fn read_data(path: Option<&Path>) -> Result<String, HandlebazzError> {
    match path {
        Some(path) => std::fs::read_to_string(path).map_err(|e| {
            HandlebazzError::TemplateDoesNotExist(format!(
                "Error reading data file '{}': {e}",
                path.display()
            ))
        }),
        None => Ok("{}".to_string()),
    }
}

/// Loads, wires up and cooks the page and its partials.
///
/// # Errors
///
/// Returns any load, I/O or cooking error.
pub fn cook_files(
    engine: &mut Engine,
    template: &str,
    data: Option<&Path>,
    partials: &[PartialArg],
) -> Result<String, HandlebazzError> {
    let page = engine.load_template(template, read_data(data)?)?;

    for partial in partials {
        let id = engine.load_template(&partial.template, read_data(partial.data.as_deref())?)?;
        engine.add_partial(page, partial.name.as_str(), id)?;
        tracing::debug!(partial = %partial.name, template = %partial.template, "registered partial");
    }

    engine.cook(page)
}

impl CliCommand for CookCommand {
    fn name(&self) -> &'static str {
        "cook"
    }

    fn help(&self) -> &'static str {
        "Cook a template with JSON data"
    }

    fn add_arguments(&self, cmd: clap::Command) -> clap::Command {
        cmd.arg(
            clap::Arg::new("template")
                .required(true)
                .value_name("TEMPLATE")
                .help("Template to cook"),
        )
        .arg(
            clap::Arg::new("data")
                .long("data")
                .short('d')
                .value_name("FILE")
                .value_parser(clap::value_parser!(PathBuf))
                .help("JSON data file (defaults to `{}`)"),
        )
        .arg(
            clap::Arg::new("partial")
                .long("partial")
                .short('p')
                .value_name("NAME=TEMPLATE[:DATA]")
                .value_parser(parse_partial)
                .action(clap::ArgAction::Append)
                .help("Register a partial, with an optional JSON data file"),
        )
        .arg(
            clap::Arg::new("output")
                .long("output")
                .short('o')
                .value_name("FILE")
                .value_parser(clap::value_parser!(PathBuf))
                .help("Write the result here instead of stdout"),
        )
    }

    fn handle(&self, matches: &clap::ArgMatches, settings: &Settings) -> Result<(), HandlebazzError> {
        let template = matches
            .get_one::<String>("template")
            .ok_or_else(|| HandlebazzError::ConfigurationError("No template given".to_string()))?;
        let data = matches.get_one::<PathBuf>("data");
        let partials: Vec<PartialArg> = matches
            .get_many::<PartialArg>("partial")
            .map(|values| values.cloned().collect())
            .unwrap_or_default();

        let mut engine = file_engine(settings);
        let cooked = cook_files(&mut engine, template, data.map(PathBuf::as_path), &partials)?;

        if let Some(output) = matches.get_one::<PathBuf>("output") {
            std::fs::write(output, &cooked)?;
            tracing::info!(output = %output.display(), bytes = cooked.len(), "wrote cooked template");
        } else {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(cooked.as_bytes())?;
            stdout.flush()?;
        }

        Ok(())
    }
}
