//! The `check` command.
//!
//! Syntax-checks template files without cooking them and reports which
//! partials each one uses.

use handlebazz_core::{HandlebazzError, Settings};
use handlebazz_template::check::{check_source, CheckReport};
use handlebazz_template::Engine;

use crate::command::CliCommand;
use crate::commands::cook::file_engine;

/// Syntax-checks one or more template files.
pub struct CheckCommand;

/// The outcome of checking one file.
#[derive(Debug)]
pub struct CheckMessage {
    pub template: String,
    pub result: Result<CheckReport, HandlebazzError>,
}

/// Loads and checks each named template.
pub fn run_checks(engine: &Engine, templates: &[String]) -> Vec<CheckMessage> {
    templates
        .iter()
        .map(|template| CheckMessage {
            template: template.clone(),
            result: engine
                .load_source(template)
                .and_then(|source| check_source(&source)),
        })
        .collect()
}

impl CliCommand for CheckCommand {
    fn name(&self) -> &'static str {
        "check"
    }

    fn help(&self) -> &'static str {
        "Check template syntax without cooking"
    }

    fn add_arguments(&self, cmd: clap::Command) -> clap::Command {
        cmd.arg(
            clap::Arg::new("templates")
                .required(true)
                .num_args(1..)
                .value_name("TEMPLATE")
                .help("Templates to check"),
        )
    }

    fn handle(&self, matches: &clap::ArgMatches, settings: &Settings) -> Result<(), HandlebazzError> {
        let templates: Vec<String> = matches
            .get_many::<String>("templates")
            .map(|values| values.cloned().collect())
            .unwrap_or_default();

        let engine = file_engine(settings);
        let messages = run_checks(&engine, &templates);

        let mut errors = 0;
        for msg in &messages {
            match &msg.result {
                Ok(report) => tracing::info!(
                    template = %msg.template,
                    tags = report.tags,
                    blocks = report.blocks,
                    partials = ?report.partials,
                    "ok"
                ),
                Err(err) => {
                    errors += 1;
                    tracing::error!(template = %msg.template, "{err}");
                }
            }
        }

        tracing::info!(
            "Checked {} template(s), {} with errors",
            messages.len(),
            errors
        );

        if errors > 0 {
            return Err(HandlebazzError::ConfigurationError(format!(
                "Template check found {errors} error(s)"
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_checks() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("good.html"), "{{> head}}{{#if x}}y{{/if}}").unwrap();
        std::fs::write(dir.path().join("bad.html"), "{{#for xs}}").unwrap();

        let settings = Settings {
            template_dirs: vec![dir.path().to_path_buf()],
            ..Settings::default()
        };
        let engine = file_engine(&settings);
        let names = ["good.html", "bad.html", "missing.html"].map(String::from);
        let messages = run_checks(&engine, &names);

        assert_eq!(messages.len(), 3);
        assert_eq!(messages[0].result.as_ref().unwrap().partials, ["head"]);
        assert!(matches!(
            messages[1].result,
            Err(HandlebazzError::UnterminatedBlock { .. })
        ));
        assert!(matches!(
            messages[2].result,
            Err(HandlebazzError::TemplateDoesNotExist(_))
        ));
    }
}
