use std::process::ExitCode;

use handlebazz_core::logging::setup_logging;

fn main() -> ExitCode {
    let registry = handlebazz_cli::default_registry();
    let matches = registry.build_cli().get_matches();

    let result = handlebazz_cli::load_settings(&matches).and_then(|settings| {
        setup_logging(&settings);
        registry.execute(&matches, &settings)
    });

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("handlebazz: {err}");
            ExitCode::FAILURE
        }
    }
}
