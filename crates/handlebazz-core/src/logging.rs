//! Logging integration for handlebazz.
//!
//! Provides helpers for configuring [`tracing`]-based logging from
//! [`Settings`](crate::settings::Settings) and for creating per-cook spans.

use crate::settings::Settings;

/// Sets up the global tracing subscriber based on the given settings.
///
/// The filter is read from `settings.log_level` (e.g. "debug", "info",
/// "handlebazz_template=trace"). In debug mode a pretty, human-readable format
/// is used; otherwise a structured JSON format is used. Output goes to stderr
/// so cooked templates written to stdout stay clean.
///
/// Calling this more than once is harmless: later calls are ignored.
pub fn setup_logging(settings: &Settings) {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let filter =
        EnvFilter::try_new(&settings.log_level).unwrap_or_else(|_| EnvFilter::new("info"));

    if settings.debug {
        fmt::Subscriber::builder()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_thread_ids(false)
            .with_file(true)
            .with_line_number(true)
            .pretty()
            .try_init()
            .ok();
    } else {
        fmt::Subscriber::builder()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(true)
            .json()
            .try_init()
            .ok();
    }
}

/// Creates a tracing span for one cook of a template.
///
/// Everything logged while the span is entered (including nested partial
/// cooks) carries the template label.
///
/// # Examples
///
/// ```
/// use handlebazz_core::logging::cook_span;
///
/// let span = cook_span("page.html");
/// let _guard = span.enter();
/// tracing::debug!("cooking");
/// ```
pub fn cook_span(template: &str) -> tracing::Span {
    tracing::debug_span!("cook", template = template)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_setup_logging_twice_is_harmless() {
        let settings = Settings::default();
        setup_logging(&settings);
        setup_logging(&Settings {
            debug: true,
            ..Settings::default()
        });
    }

    #[test]
    fn test_setup_logging_bad_filter_falls_back() {
        let settings = Settings {
            log_level: "[[not a filter".to_string(),
            ..Settings::default()
        };
        setup_logging(&settings);
    }

    #[test]
    fn test_cook_span_can_be_entered() {
        let span = cook_span("inline");
        let _guard = span.enter();
        tracing::debug!("inside");
    }
}
