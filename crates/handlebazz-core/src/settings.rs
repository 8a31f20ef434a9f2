//! Settings for handlebazz.
//!
//! [`Settings`] holds everything the engine and the command-line tool can be
//! configured with. Every field has a default, so an empty configuration file
//! is valid.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// The default limit on how deeply blocks and partials may nest.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// The complete set of handlebazz settings.
///
/// # Examples
///
/// ```
/// use handlebazz_core::settings::Settings;
///
/// let settings = Settings::default();
/// assert!(!settings.debug);
/// assert_eq!(settings.log_level, "info");
/// assert_eq!(settings.max_depth, 64);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    // ── Core ─────────────────────────────────────────────────────────

    /// Whether debug mode is enabled (human-readable logs).
    pub debug: bool,

    // ── Templates ────────────────────────────────────────────────────

    /// Directories searched, in order, when loading a template by name.
    pub template_dirs: Vec<PathBuf>,
    /// Maximum nesting of blocks and partials before cooking fails.
    pub max_depth: usize,

    // ── Logging ──────────────────────────────────────────────────────

    /// The log level or `EnvFilter` directive (e.g. "info", "handlebazz=debug").
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            debug: false,
            template_dirs: Vec::new(),
            max_depth: DEFAULT_MAX_DEPTH,
            log_level: "info".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let s = Settings::default();
        assert!(!s.debug);
        assert!(s.template_dirs.is_empty());
        assert_eq!(s.max_depth, DEFAULT_MAX_DEPTH);
        assert_eq!(s.log_level, "info");
    }

    #[test]
    fn test_settings_serialize_roundtrip_keys() {
        let json = serde_json::to_value(Settings::default()).unwrap();
        let obj = json.as_object().unwrap();
        for key in ["debug", "template_dirs", "max_depth", "log_level"] {
            assert!(obj.contains_key(key), "missing key {key}");
        }
    }
}
