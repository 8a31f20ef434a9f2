//! Core error types for handlebazz.
//!
//! Every fallible operation in the workspace returns [`HandlebazzError`].
//! Cooking errors abort the whole cook: no partially substituted output is
//! ever handed back alongside an error.

use thiserror::Error;

/// The primary error type for handlebazz.
///
/// The cooking variants mirror the failure points of the engine (data
/// parsing, key lookup, typed extraction, partial resolution, and template
/// syntax). The remaining variants cover loading and configuration.
#[derive(Error, Debug)]
pub enum HandlebazzError {
    // ── Data ─────────────────────────────────────────────────────────

    /// A template's data string is not valid JSON.
    #[error("could not parse template data JSON `{data}`: {source}")]
    DataParseError {
        /// The offending data text, verbatim.
        data: String,
        /// The underlying parser error.
        #[source]
        source: serde_json::Error,
    },

    /// A referenced field is absent from the data in scope.
    #[error("could not get object `{key}` from json")]
    KeyNotFound {
        /// The key as written in the tag.
        key: String,
    },

    /// A field exists but holds the wrong JSON kind for the requested use.
    #[error("value `{key}` is {found}, expected {expected}")]
    TypeMismatch {
        /// The key as written in the tag.
        key: String,
        /// The kind the tag requires (`array` for `#for`, `bool` for `#if`).
        expected: &'static str,
        /// The kind actually found.
        found: &'static str,
    },

    // ── Partials ─────────────────────────────────────────────────────

    /// `{{> name}}` names no registered partial.
    #[error("no partial named `{name}` found")]
    PartialNotFound {
        /// The partial name as written in the tag.
        name: String,
    },

    /// A partial was entered again while it was still being cooked.
    #[error("partial `{name}` is already being cooked (chain: {})", .chain.join(" -> "))]
    PartialCycleDetected {
        /// The partial name that closed the cycle.
        name: String,
        /// The partial names entered so far, outermost first, ending with `name`.
        chain: Vec<String>,
    },

    /// Blocks and partials are nested deeper than the configured limit.
    #[error("template nesting exceeds the maximum depth of {limit}")]
    DepthLimitExceeded {
        /// The configured limit.
        limit: usize,
    },

    // ── Syntax ───────────────────────────────────────────────────────

    /// A `{{` was never closed by `}}`.
    #[error("unterminated tag starting at byte {offset}")]
    UnterminatedTag {
        /// Byte offset of the opening `{{` within the template.
        offset: usize,
    },

    /// A `#for` or `#if` block has no matching closer.
    #[error("unterminated `#{keyword}` block starting at byte {offset}")]
    UnterminatedBlock {
        /// The block keyword (`for` or `if`).
        keyword: &'static str,
        /// Byte offset of the opening tag within the template.
        offset: usize,
    },

    /// A tag could not be classified.
    #[error("malformed tag `{{{{{tag}}}}}`: {reason}")]
    MalformedTag {
        /// The tag body between the delimiters.
        tag: String,
        /// What is wrong with it.
        reason: &'static str,
    },

    // ── Registry & loading ───────────────────────────────────────────

    /// A template handle does not refer to a live template in this engine.
    #[error("unknown template handle #{0}")]
    UnknownTemplate(usize),

    /// The requested template file was not found.
    #[error("Template does not exist: {0}")]
    TemplateDoesNotExist(String),

    // ── Configuration ────────────────────────────────────────────────

    /// A configuration value or command-line argument is missing or invalid.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    // ── IO ───────────────────────────────────────────────────────────

    /// An I/O error occurred.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl HandlebazzError {
    /// Returns `true` for errors caused by the template text itself, as
    /// opposed to its data, its partials, or the environment.
    pub const fn is_syntax_error(&self) -> bool {
        matches!(
            self,
            Self::UnterminatedTag { .. } | Self::UnterminatedBlock { .. } | Self::MalformedTag { .. }
        )
    }

    /// Shifts the byte offset of an `UnterminatedTag` or `UnterminatedBlock`
    /// by `base`. Other errors are returned unchanged.
    #[must_use]
    pub fn offset_by(self, base: usize) -> Self {
        match self {
            Self::UnterminatedTag { offset } => Self::UnterminatedTag {
                offset: offset + base,
            },
            Self::UnterminatedBlock { keyword, offset } => Self::UnterminatedBlock {
                keyword,
                offset: offset + base,
            },
            other => other,
        }
    }
}

/// A convenience type alias for `Result<T, HandlebazzError>`.
pub type HandlebazzResult<T> = Result<T, HandlebazzError>;
