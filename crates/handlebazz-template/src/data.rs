//! Access to the JSON data context.
//!
//! The cooker never matches on JSON values directly; it goes through
//! [`DataNode`], which exposes exactly what a tag can ask of its data:
//! a field by key, the value as text, as a boolean, or as an array.

use std::borrow::Cow;
use std::fmt;

use handlebazz_core::error::HandlebazzError;
use serde_json::Value;

/// The JSON kind of a data node, reported in type mismatch errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonKind {
    Null,
    Bool,
    Number,
    String,
    Array,
    Object,
}

impl JsonKind {
    /// The lowercase name used in error messages.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool => "bool",
            Self::Number => "number",
            Self::String => "string",
            Self::Array => "array",
            Self::Object => "object",
        }
    }
}

impl fmt::Display for JsonKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A node in the data context.
///
/// Typed accessors return the node's actual [`JsonKind`] on mismatch so the
/// caller can name the offending key in its error.
pub trait DataNode: Sized {
    /// The JSON kind of this node.
    fn kind(&self) -> JsonKind;

    /// Looks up a field of an object node. Non-objects have no fields.
    fn get_field(&self, key: &str) -> Option<&Self>;

    /// Stringifies any node: strings verbatim, everything else as compact JSON.
    fn to_text(&self) -> Cow<'_, str>;

    /// Extracts a boolean.
    fn expect_bool(&self) -> Result<bool, JsonKind>;

    /// Extracts the elements of an array, in order.
    fn expect_array(&self) -> Result<&[Self], JsonKind>;
}

impl DataNode for Value {
    fn kind(&self) -> JsonKind {
        match self {
            Self::Null => JsonKind::Null,
            Self::Bool(_) => JsonKind::Bool,
            Self::Number(_) => JsonKind::Number,
            Self::String(_) => JsonKind::String,
            Self::Array(_) => JsonKind::Array,
            Self::Object(_) => JsonKind::Object,
        }
    }

    fn get_field(&self, key: &str) -> Option<&Self> {
        self.as_object()?.get(key)
    }

    fn to_text(&self) -> Cow<'_, str> {
        match self {
            Self::String(s) => Cow::Borrowed(s),
            other => Cow::Owned(other.to_string()),
        }
    }

    fn expect_bool(&self) -> Result<bool, JsonKind> {
        match self {
            Self::Bool(b) => Ok(*b),
            other => Err(other.kind()),
        }
    }

    fn expect_array(&self) -> Result<&[Self], JsonKind> {
        match self {
            Self::Array(items) => Ok(items),
            other => Err(other.kind()),
        }
    }
}

/// Parses a template's data string.
///
/// # Errors
///
/// Returns `DataParseError` carrying the data text when it is not valid JSON.
pub fn parse(data: &str) -> Result<Value, HandlebazzError> {
    serde_json::from_str(data).map_err(|source| HandlebazzError::DataParseError {
        data: data.to_string(),
        source,
    })
}
