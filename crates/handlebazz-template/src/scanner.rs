//! Tag scanner.
//!
//! Splits template text into literal runs and `{{ ... }}` tags, left to right,
//! lazily. There is no escaping: a lone `{` or `}` is ordinary text, and `}}`
//! only closes a tag while one is open.

use handlebazz_core::error::HandlebazzError;

pub(crate) const OPEN: &str = "{{";
pub(crate) const CLOSE: &str = "}}";

/// A tag found by the scanner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tag<'t> {
    /// Everything between `{{` and `}}`, untrimmed.
    pub body: &'t str,
    /// Byte offset of the opening `{{`.
    pub start: usize,
    /// Byte offset just past the closing `}}`.
    pub end: usize,
}

/// A span of template text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Span<'t> {
    /// Literal text, copied to the output verbatim.
    Text(&'t str),
    /// A tag to be classified and dispatched.
    Tag(Tag<'t>),
}

/// A lazy iterator over the [`Span`]s of a template string.
///
/// The cursor can be moved with [`seek`](Scanner::seek), which is how the
/// cooker skips over a block body the extractor has already consumed.
///
/// After an `UnterminatedTag` error the scanner is exhausted.
#[derive(Debug, Clone)]
pub struct Scanner<'t> {
    source: &'t str,
    cursor: usize,
}

impl<'t> Scanner<'t> {
    /// Creates a scanner positioned at the start of `source`.
    pub const fn new(source: &'t str) -> Self {
        Self { source, cursor: 0 }
    }

    /// Creates a scanner positioned at byte `cursor` of `source`.
    pub const fn starting_at(source: &'t str, cursor: usize) -> Self {
        Self { source, cursor }
    }

    /// The byte offset of the next unscanned character.
    pub const fn position(&self) -> usize {
        self.cursor
    }

    /// Moves the cursor to byte `cursor`.
    pub fn seek(&mut self, cursor: usize) {
        self.cursor = cursor.min(self.source.len());
    }
}

impl<'t> Iterator for Scanner<'t> {
    type Item = Result<Span<'t>, HandlebazzError>;

    fn next(&mut self) -> Option<Self::Item> {
        let rest = self.source.get(self.cursor..).filter(|r| !r.is_empty())?;
        let start = self.cursor;

        match rest.find(OPEN) {
            None => {
                self.cursor = self.source.len();
                Some(Ok(Span::Text(rest)))
            }
            Some(0) => {
                let after_open = &rest[OPEN.len()..];
                if let Some(len) = after_open.find(CLOSE) {
                    let end = start + OPEN.len() + len + CLOSE.len();
                    self.cursor = end;
                    Some(Ok(Span::Tag(Tag {
                        body: &after_open[..len],
                        start,
                        end,
                    })))
                } else {
                    self.cursor = self.source.len();
                    Some(Err(HandlebazzError::UnterminatedTag { offset: start }))
                }
            }
            Some(pos) => {
                self.cursor = start + pos;
                Some(Ok(Span::Text(&rest[..pos])))
            }
        }
    }
}
