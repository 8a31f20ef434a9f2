//! Block body extraction.
//!
//! Finds the closer matching a `#for` or `#if` opener by scanning the raw
//! text after it. Tags in between are not parsed: a stray `{{` in the body is
//! just text here, and only fails if the body is later cooked. Only openers
//! and closers of the same keyword are counted, so a `{{#if}}` inside a
//! `{{#for}}` body is interpreted later, when the body itself is cooked.

use handlebazz_core::error::HandlebazzError;

use crate::command::BlockKind;
use crate::scanner::{CLOSE, OPEN};

/// A block body located by [`extract_block`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Block<'t> {
    /// Everything between the opening tag and its matching closer, verbatim.
    pub body: &'t str,
    /// Byte offset just past the matching closer.
    pub next: usize,
}

/// If `rest` (the text after a `{{`) is a `kind` closer such as `/if}}` or
/// ` /if }}`, returns how many bytes of `rest` it spans.
fn closer_len(kind: BlockKind, rest: &str) -> Option<usize> {
    let after = rest
        .trim_start()
        .strip_prefix('/')?
        .strip_prefix(kind.keyword())?;
    let tail = after.trim_start().strip_prefix(CLOSE)?;
    Some(rest.len() - tail.len())
}

/// Returns `true` if `rest` (the text after a `{{`) starts a `kind` opener.
fn is_opener(kind: BlockKind, rest: &str) -> bool {
    rest.trim_start()
        .strip_prefix('#')
        .and_then(|after| after.strip_prefix(kind.keyword()))
        .is_some_and(|after| {
            after.is_empty() || after.starts_with(char::is_whitespace) || after.starts_with(CLOSE)
        })
}

/// Extracts the body of the `kind` block whose opening tag spans
/// `opener_start..body_start` of `source`.
///
/// # Errors
///
/// Returns `UnterminatedBlock` if the input ends before the matching closer.
pub fn extract_block(
    source: &str,
    kind: BlockKind,
    opener_start: usize,
    body_start: usize,
) -> Result<Block<'_>, HandlebazzError> {
    let mut nested = 0usize;
    let mut cursor = body_start;

    while let Some(found) = source.get(cursor..).and_then(|rest| rest.find(OPEN)) {
        let start = cursor + found;
        let rest = &source[start + OPEN.len()..];

        if let Some(len) = closer_len(kind, rest) {
            if nested == 0 {
                return Ok(Block {
                    body: &source[body_start..start],
                    next: start + OPEN.len() + len,
                });
            }
            nested -= 1;
        } else if is_opener(kind, rest) {
            nested += 1;
        }

        // One byte on, so `{{{/if}}` still finds the closer at its second brace.
        cursor = start + 1;
    }

    Err(HandlebazzError::UnterminatedBlock {
        keyword: kind.keyword(),
        offset: opener_start,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Extracts the block opened by the first tag of `source`.
    fn extract(source: &str, kind: BlockKind) -> Result<Block<'_>, HandlebazzError> {
        let opener_end = source.find("}}").unwrap() + 2;
        extract_block(source, kind, 0, opener_end)
    }

    #[test]
    fn test_simple_body() {
        let source = "{{#for items}}Hello {{this}}\n{{/for}} tail";
        let block = extract(source, BlockKind::For).unwrap();
        assert_eq!(block.body, "Hello {{this}}\n");
        assert_eq!(&source[block.next..], " tail");
    }

    #[test]
    fn test_empty_body() {
        let block = extract("{{#if x}}{{/if}}", BlockKind::If).unwrap();
        assert_eq!(block.body, "");
        assert_eq!(block.next, 16);
    }

    #[test]
    fn test_same_keyword_nesting() {
        let source = "{{#for a}}<{{#for this.b}}{{this}}{{/for}}>{{/for}}!";
        let block = extract(source, BlockKind::For).unwrap();
        assert_eq!(block.body, "<{{#for this.b}}{{this}}{{/for}}>");
        assert_eq!(&source[block.next..], "!");
    }

    #[test]
    fn test_cross_keyword_is_not_counted() {
        let source = "{{#for a}}{{#if x}}y{{/if}}{{/for}}";
        let block = extract(source, BlockKind::For).unwrap();
        assert_eq!(block.body, "{{#if x}}y{{/if}}");
    }

    #[test]
    fn test_whitespace_in_tags() {
        let source = "{{#if a}}{{ #if b }}x{{ /if }}{{ /if }}";
        let block = extract(source, BlockKind::If).unwrap();
        assert_eq!(block.body, "{{ #if b }}x{{ /if }}");
        assert_eq!(block.next, source.len());
    }

    #[test]
    fn test_closer_text_outside_tag_ignored() {
        let source = "{{#if a}}/if}} {{/if}}";
        let block = extract(source, BlockKind::If).unwrap();
        assert_eq!(block.body, "/if}} ");
    }

    #[test]
    fn test_unterminated_block() {
        let err = extract("{{#for items}}{{this}}", BlockKind::For).unwrap_err();
        assert!(matches!(
            err,
            HandlebazzError::UnterminatedBlock {
                keyword: "for",
                offset: 0
            }
        ));
    }

    #[test]
    fn test_unterminated_nested_block() {
        let err = extract("{{#for a}}{{#for b}}{{/for}}", BlockKind::For).unwrap_err();
        assert!(matches!(err, HandlebazzError::UnterminatedBlock { .. }));
    }

    #[test]
    fn test_broken_tags_in_body_are_text() {
        let source = "{{#if off}}{{oops{{/if}}!";
        let block = extract(source, BlockKind::If).unwrap();
        assert_eq!(block.body, "{{oops");
        assert_eq!(&source[block.next..], "!");

        let block = extract("{{#if off}}x{{{/if}}b", BlockKind::If).unwrap();
        assert_eq!(block.body, "x{");

        let block = extract("{{#for xs}}{{this{{/for}}", BlockKind::For).unwrap();
        assert_eq!(block.body, "{{this");
    }

    #[test]
    fn test_opener_with_broken_tail_is_counted() {
        let source = "{{#for a}}{{#for b{{/for}}{{/for}}.";
        let block = extract(source, BlockKind::For).unwrap();
        assert_eq!(block.body, "{{#for b{{/for}}");
        assert_eq!(&source[block.next..], ".");
    }

    #[test]
    fn test_unterminated_tag_inside_body() {
        let err = extract("{{#if a}}x{{oops", BlockKind::If).unwrap_err();
        assert!(matches!(err, HandlebazzError::UnterminatedBlock { keyword: "if", .. }));
    }

    #[test]
    fn test_mismatched_closer_does_not_match() {
        let err = extract("{{#if a}}x{{/for}}", BlockKind::If).unwrap_err();
        assert!(matches!(err, HandlebazzError::UnterminatedBlock { .. }));
    }
}
