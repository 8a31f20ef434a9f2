//! Syntax checking without data.
//!
//! Walks a template the way the cooker would, but descends into every block
//! body regardless of its condition or contents, so a check finds syntax
//! errors a particular cook might never reach.

use handlebazz_core::error::HandlebazzError;

use crate::command::{classify, Directive};
use crate::extractor::extract_block;
use crate::scanner::{Scanner, Span};

/// What a successful check found.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckReport {
    /// Partial names used, in order of first appearance.
    pub partials: Vec<String>,
    /// Number of tags, block closers included.
    pub tags: usize,
    /// Number of `#for` and `#if` blocks.
    pub blocks: usize,
}

impl CheckReport {
    fn note_partial(&mut self, name: &str) {
        if !self.partials.iter().any(|seen| seen == name) {
            self.partials.push(name.to_string());
        }
    }
}

/// Checks the syntax of a template source.
///
/// # Errors
///
/// Returns the first `UnterminatedTag`, `UnterminatedBlock`, or
/// `MalformedTag` found.
pub fn check_source(source: &str) -> Result<CheckReport, HandlebazzError> {
    let mut report = CheckReport::default();
    check_into(&mut report, source, 0)?;
    Ok(report)
}

fn check_into(report: &mut CheckReport, source: &str, base: usize) -> Result<(), HandlebazzError> {
    let mut scanner = Scanner::new(source);
    while let Some(span) = scanner.next() {
        let Span::Tag(tag) = span.map_err(|e| e.offset_by(base))? else {
            continue;
        };
        report.tags += 1;

        match classify(tag.body)? {
            Directive::Open { kind, .. } => {
                let block = extract_block(source, kind, tag.start, tag.end)
                    .map_err(|e| e.offset_by(base))?;
                scanner.seek(block.next);
                report.tags += 1;
                report.blocks += 1;
                check_into(report, block.body, base + tag.end)?;
            }
            Directive::Close(_) => {
                return Err(HandlebazzError::MalformedTag {
                    tag: tag.body.to_string(),
                    reason: "closing tag without a matching opener",
                });
            }
            Directive::Partial(name) => report.note_partial(name),
            Directive::Value(_) => {}
        }
    }
    Ok(())
}
