//! The cooker: executes a template against its data.
//!
//! One pass of the [`Scanner`] over the template text copies literal spans
//! and dispatches every tag. Block openers hand off to the extractor, whose
//! body is then cooked recursively one level deeper; partials are cooked
//! recursively with their own data. Everything is written into a single
//! output buffer, which is dropped if any step fails.

use handlebazz_core::error::HandlebazzError;
use serde_json::Value;

use crate::command::{classify, Command, Directive, Scope};
use crate::data::{self, DataNode};
use crate::engine::{Engine, Template, TemplateId};
use crate::extractor::extract_block;
use crate::scanner::{Scanner, Span};

/// The partials currently being cooked, outermost first. The root template
/// is recorded without a name.
#[derive(Debug, Default)]
struct Trail<'e> {
    entries: Vec<(TemplateId, Option<&'e str>)>,
}

impl<'e> Trail<'e> {
    fn enter(&mut self, id: TemplateId, name: Option<&'e str>) -> Result<(), HandlebazzError> {
        if self.entries.iter().any(|(entered, _)| *entered == id) {
            let name = name.unwrap_or_default();
            let chain = self
                .entries
                .iter()
                .filter_map(|(_, entered)| *entered)
                .chain(std::iter::once(name))
                .map(str::to_string)
                .collect();
            return Err(HandlebazzError::PartialCycleDetected {
                name: name.to_string(),
                chain,
            });
        }
        self.entries.push((id, name));
        Ok(())
    }

    fn leave(&mut self) {
        self.entries.pop();
    }
}

/// A single cook of one template and everything it pulls in.
pub(crate) struct Cooker<'e> {
    engine: &'e Engine,
    trail: Trail<'e>,
}

impl<'e> Cooker<'e> {
    pub(crate) fn new(engine: &'e Engine) -> Self {
        Self {
            engine,
            trail: Trail::default(),
        }
    }

    /// Parses the template's data and cooks it at depth 0.
    pub(crate) fn cook(
        mut self,
        id: Option<TemplateId>,
        template: &'e Template,
    ) -> Result<String, HandlebazzError> {
        if let Some(id) = id {
            self.trail.enter(id, None)?;
        }

        let root = data::parse(template.data())?;
        let mut out = String::with_capacity(template.source().len());
        tracing::debug!(bytes = template.source().len(), "cooking template");

        self.cook_into(&mut out, template, template.source(), 0, Scope::root(&root))?;

        tracing::debug!(bytes = out.len(), "cooked template");
        Ok(out)
    }

    /// Cooks `source` (the template's own text, or a block body starting at
    /// byte `base` of it) and appends the result to `out`.
    fn cook_into(
        &mut self,
        out: &mut String,
        template: &'e Template,
        source: &'e str,
        base: usize,
        scope: Scope<'_>,
    ) -> Result<(), HandlebazzError> {
        if scope.depth > self.engine.max_depth() {
            return Err(HandlebazzError::DepthLimitExceeded {
                limit: self.engine.max_depth(),
            });
        }

        let mut scanner = Scanner::new(source);
        while let Some(span) = scanner.next() {
            let tag = match span.map_err(|e| e.offset_by(base))? {
                Span::Text(text) => {
                    out.push_str(text);
                    continue;
                }
                Span::Tag(tag) => tag,
            };

            let (command, body_base) = match classify(tag.body)? {
                Directive::Open { kind, expr } => {
                    let block = extract_block(source, kind, tag.start, tag.end)
                        .map_err(|e| e.offset_by(base))?;
                    scanner.seek(block.next);
                    (
                        Command::block(kind, expr, block.body, &scope),
                        base + tag.end,
                    )
                }
                Directive::Close(_) => {
                    return Err(HandlebazzError::MalformedTag {
                        tag: tag.body.to_string(),
                        reason: "closing tag without a matching opener",
                    });
                }
                Directive::Partial(name) => (Command::Partial { name }, base),
                Directive::Value(raw) => (Command::value(raw, &scope), base),
            };

            self.execute(out, template, command, body_base, &scope)?;
        }

        Ok(())
    }

    fn execute(
        &mut self,
        out: &mut String,
        template: &'e Template,
        command: Command<'e, '_>,
        base: usize,
        scope: &Scope<'_>,
    ) -> Result<(), HandlebazzError> {
        match command {
            Command::Value { raw, key, data } => {
                tracing::trace!(key = raw, "value");
                let value = key
                    .lookup(data)
                    .ok_or_else(|| HandlebazzError::KeyNotFound {
                        key: raw.to_string(),
                    })?;
                out.push_str(&value.to_text());
            }

            Command::ForLoop {
                loop_variable,
                key,
                loop_body,
                data,
            } => {
                let items = key
                    .lookup(data)
                    .ok_or_else(|| HandlebazzError::KeyNotFound {
                        key: loop_variable.to_string(),
                    })?
                    .expect_array()
                    .map_err(|found| type_mismatch(loop_variable, "array", found.as_str()))?;
                tracing::trace!(key = loop_variable, items = items.len(), "for");

                for item in items {
                    self.cook_into(out, template, loop_body, base, scope.enter(scope.parent, item))?;
                }
            }

            Command::IfCondition {
                condition_variable,
                condition,
                condition_body,
                data,
            } => {
                let flag = match condition.key.lookup(data) {
                    None => false,
                    Some(value) => value.expect_bool().map_err(|found| {
                        type_mismatch(condition_variable, "bool", found.as_str())
                    })?,
                };
                let flag = flag != condition.negated;
                tracing::trace!(key = condition_variable, taken = flag, "if");

                if flag {
                    self.cook_into(out, template, condition_body, base, scope.enter(data, data))?;
                }
            }

            Command::Partial { name } => {
                let not_found = || HandlebazzError::PartialNotFound {
                    name: name.to_string(),
                };
                let id = template.partial(name).ok_or_else(not_found)?;
                let partial = self.engine.template(id).map_err(|_| not_found())?;
                tracing::trace!(partial = name, "partial");

                self.trail.enter(id, Some(name))?;
                let root: Value = data::parse(partial.data())?;
                self.cook_into(out, partial, partial.source(), 0, scope.enter(&root, &root))?;
                self.trail.leave();
            }
        }

        Ok(())
    }
}

fn type_mismatch(key: &str, expected: &'static str, found: &'static str) -> HandlebazzError {
    HandlebazzError::TypeMismatch {
        key: key.to_string(),
        expected,
        found,
    }
}
