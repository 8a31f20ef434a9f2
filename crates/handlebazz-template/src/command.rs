//! Tag classification and scope binding.
//!
//! [`classify`] turns the body of a tag into a [`Directive`]. Once the cooker
//! has extracted a block's body, [`Command::bind`] pairs the directive with the
//! data node it resolves against, chosen from the current [`Scope`].

use handlebazz_core::error::HandlebazzError;
use serde_json::Value;

/// The two block keywords.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    /// `{{#for x}}...{{/for}}`
    For,
    /// `{{#if x}}...{{/if}}`
    If,
}

impl BlockKind {
    /// The keyword as written after `#` and `/`.
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::For => "for",
            Self::If => "if",
        }
    }

    /// If `body` opens a block of this kind, returns its (trimmed) expression.
    ///
    /// The keyword must be followed by whitespace or end the tag, so
    /// `#format` is not a `#for`.
    pub fn opener_expr(self, body: &str) -> Option<&str> {
        let rest = body.trim().strip_prefix('#')?.strip_prefix(self.keyword())?;
        match rest.chars().next() {
            None => Some(rest),
            Some(c) if c.is_whitespace() => Some(rest.trim()),
            Some(_) => None,
        }
    }

    /// Returns `true` if `body` is this kind's closing tag.
    pub fn is_closed_by(self, body: &str) -> bool {
        body.trim()
            .strip_prefix('/')
            .is_some_and(|rest| rest == self.keyword())
    }
}

/// What a tag asks for, before any data is involved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Directive<'t> {
    /// `{{#for x}}` or `{{#if x}}`; the body still has to be extracted.
    Open { kind: BlockKind, expr: &'t str },
    /// `{{/for}}` or `{{/if}}`.
    Close(BlockKind),
    /// `{{> name}}` or `{{&gt; name}}`.
    Partial(&'t str),
    /// Anything else: a key to interpolate.
    Value(&'t str),
}

fn malformed(body: &str, reason: &'static str) -> HandlebazzError {
    HandlebazzError::MalformedTag {
        tag: body.to_string(),
        reason,
    }
}

/// Classifies the body of a tag (the text between `{{` and `}}`).
///
/// Surrounding whitespace is ignored.
///
/// # Errors
///
/// Returns `MalformedTag` for an empty tag, an unknown `#keyword` or
/// `/keyword`, a block opener without a variable, or a partial without a name.
pub fn classify(body: &str) -> Result<Directive<'_>, HandlebazzError> {
    let trimmed = body.trim();

    if trimmed.is_empty() {
        return Err(malformed(body, "empty tag"));
    }

    if trimmed.starts_with('#') {
        for kind in [BlockKind::For, BlockKind::If] {
            if let Some(expr) = kind.opener_expr(trimmed) {
                if expr.is_empty() {
                    return Err(malformed(body, "block is missing its variable"));
                }
                return Ok(Directive::Open { kind, expr });
            }
        }
        return Err(malformed(body, "unknown block keyword"));
    }

    if trimmed.starts_with('/') {
        for kind in [BlockKind::For, BlockKind::If] {
            if kind.is_closed_by(trimmed) {
                return Ok(Directive::Close(kind));
            }
        }
        return Err(malformed(body, "unknown closing tag"));
    }

    let partial = trimmed
        .strip_prefix('>')
        .or_else(|| trimmed.strip_prefix("&gt;"));
    if let Some(name) = partial {
        let name = name.trim();
        if name.is_empty() {
            return Err(malformed(body, "partial is missing its name"));
        }
        return Ok(Directive::Partial(name));
    }

    Ok(Directive::Value(trimmed))
}

/// Which of the two scope nodes a key resolves against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Parent,
    Block,
}

/// A key as written in a tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key<'t> {
    /// `this`: the block node itself.
    This,
    /// `this.field`: a field of the block node, at any depth.
    BlockField(&'t str),
    /// `field`: a field of the parent node at depth 0, of the block node below.
    Field(&'t str),
}

impl<'t> Key<'t> {
    /// Parses a key. Dotted paths are not split: `this.a.b` names field `a.b`.
    pub fn parse(raw: &'t str) -> Self {
        if raw == "this" {
            return Self::This;
        }
        match raw.strip_prefix("this.") {
            Some(field) if !field.is_empty() => Self::BlockField(field),
            _ => Self::Field(raw),
        }
    }

    /// The scope node this key resolves against at `depth`.
    pub const fn target(self, depth: usize) -> Target {
        match self {
            Self::This | Self::BlockField(_) => Target::Block,
            Self::Field(_) if depth == 0 => Target::Parent,
            Self::Field(_) => Target::Block,
        }
    }

    /// Resolves the key against `data`. `this` resolves to `data` itself.
    pub fn lookup<'v>(self, data: &'v Value) -> Option<&'v Value> {
        use crate::data::DataNode;

        match self {
            Self::This => Some(data),
            Self::BlockField(field) | Self::Field(field) => data.get_field(field),
        }
    }
}

/// An `#if` expression: a key with optional negation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Condition<'t> {
    pub key: Key<'t>,
    pub negated: bool,
}

impl<'t> Condition<'t> {
    /// Parses `x`, `!x`, `this.x`, `!this.x`, or `this.!x`.
    pub fn parse(raw: &'t str) -> Self {
        let (negated, rest) = match raw.strip_prefix('!') {
            Some(rest) => (true, rest.trim_start()),
            None => (false, raw),
        };

        match Key::parse(rest) {
            Key::BlockField(field) if field.starts_with('!') => Self {
                key: Key::BlockField(&field[1..]),
                negated: true,
            },
            key => Self { key, negated },
        }
    }
}

/// The data visible to a cook: the outer node, the block node, and how many
/// blocks or partials deep the cook is.
#[derive(Debug, Clone, Copy)]
pub struct Scope<'v> {
    pub parent: &'v Value,
    pub block: &'v Value,
    pub depth: usize,
}

impl<'v> Scope<'v> {
    /// The scope of a top-level cook: both nodes are the data root.
    pub const fn root(data: &'v Value) -> Self {
        Self {
            parent: data,
            block: data,
            depth: 0,
        }
    }

    /// The scope of a block or partial body, one level deeper.
    pub const fn enter<'n>(&self, parent: &'n Value, block: &'n Value) -> Scope<'n> {
        Scope {
            parent,
            block,
            depth: self.depth + 1,
        }
    }

    /// The node a key with this target resolves against.
    pub const fn select(&self, target: Target) -> &'v Value {
        match target {
            Target::Parent => self.parent,
            Target::Block => self.block,
        }
    }
}

/// A classified tag bound to the data it resolves against.
#[derive(Debug, Clone, Copy)]
pub enum Command<'t, 'v> {
    Value {
        raw: &'t str,
        key: Key<'t>,
        data: &'v Value,
    },
    ForLoop {
        loop_variable: &'t str,
        key: Key<'t>,
        loop_body: &'t str,
        data: &'v Value,
    },
    IfCondition {
        condition_variable: &'t str,
        condition: Condition<'t>,
        condition_body: &'t str,
        data: &'v Value,
    },
    Partial {
        name: &'t str,
    },
}

impl<'t, 'v> Command<'t, 'v> {
    /// Binds an interpolation to its scope node.
    pub fn value(raw: &'t str, scope: &Scope<'v>) -> Self {
        let key = Key::parse(raw);
        Self::Value {
            raw,
            key,
            data: scope.select(key.target(scope.depth)),
        }
    }

    /// Binds a block opener and its extracted body to its scope node.
    pub fn block(kind: BlockKind, expr: &'t str, body: &'t str, scope: &Scope<'v>) -> Self {
        match kind {
            BlockKind::For => {
                let key = Key::parse(expr);
                Self::ForLoop {
                    loop_variable: expr,
                    key,
                    loop_body: body,
                    data: scope.select(key.target(scope.depth)),
                }
            }
            BlockKind::If => {
                let condition = Condition::parse(expr);
                Self::IfCondition {
                    condition_variable: expr,
                    condition,
                    condition_body: body,
                    data: scope.select(condition.key.target(scope.depth)),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    // ── classify ────────────────────────────────────────────────────

    #[test]
    fn test_classify_value() {
        assert_eq!(classify("name").unwrap(), Directive::Value("name"));
        assert_eq!(classify("  this.age ").unwrap(), Directive::Value("this.age"));
    }

    #[test]
    fn test_classify_for() {
        assert_eq!(
            classify("#for items").unwrap(),
            Directive::Open {
                kind: BlockKind::For,
                expr: "items"
            }
        );
    }

    #[test]
    fn test_classify_if_keeps_negation() {
        assert_eq!(
            classify("#if !is_valid").unwrap(),
            Directive::Open {
                kind: BlockKind::If,
                expr: "!is_valid"
            }
        );
    }

    #[test]
    fn test_classify_closers() {
        assert_eq!(classify("/for").unwrap(), Directive::Close(BlockKind::For));
        assert_eq!(classify(" /if ").unwrap(), Directive::Close(BlockKind::If));
    }

    #[test]
    fn test_classify_partial_forms() {
        assert_eq!(classify("> my_partial").unwrap(), Directive::Partial("my_partial"));
        assert_eq!(classify(">head").unwrap(), Directive::Partial("head"));
        assert_eq!(classify("&gt; end").unwrap(), Directive::Partial("end"));
    }

    #[test]
    fn test_classify_malformed() {
        for body in ["", "   ", "#for", "#if  ", "#each items", "/each", "/", ">", "&gt; "] {
            assert!(
                matches!(classify(body), Err(HandlebazzError::MalformedTag { .. })),
                "{body:?} should be malformed"
            );
        }
    }

    #[test]
    fn test_keyword_needs_separator() {
        assert!(BlockKind::For.opener_expr("#format x").is_none());
        assert!(BlockKind::If.opener_expr("#iffy").is_none());
        assert_eq!(BlockKind::For.opener_expr("#for\titems"), Some("items"));
        assert!(!BlockKind::For.is_closed_by("/format"));
    }

    // ── keys and conditions ─────────────────────────────────────────

    #[test]
    fn test_key_parse() {
        assert_eq!(Key::parse("this"), Key::This);
        assert_eq!(Key::parse("this.name"), Key::BlockField("name"));
        assert_eq!(Key::parse("this.a.b"), Key::BlockField("a.b"));
        assert_eq!(Key::parse("this."), Key::Field("this."));
        assert_eq!(Key::parse("thistle"), Key::Field("thistle"));
        assert_eq!(Key::parse("name"), Key::Field("name"));
    }

    #[test]
    fn test_key_target() {
        assert_eq!(Key::Field("x").target(0), Target::Parent);
        assert_eq!(Key::Field("x").target(1), Target::Block);
        assert_eq!(Key::This.target(0), Target::Block);
        assert_eq!(Key::BlockField("x").target(0), Target::Block);
    }

    #[test]
    fn test_condition_parse() {
        let plain = Condition::parse("is_valid");
        assert_eq!(plain.key, Key::Field("is_valid"));
        assert!(!plain.negated);

        let negated = Condition::parse("!is_valid");
        assert_eq!(negated.key, Key::Field("is_valid"));
        assert!(negated.negated);

        let block_negated = Condition::parse("this.!active");
        assert_eq!(block_negated.key, Key::BlockField("active"));
        assert!(block_negated.negated);

        let outer_negated = Condition::parse("!this.active");
        assert_eq!(outer_negated.key, Key::BlockField("active"));
        assert!(outer_negated.negated);
    }

    // ── scope binding ───────────────────────────────────────────────

    #[test]
    fn test_value_binds_parent_at_depth_zero() {
        let parent = json!({"who": "parent"});
        let block = json!({"who": "block"});
        let scope = Scope {
            parent: &parent,
            block: &block,
            depth: 0,
        };

        match Command::value("who", &scope) {
            Command::Value { data, .. } => assert_eq!(data, &parent),
            other => panic!("unexpected command {other:?}"),
        }
        match Command::value("this.who", &scope) {
            Command::Value { data, .. } => assert_eq!(data, &block),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_value_binds_block_when_nested() {
        let parent = json!({"who": "parent"});
        let block = json!({"who": "block"});
        let scope = Scope::root(&parent).enter(&parent, &block);
        assert_eq!(scope.depth, 1);

        match Command::value("who", &scope) {
            Command::Value { data, .. } => assert_eq!(data, &block),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_block_binding() {
        let root = json!({"items": [1, 2]});
        let scope = Scope::root(&root);

        match Command::block(BlockKind::For, "items", "{{this}}", &scope) {
            Command::ForLoop {
                key,
                loop_body,
                data,
                ..
            } => {
                assert_eq!(key, Key::Field("items"));
                assert_eq!(loop_body, "{{this}}");
                assert_eq!(data, &root);
            }
            other => panic!("unexpected command {other:?}"),
        }

        match Command::block(BlockKind::If, "!flag", "x", &scope) {
            Command::IfCondition { condition, .. } => assert!(condition.negated),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_key_lookup() {
        let data = json!({"name": "x"});
        assert_eq!(Key::This.lookup(&data), Some(&data));
        assert_eq!(Key::Field("name").lookup(&data), Some(&json!("x")));
        assert_eq!(Key::BlockField("nope").lookup(&data), None);
    }
}
