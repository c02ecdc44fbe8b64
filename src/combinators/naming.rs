//! Naming and describing parsers.

use crate::combinators::{resolve, ParserLike};
use crate::engine::{Context, Parser};
use crate::value::{Node, Value};

/// Replaces any failure of `parser` with a single expected `label` at the start index.
///
/// ```rust
/// use parsinator::{desc, pattern};
/// let number = desc("number", pattern("[0-9]+").unwrap());
/// let outcome = number.parse("x").unwrap();
/// assert_eq!(outcome.expected().unwrap().to_string(), r#""number""#);
/// ```
pub fn desc(label: impl Into<String>, parser: impl Into<ParserLike>) -> Parser {
    let label = label.into();
    let parser = resolve(parser);
    Parser::new(format!("desc({})", label), move |ctx: &Context| {
        let outcome = ctx.parse(&parser)?;
        if outcome.is_ok() {
            Ok(outcome)
        } else {
            ctx.fail(ctx.index(), label.as_str())
        }
    })
}

/// Wraps a success value in a [`Node`] recording `label` and the consumed span.
pub fn node(label: impl Into<String>, parser: impl Into<ParserLike>) -> Parser {
    let label = label.into();
    let parser = resolve(parser);
    Parser::new(format!("node({})", label), move |ctx: &Context| {
        let start = ctx.index();
        ctx.parse(&parser)?.and_then_value(|ctx, value| {
            Ok(Value::from(Node {
                name: label.clone(),
                value,
                start,
                end: ctx.index(),
            }))
        })
    })
}

/// Renames `parser`. Behavior is unchanged; only traces and messages differ.
pub fn name(label: impl Into<String>, parser: impl Into<ParserLike>) -> Parser {
    resolve(parser).renamed(label)
}
