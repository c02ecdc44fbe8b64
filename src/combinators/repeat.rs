//! Repetition.
//!
//! Every repetition combinator reduces to [`repeat`], which collects successes until
//! the sub-parser fails or the maximum count is reached.

use crate::combinators::{resolve, ParserLike};
use crate::engine::{Context, Outcome, Parser, Status};
use crate::errors::{Fault, FaultKind};
use crate::value::Value;

/// Zero or more.
pub fn many(parser: impl Into<ParserLike>) -> Parser {
    let parser = resolve(parser);
    repeat(format!("many({})", parser.name()), parser, 0, None)
}

pub fn at_least(min: usize, parser: impl Into<ParserLike>) -> Parser {
    let parser = resolve(parser);
    repeat(
        format!("at_least({}, {})", min, parser.name()),
        parser,
        min,
        None,
    )
}

pub fn at_most(max: usize, parser: impl Into<ParserLike>) -> Parser {
    let parser = resolve(parser);
    repeat(
        format!("at_most({}, {})", max, parser.name()),
        parser,
        0,
        Some(max),
    )
}

/// Exactly `count` times.
pub fn times(count: usize, parser: impl Into<ParserLike>) -> Parser {
    let parser = resolve(parser);
    repeat(
        format!("times({}, {})", count, parser.name()),
        parser,
        count,
        Some(count),
    )
}

/// Between `min` and `max` times, inclusive.
///
/// ```rust
/// use parsinator::times_between;
/// let p = times_between(2, 4, "a");
/// assert_eq!(p.parse("aaaaaa").unwrap().index(), 4);
/// assert!(!p.parse("a").unwrap().is_ok());
/// ```
pub fn times_between(min: usize, max: usize, parser: impl Into<ParserLike>) -> Parser {
    let parser = resolve(parser);
    repeat(
        format!("times_between({}, {}, {})", min, max, parser.name()),
        parser,
        min,
        Some(max),
    )
}

/// Runs `parser` at least `min` and at most `max` times (unbounded when `None`).
///
/// Failing before `min` reports the sub-parser's expected set at the index after the
/// last success. An unbounded repetition whose sub-parser succeeds without moving is a
/// fault.
pub(crate) fn repeat(name: String, parser: Parser, min: usize, max: Option<usize>) -> Parser {
    Parser::new(name, move |ctx: &Context| {
        let mut values = Vec::new();
        let mut current = ctx.clone();
        while max.map_or(true, |max| values.len() < max) {
            let (context, status) = current.parse(&parser)?.into_parts();
            let value = match status {
                Status::Matched(value) => value,
                Status::Failed(expected) if values.len() < min => {
                    return ctx.fail(current.index(), expected);
                }
                Status::Failed(_) => break,
                status => return Ok(Outcome::new(context, status)),
            };
            if max.is_none() && context.index() == current.index() {
                return Err(Fault::new(FaultKind::NoProgress {
                    parser: parser.name().to_string(),
                }));
            }
            values.push(value);
            current = context;
        }
        current.succeed(current.index(), Value::List(values))
    })
}
