//! Lookahead and negation. Neither consumes input.

use crate::combinators::{resolve, ParserLike};
use crate::engine::{Context, Parser, Status};
use crate::value::Value;

/// Runs `parser` and, on success, keeps its value but not its progress or state.
pub fn peek(parser: impl Into<ParserLike>) -> Parser {
    let parser = resolve(parser);
    Parser::new(format!("peek({})", parser.name()), move |ctx: &Context| {
        let outcome = ctx.parse(&parser)?;
        match outcome.status {
            Status::Matched(value) => ctx.succeed(ctx.index(), value),
            _ => Ok(outcome),
        }
    })
}

/// Succeeds with no value where `parser` fails, and fails where it succeeds.
///
/// The failure is labeled `not <text parser matched>`.
pub fn not(parser: impl Into<ParserLike>) -> Parser {
    let parser = resolve(parser);
    Parser::new(format!("not({})", parser.name()), move |ctx: &Context| {
        let outcome = ctx.parse(&parser)?;
        if outcome.is_ok() {
            let span = &ctx.input()[ctx.index()..outcome.index()];
            ctx.fail(ctx.index(), format!("not {}", span))
        } else {
            ctx.succeed(ctx.index(), Value::Nil)
        }
    })
}
