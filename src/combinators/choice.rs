//! Ordered choice.

use crate::combinators::ParserLike;
use crate::engine::{Context, ExpectedSet, Parser};
use crate::errors::{Fault, FaultKind};
use std::rc::Rc;

/// Builds an ordered choice from any number of candidates. Zero candidates is a fault.
pub fn alt<I, T>(candidates: I) -> Result<Parser, Fault>
where
    I: IntoIterator<Item = T>,
    T: Into<ParserLike>,
{
    let mut candidates = candidates.into_iter().map(|c| c.into().resolve());
    let first = candidates
        .next()
        .ok_or_else(|| Fault::new(FaultKind::EmptyCombinator { combinator: "alt" }))?;
    Ok(alt_nonempty(first, candidates.collect()))
}

/// Builds an ordered choice of `first` followed by `rest`. Used by the
/// [`alt!`](crate::alt) macro.
///
/// Each candidate runs from the same incoming context. If all fail, the failure is
/// reported at the furthest index any candidate reached, expecting the union of what
/// every candidate expected.
pub fn alt_nonempty(first: Parser, rest: Vec<Parser>) -> Parser {
    if rest.is_empty() {
        return first;
    }
    let mut candidates = Vec::with_capacity(rest.len() + 1);
    candidates.push(first);
    candidates.extend(rest);
    let name = format!(
        "alt({})",
        candidates
            .iter()
            .map(Parser::name)
            .collect::<Vec<_>>()
            .join(", ")
    );

    let candidates: Rc<[Parser]> = candidates.into();
    Parser::new(name, move |ctx: &Context| {
        let mut expected = ExpectedSet::new();
        let mut furthest = ctx.index();
        for candidate in candidates.iter() {
            let outcome = ctx.parse(candidate)?;
            if outcome.is_ok() {
                return Ok(outcome);
            }
            if let Some(e) = outcome.expected() {
                expected.union_with(e);
            }
            furthest = furthest.max(outcome.index());
        }
        ctx.fail(furthest, expected)
    })
}
