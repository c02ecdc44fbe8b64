//! Sequencing.

use crate::combinators::{ParserLike, Pattern};
use crate::engine::{Context, Outcome, Parser, Status};
use crate::errors::{Fault, FaultKind};
use crate::lazy::Lazy;
use crate::value::{Value, ValueMap};
use std::rc::Rc;

/// One element of a sequence, optionally labeled.
#[derive(Clone)]
pub enum SerItem {
    Plain(Parser),
    Labeled(String, Parser),
}

impl SerItem {
    fn label(&self) -> Option<&str> {
        match self {
            SerItem::Plain(_) => None,
            SerItem::Labeled(label, _) => Some(label),
        }
    }

    fn parser(&self) -> &Parser {
        match self {
            SerItem::Plain(parser) | SerItem::Labeled(_, parser) => parser,
        }
    }

    fn into_parser(self) -> Parser {
        match self {
            SerItem::Plain(parser) | SerItem::Labeled(_, parser) => parser,
        }
    }
}

/// Labels a sequence element so its value appears in the result map under `name`.
pub fn label(name: impl Into<String>, parser: impl Into<ParserLike>) -> SerItem {
    SerItem::Labeled(name.into(), parser.into().resolve())
}

impl From<ParserLike> for SerItem {
    fn from(p: ParserLike) -> Self {
        SerItem::Plain(p.resolve())
    }
}

impl From<Parser> for SerItem {
    fn from(p: Parser) -> Self {
        SerItem::Plain(p)
    }
}

impl From<&Parser> for SerItem {
    fn from(p: &Parser) -> Self {
        SerItem::Plain(p.clone())
    }
}

impl From<&str> for SerItem {
    fn from(p: &str) -> Self {
        ParserLike::from(p).into()
    }
}

impl From<String> for SerItem {
    fn from(p: String) -> Self {
        ParserLike::from(p).into()
    }
}

impl From<Pattern> for SerItem {
    fn from(p: Pattern) -> Self {
        ParserLike::from(p).into()
    }
}

impl From<Lazy> for SerItem {
    fn from(p: Lazy) -> Self {
        ParserLike::from(p).into()
    }
}

impl From<&Lazy> for SerItem {
    fn from(p: &Lazy) -> Self {
        ParserLike::from(p).into()
    }
}

/// Builds a sequence from any number of elements. Zero elements is a fault.
pub fn ser<I, T>(items: I) -> Result<Parser, Fault>
where
    I: IntoIterator<Item = T>,
    T: Into<SerItem>,
{
    let mut items = items.into_iter().map(Into::into);
    let first = items
        .next()
        .ok_or_else(|| Fault::new(FaultKind::EmptyCombinator { combinator: "ser" }))?;
    Ok(ser_nonempty(first, items.collect()))
}

/// Builds a sequence of `first` followed by `rest`. Used by the [`ser!`](crate::ser) macro.
pub fn ser_nonempty(first: SerItem, rest: Vec<SerItem>) -> Parser {
    if rest.is_empty() {
        return first.into_parser();
    }
    let mut items = Vec::with_capacity(rest.len() + 1);
    items.push(first);
    items.extend(rest);
    let labeled = items.iter().any(|item| item.label().is_some());
    let name = format!(
        "ser({})",
        items
            .iter()
            .map(|item| match item.label() {
                Some(label) => format!("{}: {}", label, item.parser().name()),
                None => item.parser().name().to_string(),
            })
            .collect::<Vec<_>>()
            .join(", ")
    );

    let items: Rc<[SerItem]> = items.into();
    Parser::new(name, move |ctx: &Context| {
        let mut values = Vec::new();
        let mut map = ValueMap::new();
        let mut current = ctx.clone();
        for item in items.iter() {
            let (context, status) = current.parse(item.parser())?.into_parts();
            let value = match status {
                Status::Matched(value) => value,
                status => return Ok(Outcome::new(context, status)),
            };
            match item.label() {
                Some(label) => {
                    map.insert(label.to_string(), value);
                }
                None if !labeled => values.push(value),
                None => {}
            }
            current = context;
        }
        let result = if labeled {
            Value::Map(map)
        } else {
            Value::List(values)
        };
        current.succeed(current.index(), result)
    })
}
