//! The combinator library.
//!
//! Anywhere a combinator takes a parser it accepts a [`ParserLike`]: a [`Parser`], a
//! string (matched literally), a compiled [`Pattern`], or a [`Lazy`] factory.
//!
//! [`Lazy`]: crate::lazy::Lazy

pub mod choice;
pub mod lists;
pub mod lookahead;
pub mod naming;
pub mod primitives;
pub mod repeat;
pub mod sequence;

pub use choice::{alt, alt_nonempty};
pub use lists::{list_of, list_of_with, series, ListOptions, SeriesOptions};
pub use lookahead::{not, peek};
pub use naming::{desc, name, node};
pub use primitives::{
    any, eof, fail, literal, ok, pattern, pattern_with_flags, range, Pattern, PatternFlags,
};
pub use repeat::{at_least, at_most, many, times, times_between};
pub use sequence::{label, ser, ser_nonempty, SerItem};

use crate::engine::Parser;
use crate::lazy::Lazy;

/// Anything a combinator accepts in place of a parser.
#[derive(Clone)]
pub enum ParserLike {
    Parser(Parser),
    Literal(String),
    Pattern(Pattern),
    Lazy(Lazy),
}

impl ParserLike {
    /// Normalizes to a [`Parser`].
    pub fn resolve(self) -> Parser {
        match self {
            ParserLike::Parser(parser) => parser,
            ParserLike::Literal(text) => literal(&text),
            ParserLike::Pattern(pattern) => pattern.parser(),
            ParserLike::Lazy(factory) => factory.parser(),
        }
    }
}

impl From<Parser> for ParserLike {
    fn from(parser: Parser) -> Self {
        ParserLike::Parser(parser)
    }
}

impl From<&Parser> for ParserLike {
    fn from(parser: &Parser) -> Self {
        ParserLike::Parser(parser.clone())
    }
}

impl From<&str> for ParserLike {
    fn from(text: &str) -> Self {
        ParserLike::Literal(text.to_string())
    }
}

impl From<String> for ParserLike {
    fn from(text: String) -> Self {
        ParserLike::Literal(text)
    }
}

impl From<&String> for ParserLike {
    fn from(text: &String) -> Self {
        ParserLike::Literal(text.clone())
    }
}

impl From<Pattern> for ParserLike {
    fn from(pattern: Pattern) -> Self {
        ParserLike::Pattern(pattern)
    }
}

impl From<Lazy> for ParserLike {
    fn from(factory: Lazy) -> Self {
        ParserLike::Lazy(factory)
    }
}

impl From<&Lazy> for ParserLike {
    fn from(factory: &Lazy) -> Self {
        ParserLike::Lazy(factory.clone())
    }
}

pub(crate) fn resolve(p: impl Into<ParserLike>) -> Parser {
    p.into().resolve()
}

/// Runs parsers in order, threading the context through them.
///
/// Elements may be wrapped in [`label`]; the value is then a map of the labeled
/// elements only. A single element is returned as is.
///
/// # Examples
///
/// ```rust
/// use parsinator::{label, pattern, ser, Value};
/// let assign = ser![label("key", pattern("[a-z]+").unwrap()), "=", label("val", pattern("[0-9]+").unwrap())];
/// let value = assign.parse("x=42").unwrap().into_value().unwrap();
/// assert_eq!(value.get("key"), Some(&Value::from("x")));
/// assert_eq!(value.get("val"), Some(&Value::from("42")));
/// ```
#[macro_export]
macro_rules! ser {
    ($first:expr $(, $rest:expr)* $(,)?) => {
        $crate::combinators::ser_nonempty(
            $crate::combinators::SerItem::from($first),
            vec![$($crate::combinators::SerItem::from($rest)),*],
        )
    };
}

/// Tries parsers in order; the first success wins.
///
/// ```rust
/// use parsinator::{alt, Value};
/// let ab = alt!["a", "b"];
/// assert_eq!(ab.parse("b").unwrap().value(), Some(&Value::from("b")));
/// assert!(!ab.parse("c").unwrap().is_ok());
/// ```
#[macro_export]
macro_rules! alt {
    ($first:expr $(, $rest:expr)* $(,)?) => {
        $crate::combinators::alt_nonempty(
            $crate::combinators::ParserLike::from($first).resolve(),
            vec![$($crate::combinators::ParserLike::from($rest).resolve()),*],
        )
    };
}
