//! Separated lists and series.

use crate::combinators::repeat::repeat;
use crate::combinators::{ok, resolve, ser_nonempty, ParserLike, SerItem};
use crate::engine::Parser;
use crate::errors::{Fault, FaultKind};
use crate::value::Value;
use std::fmt;
use std::rc::Rc;

/// Options for [`list_of_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListOptions {
    pub at_least: usize,
    pub at_most: Option<usize>,
    /// Leave separator values out of the result.
    pub ignore_sep: bool,
}

impl Default for ListOptions {
    fn default() -> Self {
        Self {
            at_least: 0,
            at_most: None,
            ignore_sep: true,
        }
    }
}

/// Zero or more `item`s separated by `sep`. The value is the list of items.
///
/// ```rust
/// use parsinator::{list_of, Value};
/// let letters = list_of("a", ",");
/// let value = letters.parse("a,a,a").unwrap().into_value().unwrap();
/// assert_eq!(value.as_list().map(|l| l.len()), Some(3));
/// assert_eq!(letters.parse("b").unwrap().value(), Some(&Value::List(vec![])));
/// ```
pub fn list_of(item: impl Into<ParserLike>, sep: impl Into<ParserLike>) -> Parser {
    list_of_with(ListOptions::default(), item, sep)
}

pub fn list_of_with(
    options: ListOptions,
    item: impl Into<ParserLike>,
    sep: impl Into<ParserLike>,
) -> Parser {
    let item = resolve(item);
    let sep = resolve(sep);
    let name = format!("list_of({}, {})", item.name(), sep.name());
    if options.at_most == Some(0) {
        return ok(Value::List(Vec::new())).renamed(name);
    }

    let pair = ser_nonempty(SerItem::from(&sep), vec![SerItem::from(&item)]);
    let tail = repeat(
        format!("many({})", pair.name()),
        pair,
        options.at_least.saturating_sub(1),
        options.at_most.map(|max| max - 1),
    );
    let ignore_sep = options.ignore_sep;
    let body = ser_nonempty(SerItem::from(item), vec![SerItem::from(tail)]).value(
        move |_, value| {
            let mut parts = value.into_list().unwrap_or_default().into_iter();
            let mut out = Vec::new();
            out.extend(parts.next());
            for pair in parts.next().and_then(Value::into_list).unwrap_or_default() {
                let mut pair = pair.into_list().unwrap_or_default().into_iter();
                let (sep, item) = (pair.next(), pair.next());
                if !ignore_sep {
                    out.extend(sep);
                }
                out.extend(item);
            }
            Ok(Value::List(out))
        },
    );

    let list = if options.at_least == 0 {
        repeat(format!("optional({})", body.name()), body, 0, Some(1)).value(|_, value| {
            Ok(value
                .into_list()
                .and_then(|items| items.into_iter().next())
                .unwrap_or(Value::List(Vec::new())))
        })
    } else {
        body
    };
    list.renamed(name)
}

// ============================================================================
// SERIES
// ============================================================================

/// Options for [`series`].
#[derive(Clone)]
pub struct SeriesOptions {
    pub sep_by: Option<Parser>,
    /// Applied to every element; wrapped element values are flattened into the result.
    pub wrap: Option<Rc<dyn Fn(Parser) -> Parser>>,
    pub ignore_sep: bool,
}

impl Default for SeriesOptions {
    fn default() -> Self {
        Self {
            sep_by: None,
            wrap: None,
            ignore_sep: true,
        }
    }
}

impl SeriesOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sep_by(mut self, sep: impl Into<ParserLike>) -> Self {
        self.sep_by = Some(resolve(sep));
        self
    }

    pub fn wrap(mut self, wrap: impl Fn(Parser) -> Parser + 'static) -> Self {
        self.wrap = Some(Rc::new(wrap));
        self
    }

    pub fn keep_separators(mut self) -> Self {
        self.ignore_sep = false;
        self
    }
}

impl fmt::Debug for SeriesOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SeriesOptions")
            .field("sep_by", &self.sep_by.as_ref().map(Parser::name))
            .field("wrap", &self.wrap.is_some())
            .field("ignore_sep", &self.ignore_sep)
            .finish()
    }
}

/// A fixed sequence of parsers with optional separators between them and an optional
/// wrapper around each.
///
/// ```rust
/// use parsinator::{series, SeriesOptions, Value};
/// let abc = series(SeriesOptions::new().sep_by(","), ["a", "b", "c"]).unwrap();
/// let value = abc.parse("a,b,c").unwrap().into_value().unwrap();
/// assert_eq!(value, Value::List(vec!["a".into(), "b".into(), "c".into()]));
/// ```
pub fn series<I, T>(options: SeriesOptions, parsers: I) -> Result<Parser, Fault>
where
    I: IntoIterator<Item = T>,
    T: Into<ParserLike>,
{
    let parsers: Vec<Parser> = parsers.into_iter().map(|p| resolve(p)).collect();
    if parsers.is_empty() {
        return Err(Fault::new(FaultKind::EmptyCombinator {
            combinator: "series",
        }));
    }
    let name = format!(
        "series({})",
        parsers
            .iter()
            .map(Parser::name)
            .collect::<Vec<_>>()
            .join(", ")
    );

    // Marks which positions of the sequence hold separators.
    let mut is_sep = Vec::new();
    let mut items = Vec::new();
    for (i, parser) in parsers.into_iter().enumerate() {
        if i > 0 {
            if let Some(sep) = &options.sep_by {
                items.push(SerItem::from(sep));
                is_sep.push(true);
            }
        }
        let parser = match &options.wrap {
            Some(wrap) => wrap(parser),
            None => parser,
        };
        items.push(SerItem::from(parser));
        is_sep.push(false);
    }

    let mut items = items.into_iter();
    let first = items.next().ok_or_else(|| {
        Fault::new(FaultKind::EmptyCombinator {
            combinator: "series",
        })
    })?;
    let sequence = ser_nonempty(first, items.collect());
    let single = is_sep.len() == 1;
    let wrapped = options.wrap.is_some();
    let ignore_sep = options.ignore_sep;
    let parser = sequence.value(move |_, value| {
        let values = if single {
            vec![value]
        } else {
            value.into_list().unwrap_or_default()
        };
        let mut out = Vec::with_capacity(values.len());
        for (value, &sep) in values.into_iter().zip(is_sep.iter()) {
            if sep {
                if !ignore_sep {
                    out.push(value);
                }
            } else if wrapped {
                match value {
                    Value::List(inner) => out.extend(inner),
                    other => out.push(other),
                }
            } else {
                out.push(value);
            }
        }
        Ok(Value::List(out))
    });
    Ok(parser.renamed(name))
}
