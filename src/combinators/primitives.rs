//! Leaf parsers that read the input directly.

use crate::engine::{Context, ExpectedSet, Parser};
use crate::errors::{Fault, FaultKind};
use crate::value::Value;
use regex_automata::meta::Regex;
use regex_automata::util::syntax;
use regex_automata::{Anchored, Input};
use std::fmt;

/// Matches `text` exactly. The parser is named by the JSON-quoted text.
pub fn literal(text: &str) -> Parser {
    let expected = text.to_string();
    let name = serde_json::to_string(text).unwrap_or_else(|_| format!("\"{}\"", text));
    Parser::new(name, move |ctx: &Context| {
        if ctx.remaining().starts_with(expected.as_str()) {
            ctx.succeed(ctx.index() + expected.len(), expected.as_str())
        } else {
            ctx.fail(ctx.index(), expected.as_str())
        }
    })
}

// ============================================================================
// PATTERNS
// ============================================================================

/// Regular-expression flags understood by [`Pattern`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PatternFlags {
    /// `i`
    pub case_insensitive: bool,
    /// `m`: `^` and `$` match at line boundaries.
    pub multi_line: bool,
    /// `s`: `.` matches newlines.
    pub dot_all: bool,
}

impl PatternFlags {
    /// Parses a flag string such as `"im"`. `u` is accepted; patterns are always
    /// Unicode-aware.
    pub fn parse(pattern: &str, flags: &str) -> Result<Self, Fault> {
        let mut out = Self::default();
        for flag in flags.chars() {
            match flag {
                'i' => out.case_insensitive = true,
                'm' => out.multi_line = true,
                's' => out.dot_all = true,
                'u' => {}
                other => {
                    return Err(Fault::new(FaultKind::InvalidPattern {
                        pattern: pattern.to_string(),
                        message: format!(
                            "unsupported flag '{}'; only 'i', 'm', 's' and 'u' are allowed",
                            other
                        ),
                    }))
                }
            }
        }
        Ok(out)
    }
}

impl fmt::Display for PatternFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (on, flag) in [
            (self.case_insensitive, 'i'),
            (self.multi_line, 'm'),
            (self.dot_all, 's'),
        ] {
            if on {
                write!(f, "{}", flag)?;
            }
        }
        Ok(())
    }
}

/// A compiled regular expression matched at the current index only.
#[derive(Debug, Clone)]
pub struct Pattern {
    source: String,
    flags: PatternFlags,
    regex: Regex,
}

impl Pattern {
    pub fn new(source: &str) -> Result<Self, Fault> {
        Self::with_flags(source, "")
    }

    pub fn with_flags(source: &str, flags: &str) -> Result<Self, Fault> {
        let flags = PatternFlags::parse(source, flags)?;
        let regex = Regex::builder()
            .syntax(
                syntax::Config::new()
                    .case_insensitive(flags.case_insensitive)
                    .multi_line(flags.multi_line)
                    .dot_matches_new_line(flags.dot_all),
            )
            .build(source)
            .map_err(|e| {
                Fault::new(FaultKind::InvalidPattern {
                    pattern: source.to_string(),
                    message: e.to_string(),
                })
            })?;
        Ok(Self {
            source: source.to_string(),
            flags,
            regex,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn flags(&self) -> PatternFlags {
        self.flags
    }

    /// End offset of the match starting exactly at `index`, if any.
    pub fn match_at(&self, input: &str, index: usize) -> Option<usize> {
        let search = Input::new(input).range(index..).anchored(Anchored::Yes);
        self.regex.find(search).map(|m| m.end())
    }

    pub fn parser(&self) -> Parser {
        let pattern = self.clone();
        let label = self.to_string();
        Parser::new(label.clone(), move |ctx: &Context| {
            match pattern.match_at(ctx.input(), ctx.index()) {
                Some(end) => ctx.succeed(end, &ctx.input()[ctx.index()..end]),
                None => ctx.fail(ctx.index(), label.as_str()),
            }
        })
    }
}

/// Renders as `/source/flags`.
impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}/{}", self.source, self.flags)
    }
}

/// Matches a regular expression at the current index. The value is the matched text.
///
/// ```rust
/// use parsinator::{pattern, Value};
/// let digits = pattern("[0-9]+").unwrap();
/// assert_eq!(digits.parse("42x").unwrap().value(), Some(&Value::from("42")));
/// ```
pub fn pattern(source: &str) -> Result<Parser, Fault> {
    Ok(Pattern::new(source)?.parser())
}

pub fn pattern_with_flags(source: &str, flags: &str) -> Result<Parser, Fault> {
    Ok(Pattern::with_flags(source, flags)?.parser())
}

// ============================================================================
// SINGLE CHARACTERS AND CONSTANTS
// ============================================================================

/// Matches any single character.
pub fn any() -> Parser {
    Parser::new("any", |ctx: &Context| match ctx.remaining().chars().next() {
        Some(c) => ctx.succeed(ctx.index() + c.len_utf8(), c.to_string()),
        None => ctx.fail(ctx.index(), "any"),
    })
}

/// Matches the end of the input.
pub fn eof() -> Parser {
    Parser::new("eof", |ctx: &Context| {
        if ctx.remaining().is_empty() {
            ctx.succeed(ctx.index(), Value::Nil)
        } else {
            ctx.fail(ctx.index(), "EOF")
        }
    })
}

/// Succeeds without consuming input.
pub fn ok(value: impl Into<Value>) -> Parser {
    let value = value.into();
    Parser::new("ok", move |ctx: &Context| ctx.succeed(ctx.index(), value.clone()))
}

/// Fails without consuming input.
pub fn fail(expected: impl Into<ExpectedSet>) -> Parser {
    let expected = expected.into();
    Parser::new("fail", move |ctx: &Context| {
        ctx.fail(ctx.index(), expected.clone())
    })
}

/// Matches one character between `begin` and `end`, inclusive.
pub fn range(begin: char, end: char) -> Parser {
    let label = format!("{}-{}", begin, end);
    Parser::new(format!("range({},{})", begin, end), move |ctx: &Context| {
        match ctx.remaining().chars().next() {
            Some(c) if (begin..=end).contains(&c) => {
                ctx.succeed(ctx.index() + c.len_utf8(), c.to_string())
            }
            _ => ctx.fail(ctx.index(), label.as_str()),
        }
    })
}
