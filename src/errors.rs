//! Error handling.
//!
//! Two kinds of things go wrong while parsing, and they are kept apart:
//!
//! - **Failures** are ordinary: the input didn't match. They are values
//!   ([`Status::Failed`](crate::Status::Failed)) carrying an expected set.
//! - **Faults** are bugs in the grammar or its callbacks: an empty `alt`, a bad regular
//!   expression, a callback error, runaway recursion. They are [`Fault`] errors, never
//!   retried, and never swallowed by alternation.
//!
//! [`ParseError`] bridges both into `miette` for rich reporting.

use crate::display::position::Position;
use crate::engine::outcome::ExpectedSet;
use miette::{Diagnostic, LabeledSpan, NamedSource, SourceSpan};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

// ============================================================================
// FAULTS
// ============================================================================

/// What went wrong in a fault.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FaultKind {
    #[error("`{combinator}` needs at least one parser")]
    EmptyCombinator { combinator: &'static str },

    #[error("a parser tried to move backward from index {from} to {to}")]
    BackwardMove { from: usize, to: usize },

    #[error("index {index} is not a character boundary of the {len}-byte input")]
    InvalidIndex { index: usize, len: usize },

    #[error("invalid pattern /{pattern}/: {message}")]
    InvalidPattern { pattern: String, message: String },

    #[error("no rule named '{name}' is defined")]
    UnknownRule { name: String },

    #[error("recursion depth exceeded the limit of {limit}")]
    RecursionLimit { limit: usize },

    #[error("`{parser}` matched without consuming input inside an unbounded repetition")]
    NoProgress { parser: String },

    #[error("used `map` on a {found} value, which is not a list")]
    NotAList { found: &'static str },

    #[error("used `join` on a value that isn't made of strings: {value}")]
    InvalidJoin { value: String },

    #[error("{message}")]
    Callback { message: String },
}

impl FaultKind {
    /// Suffix for the `parsinator::fault::*` diagnostic code.
    pub const fn code_suffix(&self) -> &'static str {
        match self {
            Self::EmptyCombinator { .. } => "empty_combinator",
            Self::BackwardMove { .. } => "backward_move",
            Self::InvalidIndex { .. } => "invalid_index",
            Self::InvalidPattern { .. } => "invalid_pattern",
            Self::UnknownRule { .. } => "unknown_rule",
            Self::RecursionLimit { .. } => "recursion_limit",
            Self::NoProgress { .. } => "no_progress",
            Self::NotAList { .. } => "not_a_list",
            Self::InvalidJoin { .. } => "invalid_join",
            Self::Callback { .. } => "callback",
        }
    }
}

/// Where a fault first happened: the innermost traced parser and its start index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FaultLocation {
    pub parser: String,
    pub index: usize,
}

/// An exceptional condition that aborts the whole parse.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}")]
pub struct Fault {
    pub kind: FaultKind,
    /// Filled in by the engine when the fault crosses a traced frame.
    pub location: Option<FaultLocation>,
}

impl Fault {
    pub fn new(kind: FaultKind) -> Self {
        Self {
            kind,
            location: None,
        }
    }

    /// A fault raised by user code, such as a `value` callback.
    pub fn callback(message: impl Into<String>) -> Self {
        Self::new(FaultKind::Callback {
            message: message.into(),
        })
    }

    /// Records where the fault happened unless an inner frame already did.
    pub fn located(mut self, parser: &str, index: usize) -> Self {
        if self.location.is_none() {
            self.location = Some(FaultLocation {
                parser: parser.to_string(),
                index,
            });
        }
        self
    }

    pub fn parser(&self) -> Option<&str> {
        self.location.as_ref().map(|l| l.parser.as_str())
    }

    pub fn index(&self) -> Option<usize> {
        self.location.as_ref().map(|l| l.index)
    }
}

/// Builds a callback [`Fault`] from a format string.
///
/// # Examples
///
/// ```rust
/// use parsinator::{fault, FaultKind};
/// let f = fault!("bad number {}", 42);
/// assert_eq!(f.kind, FaultKind::Callback { message: "bad number 42".into() });
/// ```
#[macro_export]
macro_rules! fault {
    ($msg:expr) => {
        $crate::Fault::callback($msg)
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::Fault::callback(format!($fmt, $($arg)*))
    };
}

// ============================================================================
// PARSE ERROR - miette bridge
// ============================================================================

/// A failed or faulted top-level outcome, as a `miette` diagnostic.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Parse error at line {} column {}: expected {expected}", .position.line, .position.column)]
    Failed {
        expected: ExpectedSet,
        position: Position,
        src: Arc<NamedSource<String>>,
        span: SourceSpan,
    },

    #[error("Parse fault: {fault}")]
    Faulted {
        fault: Fault,
        src: Arc<NamedSource<String>>,
        span: SourceSpan,
    },
}

impl ParseError {
    fn primary_label(&self) -> String {
        match self {
            ParseError::Failed { expected, .. } => format!("expected {}", expected),
            ParseError::Faulted { fault, .. } => match fault.parser() {
                Some(parser) => format!("fault in `{}`", parser),
                None => "fault here".into(),
            },
        }
    }

    fn span(&self) -> SourceSpan {
        match self {
            ParseError::Failed { span, .. } | ParseError::Faulted { span, .. } => *span,
        }
    }
}

impl Diagnostic for ParseError {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match self {
            ParseError::Failed { .. } => "parsinator::failed".to_string(),
            ParseError::Faulted { fault, .. } => {
                format!("parsinator::fault::{}", fault.kind.code_suffix())
            }
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            ParseError::Failed { .. } => None,
            ParseError::Faulted { .. } => Some(Box::new(
                "faults come from the grammar or its callbacks, not from the input",
            )),
        }
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let labels = vec![LabeledSpan::new_with_span(
            Some(self.primary_label()),
            self.span(),
        )];
        Some(Box::new(labels.into_iter()))
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        match self {
            ParseError::Failed { src, .. } | ParseError::Faulted { src, .. } => Some(&**src),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_located_keeps_innermost_location() {
        let fault = Fault::callback("boom")
            .located("inner", 3)
            .located("outer", 0);
        assert_eq!(fault.parser(), Some("inner"));
        assert_eq!(fault.index(), Some(3));
    }

    #[test]
    fn test_fault_macro_formats() {
        let fault = fault!("expected {} got {}", 1, 2);
        assert_eq!(fault.to_string(), "expected 1 got 2");
    }
}
