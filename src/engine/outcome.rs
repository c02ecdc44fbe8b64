//! The result of one parsing step.

use crate::display::position::{LineIndex, Locate};
use crate::engine::context::Context;
use crate::engine::trace::Trace;
use crate::errors::{Fault, ParseError};
use crate::value::Value;
use miette::NamedSource;
use std::fmt;
use std::sync::Arc;

/// What every internal parsing step returns.
///
/// `Err` is the propagation path for faults; ordinary parse failures are `Ok` outcomes
/// with [`Status::Failed`].
pub type Step = Result<Outcome, Fault>;

// ============================================================================
// EXPECTED SET
// ============================================================================

/// A set of human-readable labels that failed to match at a position.
///
/// Duplicate labels collapse; insertion order is kept so messages read in the order the
/// grammar tried things.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExpectedSet {
    labels: Vec<String>,
}

impl ExpectedSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn singleton(label: impl Into<String>) -> Self {
        Self {
            labels: vec![label.into()],
        }
    }

    /// Adds a label, returning false if it was already present.
    pub fn insert(&mut self, label: impl Into<String>) -> bool {
        let label = label.into();
        if self.contains(&label) {
            return false;
        }
        self.labels.push(label);
        true
    }

    /// Merges every label of `other` into this set.
    pub fn union_with(&mut self, other: &ExpectedSet) {
        for label in &other.labels {
            self.insert(label.as_str());
        }
    }

    pub fn contains(&self, label: &str) -> bool {
        self.labels.iter().any(|l| l == label)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.labels.iter().map(String::as_str)
    }
}

/// Renders as `"a"`, `"a" or "b"`, or `"a", "b" or "c"`.
impl fmt::Display for ExpectedSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let quoted: Vec<String> = self
            .labels
            .iter()
            .map(|l| serde_json::to_string(l).unwrap_or_else(|_| format!("\"{}\"", l)))
            .collect();
        match quoted.split_last() {
            None => write!(f, "<unreported>"),
            Some((last, [])) => write!(f, "{}", last),
            Some((last, init)) => write!(f, "{} or {}", init.join(", "), last),
        }
    }
}

impl From<&str> for ExpectedSet {
    fn from(label: &str) -> Self {
        Self::singleton(label)
    }
}

impl From<String> for ExpectedSet {
    fn from(label: String) -> Self {
        Self::singleton(label)
    }
}

impl<const N: usize> From<[&str; N]> for ExpectedSet {
    fn from(labels: [&str; N]) -> Self {
        labels.into_iter().collect()
    }
}

impl From<Vec<String>> for ExpectedSet {
    fn from(labels: Vec<String>) -> Self {
        labels.into_iter().collect()
    }
}

impl<S: Into<String>> FromIterator<S> for ExpectedSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = ExpectedSet::new();
        for label in iter {
            set.insert(label);
        }
        set
    }
}

// ============================================================================
// OUTCOME
// ============================================================================

/// How a step ended.
#[derive(Debug, Clone, PartialEq)]
pub enum Status {
    Matched(Value),
    Failed(ExpectedSet),
    /// Only produced by a top-level traced parse; inside the engine faults travel as `Err`.
    Faulted(Box<Fault>),
}

/// A parsing step's outcome: the status plus the context it ended at.
///
/// On success the context is positioned after the consumed input; on failure it is at
/// the furthest point reached.
#[derive(Debug, Clone)]
pub struct Outcome {
    pub(crate) context: Context,
    pub(crate) status: Status,
    pub(crate) trace: Option<Box<Trace>>,
}

impl Outcome {
    pub(crate) fn new(context: Context, status: Status) -> Self {
        Self {
            context,
            status,
            trace: None,
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self.status, Status::Matched(_))
    }

    pub fn status(&self) -> &Status {
        &self.status
    }

    pub fn context(&self) -> &Context {
        &self.context
    }

    pub fn index(&self) -> usize {
        self.context.index()
    }

    pub fn input(&self) -> &str {
        self.context.input()
    }

    /// Reads a state value from the resulting context.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.context.get(key)
    }

    pub fn value(&self) -> Option<&Value> {
        match &self.status {
            Status::Matched(value) => Some(value),
            _ => None,
        }
    }

    pub fn into_value(self) -> Option<Value> {
        match self.status {
            Status::Matched(value) => Some(value),
            _ => None,
        }
    }

    pub fn expected(&self) -> Option<&ExpectedSet> {
        match &self.status {
            Status::Failed(expected) => Some(expected),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&Fault> {
        match &self.status {
            Status::Faulted(fault) => Some(fault.as_ref()),
            _ => None,
        }
    }

    /// The finished trace, present only for top-level traced parses.
    pub fn trace(&self) -> Option<&Trace> {
        self.trace.as_deref()
    }

    pub(crate) fn into_parts(self) -> (Context, Status) {
        (self.context, self.status)
    }

    /// Applies `f` to a matched value; failures pass through untouched.
    pub(crate) fn and_then_value<F>(self, f: F) -> Step
    where
        F: FnOnce(&mut Context, Value) -> Result<Value, Fault>,
    {
        let Outcome {
            mut context,
            status,
            trace,
        } = self;
        let status = match status {
            Status::Matched(value) => Status::Matched(f(&mut context, value)?),
            other => other,
        };
        Ok(Outcome {
            context,
            status,
            trace,
        })
    }

    /// Converts the outcome into a `Result`, turning failures into a `miette` diagnostic.
    pub fn into_result(self) -> Result<Value, ParseError> {
        self.into_result_named("input")
    }

    /// Like [`into_result`](Self::into_result), naming the source in the diagnostic.
    pub fn into_result_named(self, source_name: &str) -> Result<Value, ParseError> {
        let index = self.index();
        let input = self.input().to_string();
        let position = LineIndex::new(&input).locate(index).unwrap_or_default();
        let len = input[index..].chars().next().map_or(0, char::len_utf8);
        let span = (index, len).into();
        let src = Arc::new(NamedSource::new(source_name, input));
        match self.status {
            Status::Matched(value) => Ok(value),
            Status::Failed(expected) => Err(ParseError::Failed {
                expected,
                position,
                src,
                span,
            }),
            Status::Faulted(fault) => Err(ParseError::Faulted {
                fault: *fault,
                src,
                span,
            }),
        }
    }
}
