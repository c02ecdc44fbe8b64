//! Parse contexts: the position, user state and bookkeeping every parser runs against.

use crate::engine::outcome::{ExpectedSet, Outcome, Status, Step};
use crate::engine::parser::Parser;
use crate::engine::trace::TraceCursor;
use crate::errors::{Fault, FaultKind};
use crate::value::Value;
use im::OrdMap;
use std::fmt;
use std::rc::Rc;

/// User-defined parse state. Persistent, so cloning a context is cheap and branches
/// never observe each other's writes.
pub type State = OrdMap<String, Value>;

/// A snapshot of a parse in progress.
///
/// Contexts are only created by the engine. Parser actions receive one, read the input
/// at [`index`](Self::index), and produce an outcome with [`succeed`](Self::succeed) or
/// [`fail`](Self::fail). Sub-parsers run through [`parse`](Self::parse).
#[derive(Clone)]
pub struct Context {
    input: Rc<str>,
    index: usize,
    state: State,
    pub(crate) depth: usize,
    pub(crate) max_depth: usize,
    pub(crate) trace: Option<TraceCursor>,
}

impl Context {
    pub(crate) fn root(input: Rc<str>, max_depth: usize, tracing: bool) -> Self {
        Self {
            input,
            index: 0,
            state: State::new(),
            depth: 0,
            max_depth,
            trace: tracing.then(TraceCursor::root),
        }
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub(crate) fn shared_input(&self) -> &Rc<str> {
        &self.input
    }

    /// Byte offset of the next unconsumed character.
    pub fn index(&self) -> usize {
        self.index
    }

    /// The unconsumed tail of the input.
    pub fn remaining(&self) -> &str {
        &self.input[self.index..]
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.state.get(key)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.state.insert(key.into(), value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.state.remove(key)
    }

    pub fn is_tracing(&self) -> bool {
        self.trace.is_some()
    }

    /// Returns a copy of this context moved to `index`.
    ///
    /// Moving backward is a fault. So is landing past the end of the input or inside a
    /// multi-byte character.
    pub fn advance(&self, index: usize) -> Result<Context, Fault> {
        if index < self.index {
            return Err(Fault::new(FaultKind::BackwardMove {
                from: self.index,
                to: index,
            }));
        }
        if !self.input.is_char_boundary(index) {
            return Err(Fault::new(FaultKind::InvalidIndex {
                index,
                len: self.input.len(),
            }));
        }
        let mut next = self.clone();
        next.index = index;
        Ok(next)
    }

    /// Succeeds at `index` with `value`.
    pub fn succeed(&self, index: usize, value: impl Into<Value>) -> Step {
        Ok(Outcome::new(
            self.advance(index)?,
            Status::Matched(value.into()),
        ))
    }

    /// Fails at `index`, reporting what was expected there.
    pub fn fail(&self, index: usize, expected: impl Into<ExpectedSet>) -> Step {
        Ok(Outcome::new(
            self.advance(index)?,
            Status::Failed(expected.into()),
        ))
    }

    /// Runs `parser` from this context.
    ///
    /// This is the only way to invoke a sub-parser: it enforces the recursion limit,
    /// records the attempt when tracing, and hands the sub-parser an independent copy of
    /// the context.
    pub fn parse(&self, parser: &Parser) -> Step {
        parser.run(self)
    }

    /// Moves to `index` without the forward-only check. Used when rebuilding a
    /// context from a recorded position.
    pub(crate) fn at(&self, index: usize) -> Context {
        let mut next = self.clone();
        next.index = index.min(self.input.len());
        next
    }

    /// Restores the engine bookkeeping of the frame this context is returned to.
    pub(crate) fn rebind(&mut self, frame: &Context) {
        self.depth = frame.depth;
        self.trace = frame.trace.clone();
    }

    pub(crate) fn detach(&mut self) {
        self.depth = 0;
        self.trace = None;
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("index", &self.index)
            .field("input_len", &self.input.len())
            .field("state", &self.state)
            .field("depth", &self.depth)
            .finish()
    }
}

// ============================================================================
// STATE DIFFS
// ============================================================================

/// One key that differs between two states.
#[derive(Debug, Clone, PartialEq)]
pub struct StateChange {
    pub key: String,
    pub before: Option<Value>,
    pub after: Option<Value>,
}

/// Lists the keys whose values differ between `before` and `after`, in key order.
pub fn diff_state(before: &State, after: &State) -> Vec<StateChange> {
    let mut changes: Vec<StateChange> = after
        .iter()
        .filter(|(key, value)| before.get(*key) != Some(*value))
        .map(|(key, value)| StateChange {
            key: key.clone(),
            before: before.get(key).cloned(),
            after: Some(value.clone()),
        })
        .collect();
    changes.extend(
        before
            .iter()
            .filter(|(key, _)| !after.contains_key(*key))
            .map(|(key, value)| StateChange {
                key: key.clone(),
                before: Some(value.clone()),
                after: None,
            }),
    );
    changes.sort_by(|a, b| a.key.cmp(&b.key));
    changes
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context(input: &str) -> Context {
        Context::root(Rc::from(input), 64, false)
    }

    #[test]
    fn test_advance_rejects_backward_moves() {
        let ctx = context("abc").advance(2).unwrap();
        let fault = ctx.advance(1).unwrap_err();
        assert_eq!(fault.kind, FaultKind::BackwardMove { from: 2, to: 1 });
    }

    #[test]
    fn test_state_writes_do_not_leak_into_parent() {
        let parent = context("abc");
        let mut child = parent.advance(1).unwrap();
        child.set("x", 1.0);
        assert_eq!(child.get("x"), Some(&Value::Number(1.0)));
        assert_eq!(parent.get("x"), None);
    }

    #[test]
    fn test_diff_state_reports_changes_in_key_order() {
        let mut before = State::new();
        before.insert("a".into(), Value::from(1.0));
        before.insert("gone".into(), Value::from("x"));
        let mut after = before.clone();
        after.insert("a".into(), Value::from(2.0));
        after.insert("b".into(), Value::from(true));
        after.remove("gone");
        let keys: Vec<_> = diff_state(&before, &after)
            .into_iter()
            .map(|c| c.key)
            .collect();
        assert_eq!(keys, vec!["a", "b", "gone"]);
    }
}
