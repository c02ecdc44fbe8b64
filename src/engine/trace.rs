//! Structured trace of a parse.
//!
//! While a traced parse runs, nodes live in a shared arena and each [`Context`] carries a
//! cursor to the node its parser is filling in. When the top-level parse returns, the
//! arena is frozen into an owned [`Trace`] tree. Hidden parsers never open a node, so
//! whatever they run is recorded under the nearest visible ancestor.
//!
//! [`Context`]: crate::Context

use crate::engine::context::State;
use crate::engine::outcome::Status;
use std::cell::RefCell;
use std::rc::Rc;

/// How a traced parser invocation ended.
#[derive(Debug, Clone, PartialEq)]
pub struct TraceResult {
    pub index: usize,
    pub state: State,
    pub status: Status,
}

/// One parser invocation in a frozen trace.
#[derive(Debug, Clone, PartialEq)]
pub struct TraceNode {
    pub name: String,
    pub start: usize,
    pub start_state: State,
    /// `None` only if the invocation never returned.
    pub result: Option<TraceResult>,
    pub children: Vec<TraceNode>,
}

impl TraceNode {
    pub fn is_ok(&self) -> bool {
        matches!(
            self.result,
            Some(TraceResult {
                status: Status::Matched(_),
                ..
            })
        )
    }

    pub fn end(&self) -> Option<usize> {
        self.result.as_ref().map(|r| r.index)
    }

    /// Depth-first search for the first node named `name`, including this one.
    pub fn find(&self, name: &str) -> Option<&TraceNode> {
        if self.name == name {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(name))
    }
}

/// The finished trace of a top-level parse.
#[derive(Debug, Clone, PartialEq)]
pub struct Trace {
    pub(crate) input: Rc<str>,
    pub roots: Vec<TraceNode>,
}

impl Trace {
    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn find(&self, name: &str) -> Option<&TraceNode> {
        self.roots.iter().find_map(|root| root.find(name))
    }

    /// Number of visible nodes in the trace.
    pub fn len(&self) -> usize {
        fn count(node: &TraceNode) -> usize {
            1 + node.children.iter().map(count).sum::<usize>()
        }
        self.roots.iter().map(count).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }
}

// ============================================================================
// ARENA
// ============================================================================

struct Entry {
    name: String,
    start: usize,
    start_state: State,
    result: Option<TraceResult>,
    children: Vec<usize>,
}

#[derive(Default)]
struct TraceLog {
    entries: Vec<Entry>,
    roots: Vec<usize>,
}

impl TraceLog {
    fn freeze_into(&self, id: usize, out: &mut Vec<TraceNode>) {
        let entry = &self.entries[id];
        let mut children = Vec::with_capacity(entry.children.len());
        for &child in &entry.children {
            self.freeze_into(child, &mut children);
        }
        out.push(TraceNode {
            name: entry.name.clone(),
            start: entry.start,
            start_state: entry.start_state.clone(),
            result: entry.result.clone(),
            children,
        });
    }
}

/// A position in the trace being built: the node new children attach to.
#[derive(Clone)]
pub(crate) struct TraceCursor {
    log: Rc<RefCell<TraceLog>>,
    node: Option<usize>,
}

impl TraceCursor {
    pub(crate) fn root() -> Self {
        Self {
            log: Rc::new(RefCell::new(TraceLog::default())),
            node: None,
        }
    }

    /// Opens a pending child node under this cursor and returns a cursor pointing at it.
    pub(crate) fn open(&self, name: &str, start: usize, state: State) -> Self {
        let mut log = self.log.borrow_mut();
        let id = log.entries.len();
        log.entries.push(Entry {
            name: name.to_string(),
            start,
            start_state: state,
            result: None,
            children: Vec::new(),
        });
        match self.node {
            Some(parent) => log.entries[parent].children.push(id),
            None => log.roots.push(id),
        }
        Self {
            log: Rc::clone(&self.log),
            node: Some(id),
        }
    }

    /// Records the result of the node this cursor points at.
    pub(crate) fn resolve(&self, index: usize, state: State, status: Status) {
        if let Some(id) = self.node {
            self.log.borrow_mut().entries[id].result = Some(TraceResult {
                index,
                state,
                status,
            });
        }
    }

    pub(crate) fn freeze(&self, input: Rc<str>) -> Trace {
        let log = self.log.borrow();
        let mut roots = Vec::with_capacity(log.roots.len());
        for &root in &log.roots {
            log.freeze_into(root, &mut roots);
        }
        Trace { input, roots }
    }
}
