//! The parsing engine: contexts, outcomes, parsers and the trace they record.
//!
//! Every parser invocation goes through [`Context::parse`], which
//!
//! 1. enforces [`ParseOptions::max_depth`](crate::ParseOptions::max_depth) and moves
//!    deep parses onto a fresh stack segment before the thread stack runs out,
//! 2. hands the parser its own copy of the context, so state written by a failed branch
//!    is never visible to a sibling,
//! 3. when tracing, opens a trace node before the parser runs and resolves it after,
//! 4. records faults on the innermost traced node before passing them outward.

pub mod context;
pub mod outcome;
pub mod parser;
pub mod trace;

pub use context::{diff_state, Context, State, StateChange};
pub use outcome::{ExpectedSet, Outcome, Status, Step};
pub use parser::Parser;
pub use trace::{Trace, TraceNode, TraceResult};
