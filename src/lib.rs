//! Parsinator: composable parser combinators with stateful contexts, lazy recursive
//! grammars, memoization, and traced diagnostics.
//!
//! ```rust
//! use parsinator::{alt, label, pattern, ser, Value};
//!
//! let key = pattern("[a-z]+").unwrap();
//! let number = pattern("[0-9]+").unwrap().value(|_, v| {
//!     let text = v.as_str().unwrap_or_default();
//!     text.parse::<f64>()
//!         .map(Value::from)
//!         .map_err(|e| parsinator::fault!("bad number {}: {}", text, e))
//! });
//! let assignment = ser![label("key", key), "=", label("value", alt![number, "true"])];
//!
//! let value = assignment.parse("x=42").unwrap().into_value().unwrap();
//! assert_eq!(value.get("value"), Some(&Value::Number(42.0)));
//! ```

pub use crate::combinators::{
    alt, any, at_least, at_most, desc, eof, fail, label, list_of, list_of_with, literal, many,
    name, node, not, ok, pattern, pattern_with_flags, peek, range, ser, series, times,
    times_between, ListOptions, ParserLike, Pattern, PatternFlags, SerItem, SeriesOptions,
};
pub use crate::display::{
    display_result, display_result_with, display_trace, print_result, LineIndex, Locate,
    Position,
};
pub use crate::engine::{
    Context, ExpectedSet, Outcome, Parser, State, Status, Step, Trace, TraceNode, TraceResult,
};
pub use crate::errors::{Fault, FaultKind, FaultLocation, ParseError};
pub use crate::lazy::{lazy, lazy_parsers, Grammar, Lazy, RuleFn};
pub use crate::memo::{memoize, memoize_fn, memoize_fn_with, memoize_with, MemoFn, MemoOptions};
pub use crate::options::{DisplayOptions, ParseOptions, DEFAULT_MAX_DEPTH};
pub use crate::value::{Node, Value, ValueMap};

pub mod combinators;
pub mod display;
pub mod engine;
pub mod errors;
pub mod lazy;
pub mod memo;
pub mod options;
pub mod value;
