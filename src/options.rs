//! Parse and display configuration.
//!
//! Both option structs deserialize with `serde`, with every field optional, so hosts can
//! keep them in a JSON config file:
//!
//! ```rust
//! use parsinator::{DisplayOptions, ParseOptions};
//! let parse: ParseOptions = serde_json::from_str(r#"{"trace": true}"#).unwrap();
//! assert!(parse.trace);
//! assert_eq!(parse.max_depth, ParseOptions::default().max_depth);
//! let display: DisplayOptions = serde_json::from_str(r#"{"max_match_chars": 10}"#).unwrap();
//! assert_eq!(display.lines_before, 4);
//! ```

use serde::{Deserialize, Serialize};

/// Number of nested visible parser invocations at which a parse faults instead of
/// recursing further. Only runaway recursion such as left recursion gets near it; the
/// stack grows onto the heap as needed below it.
pub const DEFAULT_MAX_DEPTH: usize = 2048;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseOptions {
    /// Record a trace of every parser invocation.
    pub trace: bool,
    pub max_depth: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            trace: false,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl ParseOptions {
    pub fn traced() -> Self {
        Self {
            trace: true,
            ..Self::default()
        }
    }
}

/// Controls how outcomes and traces are rendered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayOptions {
    /// Emit ANSI color codes.
    pub colors: bool,
    /// Longest span quoted in a trace line before it is summarized as `N characters`.
    pub max_match_chars: usize,
    /// Trace nesting depth past which rendering stops.
    pub max_trace_depth: usize,
    /// Source lines shown above the failing line.
    pub lines_before: usize,
    /// Source lines shown below the failing line.
    pub lines_after: usize,
    /// Prepend the trace to a rendered outcome when one was recorded.
    pub show_trace: bool,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            colors: false,
            max_match_chars: 30,
            max_trace_depth: 75,
            lines_before: 4,
            lines_after: 2,
            show_trace: true,
        }
    }
}
