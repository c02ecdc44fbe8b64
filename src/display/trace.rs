//! Rendering of parse traces.
//!
//! One line per visible node, depth-first:
//!
//! ```text
//! alt("a", "b"): [1:1] matched "b"
//!  "a": [1:1] failed "bb"
//!  "b": [1:1] matched "b"
//! ```

use crate::display::position::{LineIndex, Locate};
use crate::display::{quote, upcoming, Painter, Tone};
use crate::engine::{diff_state, State, Status, Trace, TraceNode};
use crate::options::DisplayOptions;
use crate::value::Value;

/// Renders `trace` as indented text.
pub fn display_trace(trace: &Trace, options: &DisplayOptions) -> String {
    let mut painter = Painter::new(options.colors);
    write_trace(&mut painter, trace, options, &LineIndex::new(trace.input()));
    painter.finish()
}

pub(crate) fn write_trace(
    painter: &mut Painter,
    trace: &Trace,
    options: &DisplayOptions,
    locator: &dyn Locate,
) {
    let mut writer = TraceWriter {
        painter,
        options,
        locator,
        input: trace.input(),
        first: true,
    };
    for root in &trace.roots {
        writer.node(0, root);
    }
}

struct TraceWriter<'a, 'p> {
    painter: &'p mut Painter,
    options: &'a DisplayOptions,
    locator: &'a dyn Locate,
    input: &'a str,
    first: bool,
}

impl TraceWriter<'_, '_> {
    fn newline(&mut self) {
        if !self.first {
            self.painter.text("\n");
        }
        self.first = false;
    }

    fn node(&mut self, indent: usize, node: &TraceNode) {
        let Some(result) = &node.result else {
            return;
        };
        let tone = match result.status {
            Status::Matched(_) => Tone::Green,
            _ => Tone::Red,
        };

        self.newline();
        self.painter.paint(Tone::Gray, &indentation(indent));
        self.painter.paint(tone, &format!("{}: ", node.name));
        let position = self.locator.locate(node.start).unwrap_or_default();
        self.painter
            .paint(Tone::Gray, &format!("[{}:{}] ", position.line, position.column));

        match &result.status {
            Status::Matched(_) => {
                let end = result.index.max(node.start);
                let matched = &self.input[node.start..end];
                let count = matched.chars().count();
                let shown = if count <= self.options.max_match_chars {
                    quote(matched)
                } else {
                    format!("{} characters", count)
                };
                self.painter.paint(tone, &format!("matched {}", shown));
                if !result.state.is_empty() {
                    let diff = state_diff(&node.start_state, &result.state);
                    self.painter.paint(Tone::Cyan, &format!(" {}", diff));
                }
            }
            status => {
                self.painter.paint(tone, "failed ");
                self.painter.paint(
                    Tone::Gray,
                    &upcoming(self.input, node.start, self.options.max_match_chars),
                );
                if !node.start_state.is_empty() {
                    self.painter
                        .paint(Tone::Red, &format!(" {}", state_map(&node.start_state)));
                }
                // Only the node where the fault was raised reports it.
                let raised_here = !node.children.iter().any(|child| {
                    matches!(
                        child.result.as_ref().map(|r| &r.status),
                        Some(Status::Faulted(_))
                    )
                });
                if let (Status::Faulted(fault), true) = (status, raised_here) {
                    self.painter.paint(Tone::Red, &format!(" got {}", fault));
                }
            }
        }

        let next = indent + 1;
        for child in &node.children {
            if next >= self.options.max_trace_depth {
                self.newline();
                self.painter.paint(
                    tone,
                    &format!(
                        "Couldn't print more results, because the max trace depth of {} was exceeded.",
                        self.options.max_trace_depth
                    ),
                );
                break;
            }
            self.node(next, child);
        }
    }
}

/// `" "` per level up to 2, then `"  |"` per three levels plus the remainder.
fn indentation(indent: usize) -> String {
    if indent >= 3 {
        format!("{}{}", "  |".repeat(indent / 3), " ".repeat(indent % 3))
    } else {
        " ".repeat(indent)
    }
}

/// `{a:1, b:x}`
fn state_map(state: &State) -> String {
    let entries: Vec<String> = state.iter().map(|(k, v)| format!("{}:{}", k, v)).collect();
    format!("{{{}}}", entries.join(", "))
}

/// `{a:1->2, b:->x}`, or `{*no change*}`.
fn state_diff(before: &State, after: &State) -> String {
    let changes = diff_state(before, after);
    if changes.is_empty() {
        return "{*no change*}".to_string();
    }
    let entries: Vec<String> = changes
        .iter()
        .map(|change| {
            let show = |v: &Option<Value>| {
                v.as_ref().map(ToString::to_string).unwrap_or_default()
            };
            format!("{}:{}->{}", change.key, show(&change.before), show(&change.after))
        })
        .collect();
    format!("{{{}}}", entries.join(", "))
}
