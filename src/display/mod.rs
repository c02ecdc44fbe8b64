//! Human-readable rendering of outcomes and traces.

pub mod position;
pub mod report;
pub mod trace;

pub use position::{LineIndex, Locate, Position};
pub use report::{display_result, display_result_with, print_result};
pub use trace::display_trace;

use std::io::Write;
use termcolor::{Buffer, Color, ColorSpec, WriteColor};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Tone {
    Plain,
    Gray,
    Green,
    Red,
    Cyan,
}

impl Tone {
    fn spec(self) -> Option<ColorSpec> {
        let mut spec = ColorSpec::new();
        match self {
            Tone::Plain => return None,
            Tone::Gray => spec.set_fg(Some(Color::Black)).set_intense(true),
            Tone::Green => spec.set_fg(Some(Color::Green)),
            Tone::Red => spec.set_fg(Some(Color::Red)),
            Tone::Cyan => spec.set_fg(Some(Color::Cyan)),
        };
        Some(spec)
    }
}

/// Collects colored text into a string.
pub(crate) struct Painter {
    buffer: Buffer,
}

impl Painter {
    pub(crate) fn new(colors: bool) -> Self {
        Self {
            buffer: if colors {
                Buffer::ansi()
            } else {
                Buffer::no_color()
            },
        }
    }

    pub(crate) fn text(&mut self, text: &str) {
        self.paint(Tone::Plain, text);
    }

    pub(crate) fn paint(&mut self, tone: Tone, text: &str) {
        if text.is_empty() {
            return;
        }
        match tone.spec() {
            Some(spec) => {
                let _ = self.buffer.set_color(&spec);
                let _ = self.buffer.write_all(text.as_bytes());
                let _ = self.buffer.reset();
            }
            None => {
                let _ = self.buffer.write_all(text.as_bytes());
            }
        }
    }

    pub(crate) fn finish(self) -> String {
        String::from_utf8_lossy(self.buffer.as_slice()).into_owned()
    }
}

/// JSON-quotes `text`.
pub(crate) fn quote(text: &str) -> String {
    serde_json::to_string(text).unwrap_or_else(|_| format!("\"{}\"", text))
}

/// Quoted excerpt of at most `max_chars` characters starting at `start`.
pub(crate) fn upcoming(input: &str, start: usize, max_chars: usize) -> String {
    let text = &input[start.min(input.len())..];
    let end = text
        .char_indices()
        .nth(max_chars)
        .map_or(text.len(), |(i, _)| i);
    quote(&text[..end])
}
