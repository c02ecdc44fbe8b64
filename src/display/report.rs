//! Rendering of top-level outcomes.

use crate::display::position::{caret_padding, LineIndex, Locate, Position};
use crate::display::{trace, Painter, Tone};
use crate::engine::{Outcome, Status};
use crate::options::DisplayOptions;
use termcolor::{ColorChoice, StandardStream};

/// Renders an outcome, preceded by its trace when one was recorded.
///
/// # Examples
///
/// ```rust
/// use parsinator::{alt, display_result, DisplayOptions};
/// let outcome = alt!["a", "b"].parse("c").unwrap();
/// assert_eq!(
///     display_result(&outcome, &DisplayOptions::default()),
///     "Couldn't continue past line 1 column 1. Expected: \"a\" or \"b\".\n 1 | c\n     ^"
/// );
/// ```
pub fn display_result(outcome: &Outcome, options: &DisplayOptions) -> String {
    display_result_with(outcome, options, &LineIndex::new(outcome.input()))
}

/// Like [`display_result`], with a caller-supplied position index.
pub fn display_result_with(
    outcome: &Outcome,
    options: &DisplayOptions,
    locator: &dyn Locate,
) -> String {
    let mut painter = Painter::new(options.colors);
    if options.show_trace {
        if let Some(recorded) = outcome.trace() {
            if !recorded.is_empty() {
                trace::write_trace(&mut painter, recorded, options, locator);
                painter.text("\n");
            }
        }
    }
    match outcome.status() {
        Status::Matched(value) => {
            let position = last_consumed(outcome, locator);
            painter.text(&format!(
                "Parsed successfully through line {} column {}. Result:\n{}",
                position.line,
                position.column,
                value.to_json()
            ));
        }
        status => write_failure(&mut painter, outcome, status, options, locator),
    }
    painter.finish()
}

/// Renders an outcome to stderr, colored when stderr is a terminal.
pub fn print_result(outcome: &Outcome, options: &DisplayOptions) {
    let mut options = options.clone();
    let stream = StandardStream::stderr(ColorChoice::Auto);
    options.colors = termcolor::WriteColor::supports_color(&stream);
    let rendered = display_result(outcome, &options);
    let mut stream = stream.lock();
    let _ = std::io::Write::write_all(&mut stream, rendered.as_bytes());
    let _ = std::io::Write::write_all(&mut stream, b"\n");
}

/// Position of the last consumed character; column 0 when nothing was consumed.
fn last_consumed(outcome: &Outcome, locator: &dyn Locate) -> Position {
    let input = outcome.input();
    match input[..outcome.index()].char_indices().next_back() {
        Some((last, _)) => locator.locate(last).unwrap_or_default(),
        None => Position { line: 1, column: 0 },
    }
}

fn write_failure(
    painter: &mut Painter,
    outcome: &Outcome,
    status: &Status,
    options: &DisplayOptions,
    locator: &dyn Locate,
) {
    let index = outcome.index();
    let position = locator.locate(index).unwrap_or_default();
    let mut header = format!(
        "Couldn't continue past line {} column {}.",
        position.line, position.column
    );
    if let Status::Failed(expected) = status {
        header.push_str(&format!(" Expected: {}.", expected));
    }
    painter.text(&header);
    painter.text("\n");
    write_excerpt(painter, outcome.input(), index, position, options, locator);

    if let Status::Faulted(fault) = status {
        painter.text("\n");
        match fault.parser() {
            Some(parser) => painter.text(&format!("In parser '{}', got {}", parser, fault)),
            None => painter.text(&format!("Got {}", fault)),
        }
    }
}

/// Numbered source lines around `position` with a caret under it.
fn write_excerpt(
    painter: &mut Painter,
    input: &str,
    index: usize,
    position: Position,
    options: &DisplayOptions,
    locator: &dyn Locate,
) {
    let width = (position.line + options.lines_after).to_string().len();
    let first = position.line.saturating_sub(options.lines_before).max(1);
    let before = numbered_lines(input, first, position.line, width, locator);
    painter.text(&before.join("\n"));

    let line_start = locator.line_start(position.line).unwrap_or(0).min(index);
    let padding = caret_padding(&input[line_start..index]);
    painter.text(&format!("\n    {}{}", " ".repeat(width), padding));
    painter.paint(Tone::Red, "^");

    let after = numbered_lines(
        input,
        position.line + 1,
        position.line + options.lines_after,
        width,
        locator,
    );
    if !after.is_empty() {
        painter.text("\n");
        painter.text(&after.join("\n"));
    }
}

fn numbered_lines(
    input: &str,
    first: usize,
    last: usize,
    width: usize,
    locator: &dyn Locate,
) -> Vec<String> {
    if first > last {
        return Vec::new();
    }
    let Some(start) = locator.line_start(first) else {
        return Vec::new();
    };
    let end = locator.line_start(last + 1).unwrap_or(input.len());
    let mut lines: Vec<&str> = input[start..end].split('\n').collect();
    if lines.last() == Some(&"") {
        lines.pop();
    }
    lines
        .into_iter()
        .enumerate()
        .map(|(n, text)| format!(" {:>width$} | {}", first + n, text, width = width))
        .collect()
}
