//! Byte offset to line/column mapping.

use once_cell::unsync::OnceCell;
use serde::{Deserialize, Serialize};
use unicode_width::UnicodeWidthChar;

/// A 1-based line and column. Columns count characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Default for Position {
    fn default() -> Self {
        Self { line: 1, column: 1 }
    }
}

/// Maps offsets into an input to positions and back.
pub trait Locate {
    /// The position of byte `offset`. `None` past the end; the end itself is valid.
    fn locate(&self, offset: usize) -> Option<Position>;

    /// Byte offset where the 1-based `line` starts, or `None` if there is no such line.
    fn line_start(&self, line: usize) -> Option<usize>;
}

/// The default [`Locate`]: line starts computed on first use and cached.
///
/// # Examples
///
/// ```rust
/// use parsinator::{LineIndex, Locate, Position};
/// let index = LineIndex::new("ab\ncd");
/// assert_eq!(index.locate(4), Some(Position { line: 2, column: 2 }));
/// assert_eq!(index.line_start(2), Some(3));
/// assert_eq!(index.locate(6), None);
/// ```
pub struct LineIndex<'a> {
    input: &'a str,
    starts: OnceCell<Vec<usize>>,
}

impl<'a> LineIndex<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            starts: OnceCell::new(),
        }
    }

    pub fn input(&self) -> &'a str {
        self.input
    }

    fn starts(&self) -> &[usize] {
        self.starts.get_or_init(|| {
            std::iter::once(0)
                .chain(self.input.match_indices('\n').map(|(i, _)| i + 1))
                .collect()
        })
    }

    pub fn line_count(&self) -> usize {
        self.starts().len()
    }

    /// The text of `line` without its newline.
    pub fn line_text(&self, line: usize) -> Option<&'a str> {
        let start = self.line_start(line)?;
        let end = self
            .line_start(line + 1)
            .map_or(self.input.len(), |next| next - 1);
        Some(&self.input[start..end])
    }

    /// Whitespace that puts a caret under byte `offset` when printed below its line.
    pub fn caret_padding(&self, offset: usize) -> String {
        let Some(position) = self.locate(offset) else {
            return String::new();
        };
        let start = self.line_start(position.line).unwrap_or(0);
        caret_padding(&self.input[start..floor_char_boundary(self.input, offset)])
    }
}

/// Whitespace as wide as `text` on screen. Tabs are copied so the caret lines up
/// however the terminal renders them.
pub fn caret_padding(text: &str) -> String {
    let mut pad = String::new();
    for c in text.chars() {
        if c == '\t' {
            pad.push('\t');
        } else {
            pad.extend(std::iter::repeat(' ').take(c.width().unwrap_or(0)));
        }
    }
    pad
}

impl Locate for LineIndex<'_> {
    fn locate(&self, offset: usize) -> Option<Position> {
        if offset > self.input.len() {
            return None;
        }
        let starts = self.starts();
        let line = starts.partition_point(|&start| start <= offset);
        let start = starts[line - 1];
        let end = floor_char_boundary(self.input, offset);
        Some(Position {
            line,
            column: self.input[start..end].chars().count() + 1,
        })
    }

    fn line_start(&self, line: usize) -> Option<usize> {
        line.checked_sub(1)
            .and_then(|i| self.starts().get(i))
            .copied()
    }
}

fn floor_char_boundary(input: &str, mut offset: usize) -> usize {
    while !input.is_char_boundary(offset) {
        offset -= 1;
    }
    offset
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locate_counts_characters() {
        let index = LineIndex::new("héllo\nwörld");
        assert_eq!(index.locate(0), Some(Position { line: 1, column: 1 }));
        // 'l' after the two-byte 'é'
        assert_eq!(index.locate(3), Some(Position { line: 1, column: 3 }));
        assert_eq!(index.locate(7), Some(Position { line: 2, column: 1 }));
    }

    #[test]
    fn test_locate_end_of_input() {
        let index = LineIndex::new("ab\n");
        assert_eq!(index.locate(3), Some(Position { line: 2, column: 1 }));
        assert_eq!(index.locate(4), None);
    }

    #[test]
    fn test_line_text() {
        let index = LineIndex::new("one\ntwo\n");
        assert_eq!(index.line_text(1), Some("one"));
        assert_eq!(index.line_text(2), Some("two"));
        assert_eq!(index.line_text(3), Some(""));
        assert_eq!(index.line_text(4), None);
        assert_eq!(index.line_start(0), None);
    }

    #[test]
    fn test_caret_padding_uses_display_width() {
        let index = LineIndex::new("\tab日x");
        assert_eq!(index.caret_padding(3), "\t  ");
        assert_eq!(index.caret_padding(6), "\t    ");
    }
}
