//! Positions, ranges and cursor motion over a line sequence.
//!
//! Columns are character indices (not byte offsets) throughout the editor.
//! The helpers at the bottom of this module convert between the two.

use std::cmp::Ordering;

/// Represents a position in the buffer as (line, column).
/// Both are 0-indexed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl Ord for Position {
    fn cmp(&self, other: &Self) -> Ordering {
        self.line
            .cmp(&other.line)
            .then(self.column.cmp(&other.column))
    }
}

impl PartialOrd for Position {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A half-open range of positions: `start` is included, `end` is not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

impl Range {
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// Returns true if `pos` lies in `[start, end)`.
    pub fn contains(&self, pos: Position) -> bool {
        self.start <= pos && pos < self.end
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Returns the range with `start <= end`.
    pub fn normalized(&self) -> Self {
        if self.start <= self.end {
            *self
        } else {
            Self::new(self.end, self.start)
        }
    }
}

/// Word motions treat alphanumerics as word characters and everything
/// else as a separator.
fn is_word_char(c: char) -> bool {
    c.is_alphanumeric()
}

/// Returns the position one word forward from `pos`.
///
/// Skips the rest of the current word, then any separators. When the line
/// is exhausted the motion lands on the start of the next line.
pub fn word_forward<S: AsRef<str>>(lines: &[S], pos: Position) -> Position {
    let Some(line) = lines.get(pos.line) else {
        return pos;
    };
    let chars: Vec<char> = line.as_ref().chars().collect();
    let has_next_line = pos.line + 1 < lines.len();

    if pos.column >= chars.len() {
        return if has_next_line {
            Position::new(pos.line + 1, 0)
        } else {
            pos
        };
    }

    let mut col = pos.column;
    while col < chars.len() && is_word_char(chars[col]) {
        col += 1;
    }
    while col < chars.len() && !is_word_char(chars[col]) {
        col += 1;
    }

    if col >= chars.len() && has_next_line {
        Position::new(pos.line + 1, 0)
    } else {
        Position::new(pos.line, col)
    }
}

/// Returns the position one word backward from `pos`.
///
/// At column 0 the motion moves to the end of the previous line.
pub fn word_backward<S: AsRef<str>>(lines: &[S], pos: Position) -> Position {
    let Some(line) = lines.get(pos.line) else {
        return pos;
    };

    if pos.column == 0 {
        return match pos.line.checked_sub(1) {
            Some(prev) => Position::new(prev, char_len(lines[prev].as_ref())),
            None => pos,
        };
    }

    let chars: Vec<char> = line.as_ref().chars().collect();
    let mut col = pos.column.min(chars.len());
    while col > 0 && !is_word_char(chars[col - 1]) {
        col -= 1;
    }
    while col > 0 && is_word_char(chars[col - 1]) {
        col -= 1;
    }
    Position::new(pos.line, col)
}

/// Column of the first non-whitespace character, or the line length for
/// blank lines.
pub fn first_non_blank(line: &str) -> usize {
    line.chars()
        .position(|c| !c.is_whitespace())
        .unwrap_or_else(|| char_len(line))
}

// ==================== Column conversions ====================

/// Number of characters in `s`.
pub fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Converts a character column into a byte offset, clamping to the end.
pub fn char_to_byte(s: &str, column: usize) -> usize {
    s.char_indices()
        .nth(column)
        .map(|(idx, _)| idx)
        .unwrap_or(s.len())
}

/// Converts a byte offset into a character column.
pub fn byte_to_char(s: &str, byte: usize) -> usize {
    let byte = byte.min(s.len());
    s.char_indices().take_while(|(idx, _)| *idx < byte).count()
}

/// Returns the substring covering character columns `[start, end)`.
pub fn char_slice(s: &str, start: usize, end: usize) -> &str {
    let from = char_to_byte(s, start);
    let to = char_to_byte(s, end.max(start));
    &s[from..to]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_ordering() {
        assert!(Position::new(0, 5) < Position::new(1, 0));
        assert!(Position::new(2, 1) < Position::new(2, 3));
        assert_eq!(Position::new(1, 1), Position::new(1, 1));
        assert_eq!(
            Position::new(3, 0).max(Position::new(2, 99)),
            Position::new(3, 0)
        );
    }

    #[test]
    fn test_range_contains_is_half_open() {
        let range = Range::new(Position::new(0, 2), Position::new(1, 1));
        assert!(range.contains(Position::new(0, 2)));
        assert!(range.contains(Position::new(0, 40)));
        assert!(range.contains(Position::new(1, 0)));
        assert!(!range.contains(Position::new(1, 1)));
        assert!(!range.contains(Position::new(0, 1)));
        assert!(Range::new(Position::new(1, 1), Position::new(1, 1)).is_empty());
    }

    #[test]
    fn test_range_normalized() {
        let range = Range::new(Position::new(3, 0), Position::new(1, 4));
        let norm = range.normalized();
        assert_eq!(norm.start, Position::new(1, 4));
        assert_eq!(norm.end, Position::new(3, 0));
    }

    #[test]
    fn test_word_forward_within_line() {
        let lines = ["Hello World Test"];
        let p = word_forward(&lines, Position::new(0, 0));
        assert_eq!(p, Position::new(0, 6));
        let p = word_forward(&lines, p);
        assert_eq!(p, Position::new(0, 12));
    }

    #[test]
    fn test_word_forward_crosses_lines() {
        let lines = ["foo", "bar"];
        assert_eq!(word_forward(&lines, Position::new(0, 1)), Position::new(1, 0));
        assert_eq!(word_forward(&lines, Position::new(0, 3)), Position::new(1, 0));
        // Last line: stays at the end of the line.
        assert_eq!(word_forward(&lines, Position::new(1, 0)), Position::new(1, 3));
        assert_eq!(word_forward(&lines, Position::new(1, 3)), Position::new(1, 3));
    }

    #[test]
    fn test_word_backward() {
        let lines = ["one", "Hello World Test"];
        assert_eq!(word_backward(&lines, Position::new(1, 12)), Position::new(1, 6));
        assert_eq!(word_backward(&lines, Position::new(1, 6)), Position::new(1, 0));
        assert_eq!(word_backward(&lines, Position::new(1, 0)), Position::new(0, 3));
        assert_eq!(word_backward(&lines, Position::new(0, 0)), Position::new(0, 0));
    }

    #[test]
    fn test_first_non_blank() {
        assert_eq!(first_non_blank("    let x"), 4);
        assert_eq!(first_non_blank("x"), 0);
        assert_eq!(first_non_blank("   "), 3);
        assert_eq!(first_non_blank(""), 0);
    }

    #[test]
    fn test_column_conversions() {
        let s = "aé😀b";
        assert_eq!(char_len(s), 4);
        assert_eq!(char_to_byte(s, 0), 0);
        assert_eq!(char_to_byte(s, 2), 3);
        assert_eq!(char_to_byte(s, 3), 7);
        assert_eq!(char_to_byte(s, 10), s.len());
        assert_eq!(byte_to_char(s, 7), 3);
        assert_eq!(byte_to_char(s, s.len()), 4);
        assert_eq!(char_slice(s, 1, 3), "é😀");
        assert_eq!(char_slice(s, 3, 1), "");
    }
}
