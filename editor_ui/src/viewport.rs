//! The visible window onto the document.

use astrax_core::Position;
use std::ops::Range;

/// Scroll position and size of the text area.
///
/// `reserved_rows` and `reserved_columns` are the rows and columns of the
/// terminal taken by chrome (status bar, line number gutter). They are set by
/// the renderer's layout step before every [`Viewport::ensure_visible`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    /// First document line shown.
    pub top_line: usize,
    /// First document column shown.
    pub left_column: usize,
    /// Terminal height in rows.
    pub height: usize,
    /// Terminal width in columns.
    pub width: usize,
    reserved_rows: usize,
    reserved_columns: usize,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(80, 24)
    }
}

impl Viewport {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            top_line: 0,
            left_column: 0,
            height,
            width,
            reserved_rows: 0,
            reserved_columns: 0,
        }
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
    }

    pub fn set_reservations(&mut self, rows: usize, columns: usize) {
        self.reserved_rows = rows;
        self.reserved_columns = columns;
    }

    pub fn reserved_rows(&self) -> usize {
        self.reserved_rows
    }

    pub fn reserved_columns(&self) -> usize {
        self.reserved_columns
    }

    /// Number of rows available for text, at least 1.
    pub fn text_rows(&self) -> usize {
        self.height.saturating_sub(self.reserved_rows).max(1)
    }

    /// Number of columns available for text, at least 1.
    pub fn text_columns(&self) -> usize {
        self.width.saturating_sub(self.reserved_columns).max(1)
    }

    /// Document lines that fall inside the text area.
    pub fn visible_lines(&self) -> Range<usize> {
        self.top_line..self.top_line + self.text_rows()
    }

    /// Scrolls the minimum amount needed for `pos` to be on screen.
    pub fn ensure_visible(&mut self, pos: Position) {
        let rows = self.text_rows();
        if pos.line < self.top_line {
            self.top_line = pos.line;
        } else if pos.line >= self.top_line + rows {
            self.top_line = pos.line + 1 - rows;
        }

        let columns = self.text_columns();
        if pos.column < self.left_column {
            self.left_column = pos.column;
        } else if pos.column >= self.left_column + columns {
            self.left_column = pos.column + 1 - columns;
        }
    }

    /// Moves the top line by `delta`, stopping at the first line.
    ///
    /// There is no bottom clamp; scrolling past the end shows filler rows.
    pub fn scroll(&mut self, delta: isize) {
        self.top_line = self.top_line.saturating_add_signed(delta);
    }
}
