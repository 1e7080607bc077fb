//! Terminal output boundary.
//!
//! The renderer draws through the [`Terminal`] trait. [`GridTerminal`] keeps
//! the cells in memory; [`CrosstermTerminal`] drives a real terminal.

use astrax_core::syntax::{Color, Style};
use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::style::{
    Attribute, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor,
};
use crossterm::terminal::{
    self, disable_raw_mode, enable_raw_mode, Clear, ClearType, DisableLineWrap, EnableLineWrap,
    EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::{execute, queue};
use std::io::{self, Stdout, Write};

/// Terminal dimensions in cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Size {
    pub width: usize,
    pub height: usize,
}

/// A cell-addressed output surface.
pub trait Terminal {
    fn size(&self) -> io::Result<Size>;

    /// Writes `text` starting at `(col, row)`, one character per cell.
    fn write_styled(&mut self, col: usize, row: usize, text: &str, style: Style) -> io::Result<()>;

    /// Blanks a rectangle of cells.
    fn clear_region(&mut self, col: usize, row: usize, width: usize, height: usize)
        -> io::Result<()>;

    fn set_cursor(&mut self, col: usize, row: usize) -> io::Result<()>;

    fn hide_cursor(&mut self) -> io::Result<()>;

    fn show_cursor(&mut self) -> io::Result<()>;

    /// Pushes pending output to the device.
    fn flush(&mut self) -> io::Result<()>;
}

// ==================== In-memory grid ====================

/// One terminal cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub style: Style,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            ch: ' ',
            style: Style::default(),
        }
    }
}

/// A terminal that records output in a cell grid.
#[derive(Debug, Clone)]
pub struct GridTerminal {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
    cursor: (usize, usize),
    cursor_visible: bool,
    /// Number of `write_styled` calls since creation.
    writes: usize,
}

impl GridTerminal {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::default(); width * height],
            cursor: (0, 0),
            cursor_visible: true,
            writes: 0,
        }
    }

    /// Resizes the grid, discarding its contents.
    pub fn resize(&mut self, width: usize, height: usize) {
        *self = Self {
            writes: self.writes,
            ..Self::new(width, height)
        };
    }

    pub fn cell(&self, col: usize, row: usize) -> Option<&Cell> {
        if col < self.width && row < self.height {
            self.cells.get(row * self.width + col)
        } else {
            None
        }
    }

    /// Text of one row, with trailing blanks removed.
    pub fn row_text(&self, row: usize) -> String {
        if row >= self.height {
            return String::new();
        }
        let start = row * self.width;
        let text: String = self.cells[start..start + self.width]
            .iter()
            .map(|cell| cell.ch)
            .collect();
        text.trim_end().to_string()
    }

    /// All rows joined by newlines.
    pub fn contents(&self) -> String {
        (0..self.height)
            .map(|row| self.row_text(row))
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn cursor(&self) -> (usize, usize) {
        self.cursor
    }

    pub fn is_cursor_visible(&self) -> bool {
        self.cursor_visible
    }

    pub fn write_count(&self) -> usize {
        self.writes
    }
}

impl Terminal for GridTerminal {
    fn size(&self) -> io::Result<Size> {
        Ok(Size {
            width: self.width,
            height: self.height,
        })
    }

    fn write_styled(&mut self, col: usize, row: usize, text: &str, style: Style) -> io::Result<()> {
        self.writes += 1;
        if row >= self.height {
            return Ok(());
        }
        for (offset, ch) in text.chars().enumerate() {
            let x = col + offset;
            if x >= self.width {
                break;
            }
            self.cells[row * self.width + x] = Cell { ch, style };
        }
        Ok(())
    }

    fn clear_region(
        &mut self,
        col: usize,
        row: usize,
        width: usize,
        height: usize,
    ) -> io::Result<()> {
        for y in row..(row + height).min(self.height) {
            for x in col..(col + width).min(self.width) {
                self.cells[y * self.width + x] = Cell::default();
            }
        }
        Ok(())
    }

    fn set_cursor(&mut self, col: usize, row: usize) -> io::Result<()> {
        self.cursor = (col, row);
        Ok(())
    }

    fn hide_cursor(&mut self) -> io::Result<()> {
        self.cursor_visible = false;
        Ok(())
    }

    fn show_cursor(&mut self) -> io::Result<()> {
        self.cursor_visible = true;
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

// ==================== Crossterm backend ====================

fn to_crossterm(color: Color) -> crossterm::style::Color {
    use crossterm::style::Color as C;
    match color {
        Color::Default => C::Reset,
        Color::Black => C::Black,
        Color::Red => C::DarkRed,
        Color::Green => C::DarkGreen,
        Color::Yellow => C::DarkYellow,
        Color::Blue => C::DarkBlue,
        Color::Magenta => C::DarkMagenta,
        Color::Cyan => C::DarkCyan,
        Color::White => C::Grey,
        Color::BrightBlack => C::DarkGrey,
        Color::BrightRed => C::Red,
        Color::BrightGreen => C::Green,
        Color::BrightYellow => C::Yellow,
        Color::BrightBlue => C::Blue,
        Color::BrightMagenta => C::Magenta,
        Color::BrightCyan => C::Cyan,
        Color::BrightWhite => C::White,
    }
}

/// Puts the terminal in raw mode on the alternate screen and restores it
/// when dropped.
pub struct RawModeGuard {
    _private: (),
}

impl RawModeGuard {
    pub fn new() -> io::Result<Self> {
        enable_raw_mode()?;
        let mut out = io::stdout();
        if let Err(e) = execute!(out, EnterAlternateScreen, DisableLineWrap, Clear(ClearType::All))
        {
            let _ = disable_raw_mode();
            return Err(e);
        }
        Ok(Self { _private: () })
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let mut out = io::stdout();
        if let Err(e) = execute!(out, ResetColor, Show, EnableLineWrap, LeaveAlternateScreen) {
            log::error!("Failed to restore terminal: {}", e);
        }
        if let Err(e) = disable_raw_mode() {
            log::error!("Failed to disable raw mode: {}", e);
        }
    }
}

/// A real terminal driven through crossterm.
///
/// Commands are queued and only reach the device on [`Terminal::flush`].
pub struct CrosstermTerminal {
    out: Stdout,
    _guard: RawModeGuard,
}

impl CrosstermTerminal {
    pub fn new() -> io::Result<Self> {
        let guard = RawModeGuard::new()?;
        Ok(Self {
            out: io::stdout(),
            _guard: guard,
        })
    }
}

impl Terminal for CrosstermTerminal {
    fn size(&self) -> io::Result<Size> {
        let (width, height) = terminal::size()?;
        Ok(Size {
            width: width as usize,
            height: height as usize,
        })
    }

    fn write_styled(&mut self, col: usize, row: usize, text: &str, style: Style) -> io::Result<()> {
        queue!(
            self.out,
            MoveTo(col as u16, row as u16),
            SetForegroundColor(to_crossterm(style.fg)),
            SetBackgroundColor(to_crossterm(style.bg)),
        )?;
        if style.bold {
            queue!(self.out, SetAttribute(Attribute::Bold))?;
        }
        if style.underline {
            queue!(self.out, SetAttribute(Attribute::Underlined))?;
        }
        queue!(self.out, Print(text), SetAttribute(Attribute::Reset), ResetColor)?;
        Ok(())
    }

    fn clear_region(
        &mut self,
        col: usize,
        row: usize,
        width: usize,
        height: usize,
    ) -> io::Result<()> {
        let blank = " ".repeat(width);
        queue!(self.out, ResetColor)?;
        for y in row..row + height {
            queue!(self.out, MoveTo(col as u16, y as u16), Print(&blank))?;
        }
        Ok(())
    }

    fn set_cursor(&mut self, col: usize, row: usize) -> io::Result<()> {
        queue!(self.out, MoveTo(col as u16, row as u16))
    }

    fn hide_cursor(&mut self) -> io::Result<()> {
        queue!(self.out, Hide)
    }

    fn show_cursor(&mut self) -> io::Result<()> {
        queue!(self.out, Show)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_write_and_clip() {
        let mut term = GridTerminal::new(5, 2);
        let style = Style::fg(Color::Red);
        term.write_styled(3, 0, "abcdef", style).unwrap();
        assert_eq!(term.row_text(0), "   ab");
        assert_eq!(term.cell(3, 0).unwrap().style, style);
        assert_eq!(term.cell(2, 0).unwrap().style, Style::default());
        assert!(term.cell(5, 0).is_none());

        // Rows outside the grid are ignored.
        term.write_styled(0, 7, "zz", style).unwrap();
        assert_eq!(term.contents(), "   ab\n");
        assert_eq!(term.write_count(), 2);
    }

    #[test]
    fn test_grid_multibyte_cells() {
        let mut term = GridTerminal::new(4, 1);
        term.write_styled(0, 0, "héé!", Style::default()).unwrap();
        assert_eq!(term.cell(2, 0).unwrap().ch, 'é');
        assert_eq!(term.row_text(0), "héé!");
    }

    #[test]
    fn test_grid_clear_region() {
        let mut term = GridTerminal::new(4, 3);
        for row in 0..3 {
            term.write_styled(0, row, "xxxx", Style::default()).unwrap();
        }
        term.clear_region(1, 1, 2, 5).unwrap();
        assert_eq!(term.contents(), "xxxx\nx  x\nx  x");
    }

    #[test]
    fn test_grid_cursor() {
        let mut term = GridTerminal::new(4, 3);
        term.hide_cursor().unwrap();
        term.set_cursor(2, 1).unwrap();
        assert!(!term.is_cursor_visible());
        term.show_cursor().unwrap();
        assert_eq!(term.cursor(), (2, 1));
        assert!(term.is_cursor_visible());
        assert_eq!(term.size().unwrap(), Size { width: 4, height: 3 });
    }

    #[test]
    fn test_color_mapping() {
        use crossterm::style::Color as C;
        assert_eq!(to_crossterm(Color::Default), C::Reset);
        assert_eq!(to_crossterm(Color::BrightBlack), C::DarkGrey);
        assert_eq!(to_crossterm(Color::Blue), C::DarkBlue);
    }
}
