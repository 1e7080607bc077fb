//! Draws the buffer, gutter and status lines onto a [`Terminal`].

use crate::terminal::{Size, Terminal};
use crate::viewport::Viewport;
use astrax_core::cursor::char_len;
use astrax_core::syntax::{Highlighter, Style, Theme, Token};
use astrax_core::{EditorConfig, Mode, Position, Search, SearchMatch, TextBuffer};
use std::io;

/// Rows taken by the status line and the message line.
const STATUS_ROWS: usize = 2;

/// Minimum width of the line number gutter, separator included.
const MIN_GUTTER_WIDTH: usize = 4;

/// Width of the line number gutter for a document of `line_count` lines.
///
/// Numbers are right-aligned in `width - 1` cells, followed by one space.
pub fn gutter_width(line_count: usize) -> usize {
    let digits = line_count.max(1).to_string().len();
    (digits + 1).max(MIN_GUTTER_WIDTH)
}

/// Screen space taken by chrome, computed once per frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    pub gutter_width: usize,
    pub status_rows: usize,
}

/// A run of equally styled cells on one row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    /// Offset from the left edge of the text area.
    pub column: usize,
    pub text: String,
    pub style: Style,
}

/// Terminal renderer for a single buffer.
pub struct Renderer {
    viewport: Viewport,
    highlighter: Option<Box<dyn Highlighter>>,
    theme: Theme,
    config: EditorConfig,
    status_message: String,
    command_line: String,
    needs_full_clear: bool,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl Renderer {
    pub fn new(config: EditorConfig) -> Self {
        Self {
            viewport: Viewport::default(),
            highlighter: None,
            theme: config.resolve_theme(),
            config,
            status_message: String::new(),
            command_line: String::new(),
            needs_full_clear: true,
        }
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut Viewport {
        &mut self.viewport
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
        self.needs_full_clear = true;
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: EditorConfig) {
        self.config = config;
        self.needs_full_clear = true;
    }

    /// Attaches a highlighter (or none), resetting its carried state.
    pub fn set_highlighter(&mut self, highlighter: Option<Box<dyn Highlighter>>) {
        self.highlighter = highlighter;
        if let Some(h) = self.highlighter.as_mut() {
            h.reset();
        }
    }

    pub fn highlighter_language(&self) -> Option<&str> {
        self.highlighter.as_ref().map(|h| h.language())
    }

    /// Forces a full clear on the next render.
    pub fn invalidate(&mut self) {
        self.needs_full_clear = true;
    }

    pub fn set_status_message(&mut self, message: impl Into<String>) {
        self.status_message = message.into();
    }

    pub fn status_message(&self) -> &str {
        &self.status_message
    }

    /// Sets the pending input shown after the `:` or `/` prompt.
    pub fn set_command_line(&mut self, text: impl Into<String>) {
        self.command_line = text.into();
    }

    pub fn scroll(&mut self, delta: isize) {
        self.viewport.scroll(delta);
    }

    /// Computes the chrome for the current buffer and settings.
    pub fn layout(&self, buffer: &TextBuffer) -> Layout {
        Layout {
            gutter_width: if self.config.show_line_numbers {
                gutter_width(buffer.line_count())
            } else {
                0
            },
            status_rows: if self.config.show_status_bar {
                STATUS_ROWS
            } else {
                0
            },
        }
    }

    // ==================== Rendering ====================

    /// Draws a full frame.
    pub fn render<T: Terminal + ?Sized>(
        &mut self,
        terminal: &mut T,
        buffer: &TextBuffer,
        mode: Mode,
        search: Option<&Search>,
    ) -> io::Result<()> {
        let size = terminal.size()?;
        self.viewport.resize(size.width, size.height);
        let layout = self.layout(buffer);
        self.viewport
            .set_reservations(layout.status_rows, layout.gutter_width);
        self.viewport.ensure_visible(buffer.cursor());

        terminal.hide_cursor()?;
        if self.needs_full_clear {
            terminal.clear_region(0, 0, size.width, size.height)?;
            self.needs_full_clear = false;
        }

        let search = search.filter(|s| s.is_active());
        let mut highlighter = self.highlighter.take();
        let drawn = if self.config.syntax_highlighting {
            self.draw_text_area(terminal, buffer, search, &layout, size, highlighter.as_mut())
        } else {
            self.draw_text_area(terminal, buffer, search, &layout, size, None)
        };
        self.highlighter = highlighter;
        drawn?;

        if layout.status_rows > 0 {
            let status_row = self.viewport.text_rows();
            if status_row < size.height {
                self.draw_status_line(terminal, buffer, mode, status_row, size.width)?;
            }
            if status_row + 1 < size.height {
                self.draw_message_line(terminal, mode, status_row + 1, size.width)?;
            }
        }

        let (col, row) = self.cursor_screen_position(buffer, mode, &layout, size);
        terminal.set_cursor(col, row)?;
        terminal.show_cursor()?;
        terminal.flush()
    }

    fn draw_text_area<T: Terminal + ?Sized>(
        &self,
        terminal: &mut T,
        buffer: &TextBuffer,
        search: Option<&Search>,
        layout: &Layout,
        size: Size,
        mut highlighter: Option<&mut Box<dyn Highlighter>>,
    ) -> io::Result<()> {
        let top = self.viewport.top_line;
        if let Some(h) = highlighter.as_mut() {
            h.reset();
            for line in buffer.lines().iter().take(top) {
                h.update_state(line);
            }
        }

        let cursor = buffer.cursor();
        let rows = self.viewport.text_rows().min(size.height);
        for row in 0..rows {
            terminal.clear_region(0, row, size.width, 1)?;

            let index = top + row;
            let Some(line) = buffer.line(index) else {
                terminal.write_styled(0, row, "~", self.theme.filler)?;
                continue;
            };

            if layout.gutter_width > 0 {
                let number = format!("{:>w$} ", index + 1, w = layout.gutter_width - 1);
                terminal.write_styled(0, row, &number, self.theme.line_number)?;
            }

            let tokens = match highlighter.as_mut() {
                Some(h) => h.highlight_line(line),
                None => Vec::new(),
            };
            let matches = match search {
                Some(s) => s.find_in_line(line, index),
                None => Vec::new(),
            };
            for segment in self.compose_line(line, &tokens, &matches, Some(cursor)) {
                terminal.write_styled(
                    layout.gutter_width + segment.column,
                    row,
                    &segment.text,
                    segment.style,
                )?;
            }
        }
        Ok(())
    }

    /// Splits the visible part of a line into styled runs.
    ///
    /// Tokens colour their spans, search matches are overlaid on top (the
    /// match starting at `current` gets the current-match style), and the
    /// result is clipped to the viewport's columns.
    pub fn compose_line(
        &self,
        line: &str,
        tokens: &[Token],
        matches: &[SearchMatch],
        current: Option<Position>,
    ) -> Vec<Segment> {
        let chars: Vec<char> = line.chars().collect();
        let left = self.viewport.left_column;
        if left >= chars.len() {
            return Vec::new();
        }
        let right = (left + self.viewport.text_columns()).min(chars.len());

        let mut styles = vec![self.theme.text; chars.len()];
        for token in tokens {
            let style = self.theme.token_style(token.kind);
            for cell in styles.iter_mut().take(token.end()).skip(token.start) {
                *cell = style;
            }
        }
        for found in matches {
            let style = if Some(found.position) == current {
                self.theme.search_current
            } else {
                self.theme.search_match
            };
            for cell in styles
                .iter_mut()
                .take(found.end_column())
                .skip(found.position.column)
            {
                *cell = style;
            }
        }

        let mut segments: Vec<Segment> = Vec::new();
        for col in left..right {
            let style = styles[col];
            match segments.last_mut() {
                Some(segment) if segment.style == style => segment.text.push(chars[col]),
                _ => segments.push(Segment {
                    column: col - left,
                    text: chars[col].to_string(),
                    style,
                }),
            }
        }
        segments
    }

    fn draw_status_line<T: Terminal + ?Sized>(
        &self,
        terminal: &mut T,
        buffer: &TextBuffer,
        mode: Mode,
        row: usize,
        width: usize,
    ) -> io::Result<()> {
        let bar = self.theme.status_bar;
        terminal.write_styled(0, row, &" ".repeat(width), bar)?;

        let mode_text = format!(" {} ", mode.name());
        let name = buffer
            .filename()
            .map(|path| path.display().to_string())
            .unwrap_or_else(|| "[No Name]".to_string());
        let flag = if buffer.is_modified() { " [+]" } else { "" };
        let file_text = format!(" {}{} ", name, flag);

        let cursor = buffer.cursor();
        let position = format!(
            "Ln {}, Col {} ({} lines)",
            cursor.line + 1,
            cursor.column + 1,
            buffer.line_count()
        );

        // The left part gives way to the position info.
        let position: String = position.chars().take(width).collect();
        let position_len = char_len(&position);
        let mut budget = width.saturating_sub(position_len);
        let mut col = 0;
        for (text, style) in [(&mode_text, self.theme.mode_style(mode)), (&file_text, bar)] {
            let visible: String = text.chars().take(budget).collect();
            let len = char_len(&visible);
            if len > 0 {
                terminal.write_styled(col, row, &visible, style)?;
            }
            col += len;
            budget -= len;
        }

        terminal.write_styled(width.saturating_sub(position_len), row, &position, bar)
    }

    fn draw_message_line<T: Terminal + ?Sized>(
        &self,
        terminal: &mut T,
        mode: Mode,
        row: usize,
        width: usize,
    ) -> io::Result<()> {
        terminal.clear_region(0, row, width, 1)?;
        let text = match mode.prompt() {
            Some(prompt) => format!("{}{}", prompt, self.command_line),
            None => self.status_message.clone(),
        };
        let text: String = text.chars().take(width).collect();
        if text.is_empty() {
            return Ok(());
        }
        terminal.write_styled(0, row, &text, self.theme.message)
    }

    fn cursor_screen_position(
        &self,
        buffer: &TextBuffer,
        mode: Mode,
        layout: &Layout,
        size: Size,
    ) -> (usize, usize) {
        let max_col = size.width.saturating_sub(1);
        let max_row = size.height.saturating_sub(1);

        if mode.prompt().is_some() && layout.status_rows > 0 {
            let col = 1 + char_len(&self.command_line);
            return (col.min(max_col), max_row);
        }

        let cursor = buffer.cursor();
        let col = cursor.column - self.viewport.left_column + layout.gutter_width;
        let row = cursor.line - self.viewport.top_line;
        debug_assert!(row < self.viewport.text_rows());
        debug_assert!(col < layout.gutter_width + self.viewport.text_columns());
        (col.min(max_col), row.min(max_row))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terminal::GridTerminal;
    use astrax_core::syntax::{Color, TokenKind};
    use astrax_core::{Language, SearchOptions};

    fn cpp_renderer(config: EditorConfig) -> Renderer {
        let mut renderer = Renderer::new(config);
        renderer.set_highlighter(Language::Cpp.highlighter());
        renderer
    }

    fn numbered(count: usize) -> TextBuffer {
        let text: Vec<String> = (0..count).map(|i| format!("line {}", i)).collect();
        TextBuffer::from_str(&text.join("\n"))
    }

    #[test]
    fn test_gutter_width() {
        assert_eq!(gutter_width(0), 4);
        assert_eq!(gutter_width(1), 4);
        assert_eq!(gutter_width(999), 4);
        assert_eq!(gutter_width(1000), 5);
        assert_eq!(gutter_width(12345), 6);
    }

    #[test]
    fn test_render_text_and_filler() {
        let buffer = TextBuffer::from_str("int x = 5;\nfoo");
        let mut renderer = cpp_renderer(EditorConfig::default());
        let mut term = GridTerminal::new(50, 6);
        renderer.render(&mut term, &buffer, Mode::Normal, None).unwrap();

        assert_eq!(term.row_text(0), "  1 int x = 5;");
        assert_eq!(term.row_text(1), "  2 foo");
        assert_eq!(term.row_text(2), "~");
        assert_eq!(term.row_text(3), "~");

        let theme = renderer.theme().clone();
        assert_eq!(term.cell(0, 0).unwrap().style, theme.line_number);
        assert_eq!(term.cell(4, 0).unwrap().style, theme.token_style(TokenKind::Type));
        assert_eq!(term.cell(8, 0).unwrap().style, theme.text);
        assert_eq!(
            term.cell(12, 0).unwrap().style,
            theme.token_style(TokenKind::Number)
        );
        assert_eq!(term.cell(0, 2).unwrap().style.fg, Color::Blue);

        assert_eq!(term.cursor(), (4, 0));
        assert!(term.is_cursor_visible());
    }

    #[test]
    fn test_status_line() {
        let mut buffer = TextBuffer::from_str("int x = 5;\nfoo");
        let mut renderer = Renderer::default();
        let mut term = GridTerminal::new(50, 6);
        renderer.render(&mut term, &buffer, Mode::Normal, None).unwrap();

        let status = term.row_text(4);
        assert!(status.starts_with(" NORMAL  [No Name] "));
        assert!(status.ends_with("Ln 1, Col 1 (2 lines)"));
        assert_eq!(term.cell(1, 4).unwrap().style, renderer.theme().mode_style(Mode::Normal));
        assert_eq!(term.cell(30, 4).unwrap().style, renderer.theme().status_bar);

        buffer.set_filename("main.cpp");
        buffer.move_cursor(1, 1);
        buffer.insert_char('!');
        renderer.render(&mut term, &buffer, Mode::Insert, None).unwrap();
        let status = term.row_text(4);
        assert!(status.starts_with(" INSERT  main.cpp [+] "));
        assert!(status.ends_with("Ln 2, Col 3 (2 lines)"));
    }

    #[test]
    fn test_status_line_truncates_left_part() {
        let buffer = TextBuffer::from_str("a\nb");
        let mut renderer = Renderer::default();
        let mut term = GridTerminal::new(30, 4);
        renderer.render(&mut term, &buffer, Mode::Normal, None).unwrap();
        assert_eq!(term.row_text(2), " NORMAL  Ln 1, Col 1 (2 lines)");
    }

    /// Grid terminal that rejects writes running past the right edge.
    struct EdgeCheckedTerminal(GridTerminal);

    impl Terminal for EdgeCheckedTerminal {
        fn size(&self) -> io::Result<Size> {
            self.0.size()
        }

        fn write_styled(&mut self, col: usize, row: usize, text: &str, style: Style) -> io::Result<()> {
            let width = self.0.size()?.width;
            assert!(
                col + char_len(text) <= width,
                "write of {:?} at column {} overruns width {}",
                text,
                col,
                width
            );
            self.0.write_styled(col, row, text, style)
        }

        fn clear_region(&mut self, col: usize, row: usize, width: usize, height: usize) -> io::Result<()> {
            self.0.clear_region(col, row, width, height)
        }

        fn set_cursor(&mut self, col: usize, row: usize) -> io::Result<()> {
            self.0.set_cursor(col, row)
        }

        fn hide_cursor(&mut self) -> io::Result<()> {
            self.0.hide_cursor()
        }

        fn show_cursor(&mut self) -> io::Result<()> {
            self.0.show_cursor()
        }

        fn flush(&mut self) -> io::Result<()> {
            self.0.flush()
        }
    }

    #[test]
    fn test_narrow_status_and_message_stay_on_screen() {
        let buffer = TextBuffer::from_str("a\nb");
        let mut renderer = Renderer::default();
        renderer.set_status_message("a rather long status message");
        let mut term = EdgeCheckedTerminal(GridTerminal::new(10, 4));
        renderer.render(&mut term, &buffer, Mode::Normal, None).unwrap();

        assert_eq!(term.0.row_text(2), "Ln 1, Col");
        assert_eq!(term.0.row_text(3), "a rather l");
    }

    #[test]
    fn test_render_coalesces_equal_styles() {
        let buffer = TextBuffer::from_str("int value");
        let config = EditorConfig {
            show_line_numbers: false,
            show_status_bar: false,
            ..EditorConfig::default()
        };
        let mut renderer = cpp_renderer(config);
        let mut term = GridTerminal::new(20, 1);
        renderer.render(&mut term, &buffer, Mode::Normal, None).unwrap();

        // "int" as a type run, " value" as one default run.
        assert_eq!(term.row_text(0), "int value");
        assert_eq!(term.write_count(), 2);

        renderer.set_highlighter(None);
        renderer.render(&mut term, &buffer, Mode::Normal, None).unwrap();
        assert_eq!(term.write_count(), 3);
    }

    #[test]
    fn test_message_and_command_line() {
        let buffer = TextBuffer::new();
        let mut renderer = Renderer::default();
        let mut term = GridTerminal::new(40, 5);

        renderer.set_status_message("written");
        renderer.render(&mut term, &buffer, Mode::Normal, None).unwrap();
        assert_eq!(term.row_text(4), "written");

        renderer.set_command_line("wq");
        renderer.render(&mut term, &buffer, Mode::Command, None).unwrap();
        assert_eq!(term.row_text(4), ":wq");
        assert_eq!(term.cursor(), (3, 4));

        renderer.set_command_line("foo");
        renderer.render(&mut term, &buffer, Mode::Search, None).unwrap();
        assert_eq!(term.row_text(4), "/foo");
    }

    #[test]
    fn test_scrolls_to_cursor() {
        let mut buffer = numbered(40);
        buffer.move_to_line(30);
        let mut renderer = Renderer::default();
        let mut term = GridTerminal::new(40, 24);
        renderer.render(&mut term, &buffer, Mode::Normal, None).unwrap();

        assert_eq!(renderer.viewport().top_line, 9);
        assert_eq!(term.row_text(21), " 31 line 30");
        assert_eq!(term.cursor(), (4, 21));
    }

    #[test]
    fn test_highlighter_state_replayed_above_viewport() {
        let buffer = TextBuffer::from_str("/* open\na\nb\nc\nd */ int");
        let config = EditorConfig {
            show_status_bar: false,
            ..EditorConfig::default()
        };
        let mut renderer = cpp_renderer(config);
        let mut term = GridTerminal::new(20, 3);
        let mut buffer = buffer;
        buffer.move_to_buffer_end();
        renderer.render(&mut term, &buffer, Mode::Normal, None).unwrap();

        assert_eq!(renderer.viewport().top_line, 2);
        let comment = renderer.theme().token_style(TokenKind::Comment);
        assert_eq!(term.cell(4, 0).unwrap().style, comment);
        assert_eq!(term.cell(4, 2).unwrap().style, comment);
        assert_eq!(
            term.cell(9, 2).unwrap().style,
            renderer.theme().token_style(TokenKind::Type)
        );

        // A second frame gives the same result.
        renderer.render(&mut term, &buffer, Mode::Normal, None).unwrap();
        assert_eq!(term.cell(4, 0).unwrap().style, comment);
    }

    #[test]
    fn test_highlighting_disabled() {
        let buffer = TextBuffer::from_str("int x;");
        let config = EditorConfig {
            syntax_highlighting: false,
            show_line_numbers: false,
            ..EditorConfig::default()
        };
        let mut renderer = cpp_renderer(config);
        let mut term = GridTerminal::new(20, 4);
        renderer.render(&mut term, &buffer, Mode::Normal, None).unwrap();
        assert_eq!(term.row_text(0), "int x;");
        assert_eq!(term.cell(0, 0).unwrap().style, renderer.theme().text);
        assert_eq!(term.cursor(), (0, 0));
    }

    #[test]
    fn test_search_overlay() {
        let mut buffer = TextBuffer::from_str("foo bar foo");
        buffer.set_cursor(Position::new(0, 8));
        let mut search = Search::new();
        search.set_pattern("foo", SearchOptions::default());

        let mut renderer = Renderer::default();
        let mut term = GridTerminal::new(30, 4);
        renderer
            .render(&mut term, &buffer, Mode::Normal, Some(&search))
            .unwrap();

        let theme = renderer.theme();
        assert_eq!(term.cell(4, 0).unwrap().style, theme.search_match);
        assert_eq!(term.cell(7, 0).unwrap().style, theme.text);
        assert_eq!(term.cell(12, 0).unwrap().style, theme.search_current);
        assert_eq!(term.cell(14, 0).unwrap().style, theme.search_current);
    }

    #[test]
    fn test_compose_line_clips_and_coalesces() {
        let mut renderer = Renderer::default();
        let viewport = renderer.viewport_mut();
        viewport.resize(5, 10);
        viewport.set_reservations(0, 0);
        viewport.left_column = 2;

        let tokens = [Token::new(3, 2, TokenKind::Keyword)];
        let segments = renderer.compose_line("abcdefgh", &tokens, &[], None);
        let theme = renderer.theme();
        assert_eq!(
            segments,
            vec![
                Segment {
                    column: 0,
                    text: "c".to_string(),
                    style: theme.text,
                },
                Segment {
                    column: 1,
                    text: "de".to_string(),
                    style: theme.token_style(TokenKind::Keyword),
                },
                Segment {
                    column: 3,
                    text: "fg".to_string(),
                    style: theme.text,
                },
            ]
        );

        assert!(renderer.compose_line("ab", &[], &[], None).is_empty());
    }

    #[test]
    fn test_horizontal_scroll() {
        let mut buffer = TextBuffer::from_str(&"x".repeat(30));
        buffer.move_to_line_end();
        let mut renderer = Renderer::default();
        let mut term = GridTerminal::new(14, 4);
        renderer.render(&mut term, &buffer, Mode::Normal, None).unwrap();

        // 10 text columns after the gutter; the cursor sits past the last char.
        assert_eq!(renderer.viewport().left_column, 21);
        assert_eq!(term.row_text(0), format!("  1 {}", "x".repeat(9)));
        assert_eq!(term.cursor(), (13, 0));
    }

    #[test]
    fn test_set_highlighter_resets_state() {
        let mut h = Language::Cpp.highlighter().unwrap();
        h.highlight_line("/* open");
        assert!(h.in_multiline_construct());

        let mut renderer = Renderer::default();
        renderer.set_highlighter(Some(h));
        assert_eq!(renderer.highlighter_language(), Some("C++"));
        renderer.set_highlighter(None);
        assert_eq!(renderer.highlighter_language(), None);
    }

    #[test]
    fn test_tiny_terminal() {
        let buffer = numbered(3);
        let mut renderer = Renderer::default();
        let mut term = GridTerminal::new(3, 1);
        renderer.render(&mut term, &buffer, Mode::Normal, None).unwrap();
        assert_eq!(term.cursor(), (2, 0));
    }
}
