//! Line-oriented text buffer with cursor, undo/redo and a yank register.

use crate::cursor::{self, char_len, char_to_byte, Position, Range};
use crate::history::{History, UndoState};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// The yank register.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Register {
    /// Yanked text.
    pub text: String,
    /// Whether a whole line was yanked.
    pub linewise: bool,
}

impl Register {
    pub fn is_empty(&self) -> bool {
        self.text.is_empty() && !self.linewise
    }
}

/// A text buffer stored as a sequence of lines.
///
/// The buffer always holds at least one line and keeps the cursor inside
/// the document: `cursor.line < line_count()` and
/// `cursor.column <= line_len(cursor.line)`.
#[derive(Debug)]
pub struct TextBuffer {
    lines: Vec<String>,
    cursor: Position,
    filename: Option<PathBuf>,
    modified: bool,
    history: History,
    register: Register,
}

impl Default for TextBuffer {
    fn default() -> Self {
        Self::new()
    }
}

/// Splits text into lines, stripping one trailing `\r` from each line.
fn split_lines(text: &str) -> Vec<String> {
    let mut lines: Vec<String> = text
        .lines()
        .map(|line| line.strip_suffix('\r').unwrap_or(line).to_string())
        .collect();
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

impl TextBuffer {
    /// Creates a new buffer holding one empty line.
    pub fn new() -> Self {
        Self {
            lines: vec![String::new()],
            cursor: Position::default(),
            filename: None,
            modified: false,
            history: History::default(),
            register: Register::default(),
        }
    }

    /// Creates a buffer from a string.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(text: &str) -> Self {
        Self {
            lines: split_lines(text),
            ..Self::new()
        }
    }

    // ==================== Content Access ====================

    /// Returns the number of lines (always at least 1).
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Returns the line at the given index.
    pub fn line(&self, index: usize) -> Option<&str> {
        self.lines.get(index).map(String::as_str)
    }

    /// Returns the length of a line in characters, 0 past the end.
    pub fn line_len(&self, index: usize) -> usize {
        self.line(index).map(char_len).unwrap_or(0)
    }

    /// Returns all lines.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Returns the whole document, lines joined by `\n`.
    pub fn content(&self) -> String {
        self.lines.join("\n")
    }

    /// Returns true if the buffer holds a single empty line.
    pub fn is_empty(&self) -> bool {
        self.lines.len() == 1 && self.lines[0].is_empty()
    }

    /// Returns whether the buffer has unsaved changes.
    pub fn is_modified(&self) -> bool {
        self.modified
    }

    pub fn filename(&self) -> Option<&Path> {
        self.filename.as_deref()
    }

    pub fn set_filename<P: AsRef<Path>>(&mut self, path: P) {
        self.filename = Some(path.as_ref().to_path_buf());
    }

    /// Returns the yank register.
    pub fn register(&self) -> &Register {
        &self.register
    }

    // ==================== Cursor ====================

    pub fn cursor(&self) -> Position {
        self.cursor
    }

    /// Sets the cursor, clamped to the document.
    pub fn set_cursor(&mut self, pos: Position) {
        let line = pos.line.min(self.lines.len() - 1);
        self.cursor = Position::new(line, pos.column.min(self.line_len(line)));
    }

    /// Moves the cursor by a delta. Vertical movement is applied first and
    /// the column is re-clamped to the new line.
    pub fn move_cursor(&mut self, dx: isize, dy: isize) {
        if dy != 0 {
            let line = self
                .cursor
                .line
                .saturating_add_signed(dy)
                .min(self.lines.len() - 1);
            self.cursor.line = line;
            self.cursor.column = self.cursor.column.min(self.line_len(line));
        }
        if dx != 0 {
            self.cursor.column = self
                .cursor
                .column
                .saturating_add_signed(dx)
                .min(self.line_len(self.cursor.line));
        }
    }

    pub fn move_to_line_start(&mut self) {
        self.cursor.column = 0;
    }

    pub fn move_to_line_end(&mut self) {
        self.cursor.column = self.line_len(self.cursor.line);
    }

    /// Moves to the first non-whitespace character of the line.
    pub fn move_to_first_non_blank(&mut self) {
        self.cursor.column = cursor::first_non_blank(&self.lines[self.cursor.line]);
    }

    pub fn move_to_buffer_start(&mut self) {
        self.cursor = Position::default();
    }

    pub fn move_to_buffer_end(&mut self) {
        let line = self.lines.len() - 1;
        self.cursor = Position::new(line, self.line_len(line));
    }

    /// Jumps to the start of a line (clamped to the last line).
    pub fn move_to_line(&mut self, line: usize) {
        self.set_cursor(Position::new(line, 0));
    }

    pub fn move_word_forward(&mut self) {
        self.cursor = cursor::word_forward(&self.lines, self.cursor);
    }

    pub fn move_word_backward(&mut self) {
        self.cursor = cursor::word_backward(&self.lines, self.cursor);
    }

    // ==================== Editing ====================

    /// Inserts a character at the cursor. `'\n'` splits the line.
    pub fn insert_char(&mut self, ch: char) {
        if ch == '\n' {
            self.insert_newline();
            return;
        }
        self.begin_edit();
        self.insert_char_raw(ch);
        self.finish_edit();
    }

    /// Inserts a string at the cursor as a single undoable edit.
    pub fn insert_str(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        self.begin_edit();
        self.insert_text_raw(text);
        self.finish_edit();
    }

    /// Splits the current line at the cursor.
    pub fn insert_newline(&mut self) {
        self.begin_edit();
        self.split_line_raw();
        self.finish_edit();
    }

    /// Deletes the character before the cursor (backspace).
    ///
    /// At column 0 the current line is joined onto the previous one.
    pub fn delete_char_before(&mut self) {
        let Position { line, column } = self.cursor;
        if column > 0 {
            self.begin_edit();
            let text = &mut self.lines[line];
            let at = char_to_byte(text, column - 1);
            text.remove(at);
            self.cursor.column -= 1;
            self.finish_edit();
        } else if line > 0 {
            self.begin_edit();
            let current = self.lines.remove(line);
            let join = self.line_len(line - 1);
            self.lines[line - 1].push_str(&current);
            self.cursor = Position::new(line - 1, join);
            self.finish_edit();
        }
    }

    /// Deletes the character under the cursor (delete key).
    ///
    /// At the end of a line the next line is joined onto this one.
    pub fn delete_char_at(&mut self) {
        let Position { line, column } = self.cursor;
        if column < self.line_len(line) {
            self.begin_edit();
            let text = &mut self.lines[line];
            let at = char_to_byte(text, column);
            text.remove(at);
            self.finish_edit();
        } else if line + 1 < self.lines.len() {
            self.begin_edit();
            let next = self.lines.remove(line + 1);
            self.lines[line].push_str(&next);
            self.finish_edit();
        }
    }

    /// Deletes the current line. The only line is cleared instead.
    pub fn delete_line(&mut self) {
        if self.lines.len() == 1 && self.lines[0].is_empty() {
            return;
        }
        self.begin_edit();
        if self.lines.len() > 1 {
            self.lines.remove(self.cursor.line);
            self.cursor.line = self.cursor.line.min(self.lines.len() - 1);
        } else {
            self.lines[0].clear();
        }
        self.cursor.column = 0;
        self.finish_edit();
    }

    /// Deletes from the cursor to the end of the line.
    pub fn delete_to_line_end(&mut self) {
        let Position { line, column } = self.cursor;
        if column >= self.line_len(line) {
            return;
        }
        self.begin_edit();
        let text = &mut self.lines[line];
        let at = char_to_byte(text, column);
        text.truncate(at);
        self.finish_edit();
    }

    /// Opens an empty line below the cursor and moves onto it.
    pub fn insert_line_below(&mut self) {
        self.begin_edit();
        self.lines.insert(self.cursor.line + 1, String::new());
        self.cursor = Position::new(self.cursor.line + 1, 0);
        self.finish_edit();
    }

    /// Opens an empty line above the cursor and moves onto it.
    pub fn insert_line_above(&mut self) {
        self.begin_edit();
        self.lines.insert(self.cursor.line, String::new());
        self.cursor.column = 0;
        self.finish_edit();
    }

    /// Joins the current line with the next one.
    ///
    /// A single space separates them when both are non-empty.
    pub fn join_lines(&mut self) {
        let line = self.cursor.line;
        if line + 1 >= self.lines.len() {
            return;
        }
        self.begin_edit();
        let next = self.lines.remove(line + 1);
        let current = &mut self.lines[line];
        let mut join = char_len(current);
        if !current.is_empty() && !next.is_empty() {
            current.push(' ');
            join += 1;
        }
        current.push_str(&next);
        self.cursor.column = join;
        self.finish_edit();
    }

    /// Applies an arbitrary transformation to the lines as one undoable edit.
    ///
    /// The buffer invariants are restored afterwards: an emptied line list
    /// gets one empty line and the cursor is clamped.
    pub fn edit_lines<R>(&mut self, f: impl FnOnce(&mut Vec<String>) -> R) -> R {
        self.begin_edit();
        let result = f(&mut self.lines);
        if self.lines.is_empty() {
            self.lines.push(String::new());
        }
        self.set_cursor(self.cursor);
        self.finish_edit();
        result
    }

    // ==================== Undo/Redo ====================

    /// Undoes the last edit. Returns false when there was nothing to undo.
    pub fn undo(&mut self) -> bool {
        let current = self.snapshot();
        match self.history.undo(current) {
            Some(state) => {
                self.restore(state);
                log::debug!("undo, depth now {}", self.history.undo_depth());
                true
            }
            None => false,
        }
    }

    /// Redoes the last undone edit. Returns false when there was nothing to redo.
    pub fn redo(&mut self) -> bool {
        let current = self.snapshot();
        match self.history.redo(current) {
            Some(state) => {
                self.restore(state);
                log::debug!("redo, depth now {}", self.history.undo_depth());
                true
            }
            None => false,
        }
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn undo_depth(&self) -> usize {
        self.history.undo_depth()
    }

    pub fn redo_depth(&self) -> usize {
        self.history.redo_depth()
    }

    /// Marks the current state as saved.
    pub fn mark_saved(&mut self) {
        self.history.mark_saved();
        self.modified = false;
    }

    fn snapshot(&self) -> UndoState {
        UndoState::new(self.lines.clone(), self.cursor)
    }

    fn restore(&mut self, state: UndoState) {
        self.lines = state.lines;
        self.cursor = state.cursor;
        self.modified = !self.history.is_at_save_point();
    }

    /// Records the pre-edit state; clears the redo stack.
    fn begin_edit(&mut self) {
        let state = self.snapshot();
        self.history.record(state);
    }

    fn finish_edit(&mut self) {
        self.modified = true;
    }

    // ==================== Clipboard ====================

    /// Copies the current line into the register.
    pub fn yank_line(&mut self) {
        self.register = Register {
            text: self.lines[self.cursor.line].clone(),
            linewise: true,
        };
    }

    /// Copies the text covered by `range` into the register.
    pub fn yank_range(&mut self, range: Range) {
        self.register = Register {
            text: self.text_in_range(range),
            linewise: false,
        };
    }

    /// Returns the text covered by `range`, lines joined by `\n`.
    pub fn text_in_range(&self, range: Range) -> String {
        let range = range.normalized();
        let last = self.lines.len() - 1;
        let start_line = range.start.line.min(last);
        let end_line = range.end.line.min(last);
        let mut parts = Vec::new();
        for index in start_line..=end_line {
            let line = &self.lines[index];
            let from = if index == start_line { range.start.column } else { 0 };
            let to = if index == end_line {
                range.end.column
            } else {
                char_len(line)
            };
            parts.push(cursor::char_slice(line, from, to));
        }
        parts.join("\n")
    }

    /// Pastes the register after the cursor (linewise: below the current line).
    pub fn paste(&mut self) {
        if self.register.is_empty() {
            return;
        }
        let register = self.register.clone();
        self.begin_edit();
        if register.linewise {
            self.lines.insert(self.cursor.line + 1, register.text);
            self.cursor = Position::new(self.cursor.line + 1, 0);
        } else {
            self.insert_text_raw(&register.text);
        }
        self.finish_edit();
    }

    /// Pastes the register before the cursor (linewise: above the current line).
    pub fn paste_before(&mut self) {
        if self.register.is_empty() {
            return;
        }
        let register = self.register.clone();
        self.begin_edit();
        if register.linewise {
            self.lines.insert(self.cursor.line, register.text);
            self.cursor.column = 0;
        } else {
            let at = self.cursor;
            self.insert_text_raw(&register.text);
            self.cursor = at;
        }
        self.finish_edit();
    }

    // ==================== File I/O ====================

    /// Loads a file, replacing the whole buffer.
    ///
    /// On failure the buffer is left untouched.
    pub fn load<P: AsRef<Path>>(&mut self, path: P) -> io::Result<()> {
        let path = path.as_ref();
        let bytes = fs::read(path)?;
        let text =
            String::from_utf8(bytes).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        self.lines = split_lines(&text);
        self.cursor = Position::default();
        self.history.clear();
        self.modified = false;
        self.filename = Some(path.to_path_buf());
        log::debug!("loaded {} lines from {}", self.lines.len(), path.display());
        Ok(())
    }

    /// Saves the buffer to `path` and marks the save point.
    pub fn save<P: AsRef<Path>>(&mut self, path: P) -> io::Result<()> {
        let path = path.as_ref();
        fs::write(path, self.content())?;
        self.filename = Some(path.to_path_buf());
        self.mark_saved();
        log::debug!("saved {} lines to {}", self.lines.len(), path.display());
        Ok(())
    }

    /// Saves the buffer to its current filename.
    pub fn save_current(&mut self) -> io::Result<()> {
        match self.filename.clone() {
            Some(path) => self.save(path),
            None => Err(io::Error::new(io::ErrorKind::NotFound, "No file name")),
        }
    }

    // ==================== Raw mutation helpers ====================

    fn insert_char_raw(&mut self, ch: char) {
        let text = &mut self.lines[self.cursor.line];
        let at = char_to_byte(text, self.cursor.column);
        text.insert(at, ch);
        self.cursor.column += 1;
    }

    fn split_line_raw(&mut self) {
        let Position { line, column } = self.cursor;
        let text = &mut self.lines[line];
        let at = char_to_byte(text, column);
        let rest = text.split_off(at);
        self.lines.insert(line + 1, rest);
        self.cursor = Position::new(line + 1, 0);
    }

    fn insert_text_raw(&mut self, text: &str) {
        for ch in text.chars() {
            match ch {
                '\n' => self.split_line_raw(),
                '\r' => {}
                _ => self.insert_char_raw(ch),
            }
        }
    }
}
