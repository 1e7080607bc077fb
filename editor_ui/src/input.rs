//! Input handling and key mapping.

use astrax_core::Mode;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Represents an editor command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorCommand {
    // Text input
    InsertChar(char),
    InsertNewline,
    InsertTab,

    // Deletion
    DeleteBackward,
    DeleteForward,
    DeleteLine,
    DeleteToLineEnd,
    JoinLines,

    // Cursor movement
    MoveLeft,
    MoveRight,
    MoveUp,
    MoveDown,
    MoveWordForward,
    MoveWordBackward,
    MoveToLineStart,
    MoveToFirstNonBlank,
    MoveToLineEnd,
    MoveToBufferStart,
    MoveToBufferEnd,

    // Mode changes
    EnterInsert,
    Append,
    AppendLineEnd,
    InsertLineStart,
    OpenLineBelow,
    OpenLineAbove,
    EnterVisual,
    EnterCommand,
    EnterSearch,
    ExitToNormal,

    // Register
    YankLine,
    YankSelection,
    Paste,
    PasteBefore,

    // Undo/Redo
    Undo,
    Redo,

    // Search
    SearchNext,
    SearchPrevious,

    // Scrolling
    ScrollUp(usize),
    ScrollDown(usize),

    // Command and search prompt
    PromptInput(char),
    PromptBackspace,
    PromptSubmit,
    PromptCancel,
}

/// Maps key events to editor commands for the current mode.
///
/// Holds the first key of two-key normal mode sequences (`dd`, `yy`, `gg`).
#[derive(Debug, Default)]
pub struct InputHandler {
    pending: Option<char>,
}

impl InputHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the first key of an unfinished sequence.
    pub fn pending(&self) -> Option<char> {
        self.pending
    }

    pub fn handle_key(&mut self, key: KeyEvent, mode: Mode) -> Option<EditorCommand> {
        match mode {
            Mode::Insert => {
                self.pending = None;
                Self::insert_key(key)
            }
            Mode::Command | Mode::Search => {
                self.pending = None;
                Self::prompt_key(key)
            }
            Mode::Normal | Mode::Visual => self.normal_key(key, mode),
        }
    }

    fn insert_key(key: KeyEvent) -> Option<EditorCommand> {
        use EditorCommand::*;
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return None;
        }
        match key.code {
            KeyCode::Esc => Some(ExitToNormal),
            KeyCode::Enter => Some(InsertNewline),
            KeyCode::Tab => Some(InsertTab),
            KeyCode::Backspace => Some(DeleteBackward),
            KeyCode::Delete => Some(DeleteForward),
            KeyCode::Left => Some(MoveLeft),
            KeyCode::Right => Some(MoveRight),
            KeyCode::Up => Some(MoveUp),
            KeyCode::Down => Some(MoveDown),
            KeyCode::Home => Some(MoveToLineStart),
            KeyCode::End => Some(MoveToLineEnd),
            KeyCode::Char(ch) if !ch.is_control() => Some(InsertChar(ch)),
            _ => None,
        }
    }

    fn prompt_key(key: KeyEvent) -> Option<EditorCommand> {
        use EditorCommand::*;
        match key.code {
            KeyCode::Esc => Some(PromptCancel),
            KeyCode::Enter => Some(PromptSubmit),
            KeyCode::Backspace => Some(PromptBackspace),
            KeyCode::Char(ch) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                Some(PromptInput(ch))
            }
            _ => None,
        }
    }

    fn normal_key(&mut self, key: KeyEvent, mode: Mode) -> Option<EditorCommand> {
        use EditorCommand::*;

        if let Some(first) = self.pending.take() {
            return match (first, key.code) {
                ('d', KeyCode::Char('d')) => Some(DeleteLine),
                ('y', KeyCode::Char('y')) => Some(YankLine),
                ('g', KeyCode::Char('g')) => Some(MoveToBufferStart),
                _ => None,
            };
        }

        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return match key.code {
                KeyCode::Char('r') => Some(Redo),
                KeyCode::Char('e') => Some(ScrollDown(1)),
                KeyCode::Char('y') => Some(ScrollUp(1)),
                KeyCode::Char('d') => Some(ScrollDown(HALF_PAGE)),
                KeyCode::Char('u') => Some(ScrollUp(HALF_PAGE)),
                _ => None,
            };
        }

        // Keys shared by normal and visual mode.
        let motion = match key.code {
            KeyCode::Char('h') | KeyCode::Left => Some(MoveLeft),
            KeyCode::Char('l') | KeyCode::Right => Some(MoveRight),
            KeyCode::Char('k') | KeyCode::Up => Some(MoveUp),
            KeyCode::Char('j') | KeyCode::Down => Some(MoveDown),
            KeyCode::Char('w') => Some(MoveWordForward),
            KeyCode::Char('b') => Some(MoveWordBackward),
            KeyCode::Char('0') | KeyCode::Home => Some(MoveToLineStart),
            KeyCode::Char('^') => Some(MoveToFirstNonBlank),
            KeyCode::Char('$') | KeyCode::End => Some(MoveToLineEnd),
            KeyCode::Char('G') => Some(MoveToBufferEnd),
            KeyCode::Char('g') => {
                self.pending = Some('g');
                None
            }
            _ => None,
        };
        if motion.is_some() || self.pending.is_some() {
            return motion;
        }

        if mode == Mode::Visual {
            return match key.code {
                KeyCode::Esc | KeyCode::Char('v') => Some(ExitToNormal),
                KeyCode::Char('y') => Some(YankSelection),
                _ => None,
            };
        }

        match key.code {
            KeyCode::Char(first @ ('d' | 'y')) => {
                self.pending = Some(first);
                None
            }
            KeyCode::Char('i') => Some(EnterInsert),
            KeyCode::Char('I') => Some(InsertLineStart),
            KeyCode::Char('a') => Some(Append),
            KeyCode::Char('A') => Some(AppendLineEnd),
            KeyCode::Char('o') => Some(OpenLineBelow),
            KeyCode::Char('O') => Some(OpenLineAbove),
            KeyCode::Char('v') => Some(EnterVisual),
            KeyCode::Char(':') => Some(EnterCommand),
            KeyCode::Char('/') => Some(EnterSearch),
            KeyCode::Char('n') => Some(SearchNext),
            KeyCode::Char('N') => Some(SearchPrevious),
            KeyCode::Char('x') | KeyCode::Delete => Some(DeleteForward),
            KeyCode::Char('D') => Some(DeleteToLineEnd),
            KeyCode::Char('J') => Some(JoinLines),
            KeyCode::Char('p') => Some(Paste),
            KeyCode::Char('P') => Some(PasteBefore),
            KeyCode::Char('u') => Some(Undo),
            KeyCode::PageDown => Some(ScrollDown(PAGE)),
            KeyCode::PageUp => Some(ScrollUp(PAGE)),
            _ => None,
        }
    }
}

/// Lines moved by Ctrl-d / Ctrl-u.
const HALF_PAGE: usize = 10;

/// Lines moved by PageUp / PageDown.
const PAGE: usize = 20;
