//! Editor Core - Pure text editor logic.
//!
//! This crate contains the buffer, history, search and syntax engines
//! without any dependency on a terminal.

pub mod buffer;
pub mod config;
pub mod cursor;
pub mod history;
pub mod mode;
pub mod search;
pub mod syntax;

pub use buffer::{Register, TextBuffer};
pub use config::EditorConfig;
pub use cursor::{Position, Range};
pub use history::{History, UndoState};
pub use mode::Mode;
pub use search::{Search, SearchDirection, SearchMatch, SearchOptions};
pub use syntax::{Highlighter, Language, LineState, Theme, Token, TokenKind};
