//! Editor UI - Terminal rendering and input handling.
//!
//! This crate draws the editor through a cell-based [`Terminal`] using
//! crossterm and maps key events to editor commands.

pub mod app;
pub mod command;
pub mod input;
pub mod renderer;
pub mod terminal;
pub mod viewport;

pub use app::{dump, run, EditorApp};
pub use command::ExCommand;
pub use input::{EditorCommand, InputHandler};
pub use renderer::Renderer;
pub use terminal::{CrosstermTerminal, GridTerminal, Size, Terminal};
pub use viewport::Viewport;
