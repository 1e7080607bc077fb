//! Undo/Redo history system.
//!
//! Every edit stores a full snapshot of the document (lines plus cursor)
//! taken before the mutation. Both stacks are bounded; the oldest entries
//! are evicted first.

use crate::cursor::Position;
use std::collections::VecDeque;

/// Default maximum number of undo levels.
pub const MAX_HISTORY_SIZE: usize = 1000;

/// A full copy of the document state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UndoState {
    pub lines: Vec<String>,
    pub cursor: Position,
}

impl UndoState {
    pub fn new(lines: Vec<String>, cursor: Position) -> Self {
        Self { lines, cursor }
    }
}

/// Manages undo/redo history.
#[derive(Debug)]
pub struct History {
    /// States that can be restored by undo (most recent at the back).
    undo_stack: VecDeque<UndoState>,
    /// States that can be restored by redo (most recent at the back).
    redo_stack: VecDeque<UndoState>,
    /// Maximum number of entries per stack.
    max_size: usize,
    /// Undo depth at the last save, `None` once that state is unreachable.
    saved_depth: Option<usize>,
}

impl Default for History {
    fn default() -> Self {
        Self::new(MAX_HISTORY_SIZE)
    }
}

impl History {
    /// Creates a new history with the given maximum size.
    pub fn new(max_size: usize) -> Self {
        Self {
            undo_stack: VecDeque::new(),
            redo_stack: VecDeque::new(),
            max_size: max_size.max(1),
            saved_depth: Some(0),
        }
    }

    /// Records the pre-edit state of a new edit.
    ///
    /// Any new edit invalidates the redo history.
    pub fn record(&mut self, state: UndoState) {
        if let Some(saved) = self.saved_depth {
            // The saved state lived in the redo stack we are about to drop.
            if saved > self.undo_stack.len() {
                self.saved_depth = None;
            }
        }
        self.redo_stack.clear();
        self.undo_stack.push_back(state);
        self.enforce_limit();
    }

    /// Pops the most recent state for undo, pushing `current` onto the redo stack.
    pub fn undo(&mut self, current: UndoState) -> Option<UndoState> {
        let state = self.undo_stack.pop_back()?;
        self.redo_stack.push_back(current);
        if self.redo_stack.len() > self.max_size {
            self.redo_stack.pop_front();
        }
        Some(state)
    }

    /// Pops the most recently undone state, pushing `current` onto the undo stack.
    pub fn redo(&mut self, current: UndoState) -> Option<UndoState> {
        let state = self.redo_stack.pop_back()?;
        self.undo_stack.push_back(current);
        self.enforce_limit();
        Some(state)
    }

    /// Returns true if undo is available.
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Returns true if redo is available.
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.redo_stack.len()
    }

    /// Marks the current depth as the saved state.
    pub fn mark_saved(&mut self) {
        self.saved_depth = Some(self.undo_stack.len());
    }

    /// Returns true if the document is back at the depth of the last save.
    pub fn is_at_save_point(&self) -> bool {
        self.saved_depth == Some(self.undo_stack.len())
    }

    /// Clears all history. The empty state counts as saved.
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.saved_depth = Some(0);
    }

    fn enforce_limit(&mut self) {
        while self.undo_stack.len() > self.max_size {
            self.undo_stack.pop_front();
            self.saved_depth = match self.saved_depth {
                Some(depth) if depth > 0 => Some(depth - 1),
                _ => None,
            };
        }
    }
}
