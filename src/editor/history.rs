//! Undo/redo stacks for the edit controller. Instance-scoped, bounded.

/// Maximum retained undo states; the oldest is evicted first.
pub const MAX_HISTORY: usize = 100;

#[derive(Debug, Default)]
pub struct History {
    undo: Vec<String>,
    redo: Vec<String>,
}

impl History {
    pub fn new() -> Self {
        History::default()
    }

    /// Record a new edit: push the previous state, evict past the bound,
    /// and clear the redo stack. Undo/redo themselves never call this.
    pub fn record(&mut self, state: String) {
        self.undo.push(state);
        if self.undo.len() > MAX_HISTORY {
            self.undo.remove(0);
        }
        self.redo.clear();
    }

    /// Pop the previous state, parking `current` on the redo stack.
    pub fn undo(&mut self, current: String) -> Option<String> {
        let previous = self.undo.pop()?;
        self.redo.push(current);
        Some(previous)
    }

    /// Pop the next state, parking `current` on the undo stack.
    pub fn redo(&mut self, current: String) -> Option<String> {
        let next = self.redo.pop()?;
        self.undo.push(current);
        Some(next)
    }

    pub fn undo_depth(&self) -> usize {
        self.undo.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.redo.len()
    }
}
