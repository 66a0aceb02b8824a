//! Edit controller — re-renders an editable surface on every keystroke
//! without losing the caret or breaking undo/redo. The host owns the event
//! plumbing; this side is text-in/html-out/caret-in/caret-out only.

use serde::Serialize;

use super::history::History;
use super::surface::{CaretPosition, caret_path, parse_surface, text_len};
use crate::markdown::highlight;

/// Change notification handed back to the host after every edit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChangeEvent {
    pub value: String,
    pub name: String,
}

/// Result of one edit cycle: the markup to set on the surface, where to
/// collapse the selection afterwards, and the change to notify.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EditOutcome {
    pub html: String,
    pub caret: CaretPosition,
    pub change: ChangeEvent,
}

/// What the host should do with a keydown before the input event fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    /// Swallow the key (Enter without Shift).
    PreventDefault,
    Undo,
    Redo,
    /// Let the browser handle it.
    Pass,
}

/// One controller per mounted editor; holds the bound value and the
/// instance-scoped history stacks.
#[derive(Debug)]
pub struct EditorController {
    value: String,
    name: String,
    history: History,
}

impl EditorController {
    pub fn new(initial: &str, name: &str) -> Self {
        EditorController {
            value: initial.to_string(),
            name: name.to_string(),
            history: History::new(),
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// An input event: the surface already holds `new_text` and the caret
    /// sits `caret_chars` characters in. Pushes the previous state, then
    /// re-renders with the caret restored at the same character offset.
    pub fn handle_input(&mut self, new_text: &str, caret_chars: usize) -> EditOutcome {
        let previous = std::mem::replace(&mut self.value, new_text.to_string());
        self.history.record(previous);
        self.render_at(caret_chars)
    }

    /// A paste event: carriage returns are stripped from the clipboard text,
    /// the selection `[sel_start, sel_end)` (character offsets) is replaced,
    /// and the caret lands after the inserted text. Counts as an edit.
    pub fn handle_paste(&mut self, clipboard: &str, sel_start: usize, sel_end: usize) -> EditOutcome {
        let clean: String = clipboard.chars().filter(|&c| c != '\r').collect();

        let total = self.value.chars().count();
        let start = sel_start.min(sel_end).min(total);
        let end = sel_start.max(sel_end).min(total);

        let mut next = String::with_capacity(self.value.len() + clean.len());
        next.extend(self.value.chars().take(start));
        next.push_str(&clean);
        next.extend(self.value.chars().skip(end));

        let caret = start + clean.chars().count();
        self.handle_input(&next, caret)
    }

    /// Classify a keydown. Enter without Shift is swallowed (one block per
    /// line; Shift+Enter passes through for literal newlines). Ctrl/Cmd+Z is
    /// undo; Ctrl/Cmd+Y or Ctrl/Cmd+Shift+Z is redo.
    pub fn key_action(&self, key: &str, shift: bool, ctrl_or_meta: bool) -> KeyAction {
        if key == "Enter" && !shift {
            return KeyAction::PreventDefault;
        }
        if ctrl_or_meta {
            return match key {
                "z" | "Z" if shift => KeyAction::Redo,
                "z" | "Z" => KeyAction::Undo,
                "y" | "Y" => KeyAction::Redo,
                _ => KeyAction::Pass,
            };
        }
        KeyAction::Pass
    }

    /// Restore the previous state; the caret moves to the end of the
    /// restored text. Returns `None` when there is nothing to undo.
    pub fn undo(&mut self) -> Option<EditOutcome> {
        let previous = self.history.undo(self.value.clone())?;
        self.value = previous;
        Some(self.render_at(usize::MAX))
    }

    /// Symmetric to [`undo`](Self::undo).
    pub fn redo(&mut self) -> Option<EditOutcome> {
        let next = self.history.redo(self.value.clone())?;
        self.value = next;
        Some(self.render_at(usize::MAX))
    }

    /// The host changed the bound value from outside; refresh the displayed
    /// markup without touching the history stacks.
    pub fn sync_external(&mut self, new_value: &str) -> String {
        self.value = new_value.to_string();
        highlight(&self.value)
    }

    fn render_at(&self, caret_chars: usize) -> EditOutcome {
        let (html, caret) = render_surface(&self.value, caret_chars);
        EditOutcome {
            html,
            caret,
            change: ChangeEvent {
                value: self.value.clone(),
                name: self.name.clone(),
            },
        }
    }
}

/// Render `text` and resolve `caret_chars` against the new tree. Offsets
/// past the end clamp to the end of the text.
pub fn render_surface(text: &str, caret_chars: usize) -> (String, CaretPosition) {
    let html = highlight(text);
    let tree = parse_surface(&html);
    let caret = caret_path(&tree, caret_chars.min(text_len(&tree)));
    (html, caret)
}
