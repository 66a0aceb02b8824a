//! Cursor-preserving edit controller for a markdown-highlighted editable
//! surface, with instance-scoped bounded undo/redo.

pub mod controller;
pub mod history;
pub mod surface;

pub use controller::{ChangeEvent, EditOutcome, EditorController, KeyAction, render_surface};
pub use surface::{CaretPosition, SurfaceNode, caret_path, parse_surface, text_len};
