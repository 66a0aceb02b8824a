//! Markdown engine — a pattern-based inline tokenizer with overlap
//! resolution, deliberately not a CommonMark parser. Supports a fixed
//! construct subset: headers, unordered lists, blockquotes, code, bold,
//! bold-italic, underline, strike, italic, links.

pub mod highlight;
pub mod inline;
pub mod span_guard;
pub mod strip;

pub use highlight::highlight;
pub use strip::strip;

/// Read-only rendering: highlight then strip, producing HTML where the
/// markdown delimiters are gone but the styling spans remain.
pub fn render(text: &str) -> String {
    strip(&highlight(text))
}
