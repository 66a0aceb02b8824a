//! Markdown highlighting — wraps every recognized construct in a
//! `<span class="md-KIND">` while preserving the original delimiters, so an
//! editable surface can show the raw markdown with styling applied.

use super::inline::process_inline;

/// Convert raw markdown into span-annotated HTML.
///
/// Escapes `&`, `<`, `>` first, then applies block rules per line, then the
/// inline pass over every line. Never fails; malformed markdown degrades to
/// literal text.
pub fn highlight(text: &str) -> String {
    let escaped = escape_html(text);
    escaped
        .split('\n')
        .map(process_line)
        .map(|line| process_inline(&line))
        .collect::<Vec<_>>()
        .join("\n")
}

/// HTML-escape the three characters that matter for text content.
/// Quotes are deliberately left alone.
fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Block-level rules: headers, unordered lists, blockquotes. First match
/// wins; the longest hash prefix is checked first so `######` is never
/// mistaken for `#`.
fn process_line(line: &str) -> String {
    for level in (1..=6).rev() {
        let prefix: String = "#".repeat(level) + " ";
        if line.starts_with(&prefix) {
            return wrap(&format!("md-h{level}"), line);
        }
    }

    // List markers only qualify at column 0; indented variants untouched.
    if line.starts_with("- ") || line.starts_with("* ") || line.starts_with("+ ") {
        let marker = &line[..1];
        let rest = process_inline(&line[2..]);
        return format!("<span class=\"md-list\">{marker}</span> {rest}");
    }

    if let Some(content) = line.strip_prefix("&gt; ") {
        let rest = process_inline(content);
        return wrap("md-quote", &format!("&gt; {rest}"));
    }

    line.to_string()
}

fn wrap(class: &str, content: &str) -> String {
    format!("<span class=\"{class}\">{content}</span>")
}
